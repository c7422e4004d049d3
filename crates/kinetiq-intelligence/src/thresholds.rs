// ABOUTME: Threshold classifier mapping metric values to qualitative levels and 0-100 scores
// ABOUTME: ThresholdTable with validated tiers, optional bounds, and level enums used by analyzers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use std::fmt;

use kinetiq_core::errors::{AnalysisError, EngineResult};
use serde::{Deserialize, Serialize};

/// Fraction of the top cutoff that maps to a score of 100
pub const SCORE_CEILING_FACTOR: f64 = 1.2;

/// Strength and power levels used by force and jump metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceLevel {
    /// Top tier
    Elite,
    /// Second tier
    Advanced,
    /// Third tier
    Intermediate,
    /// Below every tier
    Developing,
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Elite => "Elite",
            Self::Advanced => "Advanced",
            Self::Intermediate => "Intermediate",
            Self::Developing => "Developing",
        };
        f.write_str(label)
    }
}

/// Quality grades used by sprint metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityLevel {
    /// Top tier
    Excellent,
    /// Second tier
    Good,
    /// Third tier
    Average,
    /// Below every tier
    NeedsImprovement,
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::NeedsImprovement => "Needs Improvement",
        };
        f.write_str(label)
    }
}

/// Which side of a cutoff counts as reaching the tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Tier reached when `value >= cutoff`; cutoffs strictly decrease
    HigherIsBetter,
    /// Tier reached when `value <= cutoff`; cutoffs strictly increase
    LowerIsBetter,
}

/// One level and the cutoff that reaches it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTier<L> {
    /// Level awarded
    pub level: L,
    /// Cutoff value
    pub cutoff: f64,
}

/// Per-metric threshold table
///
/// Tiers are ordered best first. A value that reaches no tier receives the
/// floor level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable<L> {
    metric: String,
    polarity: Polarity,
    tiers: Vec<ThresholdTier<L>>,
    floor: L,
    bounds: Option<(f64, f64)>,
}

impl<L: Clone> ThresholdTable<L> {
    /// Build a higher-is-better table with strictly decreasing cutoffs
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `tiers` is empty, a cutoff is not finite,
    /// cutoffs do not strictly decrease, or the top cutoff is not positive
    pub fn new(metric: impl Into<String>, tiers: Vec<(L, f64)>, floor: L) -> EngineResult<Self> {
        Self::build(metric.into(), Polarity::HigherIsBetter, tiers, floor)
    }

    /// Build a lower-is-better table with strictly increasing cutoffs
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `tiers` is empty, a cutoff is not finite,
    /// or cutoffs do not strictly increase
    pub fn lower_is_better(
        metric: impl Into<String>,
        tiers: Vec<(L, f64)>,
        floor: L,
    ) -> EngineResult<Self> {
        Self::build(metric.into(), Polarity::LowerIsBetter, tiers, floor)
    }

    fn build(
        metric: String,
        polarity: Polarity,
        tiers: Vec<(L, f64)>,
        floor: L,
    ) -> EngineResult<Self> {
        if tiers.is_empty() {
            return Err(AnalysisError::invalid_value(
                metric,
                "threshold table needs at least one tier",
            ));
        }
        if let Some((_, cutoff)) = tiers.iter().find(|(_, cutoff)| !cutoff.is_finite()) {
            return Err(AnalysisError::invalid_value(
                metric,
                format!("threshold cutoff must be finite, got {cutoff}"),
            ));
        }
        let ordered = tiers.windows(2).all(|pair| match polarity {
            Polarity::HigherIsBetter => pair[0].1 > pair[1].1,
            Polarity::LowerIsBetter => pair[0].1 < pair[1].1,
        });
        if !ordered {
            return Err(AnalysisError::invalid_value(
                metric,
                "threshold cutoffs must be strictly ordered from best to worst",
            ));
        }
        if let (Polarity::HigherIsBetter, Some((_, top))) = (polarity, tiers.first()) {
            if *top <= 0.0 {
                return Err(AnalysisError::invalid_value(
                    metric,
                    format!("top cutoff of a scored table must be positive, got {top}"),
                ));
            }
        }

        Ok(Self {
            metric,
            polarity,
            tiers: tiers
                .into_iter()
                .map(|(level, cutoff)| ThresholdTier { level, cutoff })
                .collect(),
            floor,
            bounds: None,
        })
    }

    /// Declare the physiologically valid range for this metric
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `min` is not below `max`
    pub fn with_bounds(mut self, min: f64, max: f64) -> EngineResult<Self> {
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(AnalysisError::invalid_value(
                &self.metric,
                format!("invalid bounds [{min}, {max}]"),
            ));
        }
        self.bounds = Some((min, max));
        Ok(self)
    }

    /// Metric name used in error messages
    #[must_use]
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Tiers, best first
    #[must_use]
    pub fn tiers(&self) -> &[ThresholdTier<L>] {
        &self.tiers
    }

    /// Cutoff of the best tier
    #[must_use]
    pub fn top_cutoff(&self) -> f64 {
        self.tiers.first().map_or(0.0, |tier| tier.cutoff)
    }

    /// Cutoff at a tier index, best first
    #[must_use]
    pub fn cutoff(&self, index: usize) -> Option<f64> {
        self.tiers.get(index).map(|tier| tier.cutoff)
    }

    /// Highest level the value reaches, or the floor level
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if the value is not finite or outside the
    /// declared bounds
    pub fn classify(&self, value: f64) -> EngineResult<L> {
        let value = self.validate(value)?;
        let reached = self.tiers.iter().find(|tier| match self.polarity {
            Polarity::HigherIsBetter => value >= tier.cutoff,
            Polarity::LowerIsBetter => value <= tier.cutoff,
        });
        Ok(reached.map_or_else(|| self.floor.clone(), |tier| tier.level.clone()))
    }

    /// Linear score where 120% of the top cutoff maps to 100, floored at 0
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for invalid input or a lower-is-better table
    pub fn score(&self, value: f64) -> EngineResult<f64> {
        let value = self.validate(value)?;
        self.ensure_higher_is_better("score")?;
        let ceiling = self.top_cutoff() * SCORE_CEILING_FACTOR;
        Ok((value / ceiling * 100.0).clamp(0.0, 100.0))
    }

    /// Piecewise score: 100 at the top tier, equal bands between tiers
    /// spanning 50-100, and proportional below the lowest tier
    ///
    /// With three tiers the bands are 75-100 and 50-75.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for invalid input or a lower-is-better table
    pub fn banded_score(&self, value: f64) -> EngineResult<f64> {
        let value = self.validate(value)?;
        self.ensure_higher_is_better("banded_score")?;

        let top = self.top_cutoff();
        if value >= top {
            return Ok(100.0);
        }
        let band_width = if self.tiers.len() > 1 {
            50.0 / (self.tiers.len() - 1) as f64
        } else {
            50.0
        };

        for (index, pair) in self.tiers.windows(2).enumerate() {
            let (upper, lower) = (pair[0].cutoff, pair[1].cutoff);
            if value >= lower {
                let band_floor = (index + 1) as f64 * -band_width + 100.0;
                return Ok((value - lower) / (upper - lower) * band_width + band_floor);
            }
        }

        let lowest = self.tiers.last().map_or(top, |tier| tier.cutoff);
        if lowest <= 0.0 {
            return Ok(0.0);
        }
        Ok((value / lowest * 50.0).max(0.0))
    }

    fn validate(&self, value: f64) -> EngineResult<f64> {
        let value = AnalysisError::ensure_finite(&self.metric, value)?;
        if let Some((min, max)) = self.bounds {
            if value < min || value > max {
                return Err(AnalysisError::invalid_value(
                    &self.metric,
                    format!("{value} is outside the valid range [{min}, {max}]"),
                ));
            }
        }
        Ok(value)
    }

    fn ensure_higher_is_better(&self, operation: &str) -> EngineResult<()> {
        match self.polarity {
            Polarity::HigherIsBetter => Ok(()),
            Polarity::LowerIsBetter => Err(AnalysisError::invalid_value(
                &self.metric,
                format!("{operation} is only defined for higher-is-better tables"),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sprint_table() -> ThresholdTable<QualityLevel> {
        ThresholdTable::new(
            "acceleration",
            vec![
                (QualityLevel::Excellent, 5.5),
                (QualityLevel::Good, 4.5),
                (QualityLevel::Average, 3.5),
            ],
            QualityLevel::NeedsImprovement,
        )
        .unwrap()
    }

    #[test]
    fn test_banded_score_band_edges() {
        let table = sprint_table();
        assert!((table.banded_score(5.5).unwrap() - 100.0).abs() < 1e-9);
        assert!((table.banded_score(4.5).unwrap() - 75.0).abs() < 1e-9);
        assert!((table.banded_score(5.0).unwrap() - 87.5).abs() < 1e-9);
        assert!((table.banded_score(3.5).unwrap() - 50.0).abs() < 1e-9);
        assert!((table.banded_score(1.75).unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_lower_is_better_rejects_score() {
        let table = ThresholdTable::lower_is_better(
            "contact_time",
            vec![(QualityLevel::Excellent, 0.2), (QualityLevel::Good, 0.25)],
            QualityLevel::NeedsImprovement,
        )
        .unwrap();
        assert_eq!(table.classify(0.2).unwrap(), QualityLevel::Excellent);
        assert_eq!(table.classify(0.3).unwrap(), QualityLevel::NeedsImprovement);
        assert!(table.score(0.2).is_err());
    }
}
