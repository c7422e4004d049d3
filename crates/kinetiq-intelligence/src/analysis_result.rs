// ABOUTME: Result shape shared by every category analyzer plus the historical trend bundle
// ABOUTME: AnalysisResult builder, HistoricalTrend assembled from kernel and pattern detection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use kinetiq_core::errors::{AnalysisError, EngineResult};
use kinetiq_core::models::{MeasurementSeries, TestCategory};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analysis_config::AnalysisConfig;
use crate::pattern_detection::{
    ConsistencyMetrics, FatiguePeriod, MonthlySummary, PatternDetector, PeakWindow, PlateauWindow,
    RecoveryEvent,
};
use crate::statistical_analysis::{BasicStatistics, StatisticalAnalyzer, TrendAnalysis};

/// Output of one analyzer call
///
/// Built fresh per call. `metrics` carries the named numbers; `details`
/// carries structured sub-results (kinematics, profiles, programs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Category that produced the result
    pub category: TestCategory,
    /// Named numeric metrics
    pub metrics: BTreeMap<String, f64>,
    /// Headline qualitative level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    /// Headline 0-100 score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Human-readable interpretation of the headline level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    /// Historical trend when a history was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<HistoricalTrend>,
    /// Training recommendations
    pub recommendations: Vec<String>,
    /// Structured sub-results
    pub details: Map<String, Value>,
}

impl AnalysisResult {
    /// Empty result for a category
    #[must_use]
    pub fn new(category: TestCategory) -> Self {
        Self {
            category,
            metrics: BTreeMap::new(),
            classification: None,
            score: None,
            interpretation: None,
            trend: None,
            recommendations: Vec::new(),
            details: Map::new(),
        }
    }

    /// Record a named metric
    #[must_use]
    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_owned(), value);
        self
    }

    /// Record a metric only when present
    #[must_use]
    pub fn with_optional_metric(self, name: &str, value: Option<f64>) -> Self {
        match value {
            Some(value) => self.with_metric(name, value),
            None => self,
        }
    }

    /// Set the headline level
    #[must_use]
    pub fn with_classification(mut self, level: impl Display) -> Self {
        self.classification = Some(level.to_string());
        self
    }

    /// Set the headline score
    #[must_use]
    pub const fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Set the interpretation text
    #[must_use]
    pub fn with_interpretation(mut self, text: impl Into<String>) -> Self {
        self.interpretation = Some(text.into());
        self
    }

    /// Attach a historical trend
    #[must_use]
    pub fn with_trend(mut self, trend: Option<HistoricalTrend>) -> Self {
        self.trend = trend;
        self
    }

    /// Append recommendations
    #[must_use]
    pub fn with_recommendations<I, S>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations
            .extend(recommendations.into_iter().map(Into::into));
        self
    }

    /// Attach a structured sub-result
    #[must_use]
    pub fn with_detail(mut self, name: &str, value: Value) -> Self {
        self.details.insert(name.to_owned(), value);
        self
    }

    /// Serialize and attach a structured sub-result
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if the value cannot be represented as JSON
    /// (for example a non-finite float inside a map key)
    pub fn with_serialized_detail<T: Serialize>(self, name: &str, value: &T) -> EngineResult<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| AnalysisError::invalid_value(name, e.to_string()))?;
        Ok(self.with_detail(name, value))
    }

    /// Look up a metric by name
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    /// Look up a structured sub-result by name
    #[must_use]
    pub fn detail(&self, name: &str) -> Option<&Value> {
        self.details.get(name)
    }
}

/// Everything the kernel can say about a measurement history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalTrend {
    /// Descriptive statistics with the short-window direction
    pub statistics: BasicStatistics,
    /// Linear trend over time
    pub linear_trend: TrendAnalysis,
    /// Plateau windows; `None` when the history is shorter than the window
    pub plateaus: Option<Vec<PlateauWindow>>,
    /// Peak windows; `None` when the history is shorter than the window
    pub peaks: Option<Vec<PeakWindow>>,
    /// Decline runs closed by a recovery
    pub fatigue_periods: Vec<FatiguePeriod>,
    /// Spread relative to level
    pub consistency: ConsistencyMetrics,
    /// Three-point dips
    pub recovery_events: Vec<RecoveryEvent>,
    /// Per calendar month summary
    pub monthly_profile: BTreeMap<u32, MonthlySummary>,
}

impl HistoricalTrend {
    /// Trend over the primary values of a series
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` for an empty series
    pub fn from_series(series: &MeasurementSeries, config: &AnalysisConfig) -> EngineResult<Self> {
        Self::from_columns(&series.values(), &series.timestamps(), config)
    }

    /// Trend over parallel value and timestamp columns
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` for empty columns and `InvalidValue` for
    /// mismatched lengths
    pub fn from_columns(
        values: &[f64],
        timestamps: &[DateTime<Utc>],
        config: &AnalysisConfig,
    ) -> EngineResult<Self> {
        let patterns = &config.patterns;

        let statistics =
            StatisticalAnalyzer::basic_statistics_with_window(values, config.trend.short_window)?;
        let linear_trend =
            StatisticalAnalyzer::linear_trend(values, timestamps, config.trend.confidence_level)?;

        let plateaus = (values.len() >= patterns.plateau_window)
            .then(|| {
                PatternDetector::plateau_windows(
                    values,
                    timestamps,
                    patterns.plateau_window,
                    patterns.plateau_variation,
                )
            })
            .transpose()?;
        let peaks = (values.len() >= patterns.peak_window)
            .then(|| PatternDetector::peak_windows(values, timestamps, patterns.peak_window))
            .transpose()?;

        Ok(Self {
            statistics,
            linear_trend,
            plateaus,
            peaks,
            fatigue_periods: PatternDetector::fatigue_periods(
                values,
                timestamps,
                patterns.fatigue_decline,
                patterns.fatigue_recovery,
            )?,
            consistency: PatternDetector::consistency(values)?,
            recovery_events: PatternDetector::recovery_events(values, timestamps)?,
            monthly_profile: PatternDetector::monthly_profile(values, timestamps)?,
        })
    }
}

/// Trend for an optional history, `None` without one
///
/// # Errors
///
/// Propagates [`HistoricalTrend::from_series`] errors
pub fn trend_for(
    history: Option<&MeasurementSeries>,
    config: &AnalysisConfig,
) -> EngineResult<Option<HistoricalTrend>> {
    history
        .map(|series| HistoricalTrend::from_series(series, config))
        .transpose()
}
