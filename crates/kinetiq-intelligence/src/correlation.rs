// ABOUTME: Cross-test correlation analyzer over paired observations of named tests
// ABOUTME: Symmetric Pearson/Spearman matrix, predictive regressions, Cohen's d transfer effects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use std::collections::BTreeMap;

use kinetiq_core::errors::{AnalysisError, EngineResult};
use serde::Serialize;
use tracing::debug;

use crate::analysis_config::CorrelationConfig;
use crate::distribution::normal_interval;
use crate::statistical_analysis::{
    is_constant, mean, population_variance, CorrelationCoefficient, StatisticalAnalyzer,
};

/// Confidence level for effect-size intervals
pub const EFFECT_SIZE_CONFIDENCE: f64 = 0.95;

/// Correlation between two tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationEntry {
    /// Pearson product-moment correlation
    pub pearson: CorrelationCoefficient,
    /// Spearman rank correlation
    pub spearman: CorrelationCoefficient,
    /// Band of |Pearson r|
    pub relationship_strength: &'static str,
    /// Pearson p-value below the significance level
    pub significant: bool,
}

/// A test that predicts another by simple linear regression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictiveRelationship {
    /// Coefficient of determination
    pub r_squared: f64,
    /// Regression slope
    pub slope: f64,
    /// Regression intercept
    pub intercept: f64,
    /// Two-sided p-value for the slope, absent without degrees of freedom
    pub p_value: Option<f64>,
    /// Standard error of the slope
    pub std_error: f64,
    /// `y = {slope}x + {intercept}` to three decimals
    pub equation: String,
}

/// Standardized mean difference between two tests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferEffect {
    /// Cohen's d with the population-variance pooled deviation
    pub effect_size: f64,
    /// Band of |d|
    pub effect_magnitude: &'static str,
    /// Normal-approximation interval for d
    pub confidence_interval: (f64, f64),
}

/// Everything the correlation analyzer reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationReport {
    /// `matrix[a][b] == matrix[b][a]` for every pair, including `a == b`
    pub matrix: BTreeMap<String, BTreeMap<String, CorrelationEntry>>,
    /// Predictive pairs keyed `"predictor->target"`
    pub predictive_factors: BTreeMap<String, PredictiveRelationship>,
    /// Transfer effects keyed `"from->to"`
    pub transfer_effects: BTreeMap<String, TransferEffect>,
}

impl CorrelationReport {
    /// Entry for a pair of tests, in either order
    #[must_use]
    pub fn entry(&self, a: &str, b: &str) -> Option<&CorrelationEntry> {
        self.matrix.get(a).and_then(|row| row.get(b))
    }
}

/// Analyzes relationships between tests
pub struct CorrelationAnalyzer {
    config: CorrelationConfig,
}

impl CorrelationAnalyzer {
    /// Create an analyzer with the given thresholds
    #[must_use]
    pub const fn new(config: CorrelationConfig) -> Self {
        Self { config }
    }

    /// Correlate two paired series
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for mismatched lengths and `InsufficientData`
    /// for fewer than two pairs
    pub fn correlate(&self, x: &[f64], y: &[f64]) -> EngineResult<CorrelationEntry> {
        let pearson = StatisticalAnalyzer::pearson(x, y)?;
        let spearman = StatisticalAnalyzer::spearman(x, y)?;
        Ok(CorrelationEntry {
            pearson,
            spearman,
            relationship_strength: relationship_strength(pearson.coefficient),
            significant: pearson.p_value < self.config.significance_level,
        })
    }

    /// Full correlation analysis over named tests
    ///
    /// Every series holds one value per observation, so all series must have
    /// the same length.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for unequal lengths or non-finite values and
    /// `InsufficientData` for fewer than two observations
    pub fn analyze(&self, tests: &BTreeMap<String, Vec<f64>>) -> EngineResult<CorrelationReport> {
        validate_paired(tests)?;
        let names: Vec<&String> = tests.keys().collect();

        let mut matrix: BTreeMap<String, BTreeMap<String, CorrelationEntry>> = BTreeMap::new();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i..] {
                let entry = self.correlate(&tests[*a], &tests[*b])?;
                matrix
                    .entry((*a).clone())
                    .or_default()
                    .insert((*b).clone(), entry);
                matrix
                    .entry((*b).clone())
                    .or_default()
                    .insert((*a).clone(), entry);
            }
        }

        let mut predictive_factors = BTreeMap::new();
        let mut transfer_effects = BTreeMap::new();
        for predictor in &names {
            for target in names.iter().filter(|target| *target != predictor) {
                let key = format!("{predictor}->{target}");
                let (x, y) = (&tests[*predictor], &tests[*target]);

                if let Some(relationship) = predictive_strength(x, y)? {
                    if relationship.r_squared > self.config.predictive_r_squared {
                        predictive_factors.insert(key.clone(), relationship);
                    }
                }

                let transfer = transfer_effect(x, y);
                if transfer.effect_size.abs() > self.config.transfer_effect_threshold {
                    transfer_effects.insert(key, transfer);
                }
            }
        }

        debug!(
            tests = names.len(),
            predictive = predictive_factors.len(),
            transfers = transfer_effects.len(),
            "Computed cross-test correlations"
        );

        Ok(CorrelationReport {
            matrix,
            predictive_factors,
            transfer_effects,
        })
    }
}

/// Band for |r|: ≥ .7 strong, ≥ .5 moderate, ≥ .3 weak
#[must_use]
pub fn relationship_strength(coefficient: f64) -> &'static str {
    let magnitude = coefficient.abs();
    if magnitude >= 0.7 {
        "strong"
    } else if magnitude >= 0.5 {
        "moderate"
    } else if magnitude >= 0.3 {
        "weak"
    } else {
        "negligible"
    }
}

/// Band for |d|: ≥ .8 large, ≥ .5 medium, ≥ .2 small
#[must_use]
pub fn effect_magnitude(effect_size: f64) -> &'static str {
    let magnitude = effect_size.abs();
    if magnitude >= 0.8 {
        "large"
    } else if magnitude >= 0.5 {
        "medium"
    } else if magnitude >= 0.2 {
        "small"
    } else {
        "negligible"
    }
}

/// Cohen's d from `x` to `y` with its 95 % interval
///
/// The pooled deviation is `sqrt((var_x + var_y) / 2)` with population
/// variances; a zero pooled deviation yields d = 0.
#[must_use]
pub fn transfer_effect(x: &[f64], y: &[f64]) -> TransferEffect {
    let pooled = ((population_variance(x) + population_variance(y)) / 2.0).sqrt();
    let effect_size = if pooled == 0.0 {
        0.0
    } else {
        (mean(x) - mean(y)) / pooled
    };
    let n = x.len().max(1) as f64;
    let standard_error = (4.0 / n * (effect_size * effect_size / 8.0 + 1.0)).sqrt();

    TransferEffect {
        effect_size,
        effect_magnitude: effect_magnitude(effect_size),
        confidence_interval: normal_interval(EFFECT_SIZE_CONFIDENCE, effect_size, standard_error),
    }
}

/// Regression of `target` on `predictor`; `None` for a constant predictor
fn predictive_strength(
    predictor: &[f64],
    target: &[f64],
) -> EngineResult<Option<PredictiveRelationship>> {
    if is_constant(predictor) {
        return Ok(None);
    }
    let regression = StatisticalAnalyzer::linear_regression(predictor, target)?;
    Ok(Some(PredictiveRelationship {
        r_squared: regression.r_squared,
        slope: regression.slope,
        intercept: regression.intercept,
        p_value: regression.p_value,
        std_error: regression.slope_standard_error,
        equation: format!(
            "y = {:.3}x + {:.3}",
            regression.slope, regression.intercept
        ),
    }))
}

fn validate_paired(tests: &BTreeMap<String, Vec<f64>>) -> EngineResult<()> {
    let mut lengths = tests.values().map(Vec::len);
    if let Some(first) = lengths.next() {
        if lengths.any(|len| len != first) {
            return Err(AnalysisError::invalid_value(
                "tests",
                "every test needs one value per observation",
            ));
        }
        if first < 2 {
            return Err(AnalysisError::insufficient_data("correlation", 2, first));
        }
    }
    for (name, values) in tests {
        for value in values {
            AnalysisError::ensure_finite(name, *value)?;
        }
    }
    Ok(())
}
