// ABOUTME: Statistical kernel for descriptive statistics, ranking, regression, and trend fitting
// ABOUTME: Implements OLS with confidence bands, percentile rank, Pearson and Spearman correlation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use chrono::{DateTime, Utc};
use kinetiq_core::constants::labels;
use kinetiq_core::errors::{AnalysisError, EngineResult};
use serde::{Deserialize, Serialize};

use crate::distribution::{t_critical_value, t_two_sided_p_value};

/// Default window for the short-window direction label
pub const DEFAULT_SHORT_WINDOW: usize = 3;

/// Absolute slope below which a short window is labelled "stable"
pub const STABLE_SLOPE_THRESHOLD: f64 = 0.01;

/// Default confidence level for trend bands
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Descriptive statistics for a value series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStatistics {
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Last value in series order
    pub latest: f64,
    /// Number of values
    pub count: usize,
    /// Direction over the most recent points
    pub trend: String,
}

/// Ordinary least-squares fit of `y` on `x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Slope of the regression line
    pub slope: f64,
    /// Y-intercept of the regression line
    pub intercept: f64,
    /// Pearson correlation coefficient (-1 to 1)
    pub correlation: f64,
    /// Coefficient of determination (0-1)
    pub r_squared: f64,
    /// Standard error of the slope estimate
    pub slope_standard_error: f64,
    /// Standard error of the residuals
    pub residual_standard_error: f64,
    /// Degrees of freedom (n - 2)
    pub degrees_of_freedom: usize,
    /// Two-sided p-value for a non-zero slope; `None` without degrees of freedom
    pub p_value: Option<f64>,
}

impl RegressionResult {
    /// Predicted `y` at `x`
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Per-point confidence band around a fitted trend line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    /// Upper bound per input point
    pub upper: Vec<f64>,
    /// Lower bound per input point
    pub lower: Vec<f64>,
}

impl ConfidenceBand {
    /// Whether the band carries no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }
}

/// Time-based linear trend over a measurement series
///
/// `x` is measured in fractional days since the first timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    /// Change in value per day
    pub slope: f64,
    /// Fitted value at the first timestamp
    pub intercept: f64,
    /// Coefficient of determination
    pub r_squared: f64,
    /// Two-sided p-value for the slope
    pub p_value: Option<f64>,
    /// Standard error of the slope
    pub standard_error: f64,
    /// "improving" if the slope is positive, "declining" otherwise
    pub direction: String,
    /// Confidence band at the requested level (empty below 3 points)
    pub confidence_band: ConfidenceBand,
}

impl LinearTrend {
    /// Extrapolate the fitted line to `days` after the first timestamp
    #[must_use]
    pub fn project(&self, days: f64) -> f64 {
        self.slope.mul_add(days, self.intercept)
    }
}

/// Outcome of fitting a trend
///
/// Too few points is a documented sentinel rather than an error and
/// serializes as `{"trend":"insufficient_data"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "trend", rename_all = "snake_case")]
pub enum TrendAnalysis {
    /// Fewer than two points, or no spread in time
    InsufficientData,
    /// A fitted line
    Fitted(LinearTrend),
}

impl TrendAnalysis {
    /// The fitted trend, if any
    #[must_use]
    pub const fn fitted(&self) -> Option<&LinearTrend> {
        match self {
            Self::Fitted(trend) => Some(trend),
            Self::InsufficientData => None,
        }
    }
}

/// A correlation coefficient with its two-sided p-value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationCoefficient {
    /// Coefficient (-1 to 1)
    pub coefficient: f64,
    /// Two-sided p-value
    pub p_value: f64,
}

/// Statistical kernel shared by every analyzer
pub struct StatisticalAnalyzer;

impl StatisticalAnalyzer {
    /// Descriptive statistics with the default short-window direction
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` if `values` is empty
    pub fn basic_statistics(values: &[f64]) -> EngineResult<BasicStatistics> {
        Self::basic_statistics_with_window(values, DEFAULT_SHORT_WINDOW)
    }

    /// Descriptive statistics with a caller-chosen short window
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` if `values` is empty
    pub fn basic_statistics_with_window(
        values: &[f64],
        short_window: usize,
    ) -> EngineResult<BasicStatistics> {
        let Some(&latest) = values.last() else {
            return Err(AnalysisError::insufficient_data("basic_statistics", 1, 0));
        };

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(BasicStatistics {
            mean: mean(values),
            std: population_std(values),
            min,
            max,
            latest,
            count: values.len(),
            trend: Self::short_window_direction(values, short_window).to_owned(),
        })
    }

    /// Percentile rank of `value` within `reference` (rank kind)
    ///
    /// Tied values take their average 1-based rank. Returns 0 for an empty
    /// reference set.
    #[must_use]
    pub fn percentile_rank(value: f64, reference: &[f64]) -> f64 {
        if reference.is_empty() {
            return 0.0;
        }
        let below = reference.iter().filter(|&&r| r < value).count();
        let at_or_below = reference.iter().filter(|&&r| r <= value).count();
        let present = usize::from(at_or_below > below);
        (below + at_or_below + present) as f64 * 50.0 / reference.len() as f64
    }

    /// Direction label from a degree-1 fit over the last `window` values
    #[must_use]
    pub fn short_window_direction(values: &[f64], window: usize) -> &'static str {
        if window < 2 || values.len() < window {
            return labels::INSUFFICIENT_DATA;
        }
        let recent = &values[values.len() - window..];
        let x: Vec<f64> = (0..window).map(|i| i as f64).collect();
        let slope = least_squares(&x, recent).map_or(0.0, |(slope, _)| slope);

        if slope.abs() < STABLE_SLOPE_THRESHOLD {
            labels::STABLE
        } else if slope > 0.0 {
            labels::IMPROVING
        } else {
            labels::DECLINING
        }
    }

    /// Fit a linear trend over time with a confidence band
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `values` and `timestamps` differ in length
    /// or `confidence` is outside (0, 1)
    pub fn linear_trend(
        values: &[f64],
        timestamps: &[DateTime<Utc>],
        confidence: f64,
    ) -> EngineResult<TrendAnalysis> {
        ensure_same_length(values.len(), timestamps.len())?;
        if confidence.is_nan() || confidence <= 0.0 || confidence >= 1.0 {
            return Err(AnalysisError::invalid_value(
                "confidence",
                format!("must be between 0 and 1 exclusive, got {confidence}"),
            ));
        }
        if values.len() < 2 {
            return Ok(TrendAnalysis::InsufficientData);
        }

        let x = days_since_first(timestamps);
        let Ok(regression) = Self::linear_regression(&x, values) else {
            // All timestamps coincide
            return Ok(TrendAnalysis::InsufficientData);
        };

        let confidence_band = confidence_band(&x, &regression, confidence);
        let direction = if regression.slope > 0.0 {
            labels::IMPROVING
        } else {
            labels::DECLINING
        };

        Ok(TrendAnalysis::Fitted(LinearTrend {
            slope: regression.slope,
            intercept: regression.intercept,
            r_squared: regression.r_squared,
            p_value: regression.p_value,
            standard_error: regression.slope_standard_error,
            direction: direction.to_owned(),
            confidence_band,
        }))
    }

    /// Ordinary least-squares regression of `y` on `x`
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` for fewer than two points, `InvalidValue`
    /// for mismatched lengths or zero variance in `x`
    pub fn linear_regression(x: &[f64], y: &[f64]) -> EngineResult<RegressionResult> {
        ensure_same_length(x.len(), y.len())?;
        if x.len() < 2 {
            return Err(AnalysisError::insufficient_data(
                "linear_regression",
                2,
                x.len(),
            ));
        }

        let (slope, intercept) = least_squares(x, y).ok_or_else(|| {
            AnalysisError::invalid_value("x", "cannot fit a line with zero variance in x")
        })?;

        let n = x.len();
        let degrees_of_freedom = n - 2;
        let correlation = pearson_coefficient(x, y);
        let r_squared = correlation * correlation;

        let sse: f64 = x
            .iter()
            .zip(y)
            .map(|(xi, yi)| {
                let residual = yi - slope.mul_add(*xi, intercept);
                residual * residual
            })
            .sum();
        let sxx = sum_of_squares(x);

        let (residual_standard_error, slope_standard_error, p_value) = if degrees_of_freedom == 0 {
            (0.0, 0.0, None)
        } else {
            let df = degrees_of_freedom as f64;
            let residual_se = (sse / df).sqrt();
            (
                residual_se,
                residual_se / sxx.sqrt(),
                Some(t_two_sided_p_value(t_statistic(correlation, df), df)),
            )
        };

        Ok(RegressionResult {
            slope,
            intercept,
            correlation,
            r_squared,
            slope_standard_error,
            residual_standard_error,
            degrees_of_freedom,
            p_value,
        })
    }

    /// Pearson product-moment correlation with two-sided p-value
    ///
    /// A constant series has no defined correlation and yields coefficient 0
    /// with p-value 1.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for mismatched lengths and `InsufficientData`
    /// for fewer than two pairs
    pub fn pearson(x: &[f64], y: &[f64]) -> EngineResult<CorrelationCoefficient> {
        ensure_same_length(x.len(), y.len())?;
        if x.len() < 2 {
            return Err(AnalysisError::insufficient_data("pearson", 2, x.len()));
        }
        let coefficient = pearson_coefficient(x, y);
        let df = (x.len() - 2) as f64;
        let p_value = if is_constant(x) || is_constant(y) {
            1.0
        } else {
            t_two_sided_p_value(t_statistic(coefficient, df), df)
        };
        Ok(CorrelationCoefficient {
            coefficient,
            p_value,
        })
    }

    /// Spearman rank correlation (average ranks for ties) with p-value
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::pearson`]
    pub fn spearman(x: &[f64], y: &[f64]) -> EngineResult<CorrelationCoefficient> {
        ensure_same_length(x.len(), y.len())?;
        Self::pearson(&rank(x), &rank(y))
    }
}

/// Arithmetic mean; 0 for an empty slice
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population variance (divisor n); 0 for an empty slice
#[must_use]
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        sum_of_squares(values) / values.len() as f64
    }
}

/// Population standard deviation
#[must_use]
pub fn population_std(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Sum of squared deviations from the mean
fn sum_of_squares(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum()
}

/// Whether a series has no spread beyond rounding error
///
/// The spread is measured against the raw magnitude of the values, so
/// series recorded in very small units still count as varying.
#[must_use]
pub fn is_constant(values: &[f64]) -> bool {
    let magnitude: f64 = values.iter().map(|v| v * v).sum();
    sum_of_squares(values) <= f64::EPSILON * magnitude
}

/// Average ranks (1-based), ties share the mean of their positions
#[must_use]
pub fn rank(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && values[order[end + 1]] <= values[order[start]] {
            end += 1;
        }
        // Positions start..=end are tied; 1-based average
        let average = (start + end) as f64 / 2.0 + 1.0;
        for &index in &order[start..=end] {
            ranks[index] = average;
        }
        start = end + 1;
    }
    ranks
}

/// Slope and intercept, `None` when `x` has no variance
fn least_squares(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let mean_x = mean(x);
    let mean_y = mean(y);
    if is_constant(x) {
        return None;
    }
    let sxx = sum_of_squares(x);
    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let slope = sxy / sxx;
    Some((slope, slope.mul_add(-mean_x, mean_y)))
}

/// Pearson coefficient, 0 when either side is constant
fn pearson_coefficient(x: &[f64], y: &[f64]) -> f64 {
    let mean_x = mean(x);
    let mean_y = mean(y);
    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    if is_constant(x) || is_constant(y) {
        return 0.0;
    }
    (sxy / (sum_of_squares(x) * sum_of_squares(y)).sqrt()).clamp(-1.0, 1.0)
}

/// t statistic for a correlation coefficient; infinite for a perfect fit
fn t_statistic(r: f64, df: f64) -> f64 {
    let denominator = (1.0 - r) * (1.0 + r);
    if denominator <= 0.0 {
        f64::INFINITY
    } else {
        r * (df / denominator).sqrt()
    }
}

fn confidence_band(x: &[f64], regression: &RegressionResult, confidence: f64) -> ConfidenceBand {
    if regression.degrees_of_freedom == 0 {
        return ConfidenceBand::default();
    }
    let n = x.len() as f64;
    let mean_x = mean(x);
    let sxx = sum_of_squares(x);
    let t_value = t_critical_value(0.5 * (1.0 + confidence), regression.degrees_of_freedom as f64);

    let (upper, lower) = x
        .iter()
        .map(|xi| {
            let fitted = regression.predict(*xi);
            let leverage = (xi - mean_x) * (xi - mean_x) / sxx;
            let half_width = t_value * regression.residual_standard_error * (1.0 / n + leverage).sqrt();
            (fitted + half_width, fitted - half_width)
        })
        .unzip();
    ConfidenceBand { upper, lower }
}

/// Fractional days elapsed since the first timestamp
#[must_use]
pub fn days_since_first(timestamps: &[DateTime<Utc>]) -> Vec<f64> {
    let Some(first) = timestamps.first() else {
        return Vec::new();
    };
    timestamps
        .iter()
        .map(|ts| (*ts - *first).num_milliseconds() as f64 / MILLIS_PER_DAY)
        .collect()
}

fn ensure_same_length(left: usize, right: usize) -> EngineResult<()> {
    if left == right {
        Ok(())
    } else {
        Err(AnalysisError::invalid_value(
            "series",
            format!("length mismatch: {left} values vs {right} values"),
        ))
    }
}
