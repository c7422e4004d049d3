// ABOUTME: Sliding-window pattern detection over measurement series
// ABOUTME: Detects plateaus, peaks, fatigue runs, recovery dips, consistency, and monthly profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use kinetiq_core::errors::{AnalysisError, EngineResult};
use serde::{Deserialize, Serialize};

use crate::statistical_analysis::{mean, population_std};

/// Default plateau window (points)
pub const DEFAULT_PLATEAU_WINDOW: usize = 3;

/// Default coefficient-of-variation ceiling for a plateau
pub const DEFAULT_PLATEAU_VARIATION: f64 = 0.05;

/// Default peak window (points)
pub const DEFAULT_PEAK_WINDOW: usize = 5;

/// Default point-to-point relative change that counts as a decline
pub const DEFAULT_FATIGUE_DECLINE: f64 = -0.10;

/// Default point-to-point relative change that closes a decline run
pub const DEFAULT_FATIGUE_RECOVERY: f64 = 0.05;

/// Window used for dip-then-rise recovery detection
const RECOVERY_WINDOW: usize = 3;

/// A window whose values barely varied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateauWindow {
    /// First timestamp in the window
    pub start: DateTime<Utc>,
    /// Last timestamp in the window
    pub end: DateTime<Utc>,
    /// Mean value across the window
    pub mean_value: f64,
    /// Whole days between start and end
    pub duration_days: i64,
}

/// A local maximum centred in its window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakWindow {
    /// Timestamp of the peak
    pub date: DateTime<Utc>,
    /// Peak value
    pub value: f64,
    /// Relative change from the window start to the peak (percent)
    pub improvement_percent: f64,
}

/// A run of declines closed by a recovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatiguePeriod {
    /// Timestamp of the last value before the first decline
    pub start: DateTime<Utc>,
    /// Timestamp of the recovering value
    pub end: DateTime<Utc>,
    /// Relative change from start to end (percent)
    pub decline_percent: f64,
}

/// Dip-then-rise over three consecutive points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryEvent {
    /// Timestamp of the dip
    pub date: DateTime<Utc>,
    /// Relative drop into the dip (percent, negative)
    pub decline_percent: f64,
    /// Relative rise out of the dip (percent)
    pub recovery_percent: f64,
    /// Whole days from the dip to the recovering point
    pub recovery_days: i64,
}

/// Spread of a series relative to its level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyMetrics {
    /// Standard deviation over |mean| (percent); 0 when the mean is 0
    pub coefficient_of_variation: f64,
    /// `100 × (1 − CV)` clamped to 0–100; 0 when the mean is 0
    pub stability_score: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Max minus min
    pub range: f64,
}

/// Summary of the values recorded in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    /// Number of values
    pub count: usize,
}

/// Pattern detection engine
pub struct PatternDetector;

impl PatternDetector {
    /// Windows whose coefficient of variation is below `variation_threshold`
    ///
    /// Windows with a zero mean have no defined variation and are skipped.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` if there are fewer than `window` points,
    /// `InvalidValue` for a zero window or mismatched lengths
    pub fn plateau_windows(
        values: &[f64],
        timestamps: &[DateTime<Utc>],
        window: usize,
        variation_threshold: f64,
    ) -> EngineResult<Vec<PlateauWindow>> {
        validate_windowed("plateau_windows", values, timestamps, window)?;

        let plateaus = values
            .windows(window)
            .zip(timestamps.windows(window))
            .filter_map(|(slice, times)| {
                let window_mean = mean(slice);
                if window_mean == 0.0 {
                    return None;
                }
                let variation = population_std(slice) / window_mean.abs();
                (variation < variation_threshold).then(|| {
                    let start = times[0];
                    let end = times[window - 1];
                    PlateauWindow {
                        start,
                        end,
                        mean_value: window_mean,
                        duration_days: (end - start).num_days(),
                    }
                })
            })
            .collect();
        Ok(plateaus)
    }

    /// Windows whose centre point is the first arg-max of the window
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` if there are fewer than `window` points,
    /// `InvalidValue` for a zero window or mismatched lengths
    pub fn peak_windows(
        values: &[f64],
        timestamps: &[DateTime<Utc>],
        window: usize,
    ) -> EngineResult<Vec<PeakWindow>> {
        validate_windowed("peak_windows", values, timestamps, window)?;
        let centre = window / 2;

        let peaks = values
            .windows(window)
            .zip(timestamps.windows(window))
            .filter(|(slice, _)| first_arg_max(slice) == centre)
            .map(|(slice, times)| PeakWindow {
                date: times[centre],
                value: slice[centre],
                improvement_percent: relative_change_percent(slice[0], slice[centre]),
            })
            .collect();
        Ok(peaks)
    }

    /// Contiguous decline runs closed by a recovery
    ///
    /// A change is measured relative to the previous value; a zero previous
    /// value counts as no change.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for mismatched lengths
    pub fn fatigue_periods(
        values: &[f64],
        timestamps: &[DateTime<Utc>],
        decline_threshold: f64,
        recovery_threshold: f64,
    ) -> EngineResult<Vec<FatiguePeriod>> {
        ensure_same_length(values, timestamps)?;

        let mut periods = Vec::new();
        let mut run_start: Option<usize> = None;

        for i in 1..values.len() {
            let change = relative_change(values[i - 1], values[i]);
            if change < decline_threshold {
                // Anchor on the value before the first decline
                run_start.get_or_insert(i - 1);
            } else if change > recovery_threshold {
                if let Some(start) = run_start.take() {
                    periods.push(FatiguePeriod {
                        start: timestamps[start],
                        end: timestamps[i],
                        decline_percent: relative_change_percent(values[start], values[i]),
                    });
                }
            }
        }
        Ok(periods)
    }

    /// Three-point dips where the middle value is below both neighbours
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for mismatched lengths
    pub fn recovery_events(
        values: &[f64],
        timestamps: &[DateTime<Utc>],
    ) -> EngineResult<Vec<RecoveryEvent>> {
        ensure_same_length(values, timestamps)?;

        let events = values
            .windows(RECOVERY_WINDOW)
            .zip(timestamps.windows(RECOVERY_WINDOW))
            .filter(|(slice, _)| slice[0] > slice[1] && slice[2] > slice[1])
            .map(|(slice, times)| RecoveryEvent {
                date: times[1],
                decline_percent: relative_change_percent(slice[0], slice[1]),
                recovery_percent: relative_change_percent(slice[1], slice[2]),
                recovery_days: (times[2] - times[1]).num_days(),
            })
            .collect();
        Ok(events)
    }

    /// Coefficient of variation, stability score, and range
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` if `values` is empty
    pub fn consistency(values: &[f64]) -> EngineResult<ConsistencyMetrics> {
        if values.is_empty() {
            return Err(AnalysisError::insufficient_data("consistency", 1, 0));
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let level = mean(values);
        let (coefficient_of_variation, stability_score) = if level == 0.0 {
            (0.0, 0.0)
        } else {
            let cv = population_std(values) / level.abs();
            (cv * 100.0, (100.0 * (1.0 - cv)).clamp(0.0, 100.0))
        };

        Ok(ConsistencyMetrics {
            coefficient_of_variation,
            stability_score,
            min,
            max,
            range: max - min,
        })
    }

    /// Mean, spread, and count per calendar month (1-12)
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for mismatched lengths
    pub fn monthly_profile(
        values: &[f64],
        timestamps: &[DateTime<Utc>],
    ) -> EngineResult<BTreeMap<u32, MonthlySummary>> {
        ensure_same_length(values, timestamps)?;

        let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for (value, timestamp) in values.iter().zip(timestamps) {
            by_month.entry(timestamp.month()).or_default().push(*value);
        }

        Ok(by_month
            .into_iter()
            .map(|(month, month_values)| {
                let summary = MonthlySummary {
                    mean: mean(&month_values),
                    std: population_std(&month_values),
                    count: month_values.len(),
                };
                (month, summary)
            })
            .collect())
    }
}

/// Relative change from `from` to `to`; 0 when `from` is 0
fn relative_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to - from) / from
    }
}

fn relative_change_percent(from: f64, to: f64) -> f64 {
    relative_change(from, to) * 100.0
}

/// Index of the first maximum
fn first_arg_max(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = i;
        }
    }
    best
}

fn ensure_same_length(values: &[f64], timestamps: &[DateTime<Utc>]) -> EngineResult<()> {
    if values.len() == timestamps.len() {
        Ok(())
    } else {
        Err(AnalysisError::invalid_value(
            "timestamps",
            format!(
                "expected {} timestamps to match values, got {}",
                values.len(),
                timestamps.len()
            ),
        ))
    }
}

fn validate_windowed(
    operation: &'static str,
    values: &[f64],
    timestamps: &[DateTime<Utc>],
    window: usize,
) -> EngineResult<()> {
    ensure_same_length(values, timestamps)?;
    if window == 0 {
        return Err(AnalysisError::invalid_value("window", "must be at least 1"));
    }
    if values.len() < window {
        return Err(AnalysisError::insufficient_data(
            operation,
            window,
            values.len(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_arg_max_prefers_earliest() {
        assert_eq!(first_arg_max(&[1.0, 3.0, 3.0, 2.0]), 1);
        assert_eq!(first_arg_max(&[5.0]), 0);
    }

    #[test]
    fn test_relative_change_zero_base() {
        assert!(relative_change(0.0, 10.0).abs() < f64::EPSILON);
        assert!((relative_change(10.0, 9.0) + 0.1).abs() < 1e-12);
    }
}
