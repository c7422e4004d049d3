// ABOUTME: Measurement point and series models handed to analyzers by the result store
// ABOUTME: MeasurementPoint, TrialMeasurement, and timestamp-ordered MeasurementSeries definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, EngineResult};

/// A single repeated effort recorded within one testing session
///
/// Drop jumps use `contact_time_s` and `drop_height_m`; loaded jumps use
/// `added_load_kg`. Heights are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialMeasurement {
    /// Jump height reached on this trial (m)
    pub height_m: f64,
    /// Ground contact time (s)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_time_s: Option<f64>,
    /// Box height the athlete dropped from (m)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_height_m: Option<f64>,
    /// External load carried on this trial (kg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_load_kg: Option<f64>,
}

impl TrialMeasurement {
    /// Drop-jump trial
    #[must_use]
    pub const fn drop_jump(height_m: f64, contact_time_s: f64, drop_height_m: Option<f64>) -> Self {
        Self {
            height_m,
            contact_time_s: Some(contact_time_s),
            drop_height_m,
            added_load_kg: None,
        }
    }

    /// Loaded-jump trial (zero load is a body-weight jump)
    #[must_use]
    pub const fn loaded_jump(height_m: f64, added_load_kg: f64) -> Self {
        Self {
            height_m,
            contact_time_s: None,
            drop_height_m: None,
            added_load_kg: Some(added_load_kg),
        }
    }
}

/// One recorded test result
///
/// Immutable once recorded. The primary `value` carries the test's headline
/// number; optional inputs live in `sub_measurements` keyed by the names in
/// [`crate::constants::measurement_keys`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPoint {
    /// When the measurement was taken
    pub timestamp: DateTime<Utc>,
    /// Primary measured value
    pub value: f64,
    /// Named secondary values recorded in the same session
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sub_measurements: BTreeMap<String, f64>,
    /// Repeated efforts recorded in the same session
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trials: Vec<TrialMeasurement>,
}

impl MeasurementPoint {
    /// Create a point with no secondary values
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            timestamp,
            value,
            sub_measurements: BTreeMap::new(),
            trials: Vec::new(),
        }
    }

    /// Attach a named secondary value
    #[must_use]
    pub fn with_sub_measurement(mut self, key: &str, value: f64) -> Self {
        self.sub_measurements.insert(key.to_owned(), value);
        self
    }

    /// Attach session trials
    #[must_use]
    pub fn with_trials(mut self, trials: Vec<TrialMeasurement>) -> Self {
        self.trials = trials;
        self
    }

    /// Look up an optional secondary value
    #[must_use]
    pub fn sub_measurement(&self, key: &str) -> Option<f64> {
        self.sub_measurements.get(key).copied()
    }

    /// Look up a secondary value the caller cannot proceed without
    ///
    /// # Errors
    ///
    /// Returns `MissingMeasurement` if the key is absent
    pub fn require(&self, key: &str, context: &str) -> EngineResult<f64> {
        self.sub_measurement(key)
            .ok_or_else(|| AnalysisError::missing_measurement(key, context))
    }
}

/// Ordered measurements for one (athlete, test) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSeries {
    /// Name of the test these points belong to
    pub test_name: String,
    points: Vec<MeasurementPoint>,
}

impl MeasurementSeries {
    /// Build a series, ordering points by timestamp
    ///
    /// The sort is stable so points sharing a timestamp keep their input order.
    #[must_use]
    pub fn new(test_name: impl Into<String>, mut points: Vec<MeasurementPoint>) -> Self {
        points.sort_by_key(|point| point.timestamp);
        Self {
            test_name: test_name.into(),
            points,
        }
    }

    /// Points in ascending timestamp order
    #[must_use]
    pub fn points(&self) -> &[MeasurementPoint] {
        &self.points
    }

    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point
    #[must_use]
    pub fn latest(&self) -> Option<&MeasurementPoint> {
        self.points.last()
    }

    /// Primary values in order
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Timestamps in order
    #[must_use]
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Values and timestamps of the points that carry a given secondary value
    #[must_use]
    pub fn sub_measurement_columns(&self, key: &str) -> (Vec<f64>, Vec<DateTime<Utc>>) {
        self.points
            .iter()
            .filter_map(|p| p.sub_measurement(key).map(|v| (v, p.timestamp)))
            .unzip()
    }
}
