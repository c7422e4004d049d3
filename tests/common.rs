// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides athletes, timestamps, measurement series, and quiet logging setup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `kinetiq`

use std::sync::Once;

use chrono::{DateTime, Duration, Utc};
use kinetiq::{AthleteContext, Gender, MeasurementPoint, MeasurementSeries};
use tracing::Level;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_test_writer()
            .try_init();
    });
}

/// Fixed reference instant: 2025-01-06 08:00 UTC
pub fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_736_150_400, 0).unwrap()
}

/// Timestamp `days` after the reference instant
pub fn day(days: i64) -> DateTime<Utc> {
    base_time() + Duration::days(days)
}

/// Timestamps spaced `step_days` apart
pub fn timestamps(count: usize, step_days: i64) -> Vec<DateTime<Utc>> {
    (0_i64..).take(count).map(|i| day(i * step_days)).collect()
}

/// Series of plain values measured weekly
pub fn weekly_series(test_name: &str, values: &[f64]) -> MeasurementSeries {
    let points = values
        .iter()
        .zip(0_i64..)
        .map(|(value, week)| MeasurementPoint::new(day(week * 7), *value))
        .collect();
    MeasurementSeries::new(test_name, points)
}

/// Adult male with mass, height, and age
pub fn male_athlete() -> AthleteContext {
    AthleteContext::new(Uuid::new_v4(), Gender::Male)
        .with_age(24.0)
        .with_body_mass(80.0)
        .with_height(180.0)
}

/// Adolescent female with mass, height, and age
pub fn youth_female_athlete() -> AthleteContext {
    AthleteContext::new(Uuid::new_v4(), Gender::Female)
        .with_age(13.5)
        .with_body_mass(48.0)
        .with_height(158.0)
}

/// Assert two floats agree within `tolerance`
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
