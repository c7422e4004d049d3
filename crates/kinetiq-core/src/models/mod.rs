// ABOUTME: Data models for measurements, athletes, and test categories
// ABOUTME: Re-exports all model types for convenient access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

/// Athlete context and gender
pub mod athlete;
/// Test categories
pub mod category;
/// Measurement points, trials, and series
pub mod measurement;

pub use athlete::{AthleteContext, Gender};
pub use category::TestCategory;
pub use measurement::{MeasurementPoint, MeasurementSeries, TrialMeasurement};
