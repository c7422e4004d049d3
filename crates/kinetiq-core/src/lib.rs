// ABOUTME: Core types and constants for the Kinetiq performance analytics engine
// ABOUTME: Foundation crate with error handling, measurement models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

#![deny(unsafe_code)]

//! # Kinetiq Core
//!
//! Foundation crate providing shared types and constants for the Kinetiq
//! analytics engine. It changes rarely, so the analyzers built on top of it
//! recompile independently.
//!
//! ## Modules
//!
//! - **errors**: `AnalysisError`, `ErrorCode`, and `ConfigError`
//! - **models**: measurement points, series, athlete context, test categories
//! - **constants**: physical constants and measurement key names

/// Error types with stable codes
pub mod errors;

/// Physical constants and measurement key names
pub mod constants;

/// Measurement and athlete data models
pub mod models;

pub use errors::{AnalysisError, ConfigError, EngineResult, ErrorCode};
pub use models::{
    AthleteContext, Gender, MeasurementPoint, MeasurementSeries, TestCategory, TrialMeasurement,
};
