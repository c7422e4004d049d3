// ABOUTME: PerformanceAnalyzer trait and the built-in category analyzers
// ABOUTME: Anthropometrics, maturation, IMTP strength, jump profile, force-velocity, sprint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

//! # Category Analyzers
//!
//! Every test category is handled by one implementation of
//! [`PerformanceAnalyzer`]. Analyzers are stateless apart from the
//! configuration and normative tables they were built with, so a single
//! instance can be shared across threads behind an `Arc`.

use kinetiq_core::errors::EngineResult;
use kinetiq_core::models::{AthleteContext, MeasurementPoint, MeasurementSeries, TestCategory};

use crate::analysis_result::AnalysisResult;

/// Body composition and size
pub mod anthropometric;
/// Drop-jump and loaded-jump force-velocity profiling
pub mod force_velocity;
/// Isometric mid-thigh pull strength
pub mod imtp;
/// Countermovement, Abalakov and drop jump profile
pub mod jump_profile;
/// Biological maturity offset
pub mod maturation;
/// 10 m / 20 m / flying sprint decomposition
pub mod sprint;

pub use anthropometric::AnthropometricAnalyzer;
pub use force_velocity::ForceVelocityAnalyzer;
pub use imtp::ImtpAnalyzer;
pub use jump_profile::JumpProfileAnalyzer;
pub use maturation::MaturationAnalyzer;
pub use sprint::SprintAnalyzer;

/// Core abstraction for a category analyzer
///
/// `analyze` is pure: the same inputs always produce the same result, and
/// nothing is cached between calls. When `history` is supplied the result
/// carries a [`crate::analysis_result::HistoricalTrend`].
pub trait PerformanceAnalyzer: Send + Sync {
    /// Category this analyzer handles
    fn category(&self) -> TestCategory;

    /// Human-readable analyzer name for logs
    fn name(&self) -> &'static str;

    /// Analyze the current measurement, optionally against its history
    ///
    /// # Errors
    ///
    /// Returns `MissingMeasurement` when a required input is absent,
    /// `InvalidValue` for out-of-range inputs and `InsufficientData` when
    /// there are too few trials or points
    fn analyze(
        &self,
        athlete: &AthleteContext,
        current: &MeasurementPoint,
        history: Option<&MeasurementSeries>,
    ) -> EngineResult<AnalysisResult>;
}
