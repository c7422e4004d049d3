// ABOUTME: Performance analytics algorithms, classifiers, and analyzers for Kinetiq
// ABOUTME: Statistical kernel, biomechanics formulas, category and cross-test analyzers, registry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

#![deny(unsafe_code)]

//! # Kinetiq Intelligence
//!
//! Stateless analyzers over per-athlete, per-test measurement series. Every
//! analyzer composes the formula library, the statistical kernel and the
//! threshold classifier into an [`AnalysisResult`].
//!
//! ## Modules
//!
//! - **`statistical_analysis`**: descriptive statistics, regression, trend fitting
//! - **distribution**: Student-t and normal distribution functions
//! - **`pattern_detection`**: plateaus, peaks, fatigue, recovery, consistency
//! - **thresholds**: tiered classification and 0-100 scoring
//! - **norms**: canonical normative tables
//! - **formulas**: closed-form biomechanics formulas
//! - **analyzers**: one analyzer per test category
//! - **comparative**, **correlation**, **`factor_analysis`**: cross-test analyzers
//! - **registry**: category to analyzer dispatch
//! - **`analysis_config`**: tunable thresholds with environment overrides

/// Tunable analysis thresholds
pub mod analysis_config;
/// Result shape and historical trend bundle
pub mod analysis_result;
/// Per-category analyzers and the `PerformanceAnalyzer` trait
pub mod analyzers;
/// Athlete versus reference group ranking
pub mod comparative;
/// Pairwise test relationships, prediction and transfer
pub mod correlation;
/// Student-t and normal distribution functions
pub mod distribution;
/// Latent performance factor decomposition
pub mod factor_analysis;
/// Closed-form biomechanics formulas
pub mod formulas;
/// Canonical normative threshold tables
pub mod norms;
/// Sliding-window pattern detection
pub mod pattern_detection;
/// Category to analyzer dispatch
pub mod registry;
/// Descriptive statistics, regression and trend fitting
pub mod statistical_analysis;
/// Tiered threshold classification
pub mod thresholds;

pub use analysis_config::{AnalysisConfig, CorrelationConfig, PatternConfig, TrendConfig};
pub use analysis_result::{AnalysisResult, HistoricalTrend};
pub use analyzers::{
    AnthropometricAnalyzer, ForceVelocityAnalyzer, ImtpAnalyzer, JumpProfileAnalyzer,
    MaturationAnalyzer, PerformanceAnalyzer, SprintAnalyzer,
};
pub use comparative::{ComparativeAnalyzer, ComparativeReport, RelativePerformance};
pub use correlation::{CorrelationAnalyzer, CorrelationReport};
pub use factor_analysis::{FactorAnalyzer, FactorReport};
pub use norms::NormativeTables;
pub use pattern_detection::PatternDetector;
pub use registry::AnalyzerRegistry;
pub use statistical_analysis::{StatisticalAnalyzer, TrendAnalysis};
pub use thresholds::{PerformanceLevel, QualityLevel, ThresholdTable};
