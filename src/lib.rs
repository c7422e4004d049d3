// ABOUTME: Main library entry point for the Kinetiq athlete performance analytics engine
// ABOUTME: Re-exports the engine crates and adds logging setup and parallel batch analysis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

#![deny(unsafe_code)]

//! # Kinetiq
//!
//! Stateless analytics over periodic physical-performance tests. Callers
//! hand the engine already-fetched, ordered measurement series and receive
//! structured [`AnalysisResult`] values; nothing is stored or fetched here.
//!
//! ## Architecture
//!
//! - **Core** (`kinetiq-core`): errors, measurement models, constants
//! - **Intelligence** (`kinetiq-intelligence`): statistical kernel, formulas,
//!   threshold tables, category and cross-test analyzers, registry
//! - **Logging**: `tracing-subscriber` setup from `RUST_LOG` and `LOG_FORMAT`
//! - **Batch**: parallel dispatch of independent requests
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use kinetiq::{AnalysisConfig, AnalyzerRegistry, NormativeTables};
//!
//! fn main() -> anyhow::Result<()> {
//!     kinetiq::logging::init_from_env()?;
//!     let config = AnalysisConfig::from_environment()?;
//!     let norms = NormativeTables::standard()?;
//!     let registry = AnalyzerRegistry::with_builtin_analyzers(&config, &norms);
//!     println!("{} analyzers ready", registry.len());
//!     Ok(())
//! }
//! ```

/// Parallel batch analysis
pub mod batch;

/// Structured logging setup
pub mod logging;

pub use kinetiq_core::{
    constants, errors, models, AnalysisError, AthleteContext, ConfigError, EngineResult,
    ErrorCode, Gender, MeasurementPoint, MeasurementSeries, TestCategory, TrialMeasurement,
};
pub use kinetiq_intelligence::{
    analysis_config, analysis_result, analyzers, comparative, correlation, distribution,
    factor_analysis, formulas, norms, pattern_detection, registry, statistical_analysis,
    thresholds, AnalysisConfig, AnalysisResult, AnalyzerRegistry, ComparativeAnalyzer,
    CorrelationAnalyzer, FactorAnalyzer, HistoricalTrend, NormativeTables, PatternDetector,
    PerformanceAnalyzer, StatisticalAnalyzer, TrendAnalysis,
};

pub use batch::{analyze_batch, AnalysisRequest};
