// ABOUTME: Unified error handling for the analytics engine
// ABOUTME: Re-exports analysis and configuration error types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

/// Errors raised by a single analysis invocation
pub mod analysis;
/// Errors raised while loading or validating configuration
pub mod config;

pub use analysis::{AnalysisError, EngineResult, ErrorCode};
pub use config::ConfigError;
