// ABOUTME: Configuration error types for analysis parameter validation
// ABOUTME: Defines error variants for invalid ranges, environment parsing, and validation failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Environment variable could not be parsed into the expected type
    #[error("Invalid value for environment variable {key}: '{value}'")]
    InvalidEnvironmentValue {
        /// Environment variable name
        key: &'static str,
        /// Raw value that failed to parse
        value: String,
    },

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),

    /// Cross-field validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}
