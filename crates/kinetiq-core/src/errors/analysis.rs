// ABOUTME: Analysis error types raised by kernel, formula, and analyzer operations
// ABOUTME: Defines AnalysisError with structured context and a stable ErrorCode mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use serde::{Deserialize, Serialize};

/// Stable, serializable error classification for analysis failures
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Series too short for the requested statistic
    InsufficientData,
    /// A conditionally-required input is absent
    MissingMeasurement,
    /// Non-finite or out-of-bound input
    InvalidValue,
}

impl ErrorCode {
    /// Machine-readable identifier for the code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientData => "insufficient_data",
            Self::MissingMeasurement => "missing_measurement",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Errors produced by a single analysis call.
///
/// None of these are fatal to the process; each is scoped to the invocation
/// that produced it and the caller decides whether partial results are useful.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// The series is too short for the requested statistic
    #[error("Insufficient data for {operation}: need at least {required}, got {actual}")]
    InsufficientData {
        /// Operation that needed more data
        operation: &'static str,
        /// Minimum number of points or trials
        required: usize,
        /// Number actually supplied
        actual: usize,
    },

    /// A conditionally-required measurement is absent
    #[error("Missing required measurement '{measurement}': {context}")]
    MissingMeasurement {
        /// Name of the absent measurement
        measurement: String,
        /// Why the measurement was required
        context: String,
    },

    /// Input is non-numeric or outside its declared bounds
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Name of the offending input
        field: String,
        /// Reason the value was rejected
        reason: String,
    },
}

impl AnalysisError {
    /// Create an "insufficient data" error
    #[must_use]
    pub const fn insufficient_data(operation: &'static str, required: usize, actual: usize) -> Self {
        Self::InsufficientData {
            operation,
            required,
            actual,
        }
    }

    /// Create a "missing measurement" error
    #[must_use]
    pub fn missing_measurement(measurement: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingMeasurement {
            measurement: measurement.into(),
            context: context.into(),
        }
    }

    /// Create an "invalid value" error
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Reject NaN and infinities for a named input
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `value` is not finite
    pub fn ensure_finite(field: &str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::invalid_value(field, format!("expected a finite number, got {value}")))
        }
    }

    /// Require a strictly positive, finite input
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `value` is not finite or not greater than zero
    pub fn ensure_positive(field: &str, value: f64) -> Result<f64, Self> {
        let value = Self::ensure_finite(field, value)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(Self::invalid_value(field, format!("must be greater than zero, got {value}")))
        }
    }

    /// Get the stable error code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InsufficientData { .. } => ErrorCode::InsufficientData,
            Self::MissingMeasurement { .. } => ErrorCode::MissingMeasurement,
            Self::InvalidValue { .. } => ErrorCode::InvalidValue,
        }
    }
}

/// Result alias used throughout the analytics engine
pub type EngineResult<T> = Result<T, AnalysisError>;
