// ABOUTME: Configuration-driven parameters for pattern detection, trend fitting, and correlation
// ABOUTME: Provides type-safe defaults with KINETIQ_* environment overrides and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use std::env;
use std::str::FromStr;

use kinetiq_core::errors::ConfigError;
use serde::{Deserialize, Serialize};

use crate::pattern_detection::{
    DEFAULT_FATIGUE_DECLINE, DEFAULT_FATIGUE_RECOVERY, DEFAULT_PEAK_WINDOW,
    DEFAULT_PLATEAU_VARIATION, DEFAULT_PLATEAU_WINDOW,
};
use crate::statistical_analysis::{DEFAULT_CONFIDENCE_LEVEL, DEFAULT_SHORT_WINDOW};

/// Sliding-window pattern detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Points per plateau window
    pub plateau_window: usize,

    /// Coefficient of variation below which a window is a plateau
    pub plateau_variation: f64,

    /// Points per peak window
    pub peak_window: usize,

    /// Relative change below which a step counts as a decline (negative)
    pub fatigue_decline: f64,

    /// Relative change above which a step closes a decline run
    pub fatigue_recovery: f64,
}

/// Trend fitting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Confidence level for the trend band (0.0 to 1.0 exclusive)
    pub confidence_level: f64,

    /// Number of recent points used for the direction label
    pub short_window: usize,
}

/// Cross-test correlation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// p-value below which a correlation is significant
    pub significance_level: f64,

    /// R² above which a pair is reported as predictive
    pub predictive_r_squared: f64,

    /// |Cohen's d| above which a pair is reported as a transfer effect
    pub transfer_effect_threshold: f64,
}

/// Main analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Pattern detection
    pub patterns: PatternConfig,
    /// Trend fitting
    pub trend: TrendConfig,
    /// Correlation analysis
    pub correlation: CorrelationConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            patterns: PatternConfig {
                plateau_window: DEFAULT_PLATEAU_WINDOW,
                plateau_variation: DEFAULT_PLATEAU_VARIATION,
                peak_window: DEFAULT_PEAK_WINDOW,
                fatigue_decline: DEFAULT_FATIGUE_DECLINE,
                fatigue_recovery: DEFAULT_FATIGUE_RECOVERY,
            },
            trend: TrendConfig {
                confidence_level: DEFAULT_CONFIDENCE_LEVEL,
                short_window: DEFAULT_SHORT_WINDOW,
            },
            correlation: CorrelationConfig {
                significance_level: 0.05,
                predictive_r_squared: 0.5,
                transfer_effect_threshold: 0.3,
            },
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from environment variables with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable does not parse or the
    /// resulting configuration fails validation
    pub fn from_environment() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        override_from_env("KINETIQ_PLATEAU_WINDOW", &mut config.patterns.plateau_window)?;
        override_from_env(
            "KINETIQ_PLATEAU_VARIATION",
            &mut config.patterns.plateau_variation,
        )?;
        override_from_env("KINETIQ_PEAK_WINDOW", &mut config.patterns.peak_window)?;
        override_from_env("KINETIQ_FATIGUE_DECLINE", &mut config.patterns.fatigue_decline)?;
        override_from_env(
            "KINETIQ_FATIGUE_RECOVERY",
            &mut config.patterns.fatigue_recovery,
        )?;
        override_from_env("KINETIQ_CONFIDENCE_LEVEL", &mut config.trend.confidence_level)?;
        override_from_env(
            "KINETIQ_SIGNIFICANCE_LEVEL",
            &mut config.correlation.significance_level,
        )?;
        override_from_env(
            "KINETIQ_PREDICTIVE_R_SQUARED",
            &mut config.correlation.predictive_r_squared,
        )?;
        override_from_env(
            "KINETIQ_TRANSFER_EFFECT",
            &mut config.correlation.transfer_effect_threshold,
        )?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.patterns.plateau_window < 2 {
            return Err(ConfigError::ValidationFailed(
                "plateau_window must be >= 2".into(),
            ));
        }

        if self.patterns.peak_window < 3 || self.patterns.peak_window % 2 == 0 {
            return Err(ConfigError::ValidationFailed(format!(
                "peak_window must be an odd number >= 3, got {}",
                self.patterns.peak_window
            )));
        }

        if !(self.patterns.plateau_variation > 0.0 && self.patterns.plateau_variation < 1.0) {
            return Err(ConfigError::ValueOutOfRange(
                "plateau_variation must be between 0 and 1",
            ));
        }

        if !(self.patterns.fatigue_decline < 0.0 && self.patterns.fatigue_decline > -1.0) {
            return Err(ConfigError::ValueOutOfRange(
                "fatigue_decline must be between -1 and 0",
            ));
        }

        if !(self.patterns.fatigue_recovery > 0.0 && self.patterns.fatigue_recovery.is_finite()) {
            return Err(ConfigError::ValueOutOfRange("fatigue_recovery must be > 0"));
        }

        if !(self.trend.confidence_level > 0.0 && self.trend.confidence_level < 1.0) {
            return Err(ConfigError::ValueOutOfRange(
                "confidence_level must be between 0 and 1",
            ));
        }

        if self.trend.short_window < 2 {
            return Err(ConfigError::ValidationFailed(
                "short_window must be >= 2".into(),
            ));
        }

        if !(self.correlation.significance_level > 0.0 && self.correlation.significance_level < 1.0)
        {
            return Err(ConfigError::ValueOutOfRange(
                "significance_level must be between 0 and 1",
            ));
        }

        if !(0.0..=1.0).contains(&self.correlation.predictive_r_squared) {
            return Err(ConfigError::ValueOutOfRange(
                "predictive_r_squared must be between 0 and 1",
            ));
        }

        if !(self.correlation.transfer_effect_threshold >= 0.0
            && self.correlation.transfer_effect_threshold.is_finite())
        {
            return Err(ConfigError::ValueOutOfRange(
                "transfer_effect_threshold must be >= 0",
            ));
        }

        Ok(())
    }
}

fn override_from_env<T: FromStr>(key: &'static str, target: &mut T) -> Result<(), ConfigError> {
    if let Ok(raw) = env::var(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnvironmentValue { key, value: raw })?;
    }
    Ok(())
}
