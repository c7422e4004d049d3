// ABOUTME: Athlete context supplied alongside each measurement for analysis
// ABOUTME: AthleteContext and Gender definitions used by gender-conditional formulas
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AnalysisError, EngineResult};

/// Biological sex used to select formula constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male constants
    Male,
    /// Female constants
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            other => Err(AnalysisError::invalid_value(
                "gender",
                format!("expected 'male' or 'female', got '{other}'"),
            )),
        }
    }
}

/// Static facts about the athlete at the time of analysis
///
/// Everything beyond identity and gender is optional; analyzers that need a
/// field fail with `MissingMeasurement` when it is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteContext {
    /// Athlete identifier (for log correlation only)
    pub athlete_id: Uuid,
    /// Biological sex
    pub gender: Gender,
    /// Decimal age in years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_years: Option<f64>,
    /// Body mass (kg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_mass_kg: Option<f64>,
    /// Standing height (cm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    /// Lower-limb length (m)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leg_length_m: Option<f64>,
}

impl AthleteContext {
    /// Context with only identity and gender
    #[must_use]
    pub const fn new(athlete_id: Uuid, gender: Gender) -> Self {
        Self {
            athlete_id,
            gender,
            age_years: None,
            body_mass_kg: None,
            height_cm: None,
            leg_length_m: None,
        }
    }

    /// Set decimal age
    #[must_use]
    pub const fn with_age(mut self, age_years: f64) -> Self {
        self.age_years = Some(age_years);
        self
    }

    /// Set body mass
    #[must_use]
    pub const fn with_body_mass(mut self, body_mass_kg: f64) -> Self {
        self.body_mass_kg = Some(body_mass_kg);
        self
    }

    /// Set standing height
    #[must_use]
    pub const fn with_height(mut self, height_cm: f64) -> Self {
        self.height_cm = Some(height_cm);
        self
    }

    /// Set lower-limb length
    #[must_use]
    pub const fn with_leg_length(mut self, leg_length_m: f64) -> Self {
        self.leg_length_m = Some(leg_length_m);
        self
    }

    /// Body mass, required by the calling analysis
    ///
    /// # Errors
    ///
    /// Returns `MissingMeasurement` if body mass is unknown
    pub fn require_body_mass(&self, context: &str) -> EngineResult<f64> {
        self.body_mass_kg
            .ok_or_else(|| AnalysisError::missing_measurement("body_mass_kg", context))
    }

    /// Age, required by the calling analysis
    ///
    /// # Errors
    ///
    /// Returns `MissingMeasurement` if age is unknown
    pub fn require_age(&self, context: &str) -> EngineResult<f64> {
        self.age_years
            .ok_or_else(|| AnalysisError::missing_measurement("age_years", context))
    }
}
