// ABOUTME: Sprint analyzer decomposing 10 m, 20 m and flying 10 m splits
// ABOUTME: Acceleration quality and banded score, speed maintenance, max speed, deficit, program
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use kinetiq_core::constants::measurement_keys;
use kinetiq_core::errors::EngineResult;
use kinetiq_core::models::{AthleteContext, MeasurementPoint, MeasurementSeries, TestCategory};
use serde::Serialize;
use tracing::debug;

use super::PerformanceAnalyzer;
use crate::analysis_config::AnalysisConfig;
use crate::analysis_result::{trend_for, AnalysisResult};
use crate::formulas::{sprint_acceleration, SprintKinematics};
use crate::norms::NormativeTables;
use crate::thresholds::QualityLevel;

/// Normalized 20 m (t20 / t10) at or below which strength is the focus
pub const STRENGTH_PROGRAM_CEILING: f64 = 1.79;

/// Normalized 20 m at or below which power is the focus
pub const POWER_PROGRAM_CEILING: f64 = 1.82;

/// Training program family chosen from the split ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrainingFocus {
    /// Acceleration limited by force production
    #[serde(rename = "Strength Program")]
    Strength,
    /// Speed-strength development
    #[serde(rename = "Power Program")]
    Power,
    /// Mechanics and neural activation
    #[serde(rename = "Speed/Strength Program")]
    Speed,
}

impl TrainingFocus {
    /// Program for a normalized 20 m time
    #[must_use]
    pub fn from_normalized_20m(normalized_20m: f64) -> Self {
        if normalized_20m <= STRENGTH_PROGRAM_CEILING {
            Self::Strength
        } else if normalized_20m <= POWER_PROGRAM_CEILING {
            Self::Power
        } else {
            Self::Speed
        }
    }
}

/// A sprint training prescription
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SprintProgram {
    /// Program family
    pub program: TrainingFocus,
    /// Quality the program develops
    pub focus: &'static str,
    /// Suggested exercises
    pub key_exercises: Vec<&'static str>,
    /// Session emphasis
    pub training_emphasis: &'static str,
    /// Sets and frequency
    pub volume: &'static str,
    /// Rest between sets
    pub rest: &'static str,
    /// How to progress
    pub progression_notes: &'static str,
}

impl SprintProgram {
    /// Prescription for a program family
    #[must_use]
    pub fn for_focus(program: TrainingFocus) -> Self {
        match program {
            TrainingFocus::Strength => Self {
                program,
                focus: "Acceleration and Force Production",
                key_exercises: vec![
                    "Heavy Squats (3-5 reps)",
                    "Deadlifts (3-5 reps)",
                    "Power Cleans (3-5 reps)",
                    "Weighted Jumps",
                    "Hill Sprints",
                ],
                training_emphasis: "Focus on maximal strength and explosive power",
                volume: "3-4 sets per exercise, 2-3 times per week",
                rest: "2-3 minutes between sets",
                progression_notes: "Increase weight when 3x5 is achieved with good form",
            },
            TrainingFocus::Power => Self {
                program,
                focus: "Speed-Strength Development",
                key_exercises: vec![
                    "Jump Squats",
                    "Trap Bar Jumps",
                    "Olympic Lifts",
                    "Resisted Sprints",
                    "Plyometric Combinations",
                ],
                training_emphasis: "Focus on explosive power and rate of force development",
                volume: "4-6 sets per exercise, 2-3 times per week",
                rest: "2 minutes between sets",
                progression_notes: "Progress by increasing movement velocity",
            },
            TrainingFocus::Speed => Self {
                program,
                focus: "Speed and Technique",
                key_exercises: vec![
                    "Sprint Technique Drills",
                    "Flying Sprints",
                    "Rolling Starts",
                    "Sprint Bounds",
                    "Light Plyometrics",
                ],
                training_emphasis: "Focus on sprint mechanics and neural activation",
                volume: "5-8 sets per exercise, 2-3 times per week",
                rest: "Full recovery (2-3 minutes)",
                progression_notes: "Focus on quality and technical execution",
            },
        }
    }
}

/// Qualities of each sprint phase and what to prioritise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintSummary {
    /// 0-10 m acceleration quality
    pub acceleration_ability: QualityLevel,
    /// 10-20 m speed maintenance quality
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_maintenance: Option<QualityLevel>,
    /// Flying 10 m quality
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed_ability: Option<QualityLevel>,
    /// Acceleration-to-max-speed balance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration_deficit: Option<QualityLevel>,
    /// Notable weaknesses
    pub key_findings: Vec<&'static str>,
    /// What training should address first
    pub primary_focus: Vec<&'static str>,
}

impl SprintSummary {
    fn record_if_weak(
        &mut self,
        level: Option<QualityLevel>,
        finding: &'static str,
        focus: &'static str,
    ) {
        if level == Some(QualityLevel::NeedsImprovement) {
            self.key_findings.push(finding);
            self.primary_focus.push(focus);
        }
    }
}

/// Analyzer for sprint sessions
///
/// The primary value is the 10 m time in seconds. `sprint_20m` and
/// `flying_10m` sub-measurements enable the maintenance, program and
/// max-speed blocks.
pub struct SprintAnalyzer {
    config: AnalysisConfig,
    norms: NormativeTables,
}

impl SprintAnalyzer {
    /// Create an analyzer with the given configuration and norms
    #[must_use]
    pub const fn new(config: AnalysisConfig, norms: NormativeTables) -> Self {
        Self { config, norms }
    }

    fn summarize(&self, kinematics: &SprintKinematics) -> EngineResult<SprintSummary> {
        let acceleration_ability = self
            .norms
            .sprint_acceleration
            .classify(kinematics.initial_acceleration)?;
        let speed_maintenance = kinematics
            .maintenance
            .map(|m| self.norms.speed_maintenance.classify(m.velocity_drop_percent))
            .transpose()?;
        let max_speed_ability = kinematics
            .max_velocity
            .map(|v| self.norms.sprint_max_velocity.classify(v))
            .transpose()?;
        let acceleration_deficit = kinematics
            .acceleration_deficit_percent
            .map(|d| self.norms.acceleration_deficit.classify(d))
            .transpose()?;

        let mut summary = SprintSummary {
            acceleration_ability,
            speed_maintenance,
            max_speed_ability,
            acceleration_deficit,
            key_findings: Vec::new(),
            primary_focus: Vec::new(),
        };
        summary.record_if_weak(
            Some(acceleration_ability),
            "Initial acceleration needs significant improvement",
            "Force production and starting strength",
        );
        summary.record_if_weak(
            speed_maintenance,
            "Speed maintenance shows significant drop-off",
            "Speed endurance and technical efficiency",
        );
        summary.record_if_weak(
            max_speed_ability,
            "Maximum speed capability needs development",
            "Maximum velocity mechanics and power output",
        );
        Ok(summary)
    }
}

impl PerformanceAnalyzer for SprintAnalyzer {
    fn category(&self) -> TestCategory {
        TestCategory::Speed
    }

    fn name(&self) -> &'static str {
        "sprint"
    }

    fn analyze(
        &self,
        athlete: &AthleteContext,
        current: &MeasurementPoint,
        history: Option<&MeasurementSeries>,
    ) -> EngineResult<AnalysisResult> {
        let t10 = current.value;
        let t20 = current.sub_measurement(measurement_keys::SPRINT_20M);
        let flying = current.sub_measurement(measurement_keys::FLYING_10M);

        let kinematics = sprint_acceleration(t10, t20, flying)?;
        let summary = self.summarize(&kinematics)?;
        let acceleration_score = self
            .norms
            .sprint_acceleration
            .banded_score(kinematics.initial_acceleration)?;
        let max_velocity_score = kinematics
            .max_velocity
            .map(|v| self.norms.sprint_max_velocity.banded_score(v))
            .transpose()?;
        let program = t20.map(|t20| {
            SprintProgram::for_focus(TrainingFocus::from_normalized_20m(t20 / t10))
        });

        debug!(
            athlete_id = %athlete.athlete_id,
            t10,
            acceleration = kinematics.initial_acceleration,
            quality = %summary.acceleration_ability,
            "Analyzed sprint session"
        );

        let mut result = AnalysisResult::new(self.category())
            .with_metric("sprint_10m", t10)
            .with_optional_metric("sprint_20m", t20)
            .with_optional_metric("flying_10m", flying)
            .with_metric("initial_velocity", kinematics.initial_velocity)
            .with_metric("initial_acceleration", kinematics.initial_acceleration)
            .with_optional_metric(
                "second_10m_time",
                kinematics.maintenance.map(|m| m.second_10m_time),
            )
            .with_optional_metric(
                "velocity_drop_percent",
                kinematics.maintenance.map(|m| m.velocity_drop_percent),
            )
            .with_optional_metric("max_velocity", kinematics.max_velocity)
            .with_optional_metric("max_velocity_score", max_velocity_score)
            .with_optional_metric(
                "acceleration_deficit_percent",
                kinematics.acceleration_deficit_percent,
            )
            .with_classification(summary.acceleration_ability)
            .with_score(acceleration_score)
            .with_interpretation(acceleration_interpretation(summary.acceleration_ability))
            .with_recommendations(summary.primary_focus.iter().copied())
            .with_trend(trend_for(history, &self.config)?)
            .with_serialized_detail("kinematics", &kinematics)?;

        if let Some(deficit) = summary.acceleration_deficit {
            result = result.with_detail(
                "acceleration_deficit_interpretation",
                deficit_interpretation(deficit).into(),
            );
        }
        if let Some(program) = &program {
            result = result.with_serialized_detail("training_program", program)?;
        }
        result.with_serialized_detail("performance_summary", &summary)
    }
}

const fn acceleration_interpretation(level: QualityLevel) -> &'static str {
    match level {
        QualityLevel::Excellent => {
            "Elite level acceleration capability, focus on maintaining this quality"
        }
        QualityLevel::Good => {
            "Strong acceleration ability, minor improvements possible through targeted training"
        }
        QualityLevel::Average => {
            "Typical acceleration profile, potential for improvement through power development"
        }
        QualityLevel::NeedsImprovement => {
            "Focus required on explosive strength and acceleration technique"
        }
    }
}

const fn deficit_interpretation(level: QualityLevel) -> &'static str {
    match level {
        QualityLevel::Excellent => "Excellent balance between acceleration and max speed",
        QualityLevel::Good => "Good acceleration-speed relationship, minor optimization possible",
        QualityLevel::Average => "Typical acceleration-speed relationship, room for improvement",
        QualityLevel::NeedsImprovement => "Significant imbalance between acceleration and max speed",
    }
}
