// ABOUTME: Isometric mid-thigh pull analyzer for maximal and explosive strength
// ABOUTME: Relative force, RFD-50 and force-at-200ms levels, priorities, asymmetry, training plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use kinetiq_core::constants::measurement_keys;
use kinetiq_core::errors::{AnalysisError, EngineResult};
use kinetiq_core::models::{AthleteContext, MeasurementPoint, MeasurementSeries, TestCategory};
use serde::Serialize;
use tracing::debug;

use super::PerformanceAnalyzer;
use crate::analysis_config::AnalysisConfig;
use crate::analysis_result::{trend_for, AnalysisResult};
use crate::formulas::{bilateral_asymmetry, relative_strength};
use crate::norms::NormativeTables;
use crate::thresholds::{PerformanceLevel, ThresholdTable};

/// Index of the "advanced" tier in the IMTP tables
const ADVANCED_TIER: usize = 1;

/// Level and score of one IMTP metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAssessment {
    /// Measured value
    pub value: f64,
    /// Tier reached
    pub level: PerformanceLevel,
    /// 0-100 score against the elite cutoff
    pub score: f64,
    /// Interpretation for the tier
    pub interpretation: &'static str,
}

/// Prescription attached to a focus area
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainingParameters {
    /// Load prescription
    pub intensity: &'static str,
    /// Sets per exercise
    pub sets: &'static str,
    /// Repetitions per set
    pub reps: &'static str,
    /// Rest between sets
    pub rest: &'static str,
    /// Sessions per week
    pub frequency: &'static str,
    /// How to progress or what to emphasise
    pub progression: &'static str,
}

/// One below-advanced quality and how to train it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusArea {
    /// Quality to develop
    pub name: &'static str,
    /// Suggested exercises
    pub exercises: Vec<&'static str>,
    /// Prescription
    pub parameters: TrainingParameters,
}

/// Training plan derived from the three IMTP metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthRecommendations {
    /// Qualities below the advanced tier
    pub focus_areas: Vec<FocusArea>,
    /// Qualities ordered by percentage of the advanced cutoff, lowest first
    pub priorities: Vec<&'static str>,
}

/// Analyzer for IMTP sessions
///
/// The primary value is peak force in newtons; `rfd_50` and `force_200ms`
/// are required sub-measurements, and `left_peak_force`/`right_peak_force`
/// enable the bilateral comparison.
pub struct ImtpAnalyzer {
    config: AnalysisConfig,
    norms: NormativeTables,
}

impl ImtpAnalyzer {
    /// Create an analyzer with the given configuration and norms
    #[must_use]
    pub const fn new(config: AnalysisConfig, norms: NormativeTables) -> Self {
        Self { config, norms }
    }

    fn assess(
        table: &ThresholdTable<PerformanceLevel>,
        value: f64,
        interpretation: fn(PerformanceLevel) -> &'static str,
    ) -> EngineResult<MetricAssessment> {
        let level = table.classify(value)?;
        Ok(MetricAssessment {
            value,
            level,
            score: table.score(value)?,
            interpretation: interpretation(level),
        })
    }

    fn recommendations(
        &self,
        relative_force: f64,
        rfd_50: f64,
        force_200ms: f64,
    ) -> StrengthRecommendations {
        let below_advanced = |table: &ThresholdTable<PerformanceLevel>, value: f64| {
            table.cutoff(ADVANCED_TIER).is_some_and(|cutoff| value < cutoff)
        };

        let mut focus_areas = Vec::new();
        if below_advanced(&self.norms.imtp_relative_peak_force, relative_force) {
            focus_areas.push(maximum_strength_focus());
        }
        if below_advanced(&self.norms.imtp_rfd_50, rfd_50) {
            focus_areas.push(explosive_strength_focus());
        }
        if below_advanced(&self.norms.imtp_force_200ms, force_200ms) {
            focus_areas.push(early_force_focus());
        }

        let percent_of_advanced = |table: &ThresholdTable<PerformanceLevel>, value: f64| {
            table
                .cutoff(ADVANCED_TIER)
                .filter(|cutoff| *cutoff > 0.0)
                .map_or(0.0, |cutoff| value / cutoff * 100.0)
        };
        let mut ranked = [
            (
                "Maximum Strength",
                percent_of_advanced(&self.norms.imtp_relative_peak_force, relative_force),
            ),
            (
                "Rate of Force Development",
                percent_of_advanced(&self.norms.imtp_rfd_50, rfd_50),
            ),
            (
                "Early Force Production",
                percent_of_advanced(&self.norms.imtp_force_200ms, force_200ms),
            ),
        ];
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

        StrengthRecommendations {
            focus_areas,
            priorities: ranked.iter().map(|(name, _)| *name).collect(),
        }
    }
}

impl PerformanceAnalyzer for ImtpAnalyzer {
    fn category(&self) -> TestCategory {
        TestCategory::Strength
    }

    fn name(&self) -> &'static str {
        "imtp"
    }

    fn analyze(
        &self,
        athlete: &AthleteContext,
        current: &MeasurementPoint,
        history: Option<&MeasurementSeries>,
    ) -> EngineResult<AnalysisResult> {
        let peak_force = AnalysisError::ensure_positive("peak_force", current.value)?;
        let body_mass = athlete.require_body_mass("IMTP relative force")?;
        let rfd_50 = current.require(measurement_keys::RFD_50, "IMTP explosive strength")?;
        let force_200ms = current.require(measurement_keys::FORCE_200MS, "IMTP early force")?;
        let relative_force = relative_strength(peak_force, body_mass);

        let force_production = Self::assess(
            &self.norms.imtp_relative_peak_force,
            relative_force,
            strength_interpretation,
        )?;
        let explosive_strength =
            Self::assess(&self.norms.imtp_rfd_50, rfd_50, rfd_interpretation)?;
        let early_force = Self::assess(
            &self.norms.imtp_force_200ms,
            force_200ms,
            early_force_interpretation,
        )?;
        let plan = self.recommendations(relative_force, rfd_50, force_200ms);

        debug!(
            athlete_id = %athlete.athlete_id,
            relative_force,
            level = %force_production.level,
            "Analyzed IMTP session"
        );

        let mut result = AnalysisResult::new(self.category())
            .with_metric("peak_force", peak_force)
            .with_metric("relative_peak_force", relative_force)
            .with_metric("rfd_50", rfd_50)
            .with_metric("force_200ms", force_200ms)
            .with_metric("rfd_50_score", explosive_strength.score)
            .with_metric("force_200ms_score", early_force.score)
            .with_classification(force_production.level)
            .with_score(force_production.score)
            .with_interpretation(force_production.interpretation)
            .with_recommendations(plan.focus_areas.iter().map(|area| area.name))
            .with_trend(trend_for(history, &self.config)?)
            .with_serialized_detail("force_production", &force_production)?
            .with_serialized_detail("explosive_strength", &explosive_strength)?
            .with_serialized_detail("early_force", &early_force)?
            .with_serialized_detail("training_plan", &plan)?;

        if let (Some(left), Some(right)) = (
            current.sub_measurement(measurement_keys::LEFT_PEAK_FORCE),
            current.sub_measurement(measurement_keys::RIGHT_PEAK_FORCE),
        ) {
            let asymmetry = bilateral_asymmetry(left, right)?;
            result = result
                .with_metric("asymmetry_percent", asymmetry.asymmetry_percent)
                .with_serialized_detail("bilateral", &asymmetry)?;
        }

        Ok(result)
    }
}

const fn strength_interpretation(level: PerformanceLevel) -> &'static str {
    match level {
        PerformanceLevel::Elite => "Elite maximal strength relative to body mass",
        PerformanceLevel::Advanced => "Strong maximal force production",
        PerformanceLevel::Intermediate => "Moderate maximal strength, room for development",
        PerformanceLevel::Developing => "Maximal strength is a development priority",
    }
}

const fn rfd_interpretation(level: PerformanceLevel) -> &'static str {
    match level {
        PerformanceLevel::Elite => "Elite explosive strength capability, focus on maintenance",
        PerformanceLevel::Advanced => "Strong explosive strength, minor refinements needed",
        PerformanceLevel::Intermediate => {
            "Moderate explosive strength, focus on specific RFD training"
        }
        PerformanceLevel::Developing => "Requires focused development of explosive strength",
    }
}

const fn early_force_interpretation(level: PerformanceLevel) -> &'static str {
    match level {
        PerformanceLevel::Elite => "Excellent early force production, maintain current capability",
        PerformanceLevel::Advanced => "Good early force development, minor improvements possible",
        PerformanceLevel::Intermediate => "Average early force production, room for improvement",
        PerformanceLevel::Developing => "Focus needed on early force production development",
    }
}

fn maximum_strength_focus() -> FocusArea {
    FocusArea {
        name: "Maximum Strength Development",
        exercises: vec![
            "Back Squat (3-5 reps)",
            "Deadlift (3-5 reps)",
            "Push Press (3-5 reps)",
        ],
        parameters: TrainingParameters {
            intensity: "80-90% 1RM",
            sets: "4-6",
            reps: "3-5",
            rest: "3-5 min",
            frequency: "2-3 times per week",
            progression: "Increase load when all sets are completed with good form",
        },
    }
}

fn explosive_strength_focus() -> FocusArea {
    FocusArea {
        name: "Explosive Strength Development",
        exercises: vec![
            "Power Clean",
            "Jump Squats",
            "Olympic Pull Variations",
            "Plyometric Combinations",
        ],
        parameters: TrainingParameters {
            intensity: "60-70% 1RM",
            sets: "4-6",
            reps: "3-5",
            rest: "2-3 min",
            frequency: "2-3 times per week",
            progression: "Focus on movement velocity and technical execution",
        },
    }
}

fn early_force_focus() -> FocusArea {
    FocusArea {
        name: "Early Force Production",
        exercises: vec![
            "Speed-Strength Exercises",
            "Ballistic Exercises",
            "Heavy Isometric Pulls",
        ],
        parameters: TrainingParameters {
            intensity: "varies by exercise",
            sets: "3-5",
            reps: "3-6",
            rest: "2-3 min",
            frequency: "2 times per week",
            progression: "Explosive intent in each repetition",
        },
    }
}
