// ABOUTME: Force-velocity analyzer building a Samozino profile from loaded jump trials
// ABOUTME: F0, V0, Pmax, slope versus optimal, profile quality from R², load-velocity points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use kinetiq_core::constants::measurement_keys;
use kinetiq_core::constants::physics::CM_PER_M;
use kinetiq_core::errors::{AnalysisError, EngineResult};
use kinetiq_core::models::{AthleteContext, MeasurementPoint, MeasurementSeries, TestCategory};
use tracing::debug;

use super::PerformanceAnalyzer;
use crate::analysis_config::AnalysisConfig;
use crate::analysis_result::{trend_for, AnalysisResult};
use crate::formulas::{force_velocity_profile, DeficitType, FvImbalance};
use crate::norms::NormativeTables;

/// Imbalance (percent) below which a profile counts as well balanced
pub const BALANCED_PROFILE_PERCENT: f64 = 10.0;

/// Analyzer for loaded jump sessions
///
/// Trials carry jump height and added load. Body mass comes from the athlete
/// context and leg length from the athlete context or the `leg_length_cm`
/// sub-measurement. The primary value is not used by the profile; history
/// trends run over whatever primary value the caller recorded (typically the
/// session Pmax).
pub struct ForceVelocityAnalyzer {
    config: AnalysisConfig,
    norms: NormativeTables,
}

impl ForceVelocityAnalyzer {
    /// Create an analyzer with the given configuration and norms
    #[must_use]
    pub const fn new(config: AnalysisConfig, norms: NormativeTables) -> Self {
        Self { config, norms }
    }
}

impl PerformanceAnalyzer for ForceVelocityAnalyzer {
    fn category(&self) -> TestCategory {
        TestCategory::ForceVelocity
    }

    fn name(&self) -> &'static str {
        "force_velocity"
    }

    fn analyze(
        &self,
        athlete: &AthleteContext,
        current: &MeasurementPoint,
        history: Option<&MeasurementSeries>,
    ) -> EngineResult<AnalysisResult> {
        let body_mass = athlete.require_body_mass("force-velocity profile")?;
        let leg_length_m = athlete.leg_length_m.map_or_else(
            || {
                current
                    .require(measurement_keys::LEG_LENGTH_CM, "force-velocity profile")
                    .map(|cm| cm / CM_PER_M)
            },
            Ok,
        )?;

        let profile = force_velocity_profile(&current.trials, body_mass, leg_length_m)?;
        let quality = self.norms.fv_profile_quality.classify(profile.r_squared)?;
        let pmax = AnalysisError::ensure_finite("pmax", profile.pmax)?;

        debug!(
            athlete_id = %athlete.athlete_id,
            trials = current.trials.len(),
            pmax,
            "Analyzed force-velocity profile"
        );

        AnalysisResult::new(self.category())
            .with_metric("f0", profile.f0)
            .with_metric("v0", profile.v0)
            .with_metric("pmax", pmax)
            .with_metric("relative_pmax", pmax / body_mass)
            .with_metric("slope", profile.slope)
            .with_metric("optimal_slope", profile.optimal_slope)
            .with_metric("imbalance_percent", profile.imbalance.percent)
            .with_metric("r_squared", profile.r_squared)
            .with_classification(quality)
            .with_interpretation(imbalance_interpretation(&profile.imbalance))
            .with_recommendations(imbalance_recommendations(&profile.imbalance))
            .with_trend(trend_for(history, &self.config)?)
            .with_serialized_detail("force_velocity_profile", &profile)
    }
}

fn imbalance_interpretation(imbalance: &FvImbalance) -> String {
    if imbalance.magnitude < BALANCED_PROFILE_PERCENT {
        return format!(
            "Well-balanced profile ({:.1}% from optimal)",
            imbalance.percent
        );
    }
    let deficit = match imbalance.deficit {
        DeficitType::Force => "force",
        DeficitType::Velocity => "velocity",
    };
    format!(
        "{deficit} deficit: slope is {:.1}% from optimal",
        imbalance.magnitude
    )
}

fn imbalance_recommendations(imbalance: &FvImbalance) -> Vec<&'static str> {
    if imbalance.magnitude < BALANCED_PROFILE_PERCENT {
        return vec!["Train across the whole load-velocity spectrum to raise Pmax"];
    }
    match imbalance.deficit {
        DeficitType::Force => vec![
            "Prioritize heavy strength work (>80% 1RM) to raise F0",
            "Add heavy loaded jumps and sled pushes",
        ],
        DeficitType::Velocity => vec![
            "Prioritize ballistic and light-load high-velocity work to raise V0",
            "Add assisted and unloaded jumps with maximal intent",
        ],
    }
}
