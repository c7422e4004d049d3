// ABOUTME: Jump profile analyzer for vertical jump capacity and reactive strength
// ABOUTME: Arm contribution, Sayers power, per-drop-jump RSI, DJ/CMJ ratio, elastic energy usage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use std::fmt;

use kinetiq_core::constants::measurement_keys;
use kinetiq_core::errors::{AnalysisError, EngineResult};
use kinetiq_core::models::{
    AthleteContext, MeasurementPoint, MeasurementSeries, TestCategory, TrialMeasurement,
};
use serde::Serialize;
use tracing::debug;

use super::PerformanceAnalyzer;
use crate::analysis_config::AnalysisConfig;
use crate::analysis_result::{trend_for, AnalysisResult};
use crate::formulas::{
    arm_contribution_percent, dj_cmj_ratio, jump_peak_power, reactive_strength_index, DjCmjRatio,
    ReactiveStrength,
};
use crate::norms::NormativeTables;
use crate::thresholds::PerformanceLevel;

/// Overall reactive ability combining best RSI and DJ/CMJ ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactiveAbility {
    /// Elite RSI with a ratio of at least 1.1
    EliteReactiveStrength,
    /// Elite or advanced RSI with a ratio of at least 1.0
    AdvancedReactiveStrength,
    /// Intermediate RSI with a ratio of at least 0.9
    IntermediateReactiveStrength,
    /// Anything else
    DevelopingReactiveStrength,
}

impl ReactiveAbility {
    /// Combine the best RSI level with the DJ/CMJ ratio
    #[must_use]
    pub fn assess(best_rsi_level: PerformanceLevel, ratio: f64) -> Self {
        match best_rsi_level {
            PerformanceLevel::Elite if ratio >= 1.1 => Self::EliteReactiveStrength,
            PerformanceLevel::Elite | PerformanceLevel::Advanced if ratio >= 1.0 => {
                Self::AdvancedReactiveStrength
            }
            PerformanceLevel::Intermediate if ratio >= 0.9 => Self::IntermediateReactiveStrength,
            _ => Self::DevelopingReactiveStrength,
        }
    }
}

impl fmt::Display for ReactiveAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::EliteReactiveStrength => "elite_reactive_strength",
            Self::AdvancedReactiveStrength => "advanced_reactive_strength",
            Self::IntermediateReactiveStrength => "intermediate_reactive_strength",
            Self::DevelopingReactiveStrength => "developing_reactive_strength",
        };
        f.write_str(label)
    }
}

/// RSI of one drop jump with its level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropJumpRsi {
    /// Jump height (m)
    pub height_m: f64,
    /// Ground contact time (s)
    pub contact_time_s: f64,
    /// Drop height (m) when recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_height_m: Option<f64>,
    /// Reactive strength indices
    #[serde(flatten)]
    pub indices: ReactiveStrength,
    /// Level against the RSI table
    pub level: PerformanceLevel,
}

/// Reactive strength block for sessions with drop jumps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReactiveStrengthProfile {
    /// Every drop jump in trial order
    pub drop_jumps: Vec<DropJumpRsi>,
    /// Drop jump with the highest RSI (first on ties)
    pub best_rsi: DropJumpRsi,
    /// Highest drop jump over CMJ height
    pub dj_cmj_ratio: DjCmjRatio,
    /// Combined assessment
    pub reactive_ability: ReactiveAbility,
    /// Highest drop jump over CMJ height (percent)
    pub stretch_shortening_cycle_efficiency: f64,
    /// Contact time band of the highest drop jump
    pub contact_time_efficiency: &'static str,
}

/// Analyzer for countermovement jump sessions
///
/// The primary value is CMJ height in metres. `abalakov_height` enables the
/// arm contribution, drop-jump trials (with contact times) enable the
/// reactive strength block, and a known body mass enables peak power.
pub struct JumpProfileAnalyzer {
    config: AnalysisConfig,
    norms: NormativeTables,
}

impl JumpProfileAnalyzer {
    /// Create an analyzer with the given configuration and norms
    #[must_use]
    pub const fn new(config: AnalysisConfig, norms: NormativeTables) -> Self {
        Self { config, norms }
    }

    fn drop_jump_rsi(
        &self,
        trial: &TrialMeasurement,
        contact_time: f64,
    ) -> EngineResult<DropJumpRsi> {
        let indices = reactive_strength_index(trial.height_m, contact_time, trial.drop_height_m);
        Ok(DropJumpRsi {
            height_m: trial.height_m,
            contact_time_s: contact_time,
            drop_height_m: trial.drop_height_m,
            indices,
            level: self.norms.reactive_strength_index.classify(indices.rsi)?,
        })
    }

    fn reactive_strength(
        &self,
        trials: &[TrialMeasurement],
        cmj_height: f64,
    ) -> EngineResult<Option<ReactiveStrengthProfile>> {
        let drop_jumps = trials
            .iter()
            .filter_map(|trial| trial.contact_time_s.map(|ct| self.drop_jump_rsi(trial, ct)))
            .collect::<EngineResult<Vec<_>>>()?;

        let Some(best_rsi) = first_max_by(&drop_jumps, |jump| jump.indices.rsi).cloned() else {
            return Ok(None);
        };
        let Some(highest) = first_max_by(&drop_jumps, |jump| jump.height_m) else {
            return Ok(None);
        };

        let ratio = dj_cmj_ratio(highest.height_m, cmj_height);
        let reactive_ability = ReactiveAbility::assess(best_rsi.level, ratio.ratio);
        let contact_time_efficiency = self.norms.contact_time.classify(highest.contact_time_s)?;

        Ok(Some(ReactiveStrengthProfile {
            stretch_shortening_cycle_efficiency: ratio.ratio * 100.0,
            contact_time_efficiency,
            dj_cmj_ratio: ratio,
            reactive_ability,
            best_rsi,
            drop_jumps,
        }))
    }
}

impl PerformanceAnalyzer for JumpProfileAnalyzer {
    fn category(&self) -> TestCategory {
        TestCategory::Power
    }

    fn name(&self) -> &'static str {
        "jump_profile"
    }

    fn analyze(
        &self,
        athlete: &AthleteContext,
        current: &MeasurementPoint,
        history: Option<&MeasurementSeries>,
    ) -> EngineResult<AnalysisResult> {
        let cmj_height = AnalysisError::ensure_positive("cmj_height", current.value)?;
        let abalakov = current.sub_measurement(measurement_keys::ABALAKOV_HEIGHT);
        let peak_power = athlete
            .body_mass_kg
            .map(|mass| jump_peak_power(cmj_height, mass))
            .transpose()?;
        let reactive = self.reactive_strength(&current.trials, cmj_height)?;

        debug!(
            athlete_id = %athlete.athlete_id,
            cmj_height,
            drop_jumps = reactive.as_ref().map_or(0, |r| r.drop_jumps.len()),
            "Analyzed jump profile"
        );

        let mut result = AnalysisResult::new(self.category())
            .with_metric("cmj_height", cmj_height)
            .with_optional_metric("abalakov_height", abalakov)
            .with_optional_metric(
                "arm_contribution_percent",
                abalakov.map(|height| arm_contribution_percent(cmj_height, height)),
            )
            .with_optional_metric("peak_power", peak_power)
            .with_trend(trend_for(history, &self.config)?);

        if let Some(reactive) = reactive {
            let best = reactive.best_rsi.indices.rsi;
            result = result
                .with_metric("best_rsi", best)
                .with_metric("dj_cmj_ratio", reactive.dj_cmj_ratio.ratio)
                .with_metric(
                    "stretch_shortening_cycle_efficiency",
                    reactive.stretch_shortening_cycle_efficiency,
                )
                .with_classification(reactive.reactive_ability)
                .with_score(self.norms.reactive_strength_index.score(best)?)
                .with_interpretation(reactive_interpretation(reactive.reactive_ability))
                .with_recommendations(reactive_recommendations(reactive.reactive_ability))
                .with_serialized_detail("reactive_strength", &reactive)?;
        }

        Ok(result)
    }
}

/// First element with the largest key
fn first_max_by<T>(items: &[T], key: impl Fn(&T) -> f64) -> Option<&T> {
    items.iter().fold(None, |best, item| match best {
        Some(current) if key(current) >= key(item) => Some(current),
        _ => Some(item),
    })
}

const fn reactive_interpretation(ability: ReactiveAbility) -> &'static str {
    match ability {
        ReactiveAbility::EliteReactiveStrength => {
            "Excellent use of the stretch-shortening cycle under fast contacts"
        }
        ReactiveAbility::AdvancedReactiveStrength => {
            "Good reactive strength, drop jumps match or exceed the countermovement jump"
        }
        ReactiveAbility::IntermediateReactiveStrength => {
            "Moderate reactive strength, drop jumps trail the countermovement jump slightly"
        }
        ReactiveAbility::DevelopingReactiveStrength => {
            "Reactive strength is limited relative to concentric jump ability"
        }
    }
}

fn reactive_recommendations(ability: ReactiveAbility) -> Vec<&'static str> {
    match ability {
        ReactiveAbility::EliteReactiveStrength => {
            vec!["Maintain reactive qualities with low-volume high-intensity plyometrics"]
        }
        ReactiveAbility::AdvancedReactiveStrength => vec![
            "Progress drop heights while keeping contact times short",
            "Add depth jumps to box for intent",
        ],
        ReactiveAbility::IntermediateReactiveStrength
        | ReactiveAbility::DevelopingReactiveStrength => vec![
            "Build ankle stiffness with pogo hops and line hops",
            "Use low drop heights and cue minimal ground contact",
            "Develop eccentric strength to tolerate landing forces",
        ],
    }
}
