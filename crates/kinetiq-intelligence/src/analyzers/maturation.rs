// ABOUTME: Maturation analyzer estimating biological maturity from growth measures
// ABOUTME: Mirwald maturity offset, PHV status, age at PHV, considerations, growth velocity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use kinetiq_core::constants::measurement_keys;
use kinetiq_core::errors::{AnalysisError, EngineResult};
use kinetiq_core::models::{AthleteContext, MeasurementPoint, MeasurementSeries, TestCategory};
use tracing::debug;

use super::PerformanceAnalyzer;
use crate::analysis_config::AnalysisConfig;
use crate::analysis_result::{AnalysisResult, HistoricalTrend};
use crate::formulas::{estimated_age_at_phv, peak_height_velocity, MaturationStatus};

const DAYS_PER_YEAR: f64 = 365.25;

/// Analyzer for growth sessions
///
/// The primary value is standing height in centimetres. Requires
/// `seated_height_cm`, body mass (sub-measurement or athlete context) and
/// the athlete's age.
pub struct MaturationAnalyzer {
    config: AnalysisConfig,
}

impl MaturationAnalyzer {
    /// Create an analyzer with the given configuration
    #[must_use]
    pub const fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }
}

impl PerformanceAnalyzer for MaturationAnalyzer {
    fn category(&self) -> TestCategory {
        TestCategory::Maturation
    }

    fn name(&self) -> &'static str {
        "maturation"
    }

    fn analyze(
        &self,
        athlete: &AthleteContext,
        current: &MeasurementPoint,
        history: Option<&MeasurementSeries>,
    ) -> EngineResult<AnalysisResult> {
        let height_cm = AnalysisError::ensure_positive("height_cm", current.value)?;
        let seated_height_cm =
            current.require(measurement_keys::SEATED_HEIGHT_CM, "maturity offset")?;
        let weight_kg = current
            .sub_measurement(measurement_keys::WEIGHT_KG)
            .map_or_else(|| athlete.require_body_mass("maturity offset"), Ok)?;
        let age_years = athlete.require_age("maturity offset")?;

        let offset = peak_height_velocity(
            height_cm,
            seated_height_cm,
            weight_kg,
            age_years,
            current.sub_measurement(measurement_keys::LEG_LENGTH_CM),
        )?;
        let status = MaturationStatus::from_offset(offset);

        let trend = history
            .map(|series| HistoricalTrend::from_series(series, &self.config))
            .transpose()?;
        // cm/day slope scaled to a yearly rate
        let growth_velocity = trend
            .as_ref()
            .and_then(|trend| trend.linear_trend.fitted())
            .map(|fit| fit.slope * DAYS_PER_YEAR);

        debug!(
            athlete_id = %athlete.athlete_id,
            offset,
            status = %status,
            "Analyzed maturation"
        );

        Ok(AnalysisResult::new(self.category())
            .with_metric("maturity_offset", offset)
            .with_metric("estimated_age_at_phv", estimated_age_at_phv(age_years, offset))
            .with_metric("height_cm", height_cm)
            .with_metric("seated_height_cm", seated_height_cm)
            .with_optional_metric("growth_velocity_cm_per_year", growth_velocity)
            .with_classification(status)
            .with_interpretation(status_interpretation(status))
            .with_recommendations(training_considerations(status).iter().copied())
            .with_trend(trend))
    }
}

const fn status_interpretation(status: MaturationStatus) -> &'static str {
    match status {
        MaturationStatus::PrePhv => "More than a year before peak height velocity",
        MaturationStatus::DuringPhv => "Within a year of peak height velocity",
        MaturationStatus::PostPhv => "More than a year past peak height velocity",
    }
}

const fn training_considerations(status: MaturationStatus) -> &'static [&'static str] {
    match status {
        MaturationStatus::PrePhv => &[
            "Emphasize fundamental movement skills and coordination",
            "Develop speed and agility through varied play-based drills",
            "Use body-weight strength training with technical focus",
        ],
        MaturationStatus::DuringPhv => &[
            "Reduce high-impact and high-volume loading during rapid growth",
            "Maintain mobility work for tightening muscle-tendon units",
            "Monitor for growth-related pain at tendon insertions",
            "Reinforce technique as limb proportions change",
        ],
        MaturationStatus::PostPhv => &[
            "Progressively introduce external-load strength training",
            "Develop power and speed-strength qualities",
            "Individualize volume to training age",
        ],
    }
}
