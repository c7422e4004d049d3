// ABOUTME: Anthropometric analyzer for body size and composition
// ABOUTME: BMI, standing reach, Navy body fat with ACE category, height and weight trends
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
use crate::analysis_result::{trend_for, AnalysisResult, HistoricalTrend};
use crate::formulas::{bmi, bmi_category, body_fat_category, body_fat_percent};

/// Navy-method body composition for one session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyComposition {
    /// Estimated body fat (percent)
    pub body_fat_percent: f64,
    /// ACE category for the estimate
    pub body_fat_category: &'static str,
    /// Body mass index
    pub bmi: f64,
    /// WHO BMI category
    pub bmi_category: &'static str,
}

/// Analyzer for standing height sessions
///
/// The primary value is standing height in centimetres. Body mass comes from
/// the `weight_kg` sub-measurement, falling back to the athlete context.
pub struct AnthropometricAnalyzer {
    config: AnalysisConfig,
}

impl AnthropometricAnalyzer {
    /// Create an analyzer with the given configuration
    #[must_use]
    pub const fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    fn body_composition(
        athlete: &AthleteContext,
        current: &MeasurementPoint,
        height_cm: f64,
        bmi_value: f64,
    ) -> EngineResult<Option<BodyComposition>> {
        let (Some(waist), Some(neck)) = (
            current.sub_measurement(measurement_keys::WAIST_CM),
            current.sub_measurement(measurement_keys::NECK_CM),
        ) else {
            return Ok(None);
        };

        let body_fat = body_fat_percent(
            athlete.gender,
            waist,
            neck,
            height_cm,
            current.sub_measurement(measurement_keys::HIP_CM),
        )?;

        Ok(Some(BodyComposition {
            body_fat_percent: body_fat,
            body_fat_category: body_fat_category(athlete.gender, body_fat),
            bmi: bmi_value,
            bmi_category: bmi_category(bmi_value),
        }))
    }

    fn weight_trend(
        &self,
        history: Option<&MeasurementSeries>,
    ) -> EngineResult<Option<HistoricalTrend>> {
        let Some(series) = history else {
            return Ok(None);
        };
        let (weights, timestamps) = series.sub_measurement_columns(measurement_keys::WEIGHT_KG);
        if weights.is_empty() {
            return Ok(None);
        }
        HistoricalTrend::from_columns(&weights, &timestamps, &self.config).map(Some)
    }
}

impl PerformanceAnalyzer for AnthropometricAnalyzer {
    fn category(&self) -> TestCategory {
        TestCategory::Anthropometrics
    }

    fn name(&self) -> &'static str {
        "anthropometric"
    }

    fn analyze(
        &self,
        athlete: &AthleteContext,
        current: &MeasurementPoint,
        history: Option<&MeasurementSeries>,
    ) -> EngineResult<AnalysisResult> {
        let height_cm = AnalysisError::ensure_positive("height_cm", current.value)?;
        let weight_kg = current
            .sub_measurement(measurement_keys::WEIGHT_KG)
            .map_or_else(|| athlete.require_body_mass("BMI calculation"), Ok)?;
        let bmi_value = bmi(weight_kg, height_cm)?;
        let composition = Self::body_composition(athlete, current, height_cm, bmi_value)?;

        debug!(
            athlete_id = %athlete.athlete_id,
            bmi = bmi_value,
            has_body_composition = composition.is_some(),
            "Analyzed anthropometrics"
        );

        let mut result = AnalysisResult::new(self.category())
            .with_metric("height_cm", height_cm)
            .with_metric("weight_kg", weight_kg)
            .with_metric("bmi", bmi_value)
            .with_optional_metric(
                "standing_reach_cm",
                current.sub_measurement(measurement_keys::STANDING_REACH_CM),
            )
            .with_classification(bmi_category(bmi_value))
            .with_trend(trend_for(history, &self.config)?);

        if let Some(composition) = &composition {
            result = result
                .with_metric("body_fat_percent", composition.body_fat_percent)
                .with_classification(composition.body_fat_category)
                .with_interpretation(format!(
                    "Body fat {:.1}% ({}), BMI {:.1} ({})",
                    composition.body_fat_percent,
                    composition.body_fat_category,
                    composition.bmi,
                    composition.bmi_category
                ))
                .with_recommendations(composition_recommendations(composition.body_fat_category))
                .with_serialized_detail("body_composition", composition)?;
        }

        if let Some(weight_trend) = self.weight_trend(history)? {
            result = result.with_serialized_detail("weight_trend", &weight_trend)?;
        }

        Ok(result)
    }
}

fn composition_recommendations(category: &str) -> Vec<&'static str> {
    match category {
        "Essential Fat" => vec![
            "Body fat is at the essential minimum; review energy availability",
            "Monitor recovery, menstrual health and injury incidence",
        ],
        "Athletes" | "Fitness" => vec!["Maintain current nutrition and training balance"],
        "Average" => vec![
            "Consider a moderate energy deficit alongside training",
            "Reassess body composition in 8-12 weeks",
        ],
        _ => vec![
            "Prioritize body composition change with nutrition support",
            "Progress impact and plyometric loading gradually",
        ],
    }
}
