// ABOUTME: Integration tests for the built-in category analyzers
// ABOUTME: Sprint, anthropometric, maturation, IMTP, jump profile, and force-velocity scenarios
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use common::{assert_close, day, male_athlete, weekly_series, youth_female_athlete};
use kinetiq::analyzers::{
    AnthropometricAnalyzer, ForceVelocityAnalyzer, ImtpAnalyzer, JumpProfileAnalyzer,
    MaturationAnalyzer, SprintAnalyzer,
};
use kinetiq::constants::measurement_keys;
use kinetiq::{
    AnalysisConfig, AthleteContext, ErrorCode, Gender, MeasurementPoint, MeasurementSeries,
    NormativeTables, PerformanceAnalyzer, TestCategory, TrialMeasurement,
};
use uuid::Uuid;

fn sprint_analyzer() -> SprintAnalyzer {
    SprintAnalyzer::new(AnalysisConfig::default(), NormativeTables::standard().unwrap())
}

fn imtp_analyzer() -> ImtpAnalyzer {
    ImtpAnalyzer::new(AnalysisConfig::default(), NormativeTables::standard().unwrap())
}

fn jump_analyzer() -> JumpProfileAnalyzer {
    JumpProfileAnalyzer::new(AnalysisConfig::default(), NormativeTables::standard().unwrap())
}

fn force_velocity_analyzer() -> ForceVelocityAnalyzer {
    ForceVelocityAnalyzer::new(AnalysisConfig::default(), NormativeTables::standard().unwrap())
}

// ============================================================================
// Sprint
// ============================================================================

fn slow_sprint() -> MeasurementPoint {
    MeasurementPoint::new(day(0), 1.80).with_sub_measurement(measurement_keys::SPRINT_20M, 3.10)
}

#[test]
fn test_sprint_slow_start_needs_improvement() {
    let result = sprint_analyzer()
        .analyze(&male_athlete(), &slow_sprint(), None)
        .unwrap();

    assert_eq!(result.category, TestCategory::Speed);
    assert_close(result.metric("initial_velocity").unwrap(), 5.56, 0.01);
    assert_close(result.metric("second_10m_time").unwrap(), 1.30, 1e-9);
    assert_eq!(result.classification.as_deref(), Some("Needs Improvement"));
    assert_close(result.score.unwrap(), 22.04, 0.01);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r == "Force production and starting strength"));
    assert!(result.trend.is_none());
}

#[test]
fn test_sprint_program_from_split_ratio() {
    let result = sprint_analyzer()
        .analyze(&male_athlete(), &slow_sprint(), None)
        .unwrap();

    let program = result.detail("training_program").unwrap();
    assert_eq!(program["program"], "Strength Program");
    assert_eq!(program["focus"], "Acceleration and Force Production");
}

#[test]
fn test_sprint_without_twenty_metre_split() {
    let current = MeasurementPoint::new(day(0), 1.70);
    let result = sprint_analyzer()
        .analyze(&male_athlete(), &current, None)
        .unwrap();

    assert!(result.metric("second_10m_time").is_none());
    assert!(result.detail("training_program").is_none());
    assert!(result.detail("kinematics").is_some());
}

#[test]
fn test_sprint_flying_split_reports_deficit() {
    let current = slow_sprint().with_sub_measurement(measurement_keys::FLYING_10M, 1.10);
    let result = sprint_analyzer()
        .analyze(&male_athlete(), &current, None)
        .unwrap();

    assert_close(result.metric("max_velocity").unwrap(), 9.09, 0.01);
    assert_close(
        result.metric("acceleration_deficit_percent").unwrap(),
        38.89,
        0.01,
    );
    assert_eq!(
        result.detail("acceleration_deficit_interpretation").unwrap(),
        "Significant imbalance between acceleration and max speed"
    );
}

#[test]
fn test_sprint_max_velocity_relative_score() {
    let current = slow_sprint().with_sub_measurement(measurement_keys::FLYING_10M, 1.10);
    let result = sprint_analyzer()
        .analyze(&male_athlete(), &current, None)
        .unwrap();

    // 9.09 m/s sits in the 8.5-9.5 band scored 75-100
    let expected = (10.0 / 1.10 - 8.5) / (9.5 - 8.5) * 25.0 + 75.0;
    assert_close(result.metric("max_velocity_score").unwrap(), expected, 1e-9);

    let without_flying = sprint_analyzer()
        .analyze(&male_athlete(), &slow_sprint(), None)
        .unwrap();
    assert!(without_flying.metric("max_velocity_score").is_none());
}

#[test]
fn test_sprint_analysis_is_idempotent() {
    let analyzer = sprint_analyzer();
    let athlete = male_athlete();
    let history = weekly_series("sprint_10m", &[1.95, 1.92, 1.90, 1.88, 1.85, 1.83]);

    let first = analyzer
        .analyze(&athlete, &slow_sprint(), Some(&history))
        .unwrap();
    let second = analyzer
        .analyze(&athlete, &slow_sprint(), Some(&history))
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_sprint_with_history_attaches_trend() {
    let history = weekly_series("sprint_10m", &[1.95, 1.92, 1.90, 1.88, 1.85, 1.83]);
    let result = sprint_analyzer()
        .analyze(&male_athlete(), &slow_sprint(), Some(&history))
        .unwrap();

    let trend = result.trend.unwrap();
    assert_eq!(trend.statistics.count, 6);
    assert!(trend.linear_trend.fitted().unwrap().slope < 0.0);
    assert!(trend.peaks.is_some());
}

#[test]
fn test_sprint_rejects_inverted_splits() {
    let current =
        MeasurementPoint::new(day(0), 1.80).with_sub_measurement(measurement_keys::SPRINT_20M, 1.75);
    let err = sprint_analyzer()
        .analyze(&male_athlete(), &current, None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidValue);
}

// ============================================================================
// Anthropometrics
// ============================================================================

#[test]
fn test_anthropometric_body_composition() {
    let current = MeasurementPoint::new(day(0), 180.0)
        .with_sub_measurement(measurement_keys::WEIGHT_KG, 80.0)
        .with_sub_measurement(measurement_keys::WAIST_CM, 85.0)
        .with_sub_measurement(measurement_keys::NECK_CM, 38.0);
    let result = AnthropometricAnalyzer::new(AnalysisConfig::default())
        .analyze(&male_athlete(), &current, None)
        .unwrap();

    assert_close(result.metric("bmi").unwrap(), 24.69, 0.01);
    assert_close(result.metric("body_fat_percent").unwrap(), 16.1, 0.1);
    assert_eq!(result.classification.as_deref(), Some("Fitness"));
    assert_eq!(result.detail("body_composition").unwrap()["bmi_category"], "Normal");
}

#[test]
fn test_anthropometric_bmi_only_uses_context_mass() {
    let current = MeasurementPoint::new(day(0), 180.0);
    let result = AnthropometricAnalyzer::new(AnalysisConfig::default())
        .analyze(&male_athlete(), &current, None)
        .unwrap();

    assert_eq!(result.metric("weight_kg"), Some(80.0));
    assert_eq!(result.classification.as_deref(), Some("Normal"));
    assert!(result.metric("body_fat_percent").is_none());
}

#[test]
fn test_anthropometric_missing_mass() {
    let athlete = AthleteContext::new(Uuid::new_v4(), Gender::Male);
    let err = AnthropometricAnalyzer::new(AnalysisConfig::default())
        .analyze(&athlete, &MeasurementPoint::new(day(0), 180.0), None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingMeasurement);
}

#[test]
fn test_anthropometric_female_without_hip() {
    let current = MeasurementPoint::new(day(0), 158.0)
        .with_sub_measurement(measurement_keys::WAIST_CM, 66.0)
        .with_sub_measurement(measurement_keys::NECK_CM, 30.0);
    let err = AnthropometricAnalyzer::new(AnalysisConfig::default())
        .analyze(&youth_female_athlete(), &current, None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingMeasurement);
}

#[test]
fn test_anthropometric_weight_trend() {
    let points = [78.0, 78.5, 79.0, 79.4]
        .iter()
        .zip(0_i64..)
        .map(|(weight, week)| {
            MeasurementPoint::new(day(week * 7), 180.0)
                .with_sub_measurement(measurement_keys::WEIGHT_KG, *weight)
        })
        .collect();
    let history = MeasurementSeries::new("height", points);
    let result = AnthropometricAnalyzer::new(AnalysisConfig::default())
        .analyze(&male_athlete(), &MeasurementPoint::new(day(28), 180.0), Some(&history))
        .unwrap();

    let weight_trend = result.detail("weight_trend").unwrap();
    assert_eq!(weight_trend["statistics"]["count"], 4);
}

// ============================================================================
// Maturation
// ============================================================================

fn youth_height(height_cm: f64) -> MeasurementPoint {
    MeasurementPoint::new(day(0), height_cm)
        .with_sub_measurement(measurement_keys::SEATED_HEIGHT_CM, 82.0)
}

#[test]
fn test_maturation_offset_and_status() {
    let result = MaturationAnalyzer::new(AnalysisConfig::default())
        .analyze(&youth_female_athlete(), &youth_height(158.0), None)
        .unwrap();

    assert_close(result.metric("maturity_offset").unwrap(), -4.122, 1e-3);
    assert_close(result.metric("estimated_age_at_phv").unwrap(), 17.622, 1e-3);
    assert_eq!(result.classification.as_deref(), Some("Pre-PHV"));
    assert!(!result.recommendations.is_empty());
}

#[test]
fn test_maturation_requires_seated_height_and_age() {
    let analyzer = MaturationAnalyzer::new(AnalysisConfig::default());

    let err = analyzer
        .analyze(
            &youth_female_athlete(),
            &MeasurementPoint::new(day(0), 158.0),
            None,
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingMeasurement);

    let ageless = AthleteContext::new(Uuid::new_v4(), Gender::Female).with_body_mass(48.0);
    let err = analyzer
        .analyze(&ageless, &youth_height(158.0), None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingMeasurement);
}

#[test]
fn test_maturation_growth_velocity_per_year() {
    let history = weekly_series("height", &[150.0, 150.5, 151.0, 151.5]);
    let result = MaturationAnalyzer::new(AnalysisConfig::default())
        .analyze(&youth_female_athlete(), &youth_height(158.0), Some(&history))
        .unwrap();

    assert_close(
        result.metric("growth_velocity_cm_per_year").unwrap(),
        0.5 / 7.0 * 365.25,
        1e-6,
    );
}

// ============================================================================
// IMTP
// ============================================================================

fn imtp_session() -> MeasurementPoint {
    MeasurementPoint::new(day(0), 2480.0)
        .with_sub_measurement(measurement_keys::RFD_50, 7000.0)
        .with_sub_measurement(measurement_keys::FORCE_200MS, 1800.0)
}

#[test]
fn test_imtp_levels_and_plan() {
    let result = imtp_analyzer()
        .analyze(&male_athlete(), &imtp_session(), None)
        .unwrap();

    assert_close(result.metric("relative_peak_force").unwrap(), 31.0, 1e-9);
    assert_eq!(result.classification.as_deref(), Some("Advanced"));
    assert_close(result.score.unwrap(), 31.0 / 42.0 * 100.0, 1e-9);
    assert_eq!(result.recommendations, vec!["Early Force Production".to_owned()]);

    let plan = result.detail("training_plan").unwrap();
    assert_eq!(plan["priorities"][0], "Early Force Production");
    assert_eq!(result.detail("early_force").unwrap()["level"], "Intermediate");
}

#[test]
fn test_imtp_bilateral_asymmetry() {
    let current = imtp_session()
        .with_sub_measurement(measurement_keys::LEFT_PEAK_FORCE, 1250.0)
        .with_sub_measurement(measurement_keys::RIGHT_PEAK_FORCE, 1000.0);
    let result = imtp_analyzer()
        .analyze(&male_athlete(), &current, None)
        .unwrap();

    assert_close(result.metric("asymmetry_percent").unwrap(), 20.0, 1e-9);
    assert_eq!(result.detail("bilateral").unwrap()["assessment"], "significant");
}

#[test]
fn test_imtp_missing_inputs() {
    let analyzer = imtp_analyzer();

    let no_rfd = MeasurementPoint::new(day(0), 2480.0)
        .with_sub_measurement(measurement_keys::FORCE_200MS, 1800.0);
    let err = analyzer.analyze(&male_athlete(), &no_rfd, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingMeasurement);

    let massless = AthleteContext::new(Uuid::new_v4(), Gender::Male);
    let err = analyzer.analyze(&massless, &imtp_session(), None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingMeasurement);
}

// ============================================================================
// Jump profile
// ============================================================================

fn jump_session() -> MeasurementPoint {
    MeasurementPoint::new(day(0), 0.35)
        .with_sub_measurement(measurement_keys::ABALAKOV_HEIGHT, 0.46)
        .with_trials(vec![
            TrialMeasurement::drop_jump(0.30, 0.18, Some(0.4)),
            TrialMeasurement::drop_jump(0.38, 0.12, Some(0.4)),
        ])
}

#[test]
fn test_jump_profile_reactive_strength() {
    let result = jump_analyzer()
        .analyze(&male_athlete(), &jump_session(), None)
        .unwrap();

    assert_close(result.metric("best_rsi").unwrap(), 0.38 / 0.12, 1e-9);
    assert_close(result.metric("dj_cmj_ratio").unwrap(), 0.38 / 0.35, 1e-9);
    assert_close(result.metric("arm_contribution_percent").unwrap(), 31.43, 0.01);
    assert_close(result.metric("peak_power").unwrap(), 3693.5, 1e-6);
    assert_eq!(
        result.classification.as_deref(),
        Some("advanced_reactive_strength")
    );
    assert_close(result.score.unwrap(), 0.38 / 0.12 / 3.6 * 100.0, 1e-9);

    let reactive = result.detail("reactive_strength").unwrap();
    assert_eq!(reactive["contact_time_efficiency"], "excellent");
    assert_eq!(reactive["drop_jumps"].as_array().unwrap().len(), 2);
}

#[test]
fn test_jump_profile_without_drop_jumps() {
    let current = MeasurementPoint::new(day(0), 0.35);
    let athlete = AthleteContext::new(Uuid::new_v4(), Gender::Female);
    let result = jump_analyzer().analyze(&athlete, &current, None).unwrap();

    assert_eq!(result.metric("cmj_height"), Some(0.35));
    assert!(result.metric("best_rsi").is_none());
    assert!(result.metric("peak_power").is_none());
    assert!(result.classification.is_none());
}

// ============================================================================
// Force-velocity
// ============================================================================

fn loaded_session() -> MeasurementPoint {
    MeasurementPoint::new(day(0), 0.40).with_trials(vec![
        TrialMeasurement::loaded_jump(0.40, 0.0),
        TrialMeasurement::loaded_jump(0.30, 20.0),
        TrialMeasurement::loaded_jump(0.22, 40.0),
    ])
}

#[test]
fn test_force_velocity_profile_metrics() {
    let athlete = male_athlete().with_leg_length(1.0);
    let result = force_velocity_analyzer()
        .analyze(&athlete, &loaded_session(), None)
        .unwrap();

    let pmax = result.metric("pmax").unwrap();
    assert!(pmax > 0.0);
    assert_close(result.metric("relative_pmax").unwrap(), pmax / 80.0, 1e-9);
    assert_close(result.metric("optimal_slope").unwrap(), -9.81 / 1.6, 1e-9);
    assert!(result.classification.is_some());
    assert!(result.detail("force_velocity_profile").is_some());
}

#[test]
fn test_force_velocity_leg_length_from_sub_measurement() {
    let analyzer = force_velocity_analyzer();
    let from_context = analyzer
        .analyze(&male_athlete().with_leg_length(1.0), &loaded_session(), None)
        .unwrap();
    let from_session = analyzer
        .analyze(
            &male_athlete(),
            &loaded_session().with_sub_measurement(measurement_keys::LEG_LENGTH_CM, 100.0),
            None,
        )
        .unwrap();
    assert_close(
        from_context.metric("imbalance_percent").unwrap(),
        from_session.metric("imbalance_percent").unwrap(),
        1e-9,
    );
}

#[test]
fn test_force_velocity_error_paths() {
    let analyzer = force_velocity_analyzer();

    let err = analyzer
        .analyze(&male_athlete(), &loaded_session(), None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingMeasurement);

    let single = MeasurementPoint::new(day(0), 0.40)
        .with_trials(vec![TrialMeasurement::loaded_jump(0.40, 0.0)]);
    let err = analyzer
        .analyze(&male_athlete().with_leg_length(1.0), &single, None)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InsufficientData);
}
