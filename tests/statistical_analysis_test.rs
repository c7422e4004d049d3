// ABOUTME: Integration tests for the statistical kernel and pattern detection
// ABOUTME: Covers descriptive statistics, ranking, regression, trend fitting, and sliding-window patterns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use common::{assert_close, day, timestamps};
use kinetiq::constants::labels;
use kinetiq::pattern_detection::PatternDetector;
use kinetiq::statistical_analysis::{is_constant, rank, StatisticalAnalyzer, TrendAnalysis};
use kinetiq::AnalysisError;

// ============================================================================
// Descriptive statistics
// ============================================================================

#[test]
fn test_basic_statistics_bounds_and_latest() {
    let samples: [&[f64]; 4] = [
        &[4.2],
        &[3.0, 1.0, 2.0],
        &[-5.0, 10.0, 0.0, 7.5, -2.25],
        &[1.8, 1.8, 1.8, 1.8],
    ];
    for values in samples {
        let stats = StatisticalAnalyzer::basic_statistics(values).unwrap();
        assert!(stats.max >= stats.min);
        assert_eq!(stats.latest, *values.last().unwrap());
        assert_eq!(stats.count, values.len());
    }
}

#[test]
fn test_basic_statistics_population_std() {
    let stats = StatisticalAnalyzer::basic_statistics(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])
        .unwrap();
    assert_close(stats.mean, 5.0, 1e-12);
    assert_close(stats.std, 2.0, 1e-12);
}

#[test]
fn test_basic_statistics_empty_is_insufficient_data() {
    let err = StatisticalAnalyzer::basic_statistics(&[]).unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientData { .. }));
}

#[test]
fn test_short_window_direction_labels() {
    assert_eq!(
        StatisticalAnalyzer::short_window_direction(&[1.0, 2.0, 3.0], 3),
        labels::IMPROVING
    );
    assert_eq!(
        StatisticalAnalyzer::short_window_direction(&[9.0, 3.0, 2.0, 1.0], 3),
        labels::DECLINING
    );
    assert_eq!(
        StatisticalAnalyzer::short_window_direction(&[5.0, 5.0, 5.0], 3),
        labels::STABLE
    );
    assert_eq!(
        StatisticalAnalyzer::short_window_direction(&[1.0, 2.0], 3),
        labels::INSUFFICIENT_DATA
    );
}

// ============================================================================
// Ranking
// ============================================================================

#[test]
fn test_percentile_rank_uses_average_tie_rank() {
    let reference = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_close(StatisticalAnalyzer::percentile_rank(3.0, &reference), 60.0, 1e-12);
    assert_close(StatisticalAnalyzer::percentile_rank(6.0, &reference), 100.0, 1e-12);
    assert_close(StatisticalAnalyzer::percentile_rank(0.0, &reference), 0.0, 1e-12);
    assert_close(StatisticalAnalyzer::percentile_rank(2.5, &reference), 40.0, 1e-12);
}

#[test]
fn test_percentile_rank_empty_reference() {
    assert_eq!(StatisticalAnalyzer::percentile_rank(3.0, &[]), 0.0);
}

#[test]
fn test_rank_is_one_based() {
    assert_eq!(rank(&[30.0, 10.0, 20.0]), vec![3.0, 1.0, 2.0]);
}

// ============================================================================
// Regression and trend
// ============================================================================

#[test]
fn test_linear_trend_insufficient_below_two_points() {
    let none = StatisticalAnalyzer::linear_trend(&[], &[], 0.95).unwrap();
    assert_eq!(none, TrendAnalysis::InsufficientData);

    let one = StatisticalAnalyzer::linear_trend(&[42.0], &[day(0)], 0.95).unwrap();
    assert_eq!(one, TrendAnalysis::InsufficientData);
}

#[test]
fn test_linear_trend_two_points_matches_secant() {
    let trend = StatisticalAnalyzer::linear_trend(&[10.0, 17.0], &[day(0), day(14)], 0.95)
        .unwrap();
    let fitted = trend.fitted().expect("two points fit a line");
    assert_close(fitted.slope, 0.5, 1e-12);
    assert_close(fitted.intercept, 10.0, 1e-12);
    assert_eq!(fitted.direction, labels::IMPROVING);
}

#[test]
fn test_linear_trend_confidence_band_brackets_fit() {
    let values = [30.0, 31.5, 31.0, 33.0, 34.5, 34.0];
    let trend = StatisticalAnalyzer::linear_trend(&values, &timestamps(6, 7), 0.95).unwrap();
    let fitted = trend.fitted().unwrap();

    assert_eq!(fitted.confidence_band.upper.len(), values.len());
    assert_eq!(fitted.confidence_band.lower.len(), values.len());
    for (upper, lower) in fitted
        .confidence_band
        .upper
        .iter()
        .zip(&fitted.confidence_band.lower)
    {
        assert!(upper > lower);
    }
    assert!(fitted.p_value.unwrap() < 0.05);
}

#[test]
fn test_linear_trend_rejects_bad_confidence() {
    let err = StatisticalAnalyzer::linear_trend(&[1.0, 2.0], &[day(0), day(1)], 1.0).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidValue { .. }));
}

#[test]
fn test_linear_trend_rejects_length_mismatch() {
    let err = StatisticalAnalyzer::linear_trend(&[1.0, 2.0, 3.0], &[day(0), day(1)], 0.95)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidValue { .. }));
}

#[test]
fn test_linear_trend_same_timestamp_is_insufficient() {
    let trend = StatisticalAnalyzer::linear_trend(&[1.0, 2.0], &[day(3), day(3)], 0.95).unwrap();
    assert_eq!(trend, TrendAnalysis::InsufficientData);
}

#[test]
fn test_linear_regression_exact_line() {
    let x = [0.0, 1.0, 2.0, 3.0, 4.0];
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
    let fit = StatisticalAnalyzer::linear_regression(&x, &y).unwrap();

    assert_close(fit.slope, 2.0, 1e-12);
    assert_close(fit.intercept, 1.0, 1e-12);
    assert_close(fit.r_squared, 1.0, 1e-12);
    assert!(fit.p_value.unwrap() < 1e-6);
    assert_close(fit.predict(10.0), 21.0, 1e-9);
}

#[test]
fn test_linear_regression_zero_variance_x() {
    let err = StatisticalAnalyzer::linear_regression(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0])
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidValue { .. }));
}

#[test]
fn test_is_constant_scales_with_magnitude() {
    assert!(is_constant(&[0.1, 0.1, 0.1]));
    assert!(is_constant(&[0.0, 0.0]));
    assert!(is_constant(&[]));
    assert!(!is_constant(&[1e-9, 2e-9, 3e-9]));
    assert!(!is_constant(&[1000.0, 1000.001]));
}

#[test]
fn test_linear_regression_small_unit_predictor() {
    let fit = StatisticalAnalyzer::linear_regression(&[1e-9, 2e-9, 3e-9], &[2.0, 4.0, 6.0])
        .unwrap();
    assert_close(fit.slope, 2e9, 1e-3);
    assert_close(fit.r_squared, 1.0, 1e-9);
}

// ============================================================================
// Correlation
// ============================================================================

#[test]
fn test_pearson_self_correlation() {
    let x = [1.2, 3.4, 2.2, 5.1, 4.0];
    let r = StatisticalAnalyzer::pearson(&x, &x).unwrap();
    assert_close(r.coefficient, 1.0, 1e-12);
    assert_close(r.p_value, 0.0, 1e-12);
}

#[test]
fn test_pearson_constant_series() {
    let r = StatisticalAnalyzer::pearson(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).unwrap();
    assert_eq!(r.coefficient, 0.0);
    assert_eq!(r.p_value, 1.0);
}

#[test]
fn test_spearman_monotonic_nonlinear() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0];
    let y: Vec<f64> = x.iter().map(|v: &f64| v.powi(3)).collect();
    let rho = StatisticalAnalyzer::spearman(&x, &y).unwrap();
    assert_close(rho.coefficient, 1.0, 1e-12);

    let pearson = StatisticalAnalyzer::pearson(&x, &y).unwrap();
    assert!(pearson.coefficient < 1.0);
}

#[test]
fn test_correlation_needs_two_pairs() {
    let err = StatisticalAnalyzer::pearson(&[1.0], &[2.0]).unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientData { .. }));
}

// ============================================================================
// Pattern detection
// ============================================================================

#[test]
fn test_plateau_windows() {
    let values = [100.0, 101.0, 100.0, 150.0, 200.0];
    let plateaus = PatternDetector::plateau_windows(&values, &timestamps(5, 7), 3, 0.05).unwrap();

    assert_eq!(plateaus.len(), 1);
    assert_eq!(plateaus[0].start, day(0));
    assert_eq!(plateaus[0].end, day(14));
    assert_eq!(plateaus[0].duration_days, 14);
    assert_close(plateaus[0].mean_value, 301.0 / 3.0, 1e-9);
}

#[test]
fn test_plateau_needs_window_points() {
    let err = PatternDetector::plateau_windows(&[1.0, 2.0], &timestamps(2, 7), 3, 0.05)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientData { .. }));
}

#[test]
fn test_peak_windows_centre_maximum() {
    let values = [1.0, 2.0, 5.0, 2.0, 1.0, 0.5];
    let peaks = PatternDetector::peak_windows(&values, &timestamps(6, 7), 5).unwrap();

    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].date, day(14));
    assert_close(peaks[0].value, 5.0, 1e-12);
    assert_close(peaks[0].improvement_percent, 400.0, 1e-9);
}

#[test]
fn test_fatigue_period_closed_by_recovery() {
    let values = [100.0, 85.0, 80.0, 90.0];
    let periods =
        PatternDetector::fatigue_periods(&values, &timestamps(4, 7), -0.10, 0.05).unwrap();

    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].start, day(0));
    assert_eq!(periods[0].end, day(21));
    assert_close(periods[0].decline_percent, -10.0, 1e-9);
}

#[test]
fn test_open_fatigue_run_is_not_reported() {
    let values = [100.0, 85.0, 70.0];
    let periods =
        PatternDetector::fatigue_periods(&values, &timestamps(3, 7), -0.10, 0.05).unwrap();
    assert!(periods.is_empty());
}

#[test]
fn test_recovery_events() {
    let values = [10.0, 8.0, 9.0, 9.5];
    let events = PatternDetector::recovery_events(&values, &timestamps(4, 7)).unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].date, day(7));
    assert_close(events[0].decline_percent, -20.0, 1e-9);
    assert_close(events[0].recovery_percent, 12.5, 1e-9);
    assert_eq!(events[0].recovery_days, 7);
}

#[test]
fn test_consistency_metrics() {
    let steady = PatternDetector::consistency(&[10.0, 10.0, 10.0]).unwrap();
    assert_eq!(steady.coefficient_of_variation, 0.0);
    assert_eq!(steady.stability_score, 100.0);
    assert_eq!(steady.range, 0.0);

    let spread = PatternDetector::consistency(&[8.0, 12.0]).unwrap();
    assert_close(spread.coefficient_of_variation, 20.0, 1e-9);
    assert_close(spread.stability_score, 80.0, 1e-9);
    assert_close(spread.range, 4.0, 1e-12);

    let zero_mean = PatternDetector::consistency(&[0.0, 0.0]).unwrap();
    assert_eq!(zero_mean.stability_score, 0.0);
}

#[test]
fn test_monthly_profile_groups_by_calendar_month() {
    // Weekly from 6 January: four points in January, one in February
    let values = [1.0, 2.0, 3.0, 4.0, 10.0];
    let profile = PatternDetector::monthly_profile(&values, &timestamps(5, 7)).unwrap();

    assert_eq!(profile.len(), 2);
    assert_eq!(profile[&1].count, 4);
    assert_close(profile[&1].mean, 2.5, 1e-12);
    assert_eq!(profile[&2].count, 1);
    assert_close(profile[&2].mean, 10.0, 1e-12);
}
