// ABOUTME: Integration tests for reference-group comparison of one athlete
// ABOUTME: Covers z-scores, percentile ranks, relative labels, strengths, weaknesses, and advice
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
#![allow(missing_docs)]

mod common;

use std::collections::BTreeMap;

use common::assert_close;
use kinetiq::comparative::RelativePerformance;
use kinetiq::{AnalysisError, ComparativeAnalyzer};

fn reference_groups() -> BTreeMap<String, Vec<f64>> {
    BTreeMap::from([
        ("cmj".to_owned(), vec![0.30, 0.35, 0.40, 0.45, 0.50]),
        ("imtp".to_owned(), vec![25.0, 28.0, 30.0, 32.0, 35.0]),
        ("rsi".to_owned(), vec![2.0, 2.2, 2.4, 2.6, 2.8]),
        ("flexibility".to_owned(), vec![12.0, 18.0]),
    ])
}

fn athlete_values() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("cmj".to_owned(), 0.40),
        ("imtp".to_owned(), 40.0),
        ("rsi".to_owned(), 1.8),
        ("sit_and_reach".to_owned(), 31.0),
    ])
}

#[test]
fn test_value_at_group_mean_is_average() {
    let report = ComparativeAnalyzer::compare(&athlete_values(), &reference_groups()).unwrap();
    let cmj = &report.rankings["cmj"];

    assert_close(cmj.z_score, 0.0, 1e-12);
    assert_eq!(cmj.relative_performance, RelativePerformance::Average);
    assert_close(cmj.percentile, 60.0, 1e-12);
}

#[test]
fn test_strengths_and_weaknesses() {
    let report = ComparativeAnalyzer::compare(&athlete_values(), &reference_groups()).unwrap();

    assert_eq!(
        report.rankings["imtp"].relative_performance,
        RelativePerformance::Exceptional
    );
    assert_eq!(
        report.rankings["rsi"].relative_performance,
        RelativePerformance::NeedsImprovement
    );
    assert_eq!(report.strengths, vec!["imtp".to_owned()]);
    assert_eq!(report.weaknesses, vec!["rsi".to_owned()]);
    assert_eq!(report.rankings["rsi"].percentile, 0.0);
}

#[test]
fn test_tests_without_reference_are_skipped() {
    let report = ComparativeAnalyzer::compare(&athlete_values(), &reference_groups()).unwrap();

    assert!(!report.rankings.contains_key("sit_and_reach"));
    assert_eq!(report.rankings.len(), 3);
    // Group statistics cover every non-empty group, ranked or not
    assert_eq!(report.group_statistics.len(), 4);
    assert_eq!(report.group_statistics["flexibility"].count, 2);
    assert_close(report.group_statistics["cmj"].mean, 0.40, 1e-12);
    assert_eq!(report.group_statistics["imtp"].max, 35.0);
}

#[test]
fn test_recommendations_follow_weaknesses() {
    let report = ComparativeAnalyzer::compare(&athlete_values(), &reference_groups()).unwrap();

    assert_eq!(
        report.recommendations.first().unwrap(),
        "Prioritize rsi development: Needs Improvement (percentile 0)"
    );
    assert_eq!(
        report.recommendations.last().unwrap(),
        "Preserve strengths with maintenance volume: imtp"
    );
}

#[test]
fn test_balanced_athlete_gets_general_advice() {
    let athlete = BTreeMap::from([("cmj".to_owned(), 0.41)]);
    let report = ComparativeAnalyzer::compare(&athlete, &reference_groups()).unwrap();

    assert!(report.weaknesses.is_empty());
    assert!(report.strengths.is_empty());
    assert_eq!(
        report.recommendations,
        vec!["Maintain a balanced program across all tested qualities".to_owned()]
    );
}

#[test]
fn test_z_score_edge_cases() {
    assert_eq!(ComparativeAnalyzer::z_score(2.0, &[1.0, 1.0, 1.0]), 0.0);
    assert_eq!(ComparativeAnalyzer::z_score(2.0, &[]), 0.0);
    assert_close(
        ComparativeAnalyzer::z_score(3.0, &[1.0, 3.0]),
        1.0,
        1e-12,
    );
}

#[test]
fn test_relative_performance_bands() {
    assert_eq!(
        RelativePerformance::from_z_score(2.0),
        RelativePerformance::AboveAverage
    );
    assert_eq!(
        RelativePerformance::from_z_score(1.0),
        RelativePerformance::Average
    );
    assert_eq!(
        RelativePerformance::from_z_score(-1.0),
        RelativePerformance::BelowAverage
    );
    assert_eq!(
        RelativePerformance::from_z_score(-2.0),
        RelativePerformance::NeedsImprovement
    );
    assert_eq!(RelativePerformance::AboveAverage.to_string(), "Above Average");
}

#[test]
fn test_compare_rejects_non_finite_values() {
    let athlete = BTreeMap::from([("cmj".to_owned(), f64::NAN)]);
    let err = ComparativeAnalyzer::compare(&athlete, &reference_groups()).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidValue { .. }));

    let groups = BTreeMap::from([("cmj".to_owned(), vec![0.3, f64::INFINITY])]);
    let err = ComparativeAnalyzer::compare(&athlete_values(), &groups).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidValue { .. }));
}
