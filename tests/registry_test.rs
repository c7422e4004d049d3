// ABOUTME: Integration tests for the analyzer registry and category dispatch
// ABOUTME: Covers built-in registration, custom categories, duplicates, and unknown categories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use common::{day, init_test_logging, male_athlete};
use kinetiq::{
    AnalysisConfig, AnalysisResult, AnalyzerRegistry, AthleteContext, EngineResult, ErrorCode,
    MeasurementPoint, MeasurementSeries, NormativeTables, PerformanceAnalyzer, TestCategory,
};

/// Grip dynamometer analyzer used to exercise custom categories
struct GripAnalyzer {
    label: &'static str,
}

impl PerformanceAnalyzer for GripAnalyzer {
    fn category(&self) -> TestCategory {
        TestCategory::Custom("grip_strength".to_owned())
    }

    fn name(&self) -> &'static str {
        "grip"
    }

    fn analyze(
        &self,
        _athlete: &AthleteContext,
        current: &MeasurementPoint,
        _history: Option<&MeasurementSeries>,
    ) -> EngineResult<AnalysisResult> {
        Ok(AnalysisResult::new(self.category())
            .with_metric("grip_kg", current.value)
            .with_classification(self.label))
    }
}

fn builtin_registry() -> AnalyzerRegistry {
    AnalyzerRegistry::with_builtin_analyzers(
        &AnalysisConfig::default(),
        &NormativeTables::standard().unwrap(),
    )
}

#[test]
fn test_builtin_registry_covers_every_category() {
    init_test_logging();
    let registry = builtin_registry();

    assert_eq!(registry.len(), TestCategory::BUILTIN.len());
    for category in &TestCategory::BUILTIN {
        assert!(registry.contains(category), "missing {category}");
        assert_eq!(registry.get(category).unwrap().category(), *category);
    }
    assert_eq!(registry.categories(), TestCategory::BUILTIN.to_vec());
}

#[test]
fn test_register_custom_category() {
    init_test_logging();
    let mut registry = builtin_registry();
    let grip = TestCategory::Custom("grip_strength".to_owned());

    assert!(registry.register(Arc::new(GripAnalyzer { label: "first" })));
    assert!(registry.contains(&grip));
    assert_eq!(registry.categories().last(), Some(&grip));

    let result = registry
        .analyze(&grip, &male_athlete(), &MeasurementPoint::new(day(0), 52.0), None)
        .unwrap();
    assert_eq!(result.metric("grip_kg"), Some(52.0));
    assert_eq!(result.category, grip);
}

#[test]
fn test_duplicate_registration_keeps_first() {
    init_test_logging();
    let mut registry = AnalyzerRegistry::new();
    let grip = TestCategory::Custom("grip_strength".to_owned());

    assert!(registry.register(Arc::new(GripAnalyzer { label: "first" })));
    assert!(!registry.register(Arc::new(GripAnalyzer { label: "second" })));
    assert_eq!(registry.len(), 1);

    let result = registry
        .analyze(&grip, &male_athlete(), &MeasurementPoint::new(day(0), 48.0), None)
        .unwrap();
    assert_eq!(result.classification.as_deref(), Some("first"));
}

#[test]
fn test_unknown_category_is_invalid_value() {
    init_test_logging();
    let registry = builtin_registry();
    let err = registry
        .analyze(
            &TestCategory::Custom("vo2max".to_owned()),
            &male_athlete(),
            &MeasurementPoint::new(day(0), 55.0),
            None,
        )
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::InvalidValue);
    assert!(err.to_string().contains("vo2max"));
}

#[test]
fn test_default_registry_is_empty() {
    let registry = AnalyzerRegistry::default();
    assert!(registry.is_empty());
    assert!(registry.get(&TestCategory::Speed).is_none());
}

#[test]
fn test_registry_dispatches_builtin_analysis() {
    init_test_logging();
    let registry = builtin_registry();
    let current = MeasurementPoint::new(day(0), 1.80);

    let result = registry
        .analyze(&TestCategory::Speed, &male_athlete(), &current, None)
        .unwrap();
    assert_eq!(result.category, TestCategory::Speed);
    assert_eq!(result.classification.as_deref(), Some("Needs Improvement"));
}
