// ABOUTME: Registry mapping test categories to their performance analyzers
// ABOUTME: Built once with the built-in analyzers and extended with custom categories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

// NOTE: `.clone()` calls here copy Arc handles and category keys

use std::collections::HashMap;
use std::sync::Arc;

use kinetiq_core::errors::{AnalysisError, EngineResult};
use kinetiq_core::models::{AthleteContext, MeasurementPoint, MeasurementSeries, TestCategory};
use tracing::{debug, info, warn};

use crate::analysis_config::AnalysisConfig;
use crate::analysis_result::AnalysisResult;
use crate::analyzers::{
    AnthropometricAnalyzer, ForceVelocityAnalyzer, ImtpAnalyzer, JumpProfileAnalyzer,
    MaturationAnalyzer, PerformanceAnalyzer, SprintAnalyzer,
};
use crate::norms::NormativeTables;

/// Category to analyzer table
///
/// The table is filled at startup and only read afterwards, so a shared
/// reference can be handed to any number of worker threads.
pub struct AnalyzerRegistry {
    analyzers: HashMap<TestCategory, Arc<dyn PerformanceAnalyzer>>,
}

impl AnalyzerRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            analyzers: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in analyzer
    #[must_use]
    pub fn with_builtin_analyzers(config: &AnalysisConfig, norms: &NormativeTables) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AnthropometricAnalyzer::new(config.clone())));
        registry.register(Arc::new(MaturationAnalyzer::new(config.clone())));
        registry.register(Arc::new(ImtpAnalyzer::new(config.clone(), norms.clone())));
        registry.register(Arc::new(JumpProfileAnalyzer::new(
            config.clone(),
            norms.clone(),
        )));
        registry.register(Arc::new(ForceVelocityAnalyzer::new(
            config.clone(),
            norms.clone(),
        )));
        registry.register(Arc::new(SprintAnalyzer::new(config.clone(), norms.clone())));

        info!("Registered {} built-in analyzers", registry.analyzers.len());
        registry
    }

    /// Register an analyzer under its own category
    ///
    /// Returns `false`, leaving the existing analyzer in place, when the
    /// category is already taken.
    pub fn register(&mut self, analyzer: Arc<dyn PerformanceAnalyzer>) -> bool {
        let category = analyzer.category();
        if self.analyzers.contains_key(&category) {
            warn!(
                category = category.as_str(),
                analyzer = analyzer.name(),
                "Analyzer already registered for category, ignoring"
            );
            return false;
        }

        debug!(
            category = category.as_str(),
            analyzer = analyzer.name(),
            "Registering analyzer"
        );
        self.analyzers.insert(category, analyzer);
        true
    }

    /// Analyzer for a category
    #[must_use]
    pub fn get(&self, category: &TestCategory) -> Option<Arc<dyn PerformanceAnalyzer>> {
        self.analyzers.get(category).cloned()
    }

    /// Check if a category has an analyzer
    #[must_use]
    pub fn contains(&self, category: &TestCategory) -> bool {
        self.analyzers.contains_key(category)
    }

    /// Registered categories in sorted order
    #[must_use]
    pub fn categories(&self) -> Vec<TestCategory> {
        let mut categories: Vec<TestCategory> = self.analyzers.keys().cloned().collect();
        categories.sort();
        categories
    }

    /// Number of registered analyzers
    #[must_use]
    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    /// Whether no analyzer is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Dispatch an analysis to the analyzer registered for `category`
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for an unregistered category, otherwise whatever
    /// the analyzer returns
    pub fn analyze(
        &self,
        category: &TestCategory,
        athlete: &AthleteContext,
        current: &MeasurementPoint,
        history: Option<&MeasurementSeries>,
    ) -> EngineResult<AnalysisResult> {
        let analyzer = self.analyzers.get(category).ok_or_else(|| {
            AnalysisError::invalid_value(
                "category",
                format!("no analyzer registered for '{}'", category.as_str()),
            )
        })?;

        debug!(
            category = category.as_str(),
            athlete_id = %athlete.athlete_id,
            points = history.map_or(0, MeasurementSeries::len),
            "Dispatching analysis"
        );
        analyzer.analyze(athlete, current, history)
    }
}

impl Default for AnalyzerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
