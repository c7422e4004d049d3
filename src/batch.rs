// ABOUTME: Parallel batch runner dispatching independent analysis requests through the registry
// ABOUTME: Fans requests out with rayon and returns per-request results in input order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use kinetiq_core::errors::EngineResult;
use kinetiq_core::models::{AthleteContext, MeasurementPoint, MeasurementSeries, TestCategory};
use kinetiq_intelligence::analysis_result::AnalysisResult;
use kinetiq_intelligence::registry::AnalyzerRegistry;
use rayon::prelude::*;
use tracing::{info, warn};

/// One (athlete, test) analysis to run
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Category selecting the analyzer
    pub category: TestCategory,
    /// Athlete the measurement belongs to
    pub athlete: AthleteContext,
    /// Measurement to analyze
    pub current: MeasurementPoint,
    /// Prior measurements of the same test, oldest first
    pub history: Option<MeasurementSeries>,
}

impl AnalysisRequest {
    /// Request without history
    #[must_use]
    pub const fn new(
        category: TestCategory,
        athlete: AthleteContext,
        current: MeasurementPoint,
    ) -> Self {
        Self {
            category,
            athlete,
            current,
            history: None,
        }
    }

    /// Attach the test history
    #[must_use]
    pub fn with_history(mut self, history: MeasurementSeries) -> Self {
        self.history = Some(history);
        self
    }
}

/// Run every request in parallel
///
/// Requests are independent: one failing request does not affect the others,
/// and `results[i]` always belongs to `requests[i]`.
#[must_use]
pub fn analyze_batch(
    registry: &AnalyzerRegistry,
    requests: &[AnalysisRequest],
) -> Vec<EngineResult<AnalysisResult>> {
    let results: Vec<EngineResult<AnalysisResult>> = requests
        .par_iter()
        .map(|request| {
            registry.analyze(
                &request.category,
                &request.athlete,
                &request.current,
                request.history.as_ref(),
            )
        })
        .collect();

    let failed = results.iter().filter(|result| result.is_err()).count();
    if failed > 0 {
        warn!(
            requests = requests.len(),
            failed, "Batch analysis completed with failures"
        );
    } else {
        info!(requests = requests.len(), "Batch analysis completed");
    }
    results
}
