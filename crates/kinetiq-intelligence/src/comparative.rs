// ABOUTME: Comparative analyzer ranking an athlete against reference groups per test
// ABOUTME: Percentile rank, z-score labels, group statistics, strengths, weaknesses, advice
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use std::collections::BTreeMap;
use std::fmt;

use kinetiq_core::errors::{AnalysisError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::statistical_analysis::{is_constant, mean, population_std, StatisticalAnalyzer};

/// Standing relative to a reference group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelativePerformance {
    /// z > 2
    Exceptional,
    /// 1 < z ≤ 2
    #[serde(rename = "Above Average")]
    AboveAverage,
    /// −1 < z ≤ 1
    Average,
    /// −2 < z ≤ −1
    #[serde(rename = "Below Average")]
    BelowAverage,
    /// z ≤ −2
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl RelativePerformance {
    /// Label for a z-score
    #[must_use]
    pub fn from_z_score(z: f64) -> Self {
        if z > 2.0 {
            Self::Exceptional
        } else if z > 1.0 {
            Self::AboveAverage
        } else if z > -1.0 {
            Self::Average
        } else if z > -2.0 {
            Self::BelowAverage
        } else {
            Self::NeedsImprovement
        }
    }

    /// Whether the label counts as a strength
    #[must_use]
    pub const fn is_strength(self) -> bool {
        matches!(self, Self::Exceptional | Self::AboveAverage)
    }

    /// Whether the label counts as a weakness
    #[must_use]
    pub const fn is_weakness(self) -> bool {
        matches!(self, Self::BelowAverage | Self::NeedsImprovement)
    }
}

impl fmt::Display for RelativePerformance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Exceptional => "Exceptional",
            Self::AboveAverage => "Above Average",
            Self::Average => "Average",
            Self::BelowAverage => "Below Average",
            Self::NeedsImprovement => "Needs Improvement",
        };
        f.write_str(label)
    }
}

/// Athlete's standing on one test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRanking {
    /// Athlete's value
    pub value: f64,
    /// Percentile rank within the group (0-100)
    pub percentile: f64,
    /// Standard score against the group; 0 for a constant group
    pub z_score: f64,
    /// Qualitative label from the z-score
    pub relative_performance: RelativePerformance,
}

/// Descriptive statistics of a reference group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    /// Mean
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Group size
    pub count: usize,
}

/// Full comparison of one athlete against reference groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeReport {
    /// Per-test standing, only for tests with a non-empty reference group
    pub rankings: BTreeMap<String, TestRanking>,
    /// Reference group statistics per test
    pub group_statistics: BTreeMap<String, GroupStatistics>,
    /// Tests ranked Exceptional or Above Average
    pub strengths: Vec<String>,
    /// Tests ranked Below Average or Needs Improvement
    pub weaknesses: Vec<String>,
    /// Training advice derived from the weaknesses
    pub recommendations: Vec<String>,
}

/// Compares athletes with reference groups
pub struct ComparativeAnalyzer;

impl ComparativeAnalyzer {
    /// Z-score of `value` against `reference` (population std)
    ///
    /// Returns 0 when the reference group is empty or constant.
    #[must_use]
    pub fn z_score(value: f64, reference: &[f64]) -> f64 {
        if reference.is_empty() || is_constant(reference) {
            0.0
        } else {
            (value - mean(reference)) / population_std(reference)
        }
    }

    /// Rank one athlete's latest values against reference groups
    ///
    /// Tests without a reference group, or with an empty one, are skipped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for a non-finite athlete or reference value
    pub fn compare(
        athlete_values: &BTreeMap<String, f64>,
        reference_groups: &BTreeMap<String, Vec<f64>>,
    ) -> EngineResult<ComparativeReport> {
        let mut rankings = BTreeMap::new();
        let mut group_statistics = BTreeMap::new();

        for (test, &value) in athlete_values {
            let Some(group) = reference_groups.get(test).filter(|g| !g.is_empty()) else {
                debug!(test = %test, "No reference group, skipping comparison");
                continue;
            };
            let value = AnalysisError::ensure_finite(test, value)?;
            for reference in group {
                AnalysisError::ensure_finite(test, *reference)?;
            }

            let z_score = Self::z_score(value, group);
            rankings.insert(
                test.clone(),
                TestRanking {
                    value,
                    percentile: StatisticalAnalyzer::percentile_rank(value, group),
                    z_score,
                    relative_performance: RelativePerformance::from_z_score(z_score),
                },
            );
        }

        for (test, group) in reference_groups.iter().filter(|(_, g)| !g.is_empty()) {
            group_statistics.insert(test.clone(), group_stats(group));
        }

        let strengths: Vec<String> = rankings
            .iter()
            .filter(|(_, r)| r.relative_performance.is_strength())
            .map(|(test, _)| test.clone())
            .collect();
        let weaknesses: Vec<String> = rankings
            .iter()
            .filter(|(_, r)| r.relative_performance.is_weakness())
            .map(|(test, _)| test.clone())
            .collect();
        let recommendations = recommendations(&rankings, &weaknesses, &strengths);

        Ok(ComparativeReport {
            rankings,
            group_statistics,
            strengths,
            weaknesses,
            recommendations,
        })
    }
}

fn group_stats(group: &[f64]) -> GroupStatistics {
    GroupStatistics {
        mean: mean(group),
        std: population_std(group),
        min: group.iter().copied().fold(f64::INFINITY, f64::min),
        max: group.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        count: group.len(),
    }
}

fn recommendations(
    rankings: &BTreeMap<String, TestRanking>,
    weaknesses: &[String],
    strengths: &[String],
) -> Vec<String> {
    let mut advice: Vec<String> = weaknesses
        .iter()
        .filter_map(|test| {
            rankings.get(test).map(|r| {
                format!(
                    "Prioritize {test} development: {} (percentile {:.0})",
                    r.relative_performance, r.percentile
                )
            })
        })
        .collect();

    if advice.is_empty() {
        advice.push("Maintain a balanced program across all tested qualities".to_owned());
    }
    if !strengths.is_empty() {
        advice.push(format!(
            "Preserve strengths with maintenance volume: {}",
            strengths.join(", ")
        ));
    }
    advice
}
