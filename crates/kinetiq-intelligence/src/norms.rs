// ABOUTME: Canonical normative threshold tables for every classified metric
// ABOUTME: Strength, reactive strength, sprint, and profile-quality cutoffs supplied to analyzers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

//! Normative reference data
//!
//! Each metric has exactly one table. Callers may construct their own tables
//! (for example age-group norms) and pass them to the registry instead of
//! [`NormativeTables::standard`].

use kinetiq_core::errors::EngineResult;

use crate::thresholds::{PerformanceLevel, QualityLevel, ThresholdTable};

/// IMTP relative peak force cutoffs (N/kg)
pub const IMTP_RELATIVE_PEAK_FORCE: [f64; 3] = [35.0, 30.0, 25.0];
/// IMTP rate of force development over 50 ms cutoffs (N/s)
pub const IMTP_RFD_50: [f64; 3] = [8000.0, 6000.0, 4000.0];
/// IMTP force at 200 ms cutoffs (N)
pub const IMTP_FORCE_200MS: [f64; 3] = [2500.0, 2000.0, 1500.0];
/// Reactive strength index cutoffs (m/s)
pub const REACTIVE_STRENGTH_INDEX: [f64; 3] = [3.0, 2.5, 2.0];
/// 0-10 m acceleration cutoffs (m/s²)
pub const SPRINT_ACCELERATION: [f64; 3] = [5.5, 4.5, 3.5];
/// Flying 10 m velocity cutoffs (m/s)
pub const SPRINT_MAX_VELOCITY: [f64; 3] = [9.5, 8.5, 7.5];
/// 10-20 m velocity drop cutoffs (percent, lower is better)
pub const SPEED_MAINTENANCE_DROP: [f64; 3] = [5.0, 10.0, 15.0];
/// Acceleration deficit cutoffs (percent, lower is better)
pub const ACCELERATION_DEFICIT: [f64; 3] = [15.0, 20.0, 25.0];
/// Drop-jump ground contact time cutoffs (s, lower is better)
pub const CONTACT_TIME: [f64; 3] = [0.2, 0.25, 0.3];
/// Force-velocity regression R² cutoffs
pub const FV_PROFILE_QUALITY: [f64; 3] = [0.95, 0.90, 0.85];

/// Every threshold table the built-in analyzers classify against
#[derive(Debug, Clone, PartialEq)]
pub struct NormativeTables {
    /// IMTP peak force relative to body mass (N/kg)
    pub imtp_relative_peak_force: ThresholdTable<PerformanceLevel>,
    /// IMTP RFD over the first 50 ms (N/s)
    pub imtp_rfd_50: ThresholdTable<PerformanceLevel>,
    /// IMTP force at 200 ms (N)
    pub imtp_force_200ms: ThresholdTable<PerformanceLevel>,
    /// Drop-jump reactive strength index
    pub reactive_strength_index: ThresholdTable<PerformanceLevel>,
    /// 0-10 m acceleration (m/s²)
    pub sprint_acceleration: ThresholdTable<QualityLevel>,
    /// Flying 10 m velocity (m/s)
    pub sprint_max_velocity: ThresholdTable<QualityLevel>,
    /// Velocity drop from the first to the second 10 m (percent)
    pub speed_maintenance: ThresholdTable<QualityLevel>,
    /// Gap between acceleration and max velocity (percent)
    pub acceleration_deficit: ThresholdTable<QualityLevel>,
    /// Best drop-jump contact time (s)
    pub contact_time: ThresholdTable<&'static str>,
    /// Force-velocity regression R²
    pub fv_profile_quality: ThresholdTable<&'static str>,
}

impl NormativeTables {
    /// The standard adult tables
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if a table fails validation
    pub fn standard() -> EngineResult<Self> {
        Ok(Self {
            imtp_relative_peak_force: performance_table(
                "imtp_relative_peak_force",
                IMTP_RELATIVE_PEAK_FORCE,
            )?
            .with_bounds(0.0, 100.0)?,
            imtp_rfd_50: performance_table("imtp_rfd_50", IMTP_RFD_50)?.with_bounds(0.0, 50_000.0)?,
            imtp_force_200ms: performance_table("imtp_force_200ms", IMTP_FORCE_200MS)?
                .with_bounds(0.0, 10_000.0)?,
            reactive_strength_index: performance_table(
                "reactive_strength_index",
                REACTIVE_STRENGTH_INDEX,
            )?
            .with_bounds(0.0, 10.0)?,
            sprint_acceleration: quality_table("sprint_acceleration", SPRINT_ACCELERATION)?
                .with_bounds(0.0, 20.0)?,
            sprint_max_velocity: quality_table("sprint_max_velocity", SPRINT_MAX_VELOCITY)?
                .with_bounds(0.0, 15.0)?,
            speed_maintenance: ThresholdTable::lower_is_better(
                "speed_maintenance",
                quality_tiers(SPEED_MAINTENANCE_DROP),
                QualityLevel::NeedsImprovement,
            )?,
            acceleration_deficit: ThresholdTable::lower_is_better(
                "acceleration_deficit",
                quality_tiers(ACCELERATION_DEFICIT),
                QualityLevel::NeedsImprovement,
            )?,
            contact_time: ThresholdTable::lower_is_better(
                "contact_time",
                vec![
                    ("excellent", CONTACT_TIME[0]),
                    ("good", CONTACT_TIME[1]),
                    ("moderate", CONTACT_TIME[2]),
                ],
                "needs_improvement",
            )?,
            fv_profile_quality: ThresholdTable::new(
                "fv_profile_quality",
                vec![
                    ("excellent", FV_PROFILE_QUALITY[0]),
                    ("good", FV_PROFILE_QUALITY[1]),
                    ("acceptable", FV_PROFILE_QUALITY[2]),
                ],
                "needs_improvement",
            )?,
        })
    }
}

fn performance_table(
    metric: &str,
    cutoffs: [f64; 3],
) -> EngineResult<ThresholdTable<PerformanceLevel>> {
    ThresholdTable::new(
        metric,
        vec![
            (PerformanceLevel::Elite, cutoffs[0]),
            (PerformanceLevel::Advanced, cutoffs[1]),
            (PerformanceLevel::Intermediate, cutoffs[2]),
        ],
        PerformanceLevel::Developing,
    )
}

fn quality_table(metric: &str, cutoffs: [f64; 3]) -> EngineResult<ThresholdTable<QualityLevel>> {
    ThresholdTable::new(metric, quality_tiers(cutoffs), QualityLevel::NeedsImprovement)
}

fn quality_tiers(cutoffs: [f64; 3]) -> Vec<(QualityLevel, f64)> {
    vec![
        (QualityLevel::Excellent, cutoffs[0]),
        (QualityLevel::Good, cutoffs[1]),
        (QualityLevel::Average, cutoffs[2]),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables_validate() {
        let tables = NormativeTables::standard().unwrap();
        assert_eq!(
            tables.imtp_relative_peak_force.classify(31.0).unwrap(),
            PerformanceLevel::Advanced
        );
        assert_eq!(tables.contact_time.classify(0.22).unwrap(), "good");
        assert_eq!(
            tables.speed_maintenance.classify(-20.0).unwrap(),
            QualityLevel::Excellent
        );
    }
}
