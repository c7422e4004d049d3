// ABOUTME: Closed-form biomechanics formulas used by the category analyzers
// ABOUTME: Navy body fat, BMI, Mirwald maturity offset, RSI, Samozino F-V profile, sprint kinematics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

//! Formula library
//!
//! Every function takes fully resolved inputs in the units named by its
//! parameters; no unit conversion happens here. Ratios documented as
//! zero-guarded return 0 instead of failing.

use std::fmt;

use kinetiq_core::constants::physics::{CM_PER_M, GRAVITY, SPRINT_SEGMENT_M};
use kinetiq_core::errors::{AnalysisError, EngineResult};
use kinetiq_core::models::{Gender, TrialMeasurement};
use serde::{Deserialize, Serialize};

use crate::statistical_analysis::StatisticalAnalyzer;

/// Fraction of leg length used as the optimal push-off distance (Samozino et al. 2014)
pub const OPTIMAL_PUSH_OFF_FRACTION: f64 = 0.4;

// ============================================================================
// Body composition
// ============================================================================

/// Body fat percentage by the U.S. Navy circumference method
///
/// Male: `495 / (1.0324 − 0.19077·log10(waist − neck) + 0.15456·log10(height)) − 450`
///
/// Female: `495 / (1.29579 − 0.35004·log10(waist + hip − neck) + 0.22100·log10(height)) − 450`
///
/// # Errors
///
/// Returns `MissingMeasurement` for a female without `hip_cm`, and
/// `InvalidValue` for non-positive inputs or a non-positive log argument
pub fn body_fat_percent(
    gender: Gender,
    waist_cm: f64,
    neck_cm: f64,
    height_cm: f64,
    hip_cm: Option<f64>,
) -> EngineResult<f64> {
    let waist = AnalysisError::ensure_positive("waist_cm", waist_cm)?;
    let neck = AnalysisError::ensure_positive("neck_cm", neck_cm)?;
    let height = AnalysisError::ensure_positive("height_cm", height_cm)?;

    let (circumference, intercept, circumference_coef, height_coef): (f64, f64, f64, f64) =
        match gender {
            Gender::Male => (waist - neck, 1.0324, 0.19077, 0.15456),
            Gender::Female => {
                let hip = hip_cm.ok_or_else(|| {
                    AnalysisError::missing_measurement("hip_cm", "female body fat estimation")
                })?;
                let hip = AnalysisError::ensure_positive("hip_cm", hip)?;
                (waist + hip - neck, 1.29579, 0.35004, 0.22100)
            }
        };

    if circumference <= 0.0 {
        return Err(AnalysisError::invalid_value(
            "neck_cm",
            format!("circumference term must be positive, got {circumference}"),
        ));
    }

    let density = height_coef.mul_add(
        height.log10(),
        (-circumference_coef).mul_add(circumference.log10(), intercept),
    );
    if density <= 0.0 {
        return Err(AnalysisError::invalid_value(
            "body_density",
            format!("density term must be positive, got {density}"),
        ));
    }
    Ok(495.0 / density - 450.0)
}

/// Body mass index (kg/m²)
///
/// # Errors
///
/// Returns `InvalidValue` if height or weight is not positive
pub fn bmi(weight_kg: f64, height_cm: f64) -> EngineResult<f64> {
    let weight = AnalysisError::ensure_positive("weight_kg", weight_kg)?;
    let height_m = AnalysisError::ensure_positive("height_cm", height_cm)? / CM_PER_M;
    Ok(weight / (height_m * height_m))
}

/// WHO adult BMI category
#[must_use]
pub fn bmi_category(bmi: f64) -> &'static str {
    if bmi < 18.5 {
        "Underweight"
    } else if bmi < 25.0 {
        "Normal"
    } else if bmi < 30.0 {
        "Overweight"
    } else {
        "Obese"
    }
}

/// American Council on Exercise body fat category
#[must_use]
pub fn body_fat_category(gender: Gender, body_fat_percent: f64) -> &'static str {
    let bands = match gender {
        Gender::Male => [6.0, 14.0, 18.0, 25.0],
        Gender::Female => [14.0, 21.0, 25.0, 32.0],
    };
    if body_fat_percent < bands[0] {
        "Essential Fat"
    } else if body_fat_percent < bands[1] {
        "Athletes"
    } else if body_fat_percent < bands[2] {
        "Fitness"
    } else if body_fat_percent < bands[3] {
        "Average"
    } else {
        "Obese"
    }
}

// ============================================================================
// Maturation
// ============================================================================

/// Maturity offset band relative to peak height velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaturationStatus {
    /// More than a year before PHV
    #[serde(rename = "Pre-PHV")]
    PrePhv,
    /// Within a year of PHV (inclusive)
    #[serde(rename = "During-PHV")]
    DuringPhv,
    /// More than a year after PHV
    #[serde(rename = "Post-PHV")]
    PostPhv,
}

impl MaturationStatus {
    /// Classify a maturity offset; the ±1 boundaries belong to `DuringPhv`
    #[must_use]
    pub fn from_offset(offset_years: f64) -> Self {
        if offset_years < -1.0 {
            Self::PrePhv
        } else if offset_years <= 1.0 {
            Self::DuringPhv
        } else {
            Self::PostPhv
        }
    }
}

impl fmt::Display for MaturationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PrePhv => "Pre-PHV",
            Self::DuringPhv => "During-PHV",
            Self::PostPhv => "Post-PHV",
        };
        f.write_str(label)
    }
}

/// Maturity offset in years from peak height velocity (Mirwald et al. 2002)
///
/// `−9.236 + 0.0002708·(leg·SHR) − 0.001663·(age·leg) + 0.007216·(age·SHR) + 0.02292·(weight/height·100)`
/// where SHR is seated height as a percentage of standing height. Leg length
/// defaults to standing minus seated height.
///
/// # Errors
///
/// Returns `InvalidValue` for non-positive inputs or a derived leg length
/// that is not positive
pub fn peak_height_velocity(
    height_cm: f64,
    seated_height_cm: f64,
    weight_kg: f64,
    age_years: f64,
    leg_length_cm: Option<f64>,
) -> EngineResult<f64> {
    let height = AnalysisError::ensure_positive("height_cm", height_cm)?;
    let seated = AnalysisError::ensure_positive("seated_height_cm", seated_height_cm)?;
    let weight = AnalysisError::ensure_positive("weight_kg", weight_kg)?;
    let age = AnalysisError::ensure_positive("age_years", age_years)?;
    let leg = AnalysisError::ensure_positive(
        "leg_length_cm",
        leg_length_cm.unwrap_or(height - seated),
    )?;

    let sitting_height_ratio = seated / height * 100.0;
    let weight_height_ratio = weight / height * 100.0;

    let offset = 0.02292f64.mul_add(
        weight_height_ratio,
        0.007_216f64.mul_add(
            age * sitting_height_ratio,
            (-0.001_663f64).mul_add(
                age * leg,
                0.000_270_8f64.mul_add(leg * sitting_height_ratio, -9.236),
            ),
        ),
    );
    Ok(offset)
}

/// Chronological age at which PHV occurs (or occurred)
#[must_use]
pub fn estimated_age_at_phv(age_years: f64, maturity_offset: f64) -> f64 {
    age_years - maturity_offset
}

// ============================================================================
// Jump and reactive strength
// ============================================================================

/// Reactive strength indices for one drop jump
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactiveStrength {
    /// Jump height over contact time (m/s); 0 for a non-positive contact time
    pub rsi: f64,
    /// RSI normalized by drop height, when the drop height is known
    pub modified_rsi: Option<f64>,
}

/// Reactive strength index and its drop-height-normalized variant
#[must_use]
pub fn reactive_strength_index(
    jump_height_m: f64,
    contact_time_s: f64,
    drop_height_m: Option<f64>,
) -> ReactiveStrength {
    let rsi = if contact_time_s > 0.0 {
        jump_height_m / contact_time_s
    } else {
        0.0
    };
    let modified_rsi = drop_height_m.map(|drop| {
        let denominator = contact_time_s * drop;
        if denominator > 0.0 {
            jump_height_m / denominator
        } else {
            0.0
        }
    });
    ReactiveStrength { rsi, modified_rsi }
}

/// Drop jump to countermovement jump height ratio assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactiveRatioAssessment {
    /// Ratio ≥ 1.1
    ExcellentReactiveAbility,
    /// Ratio ≥ 1.0
    GoodReactiveAbility,
    /// Ratio ≥ 0.9
    ModerateReactiveAbility,
    /// Ratio < 0.9
    LimitedReactiveAbility,
}

impl ReactiveRatioAssessment {
    /// Classify a DJ/CMJ ratio
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 1.1 {
            Self::ExcellentReactiveAbility
        } else if ratio >= 1.0 {
            Self::GoodReactiveAbility
        } else if ratio >= 0.9 {
            Self::ModerateReactiveAbility
        } else {
            Self::LimitedReactiveAbility
        }
    }

    /// Stable identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExcellentReactiveAbility => "excellent_reactive_ability",
            Self::GoodReactiveAbility => "good_reactive_ability",
            Self::ModerateReactiveAbility => "moderate_reactive_ability",
            Self::LimitedReactiveAbility => "limited_reactive_ability",
        }
    }
}

impl fmt::Display for ReactiveRatioAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DJ/CMJ ratio with its assessment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DjCmjRatio {
    /// Drop jump height over CMJ height; 0 if the CMJ height is not positive
    pub ratio: f64,
    /// Qualitative reactive ability
    pub assessment: ReactiveRatioAssessment,
}

/// Drop jump to countermovement jump ratio
#[must_use]
pub fn dj_cmj_ratio(dj_height: f64, cmj_height: f64) -> DjCmjRatio {
    let ratio = if cmj_height > 0.0 {
        dj_height / cmj_height
    } else {
        0.0
    };
    DjCmjRatio {
        ratio,
        assessment: ReactiveRatioAssessment::from_ratio(ratio),
    }
}

/// Arm swing contribution: Abalakov over CMJ gain (percent); 0 if CMJ ≤ 0
#[must_use]
pub fn arm_contribution_percent(cmj_height: f64, abalakov_height: f64) -> f64 {
    if cmj_height <= 0.0 {
        0.0
    } else {
        (abalakov_height - cmj_height) / cmj_height * 100.0
    }
}

/// Peak power estimate from jump height (Sayers et al. 1999), in watts
///
/// `60.7 × height_cm + 45.3 × mass_kg − 2055`
///
/// # Errors
///
/// Returns `InvalidValue` if body mass is not positive or height is negative
pub fn jump_peak_power(jump_height_m: f64, body_mass_kg: f64) -> EngineResult<f64> {
    let height = AnalysisError::ensure_finite("jump_height_m", jump_height_m)?;
    if height < 0.0 {
        return Err(AnalysisError::invalid_value(
            "jump_height_m",
            format!("must not be negative, got {height}"),
        ));
    }
    let mass = AnalysisError::ensure_positive("body_mass_kg", body_mass_kg)?;
    Ok(60.7f64.mul_add(height * CM_PER_M, 45.3f64.mul_add(mass, -2055.0)))
}

// ============================================================================
// Force-velocity profile
// ============================================================================

/// Which quality limits a force-velocity profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeficitType {
    /// Negative imbalance
    Force,
    /// Zero or positive imbalance
    Velocity,
}

/// Deviation of the measured slope from the optimal slope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FvImbalance {
    /// `(actual − optimal) / optimal × 100`
    pub percent: f64,
    /// Limiting quality
    pub deficit: DeficitType,
    /// Absolute imbalance
    pub magnitude: f64,
}

/// Samozino force-velocity profile from loaded jumps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FvProfile {
    /// Theoretical maximal force at zero velocity (N)
    pub f0: f64,
    /// Theoretical maximal velocity at zero force (m/s)
    pub v0: f64,
    /// Maximal power `F0·V0/4` (W)
    pub pmax: f64,
    /// Slope magnitude `−dF/dv`
    pub slope: f64,
    /// Goodness of fit of force on velocity
    pub r_squared: f64,
    /// Optimal slope for the athlete's leg length
    pub optimal_slope: f64,
    /// Deviation from the optimal slope
    pub imbalance: FvImbalance,
    /// Per-trial (load kg, take-off velocity m/s)
    pub load_velocity_points: Vec<(f64, f64)>,
}

/// Optimal force-velocity slope: `−(g·L) / (4 × 0.4·L)`
///
/// # Errors
///
/// Returns `InvalidValue` if leg length is not positive
pub fn optimal_fv_slope(leg_length_m: f64) -> EngineResult<f64> {
    let leg = AnalysisError::ensure_positive("leg_length_m", leg_length_m)?;
    let push_off_distance = leg * OPTIMAL_PUSH_OFF_FRACTION;
    Ok(-(GRAVITY * leg) / (4.0 * push_off_distance))
}

/// Force-velocity profile by Samozino's method
///
/// For each trial `v = √(2·g·h)` and `F = (body_mass + load)·g`; force is
/// regressed on velocity. A trial without a load is a body-weight jump.
///
/// # Errors
///
/// Returns `InsufficientData` for fewer than two trials, `InvalidValue` for
/// non-positive mass or leg length, negative heights, identical velocities,
/// or a zero regression slope
pub fn force_velocity_profile(
    trials: &[TrialMeasurement],
    body_mass_kg: f64,
    leg_length_m: f64,
) -> EngineResult<FvProfile> {
    if trials.len() < 2 {
        return Err(AnalysisError::insufficient_data(
            "force_velocity_profile",
            2,
            trials.len(),
        ));
    }
    let mass = AnalysisError::ensure_positive("body_mass_kg", body_mass_kg)?;
    let optimal_slope = optimal_fv_slope(leg_length_m)?;

    let mut velocities = Vec::with_capacity(trials.len());
    let mut forces = Vec::with_capacity(trials.len());
    let mut load_velocity_points = Vec::with_capacity(trials.len());
    for trial in trials {
        let height = AnalysisError::ensure_finite("height_m", trial.height_m)?;
        if height < 0.0 {
            return Err(AnalysisError::invalid_value(
                "height_m",
                format!("jump height must not be negative, got {height}"),
            ));
        }
        let load = AnalysisError::ensure_finite("added_load_kg", trial.added_load_kg.unwrap_or(0.0))?;
        let velocity = (2.0 * GRAVITY * height).sqrt();
        velocities.push(velocity);
        forces.push((mass + load) * GRAVITY);
        load_velocity_points.push((load, velocity));
    }

    let regression = StatisticalAnalyzer::linear_regression(&velocities, &forces)?;
    if regression.slope == 0.0 {
        return Err(AnalysisError::invalid_value(
            "force_velocity_slope",
            "force does not change with velocity",
        ));
    }

    let f0 = regression.intercept;
    let v0 = -regression.intercept / regression.slope;
    let slope = -regression.slope;
    let imbalance_percent = (slope - optimal_slope) / optimal_slope * 100.0;

    Ok(FvProfile {
        f0,
        v0,
        pmax: f0 * v0 / 4.0,
        slope,
        r_squared: regression.r_squared,
        optimal_slope,
        imbalance: FvImbalance {
            percent: imbalance_percent,
            deficit: if imbalance_percent < 0.0 {
                DeficitType::Force
            } else {
                DeficitType::Velocity
            },
            magnitude: imbalance_percent.abs(),
        },
        load_velocity_points,
    })
}

// ============================================================================
// Sprint kinematics
// ============================================================================

/// Speed maintenance over the second 10 m
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedMaintenance {
    /// `t20 − t10` (s)
    pub second_10m_time: f64,
    /// Average velocity over 10-20 m (m/s)
    pub final_velocity: f64,
    /// Relative velocity change from the first to the second 10 m (percent)
    pub velocity_drop_percent: f64,
}

/// Acceleration over the two 10 m segments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelerationCurve {
    /// Average velocity over 0-20 m (m/s)
    pub velocity_20m: f64,
    /// Acceleration over 10-20 m (m/s²)
    pub acceleration_10_20: f64,
    /// Relative decrease from the 0-10 m acceleration (percent)
    pub acceleration_decrease_percent: f64,
}

/// Velocity and acceleration decomposition of a sprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprintKinematics {
    /// Average velocity over 0-10 m (m/s)
    pub initial_velocity: f64,
    /// `v² / (2·10)` over 0-10 m (m/s²)
    pub initial_acceleration: f64,
    /// Present when a 20 m split is known
    pub maintenance: Option<SpeedMaintenance>,
    /// Present when a 20 m split is known
    pub curve: Option<AccelerationCurve>,
    /// Flying 10 m velocity (m/s)
    pub max_velocity: Option<f64>,
    /// `(max_v − v10) / max_v × 100`
    pub acceleration_deficit_percent: Option<f64>,
}

/// Sprint velocity and acceleration decomposition
///
/// # Errors
///
/// Returns `InvalidValue` for non-positive times or a 20 m time that does
/// not exceed the 10 m time
pub fn sprint_acceleration(
    t10: f64,
    t20: Option<f64>,
    t_flying10: Option<f64>,
) -> EngineResult<SprintKinematics> {
    let t10 = AnalysisError::ensure_positive("sprint_10m", t10)?;
    let initial_velocity = SPRINT_SEGMENT_M / t10;
    let initial_acceleration = segment_acceleration(0.0, initial_velocity);

    let (maintenance, curve) = match t20 {
        Some(t20) => {
            let t20 = AnalysisError::ensure_positive("sprint_20m", t20)?;
            if t20 <= t10 {
                return Err(AnalysisError::invalid_value(
                    "sprint_20m",
                    format!("20 m time {t20} must exceed 10 m time {t10}"),
                ));
            }
            let second_10m_time = t20 - t10;
            let final_velocity = SPRINT_SEGMENT_M / second_10m_time;
            let velocity_20m = 2.0 * SPRINT_SEGMENT_M / t20;
            let acceleration_10_20 = segment_acceleration(initial_velocity, velocity_20m);
            (
                Some(SpeedMaintenance {
                    second_10m_time,
                    final_velocity,
                    velocity_drop_percent: (initial_velocity - final_velocity) / initial_velocity
                        * 100.0,
                }),
                Some(AccelerationCurve {
                    velocity_20m,
                    acceleration_10_20,
                    acceleration_decrease_percent: (initial_acceleration - acceleration_10_20)
                        / initial_acceleration
                        * 100.0,
                }),
            )
        }
        None => (None, None),
    };

    let max_velocity = t_flying10
        .map(|t| AnalysisError::ensure_positive("flying_10m", t).map(|t| SPRINT_SEGMENT_M / t))
        .transpose()?;
    let acceleration_deficit_percent =
        max_velocity.map(|max_v| (max_v - initial_velocity) / max_v * 100.0);

    Ok(SprintKinematics {
        initial_velocity,
        initial_acceleration,
        maintenance,
        curve,
        max_velocity,
        acceleration_deficit_percent,
    })
}

/// `(v_end² − v_start²) / (2·10)`
fn segment_acceleration(v_start: f64, v_end: f64) -> f64 {
    v_end.mul_add(v_end, -(v_start * v_start)) / (2.0 * SPRINT_SEGMENT_M)
}

// ============================================================================
// Strength
// ============================================================================

/// Force per kilogram of body mass; 0 for a non-positive mass
#[must_use]
pub fn relative_strength(force_n: f64, body_mass_kg: f64) -> f64 {
    if body_mass_kg > 0.0 {
        force_n / body_mass_kg
    } else {
        0.0
    }
}

/// Side producing more force
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left limb
    Left,
    /// Right limb
    Right,
}

/// Severity of a left/right force difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsymmetryLevel {
    /// ≤ 5 %
    Normal,
    /// ≤ 10 %
    Minor,
    /// ≤ 15 %
    Moderate,
    /// > 15 %
    Significant,
}

impl AsymmetryLevel {
    /// Classify an asymmetry percentage
    #[must_use]
    pub fn from_percent(asymmetry_percent: f64) -> Self {
        if asymmetry_percent <= 5.0 {
            Self::Normal
        } else if asymmetry_percent <= 10.0 {
            Self::Minor
        } else if asymmetry_percent <= 15.0 {
            Self::Moderate
        } else {
            Self::Significant
        }
    }
}

impl fmt::Display for AsymmetryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Normal => "normal",
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Significant => "significant",
        };
        f.write_str(label)
    }
}

/// Left/right force comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BilateralAsymmetry {
    /// Side with the higher force (right on a tie)
    pub stronger_side: Side,
    /// `(stronger − weaker) / stronger × 100`
    pub asymmetry_percent: f64,
    /// Weaker over stronger
    pub ratio: f64,
    /// Severity band
    pub assessment: AsymmetryLevel,
}

/// Bilateral force asymmetry
///
/// # Errors
///
/// Returns `InvalidValue` for negative forces or when both sides are zero
pub fn bilateral_asymmetry(left_n: f64, right_n: f64) -> EngineResult<BilateralAsymmetry> {
    let left = AnalysisError::ensure_finite("left_peak_force", left_n)?;
    let right = AnalysisError::ensure_finite("right_peak_force", right_n)?;
    if left < 0.0 || right < 0.0 {
        return Err(AnalysisError::invalid_value(
            "peak_force",
            "bilateral forces must not be negative",
        ));
    }
    let stronger = left.max(right);
    let weaker = left.min(right);
    if stronger <= 0.0 {
        return Err(AnalysisError::invalid_value(
            "peak_force",
            "at least one side must produce force",
        ));
    }
    let asymmetry_percent = (stronger - weaker) / stronger * 100.0;
    Ok(BilateralAsymmetry {
        stronger_side: if left > right { Side::Left } else { Side::Right },
        asymmetry_percent,
        ratio: weaker / stronger,
        assessment: AsymmetryLevel::from_percent(asymmetry_percent),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_acceleration_from_rest() {
        let v = 10.0 / 1.8;
        assert!((segment_acceleration(0.0, v) - v * v / 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_optimal_slope_independent_of_leg_length() {
        let short = optimal_fv_slope(0.8).unwrap();
        let long = optimal_fv_slope(1.1).unwrap();
        assert!((short - long).abs() < 1e-12);
        assert!((short + GRAVITY / 1.6).abs() < 1e-12);
    }
}
