// ABOUTME: Physical constants and measurement key names shared across the engine
// ABOUTME: Pure data constants organized by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

//! Constants module
//!
//! Constants are grouped into small domain modules rather than one flat list.

/// Physical constants used by biomechanics formulas
pub mod physics {
    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f64 = 9.81;
    /// Length of one sprint timing segment (m)
    pub const SPRINT_SEGMENT_M: f64 = 10.0;
    /// Centimeters per meter
    pub const CM_PER_M: f64 = 100.0;
}

/// Names of secondary values carried in `MeasurementPoint::sub_measurements`
pub mod measurement_keys {
    /// Body mass recorded with an anthropometric test (kg)
    pub const WEIGHT_KG: &str = "weight_kg";
    /// Seated height (cm)
    pub const SEATED_HEIGHT_CM: &str = "seated_height_cm";
    /// Lower-limb length (cm)
    pub const LEG_LENGTH_CM: &str = "leg_length_cm";
    /// Standing reach (cm)
    pub const STANDING_REACH_CM: &str = "standing_reach_cm";
    /// Waist circumference (cm)
    pub const WAIST_CM: &str = "waist_cm";
    /// Neck circumference (cm)
    pub const NECK_CM: &str = "neck_cm";
    /// Hip circumference (cm)
    pub const HIP_CM: &str = "hip_cm";

    /// Rate of force development over the first 50 ms (N/s)
    pub const RFD_50: &str = "rfd_50";
    /// Force reached at 200 ms (N)
    pub const FORCE_200MS: &str = "force_200ms";
    /// Left-side peak force (N)
    pub const LEFT_PEAK_FORCE: &str = "left_peak_force";
    /// Right-side peak force (N)
    pub const RIGHT_PEAK_FORCE: &str = "right_peak_force";

    /// Arm-swing countermovement jump height (m)
    pub const ABALAKOV_HEIGHT: &str = "abalakov_height";

    /// 20 m sprint time (s)
    pub const SPRINT_20M: &str = "sprint_20m";
    /// Flying 10 m sprint time (s)
    pub const FLYING_10M: &str = "flying_10m";
}

/// Labels shared by trend and pattern outputs
pub mod labels {
    /// Upward trend
    pub const IMPROVING: &str = "improving";
    /// Downward trend
    pub const DECLINING: &str = "declining";
    /// No meaningful slope
    pub const STABLE: &str = "stable";
    /// Too few points to judge
    pub const INSUFFICIENT_DATA: &str = "insufficient_data";
}
