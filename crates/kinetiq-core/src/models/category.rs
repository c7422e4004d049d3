// ABOUTME: Test category enumeration used as the analyzer registry key
// ABOUTME: Built-in categories plus a Custom variant for externally registered analyzers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Kinetiq Performance Lab

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of physical test
///
/// Built-in variants have analyzers in the intelligence crate. `Custom`
/// lets callers register analyzers for test types the engine does not ship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestCategory {
    /// Height, mass, circumferences, body composition
    Anthropometrics,
    /// Growth and maturity offset
    Maturation,
    /// Isometric mid-thigh pull
    Strength,
    /// Countermovement, Abalakov, and drop jumps
    Power,
    /// Loaded-jump force-velocity profiling
    ForceVelocity,
    /// Linear sprint splits
    Speed,
    /// Externally defined category
    Custom(String),
}

impl TestCategory {
    /// All categories with built-in analyzers
    pub const BUILTIN: [Self; 6] = [
        Self::Anthropometrics,
        Self::Maturation,
        Self::Strength,
        Self::Power,
        Self::ForceVelocity,
        Self::Speed,
    ];

    /// Stable identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Anthropometrics => "anthropometrics",
            Self::Maturation => "maturation",
            Self::Strength => "strength",
            Self::Power => "power",
            Self::ForceVelocity => "force_velocity",
            Self::Speed => "speed",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for TestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
