//! Tension level enum shared by poles, cables and groups.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Voltage classification of a pole section, cable or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TensionLevel {
    Low,
    Medium,
}

impl TensionLevel {
    /// Returns a static slice of all tension levels.
    pub fn all() -> &'static [TensionLevel] {
        &[TensionLevel::Low, TensionLevel::Medium]
    }

    /// Lower-case adjective used in messages ("low", "medium").
    pub fn label(&self) -> &'static str {
        match self {
            TensionLevel::Low => "low",
            TensionLevel::Medium => "medium",
        }
    }
}

impl std::fmt::Display for TensionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TensionLevel::Low => write!(f, "LOW"),
            TensionLevel::Medium => write!(f, "MEDIUM"),
        }
    }
}

impl FromStr for TensionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" | "Low" | "low" => Ok(TensionLevel::Low),
            "MEDIUM" | "Medium" | "medium" => Ok(TensionLevel::Medium),
            _ => Err(format!(
                "Invalid tension level '{}'. Valid values: LOW, MEDIUM",
                s
            )),
        }
    }
}
