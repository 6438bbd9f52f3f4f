//! Utility pole catalog model.

use serde::{Deserialize, Serialize};

use super::TensionLevel;

/// Section geometry of one tension side of a pole.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoltageSection {
    /// Number of levels available for this tension.
    pub levels_count: u32,
    /// Length of the first section in millimeters.
    pub start_section_length_mm: f64,
    /// Length added per level above the first, in millimeters.
    pub section_length_add_per_level_mm: f64,
}

/// A utility pole from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityPole {
    /// Unique identifier (ULID).
    pub id: String,
    /// Catalog code.
    pub code: u32,
    pub description: String,
    /// Ratio applied to sections on the strong side of the pole.
    pub strong_side_section_multiplier: f64,
    pub low_voltage: VoltageSection,
    pub medium_voltage: VoltageSection,
}

impl UtilityPole {
    /// Returns the section geometry for a tension side.
    pub fn section(&self, tension: TensionLevel) -> &VoltageSection {
        match tension {
            TensionLevel::Low => &self.low_voltage,
            TensionLevel::Medium => &self.medium_voltage,
        }
    }

    /// Number of levels the pole offers for a tension side.
    pub fn levels_count(&self, tension: TensionLevel) -> u32 {
        self.section(tension).levels_count
    }

    /// Whether `level` (1-based) exists on the given tension side.
    pub fn supports_level(&self, tension: TensionLevel, level: u32) -> bool {
        level >= 1 && level <= self.levels_count(tension)
    }

    /// Section length before any strong side multiplier is applied.
    ///
    /// Level 0 is treated as level 1.
    pub fn base_section_length_mm(&self, tension: TensionLevel, level: u32) -> f64 {
        let section = self.section(tension);
        let steps = level.saturating_sub(1) as f64;
        section.start_section_length_mm + steps * section.section_length_add_per_level_mm
    }

    /// True when any length, count or multiplier is negative.
    pub fn has_negative_dimensions(&self) -> bool {
        self.strong_side_section_multiplier < 0.0
            || [&self.low_voltage, &self.medium_voltage].iter().any(|s| {
                s.start_section_length_mm < 0.0 || s.section_length_add_per_level_mm < 0.0
            })
    }
}
