//! Pole section length model.

use crate::config::EngineConfig;
use crate::models::{TensionLevel, UtilityPole};

/// Derives the physical length of a pole section.
///
/// `length = start + (level - 1) * add_per_level` for the tension side,
/// scaled by the pole's strong side multiplier when that side is the
/// configured strong side. Total over any pole and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLengthModel {
    strong_side: TensionLevel,
}

impl SectionLengthModel {
    pub fn new(strong_side: TensionLevel) -> Self {
        Self { strong_side }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.strong_side)
    }

    pub fn strong_side(&self) -> TensionLevel {
        self.strong_side
    }

    /// Section length in millimeters for a 1-based level.
    pub fn section_length_mm(&self, pole: &UtilityPole, tension: TensionLevel, level: u32) -> f64 {
        let length = pole.base_section_length_mm(tension, level);
        if tension == self.strong_side {
            length * pole.strong_side_section_multiplier
        } else {
            length
        }
    }
}

impl Default for SectionLengthModel {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
