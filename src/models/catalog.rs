//! Read-only catalog entries: cables, materials, pole screws and cable connectors.

use serde::{Deserialize, Serialize};

use super::TensionLevel;

/// A cable from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cable {
    pub id: String,
    pub code: u32,
    pub description: String,
    /// Conductor section area in mm².
    pub section_area_mm: f64,
    pub tension: TensionLevel,
}

/// A loose material from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub code: u32,
    pub description: String,
    /// Unit of measure (e.g. "UN", "M").
    pub unit: String,
}

/// A screw used to fix hardware through a pole section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoleScrew {
    pub id: String,
    pub code: u32,
    pub description: String,
    pub length_mm: f64,
}

/// A connector joining an entrance cable to an exit cable.
///
/// Each side accepts an inclusive range of cable section areas (mm²).
/// Single-side connectors have an exit range of `[0, 0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CableConnector {
    pub id: String,
    pub code: u32,
    pub description: String,
    pub entrance_min_mm: f64,
    pub entrance_max_mm: f64,
    pub exit_min_mm: f64,
    pub exit_max_mm: f64,
}

impl CableConnector {
    /// Whether both sections fall inside the connector's ranges.
    pub fn accepts(&self, entrance_mm: f64, exit_mm: f64) -> bool {
        (self.entrance_min_mm..=self.entrance_max_mm).contains(&entrance_mm)
            && (self.exit_min_mm..=self.exit_max_mm).contains(&exit_mm)
    }
}
