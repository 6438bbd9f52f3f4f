//! Output records of a BOM computation.

use serde::{Deserialize, Serialize};

use super::TensionLevel;

/// Kind of catalog item a [`ProjectMaterial`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemType {
    Material,
    Cable,
    UtilityPole,
    PoleScrew,
    CableConnector,
}

/// Where a group-contributed record came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSpecs {
    pub group_id: String,
    pub utility_pole_level: u32,
    pub tension_level: TensionLevel,
}

/// One BOM line of a point.
///
/// Records are never mutated; recomputing a point yields a fresh set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMaterial {
    pub project_id: String,
    pub point_id: String,
    pub item_id: String,
    pub item_type: ItemType,
    pub quantity: u32,
    /// Absent for items requested directly on the point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_specs: Option<GroupSpecs>,
}
