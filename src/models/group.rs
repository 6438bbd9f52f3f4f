//! Hardware groups: reusable templates attached to a pole level.

use serde::{Deserialize, Serialize};

use super::TensionLevel;

/// A named template of hardware requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub description: String,
    pub tension: TensionLevel,
}

/// One requirement line of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupItem {
    pub id: String,
    /// Owning group.
    pub group_id: String,
    #[serde(flatten)]
    pub role: GroupItemRole,
}

/// What a group item asks for.
///
/// Consumers match on this exhaustively, so a new role is a compile-time
/// change at every site that partitions or prices group items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GroupItemRole {
    /// A fixed catalog material.
    Material(GroupMaterial),
    /// A connector picked from the catalog by the point's cable sections.
    CableConnector(GroupCableConnector),
    /// A screw picked from the catalog by the pole section length.
    PoleScrew(GroupPoleScrew),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMaterial {
    pub material_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCableConnector {
    pub quantity: u32,
    /// Exit section override in mm², used instead of the point's exit cable.
    #[serde(default)]
    pub local_cable_section_mm: Option<f64>,
    /// Connector only takes an entrance cable.
    #[serde(default)]
    pub one_side_connector: bool,
}

impl GroupCableConnector {
    /// Exit section override, ignoring a zero override.
    pub fn exit_override_mm(&self) -> Option<f64> {
        self.local_cable_section_mm.filter(|mm| *mm > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPoleScrew {
    pub quantity: u32,
    /// Template offset in millimeters. Screw matching uses the section length alone.
    #[serde(default)]
    pub length_add_mm: f64,
}
