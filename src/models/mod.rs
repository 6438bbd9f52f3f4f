//! Domain models for distribution project budgeting.

mod catalog;
mod group;
mod point;
mod project_material;
mod tension;
mod utility_pole;

pub use catalog::{Cable, CableConnector, Material, PoleScrew};
pub use group::{
    Group, GroupCableConnector, GroupItem, GroupItemRole, GroupMaterial, GroupPoleScrew,
};
pub use point::{Point, Project};
pub use project_material::{GroupSpecs, ItemType, ProjectMaterial};
pub use tension::TensionLevel;
pub use utility_pole::{UtilityPole, VoltageSection};

use ulid::Ulid;

/// Generates a new ULID string.
pub fn generate_ulid() -> String {
    Ulid::new().to_string()
}
