//! Project and point models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::generate_ulid;

/// A distribution project owning a set of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// A physical location of a project that needs its own BOM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    /// Unique identifier (ULID).
    pub id: String,
    pub project_id: String,
    /// Unique within the project.
    pub name: String,
    pub description: Option<String>,
    pub utility_pole_id: Option<String>,
    pub low_tension_entrance_cable_id: Option<String>,
    pub low_tension_exit_cable_id: Option<String>,
    pub medium_tension_entrance_cable_id: Option<String>,
    pub medium_tension_exit_cable_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Point {
    /// Creates a point with a generated ULID, no pole, no cables.
    pub fn new(project_id: String, name: String, description: Option<String>) -> Self {
        Self {
            id: generate_ulid(),
            project_id,
            name,
            description,
            utility_pole_id: None,
            low_tension_entrance_cable_id: None,
            low_tension_exit_cable_id: None,
            medium_tension_entrance_cable_id: None,
            medium_tension_exit_cable_id: None,
            created_at: Utc::now(),
        }
    }
}
