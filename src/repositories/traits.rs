//! Store traits the engine consumes.
//!
//! Every lookup that takes a list of ids is a single bulk call; backends
//! return only the entities that exist and callers work out what is
//! missing. Order of returned entities is not significant unless the
//! method name says otherwise.
//!
//! - [`CatalogStore`] - Utility poles, cables, materials, screws, connectors
//! - [`GroupStore`] - Groups and their items
//! - [`ProjectStore`] - Project existence, point names, point writes
//! - [`ProjectMaterialSink`] - Bulk write of computed BOM records

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{
    Cable, CableConnector, Group, GroupItem, Material, Point, PoleScrew, ProjectMaterial,
    UtilityPole,
};

/// Read access to the catalog plus the maintenance writes it needs.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_utility_pole_by_id(&self, id: &str) -> Result<Option<UtilityPole>, AppError>;

    async fn find_utility_poles_by_ids(&self, ids: &[String])
        -> Result<Vec<UtilityPole>, AppError>;

    async fn find_utility_pole_by_code(&self, code: u32) -> Result<Option<UtilityPole>, AppError>;

    async fn find_cables_by_ids(&self, ids: &[String]) -> Result<Vec<Cable>, AppError>;

    async fn find_materials_by_ids(&self, ids: &[String]) -> Result<Vec<Material>, AppError>;

    /// All pole screws, ascending by length.
    async fn list_pole_screws_ordered_by_length(&self) -> Result<Vec<PoleScrew>, AppError>;

    /// All cable connectors in a stable, deterministic order.
    async fn list_cable_connectors_ordered(&self) -> Result<Vec<CableConnector>, AppError>;

    async fn list_pole_screw_codes(&self) -> Result<Vec<u32>, AppError>;

    /// Inserts or replaces a utility pole by id.
    async fn save_utility_pole(&self, pole: UtilityPole) -> Result<(), AppError>;

    async fn create_pole_screws(&self, screws: Vec<PoleScrew>) -> Result<(), AppError>;
}

/// Access to hardware group templates.
#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn find_groups_by_ids(&self, ids: &[String]) -> Result<Vec<Group>, AppError>;

    async fn find_group_items_by_group_ids(
        &self,
        group_ids: &[String],
    ) -> Result<Vec<GroupItem>, AppError>;
}

/// Projects and their points.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn project_exists(&self, project_id: &str) -> Result<bool, AppError>;

    async fn point_name_exists_in_project(
        &self,
        name: &str,
        project_id: &str,
    ) -> Result<bool, AppError>;

    async fn list_point_names_in_project(&self, project_id: &str)
        -> Result<Vec<String>, AppError>;

    async fn save_points(&self, points: Vec<Point>) -> Result<(), AppError>;

    /// Removes points by id. Unknown ids are ignored.
    async fn delete_points(&self, point_ids: &[String]) -> Result<(), AppError>;
}

/// Destination of computed BOM records.
///
/// Called once per computation with the complete batch.
#[async_trait]
pub trait ProjectMaterialSink: Send + Sync {
    async fn persist_project_materials(
        &self,
        records: Vec<ProjectMaterial>,
    ) -> Result<(), AppError>;
}
