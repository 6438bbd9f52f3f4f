//! In-memory backend backed by a JSON dataset.
//!
//! Implements every store trait over a single [`Dataset`] guarded by an
//! async `RwLock`. Used by the CLI (loaded from a file) and by tests.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{
    Cable, CableConnector, Group, GroupItem, Material, Point, PoleScrew, Project,
    ProjectMaterial, UtilityPole,
};
use crate::repositories::{CatalogStore, GroupStore, ProjectMaterialSink, ProjectStore};

/// Everything the in-memory backend knows, in serializable form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub utility_poles: Vec<UtilityPole>,
    #[serde(default)]
    pub cables: Vec<Cable>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub pole_screws: Vec<PoleScrew>,
    #[serde(default)]
    pub cable_connectors: Vec<CableConnector>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub group_items: Vec<GroupItem>,
    #[serde(default)]
    pub project_materials: Vec<ProjectMaterial>,
}

/// Store implementation holding a [`Dataset`] in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<Dataset>,
    persist_calls: AtomicUsize,
}

impl InMemoryStore {
    /// Creates a store over the given dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            data: RwLock::new(dataset),
            persist_calls: AtomicUsize::new(0),
        }
    }

    /// Loads a dataset from a JSON file.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let content = tokio::fs::read_to_string(path).await?;
        let dataset: Dataset = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            poles = dataset.utility_poles.len(),
            groups = dataset.groups.len(),
            "Loaded dataset"
        );
        Ok(Self::new(dataset))
    }

    /// Writes the current dataset to a JSON file.
    pub async fn save(&self, path: &Path) -> Result<(), AppError> {
        let content = serde_json::to_string_pretty(&*self.data.read().await)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Returns a copy of the current dataset.
    pub async fn snapshot(&self) -> Dataset {
        self.data.read().await.clone()
    }

    /// Number of times the material sink has been invoked.
    pub fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }
}

fn select_by_ids<T: Clone>(items: &[T], ids: &[String], id_of: impl Fn(&T) -> &str) -> Vec<T> {
    let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
    items
        .iter()
        .filter(|item| wanted.contains(id_of(item)))
        .cloned()
        .collect()
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn find_utility_pole_by_id(&self, id: &str) -> Result<Option<UtilityPole>, AppError> {
        let data = self.data.read().await;
        Ok(data.utility_poles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_utility_poles_by_ids(
        &self,
        ids: &[String],
    ) -> Result<Vec<UtilityPole>, AppError> {
        let data = self.data.read().await;
        Ok(select_by_ids(&data.utility_poles, ids, |p| p.id.as_str()))
    }

    async fn find_utility_pole_by_code(&self, code: u32) -> Result<Option<UtilityPole>, AppError> {
        let data = self.data.read().await;
        Ok(data.utility_poles.iter().find(|p| p.code == code).cloned())
    }

    async fn find_cables_by_ids(&self, ids: &[String]) -> Result<Vec<Cable>, AppError> {
        let data = self.data.read().await;
        Ok(select_by_ids(&data.cables, ids, |c| c.id.as_str()))
    }

    async fn find_materials_by_ids(&self, ids: &[String]) -> Result<Vec<Material>, AppError> {
        let data = self.data.read().await;
        Ok(select_by_ids(&data.materials, ids, |m| m.id.as_str()))
    }

    async fn list_pole_screws_ordered_by_length(&self) -> Result<Vec<PoleScrew>, AppError> {
        let mut screws = self.data.read().await.pole_screws.clone();
        screws.sort_by(|a, b| {
            a.length_mm
                .total_cmp(&b.length_mm)
                .then_with(|| a.code.cmp(&b.code))
        });
        Ok(screws)
    }

    async fn list_cable_connectors_ordered(&self) -> Result<Vec<CableConnector>, AppError> {
        let mut connectors = self.data.read().await.cable_connectors.clone();
        // Tightest entrance range first, then tightest exit range
        connectors.sort_by(|a, b| {
            a.entrance_max_mm
                .total_cmp(&b.entrance_max_mm)
                .then_with(|| a.exit_max_mm.total_cmp(&b.exit_max_mm))
                .then_with(|| a.code.cmp(&b.code))
        });
        Ok(connectors)
    }

    async fn list_pole_screw_codes(&self) -> Result<Vec<u32>, AppError> {
        let data = self.data.read().await;
        Ok(data.pole_screws.iter().map(|s| s.code).collect())
    }

    async fn save_utility_pole(&self, pole: UtilityPole) -> Result<(), AppError> {
        let mut data = self.data.write().await;
        match data.utility_poles.iter().position(|p| p.id == pole.id) {
            Some(index) => data.utility_poles[index] = pole,
            None => data.utility_poles.push(pole),
        }
        Ok(())
    }

    async fn create_pole_screws(&self, screws: Vec<PoleScrew>) -> Result<(), AppError> {
        self.data.write().await.pole_screws.extend(screws);
        Ok(())
    }
}

#[async_trait]
impl GroupStore for InMemoryStore {
    async fn find_groups_by_ids(&self, ids: &[String]) -> Result<Vec<Group>, AppError> {
        let data = self.data.read().await;
        Ok(select_by_ids(&data.groups, ids, |g| g.id.as_str()))
    }

    async fn find_group_items_by_group_ids(
        &self,
        group_ids: &[String],
    ) -> Result<Vec<GroupItem>, AppError> {
        let data = self.data.read().await;
        Ok(select_by_ids(&data.group_items, group_ids, |i| i.group_id.as_str()))
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn project_exists(&self, project_id: &str) -> Result<bool, AppError> {
        let data = self.data.read().await;
        Ok(data.projects.iter().any(|p| p.id == project_id))
    }

    async fn point_name_exists_in_project(
        &self,
        name: &str,
        project_id: &str,
    ) -> Result<bool, AppError> {
        let data = self.data.read().await;
        Ok(data
            .points
            .iter()
            .any(|p| p.project_id == project_id && p.name == name))
    }

    async fn list_point_names_in_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<String>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .points
            .iter()
            .filter(|p| p.project_id == project_id)
            .map(|p| p.name.clone())
            .collect())
    }

    async fn save_points(&self, points: Vec<Point>) -> Result<(), AppError> {
        self.data.write().await.points.extend(points);
        Ok(())
    }

    async fn delete_points(&self, point_ids: &[String]) -> Result<(), AppError> {
        let doomed: HashSet<&str> = point_ids.iter().map(String::as_str).collect();
        self.data
            .write()
            .await
            .points
            .retain(|p| !doomed.contains(p.id.as_str()));
        Ok(())
    }
}

#[async_trait]
impl ProjectMaterialSink for InMemoryStore {
    async fn persist_project_materials(
        &self,
        records: Vec<ProjectMaterial>,
    ) -> Result<(), AppError> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        self.data.write().await.project_materials.extend(records);
        Ok(())
    }
}
