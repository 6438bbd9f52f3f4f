//! Point creation pipeline.
//!
//! A point request is validated, its references resolved in bulk, its BOM
//! computed, and only then are the point and its records persisted. Any
//! failure, including a rejected record batch, leaves the stores untouched.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::context::{AppCatalog, AppMaterialSink, AppProjects, Context};
use crate::di::FromContext;
use crate::error::AppError;
use crate::models::{
    Cable, CableConnector, Material, Point, PoleScrew, ProjectMaterial, UtilityPole,
};
use crate::services::bom::{
    BomAggregator, BomInput, ResolvedCablePair, ResolvedPointCable, ResolvedPointCables,
    ResolvedUtilityPole, UntiedMaterial,
};
use crate::services::groups::{
    GroupPlacement, GroupResolutionService, PointGroupRequest, ResolvedPointGroup,
};
use crate::services::lookup::{distinct_ids, ResolvedIndex};
use crate::services::section::SectionLengthModel;

// ============================================================================
// Request Types
// ============================================================================

/// Utility pole placed on the point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointUtilityPoleRequest {
    pub utility_pole_id: String,
    /// Bill the pole as newly acquired.
    #[serde(default)]
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointCableRequest {
    pub cable_id: String,
    #[serde(default)]
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CablePairRequest {
    pub entrance: PointCableRequest,
    #[serde(default)]
    pub exit: Option<PointCableRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointCablesRequest {
    #[serde(default)]
    pub low_tension: Option<CablePairRequest>,
    #[serde(default)]
    pub medium_tension: Option<CablePairRequest>,
}

impl PointCablesRequest {
    fn slots(&self) -> impl Iterator<Item = &PointCableRequest> {
        [self.low_tension.as_ref(), self.medium_tension.as_ref()]
            .into_iter()
            .flatten()
            .flat_map(|pair| std::iter::once(&pair.entrance).chain(pair.exit.as_ref()))
    }
}

/// A material billed directly on the point, outside any group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UntiedMaterialRequest {
    pub material_id: String,
    pub quantity: u32,
}

/// Everything needed to create a point and compute its BOM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePointRequest {
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub utility_pole: Option<PointUtilityPoleRequest>,
    #[serde(default)]
    pub cables: PointCablesRequest,
    #[serde(default)]
    pub groups: Vec<PointGroupRequest>,
    #[serde(default)]
    pub untied_materials: Vec<UntiedMaterialRequest>,
}

/// Point creation by plain ids: nothing billed, no groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointIds {
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub utility_pole_id: Option<String>,
    #[serde(default)]
    pub low_tension_entrance_cable_id: Option<String>,
    #[serde(default)]
    pub low_tension_exit_cable_id: Option<String>,
    #[serde(default)]
    pub medium_tension_entrance_cable_id: Option<String>,
    #[serde(default)]
    pub medium_tension_exit_cable_id: Option<String>,
}

impl TryFrom<PointIds> for CreatePointRequest {
    type Error = AppError;

    fn try_from(ids: PointIds) -> Result<Self, Self::Error> {
        fn pair(
            entrance: Option<String>,
            exit: Option<String>,
            side: &str,
        ) -> Result<Option<CablePairRequest>, AppError> {
            let cable = |cable_id| PointCableRequest {
                cable_id,
                is_new: false,
            };
            match (entrance, exit) {
                (Some(entrance), exit) => Ok(Some(CablePairRequest {
                    entrance: cable(entrance),
                    exit: exit.map(cable),
                })),
                (None, None) => Ok(None),
                (None, Some(_)) => Err(AppError::Validation(format!(
                    "{} tension exit cable given without an entrance cable",
                    side
                ))),
            }
        }

        Ok(Self {
            project_id: ids.project_id,
            name: ids.name,
            description: ids.description,
            utility_pole: ids.utility_pole_id.map(|utility_pole_id| PointUtilityPoleRequest {
                utility_pole_id,
                is_new: false,
            }),
            cables: PointCablesRequest {
                low_tension: pair(
                    ids.low_tension_entrance_cable_id,
                    ids.low_tension_exit_cable_id,
                    "Low",
                )?,
                medium_tension: pair(
                    ids.medium_tension_entrance_cable_id,
                    ids.medium_tension_exit_cable_id,
                    "Medium",
                )?,
            },
            groups: Vec::new(),
            untied_materials: Vec::new(),
        })
    }
}

/// A created point and its BOM records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPoint {
    pub point: Point,
    pub materials: Vec<ProjectMaterial>,
}

// ============================================================================
// Pipeline state
// ============================================================================

/// References of one request, resolved and validated.
struct ResolvedPointInputs {
    point: Point,
    utility_pole: Option<ResolvedUtilityPole>,
    cables: ResolvedPointCables,
    groups: Vec<ResolvedPointGroup>,
    untied_materials: Vec<UntiedMaterial>,
}

/// Catalog listings used for matching, fetched once per computation.
struct MatchingCatalog {
    pole_screws: Vec<PoleScrew>,
    cable_connectors: Vec<CableConnector>,
}

fn indexed<T: Clone>(index: &ResolvedIndex<T>, id: &str, kind: &str) -> Result<T, AppError> {
    index
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::Internal(format!("{} {} missing after lookup", kind, id)))
}

fn resolve_cable_pair(
    index: &ResolvedIndex<Cable>,
    request: Option<&CablePairRequest>,
) -> Result<Option<ResolvedCablePair>, AppError> {
    let Some(request) = request else {
        return Ok(None);
    };
    let exit = match &request.exit {
        Some(exit) => Some(resolve_cable_slot(index, exit)?),
        None => None,
    };
    Ok(Some(ResolvedCablePair {
        entrance: resolve_cable_slot(index, &request.entrance)?,
        exit,
    }))
}

fn resolve_cable_slot(
    index: &ResolvedIndex<Cable>,
    slot: &PointCableRequest,
) -> Result<ResolvedPointCable, AppError> {
    Ok(ResolvedPointCable {
        cable: indexed(index, &slot.cable_id, "Cable")?,
        is_new: slot.is_new,
    })
}

/// Build the inputs of one request from the batch-wide indexes.
fn point_inputs(
    request: CreatePointRequest,
    utility_pole: Option<ResolvedUtilityPole>,
    groups: Vec<ResolvedPointGroup>,
    cables: &ResolvedIndex<Cable>,
    materials: &ResolvedIndex<Material>,
) -> Result<ResolvedPointInputs, AppError> {
    let resolved_cables = ResolvedPointCables {
        low_tension: resolve_cable_pair(cables, request.cables.low_tension.as_ref())?,
        medium_tension: resolve_cable_pair(cables, request.cables.medium_tension.as_ref())?,
    };
    let untied_materials = request
        .untied_materials
        .iter()
        .map(|untied| {
            Ok(UntiedMaterial {
                material: indexed(materials, &untied.material_id, "Material")?,
                quantity: untied.quantity,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let mut point = Point::new(request.project_id, request.name, request.description);
    point.utility_pole_id = utility_pole.as_ref().map(|p| p.pole.id.clone());
    let cable_id = |slot: &ResolvedPointCable| slot.cable.id.clone();
    if let Some(pair) = &resolved_cables.low_tension {
        point.low_tension_entrance_cable_id = Some(cable_id(&pair.entrance));
        point.low_tension_exit_cable_id = pair.exit.as_ref().map(cable_id);
    }
    if let Some(pair) = &resolved_cables.medium_tension {
        point.medium_tension_entrance_cable_id = Some(cable_id(&pair.entrance));
        point.medium_tension_exit_cable_id = pair.exit.as_ref().map(cable_id);
    }

    Ok(ResolvedPointInputs {
        point,
        utility_pole,
        cables: resolved_cables,
        groups,
        untied_materials,
    })
}

// ============================================================================
// Service
// ============================================================================

/// Creates points and computes their BOM.
#[derive(FromContext, Clone)]
pub struct PointService {
    projects: AppProjects,
    catalog: AppCatalog,
    resolver: GroupResolutionService,
    sink: AppMaterialSink,
    config: Arc<Config>,
}

impl PointService {
    /// Create one point and persist it together with its BOM.
    pub async fn create_point(
        &self,
        request: CreatePointRequest,
    ) -> Result<CreatedPoint, AppError> {
        tracing::info!(
            project_id = %request.project_id,
            point = %request.name,
            groups = request.groups.len(),
            "Creating point"
        );

        self.ensure_project(&request.project_id).await?;
        if self
            .projects
            .point_name_exists_in_project(&request.name, &request.project_id)
            .await?
        {
            tracing::warn!(point = %request.name, "Point name already registered");
            return Err(AppError::PointNameTaken {
                name: request.name,
                project_id: request.project_id,
            });
        }

        let created = self
            .build_and_persist(vec![request])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Point computation yielded nothing".to_string()))?;

        tracing::info!(
            point_id = %created.point.id,
            records = created.materials.len(),
            "Point created"
        );
        Ok(created)
    }

    /// Create several points of the same project as one unit.
    ///
    /// The first failing request aborts the batch before anything is saved.
    pub async fn create_many_points(
        &self,
        requests: Vec<CreatePointRequest>,
    ) -> Result<Vec<CreatedPoint>, AppError> {
        let Some(first) = requests.first() else {
            return Ok(Vec::new());
        };
        let project_id = first.project_id.clone();
        tracing::info!(project_id = %project_id, points = requests.len(), "Creating points");

        if requests.iter().any(|r| r.project_id != project_id) {
            return Err(AppError::MixedProjects);
        }

        let mut names = HashSet::new();
        if let Some(duplicate) = requests.iter().find(|r| !names.insert(r.name.as_str())) {
            return Err(AppError::DuplicatePointName(duplicate.name.clone()));
        }

        self.ensure_project(&project_id).await?;
        let existing: HashSet<String> = self
            .projects
            .list_point_names_in_project(&project_id)
            .await?
            .into_iter()
            .collect();
        if let Some(taken) = requests.iter().find(|r| existing.contains(&r.name)) {
            tracing::warn!(point = %taken.name, "Point name already registered");
            return Err(AppError::PointNameTaken {
                name: taken.name.clone(),
                project_id,
            });
        }

        let created = self.build_and_persist(requests).await?;
        tracing::info!(
            project_id = %project_id,
            points = created.len(),
            records = created.iter().map(|c| c.materials.len()).sum::<usize>(),
            "Points created"
        );
        Ok(created)
    }

    async fn ensure_project(&self, project_id: &str) -> Result<(), AppError> {
        if self.projects.project_exists(project_id).await? {
            Ok(())
        } else {
            Err(AppError::ProjectNotFound(project_id.to_string()))
        }
    }

    /// Resolve, compute and persist a checked set of requests.
    async fn build_and_persist(
        &self,
        requests: Vec<CreatePointRequest>,
    ) -> Result<Vec<CreatedPoint>, AppError> {
        let resolved = self.resolve_inputs(requests).await?;
        let catalog = self.fetch_matching_catalog().await?;
        let created = resolved
            .into_iter()
            .map(|inputs| self.compute(inputs, &catalog))
            .collect::<Result<Vec<_>, AppError>>()?;

        self.persist(&created).await?;
        Ok(created)
    }

    /// Resolve every reference of the batch with one lookup per entity kind.
    ///
    /// Missing ids of a kind are reported together for the whole batch, in
    /// request order.
    async fn resolve_inputs(
        &self,
        requests: Vec<CreatePointRequest>,
    ) -> Result<Vec<ResolvedPointInputs>, AppError> {
        let poles = self.lookup_utility_poles(&requests).await?;
        let mut utility_poles = Vec::with_capacity(requests.len());
        for request in &requests {
            let pole = match &request.utility_pole {
                Some(pole_request) => Some(ResolvedUtilityPole {
                    pole: indexed(&poles, &pole_request.utility_pole_id, "Utility pole")?,
                    is_new: pole_request.is_new,
                }),
                None => None,
            };
            utility_poles.push(pole);
        }

        let groups = {
            let placements: Vec<GroupPlacement<'_>> = requests
                .iter()
                .zip(&utility_poles)
                .map(|(request, pole)| GroupPlacement {
                    requests: &request.groups,
                    utility_pole: pole.as_ref().map(|p| &p.pole),
                })
                .collect();
            self.resolver.resolve_many(&placements).await?
        };

        let cables = self.lookup_cables(&requests).await?;
        let materials = self.lookup_materials(&requests).await?;

        requests
            .into_iter()
            .zip(utility_poles)
            .zip(groups)
            .map(|((request, utility_pole), groups)| {
                point_inputs(request, utility_pole, groups, &cables, &materials)
            })
            .collect()
    }

    async fn lookup_utility_poles(
        &self,
        requests: &[CreatePointRequest],
    ) -> Result<ResolvedIndex<UtilityPole>, AppError> {
        let ids: Vec<String> = requests
            .iter()
            .filter_map(|r| r.utility_pole.as_ref())
            .map(|p| p.utility_pole_id.clone())
            .collect();
        let lookup = distinct_ids(ids.iter().map(String::as_str));
        let found = if lookup.is_empty() {
            Vec::new()
        } else {
            self.catalog.find_utility_poles_by_ids(&lookup).await?
        };
        ResolvedIndex::resolve(&ids, found, |p| p.id.as_str())
            .map_err(AppError::UtilityPolesNotFound)
    }

    async fn lookup_cables(
        &self,
        requests: &[CreatePointRequest],
    ) -> Result<ResolvedIndex<Cable>, AppError> {
        let ids: Vec<String> = requests
            .iter()
            .flat_map(|r| r.cables.slots())
            .map(|slot| slot.cable_id.clone())
            .collect();
        let lookup = distinct_ids(ids.iter().map(String::as_str));
        let found = if lookup.is_empty() {
            Vec::new()
        } else {
            self.catalog.find_cables_by_ids(&lookup).await?
        };
        ResolvedIndex::resolve(&ids, found, |c| c.id.as_str()).map_err(AppError::CablesNotFound)
    }

    async fn lookup_materials(
        &self,
        requests: &[CreatePointRequest],
    ) -> Result<ResolvedIndex<Material>, AppError> {
        let ids: Vec<String> = requests
            .iter()
            .flat_map(|r| &r.untied_materials)
            .map(|m| m.material_id.clone())
            .collect();
        let lookup = distinct_ids(ids.iter().map(String::as_str));
        let found = if lookup.is_empty() {
            Vec::new()
        } else {
            self.catalog.find_materials_by_ids(&lookup).await?
        };
        ResolvedIndex::resolve(&ids, found, |m| m.id.as_str())
            .map_err(AppError::MaterialsNotFound)
    }

    async fn fetch_matching_catalog(&self) -> Result<MatchingCatalog, AppError> {
        let (pole_screws, cable_connectors) = tokio::try_join!(
            self.catalog.list_pole_screws_ordered_by_length(),
            self.catalog.list_cable_connectors_ordered(),
        )?;
        tracing::debug!(
            pole_screws = pole_screws.len(),
            cable_connectors = cable_connectors.len(),
            "Fetched matching catalog"
        );
        Ok(MatchingCatalog {
            pole_screws,
            cable_connectors,
        })
    }

    fn compute(
        &self,
        inputs: ResolvedPointInputs,
        catalog: &MatchingCatalog,
    ) -> Result<CreatedPoint, AppError> {
        let aggregator = BomAggregator::new(SectionLengthModel::from_config(&self.config.engine));
        let materials = aggregator.assemble(&BomInput {
            project_id: &inputs.point.project_id,
            point_id: &inputs.point.id,
            utility_pole: inputs.utility_pole.as_ref(),
            cables: &inputs.cables,
            groups: &inputs.groups,
            untied_materials: &inputs.untied_materials,
            pole_screws: &catalog.pole_screws,
            cable_connectors: &catalog.cable_connectors,
        })?;

        Ok(CreatedPoint {
            point: inputs.point,
            materials,
        })
    }

    /// Save the points in one call, then send all their records to the sink
    /// in one call. Saved points are deleted again if the sink fails.
    async fn persist(&self, created: &[CreatedPoint]) -> Result<(), AppError> {
        let points: Vec<Point> = created.iter().map(|c| c.point.clone()).collect();
        let point_ids: Vec<String> = points.iter().map(|p| p.id.clone()).collect();
        let records: Vec<ProjectMaterial> = created
            .iter()
            .flat_map(|c| c.materials.iter().cloned())
            .collect();

        self.projects.save_points(points).await?;
        if let Err(err) = self.sink.persist_project_materials(records).await {
            tracing::warn!(
                error = %err,
                points = point_ids.len(),
                "Material sink failed, removing saved points"
            );
            if let Err(cleanup) = self.projects.delete_points(&point_ids).await {
                tracing::error!(error = %cleanup, "Could not remove saved points");
            }
            return Err(err);
        }
        Ok(())
    }
}
