//! Group resolution: validate requested group levels against the pole and
//! expand each group into its role buckets.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::context::{AppGroups, Context};
use crate::di::FromContext;
use crate::error::AppError;
use crate::models::{
    Group, GroupCableConnector, GroupItem, GroupItemRole, GroupMaterial, GroupPoleScrew,
    TensionLevel, UtilityPole,
};
use crate::services::lookup::{distinct_ids, ResolvedIndex};

// ============================================================================
// Types
// ============================================================================

/// A group attached to one level of one tension side of the pole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointGroupRequest {
    pub tension_level: TensionLevel,
    /// 1-based pole level.
    pub level: u32,
    pub group_id: String,
}

/// A requested group with its items split by role.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPointGroup {
    pub tension_level: TensionLevel,
    pub level: u32,
    pub group: Group,
    pub materials: Vec<GroupMaterial>,
    pub cable_connectors: Vec<GroupCableConnector>,
    pub pole_screws: Vec<GroupPoleScrew>,
}

impl ResolvedPointGroup {
    fn new(request: &PointGroupRequest, group: Group) -> Self {
        Self {
            tension_level: request.tension_level,
            level: request.level,
            group,
            materials: Vec::new(),
            cable_connectors: Vec::new(),
            pole_screws: Vec::new(),
        }
    }

    fn push(&mut self, role: GroupItemRole) {
        match role {
            GroupItemRole::Material(material) => self.materials.push(material),
            GroupItemRole::CableConnector(connector) => self.cable_connectors.push(connector),
            GroupItemRole::PoleScrew(screw) => self.pole_screws.push(screw),
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Checks requested levels: no repeated `(tension, level)` pair, and every
/// tension side fits the pole's level capacity.
pub fn validate_group_levels(
    requests: &[PointGroupRequest],
    pole: &UtilityPole,
) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for request in requests {
        if !seen.insert((request.tension_level, request.level)) {
            return Err(AppError::DuplicateGroupLevel {
                tension: request.tension_level,
                level: request.level,
            });
        }
    }

    for tension in TensionLevel::all() {
        let levels: Vec<u32> = requests
            .iter()
            .filter(|r| r.tension_level == *tension)
            .map(|r| r.level)
            .collect();
        let capacity = pole.levels_count(*tension);

        let over_count = levels.len() > capacity as usize;
        let out_of_range = levels
            .iter()
            .any(|level| !pole.supports_level(*tension, *level));
        if over_count || out_of_range {
            return Err(AppError::PoleCapacityExceeded(*tension));
        }
    }

    Ok(())
}

// ============================================================================
// Service
// ============================================================================

/// The group requests of one point and the pole they are attached to.
#[derive(Debug, Clone, Copy)]
pub struct GroupPlacement<'a> {
    pub requests: &'a [PointGroupRequest],
    pub utility_pole: Option<&'a UtilityPole>,
}

/// Resolves group requests against the group store.
#[derive(FromContext, Clone)]
pub struct GroupResolutionService {
    groups: AppGroups,
}

impl GroupResolutionService {
    pub fn new(groups: AppGroups) -> Self {
        Self { groups }
    }

    /// Validate and resolve `requests`, one output per request in order.
    pub async fn resolve(
        &self,
        requests: &[PointGroupRequest],
        pole: &UtilityPole,
    ) -> Result<Vec<ResolvedPointGroup>, AppError> {
        let placement = GroupPlacement {
            requests,
            utility_pole: Some(pole),
        };
        let mut resolved = self.resolve_many(&[placement]).await?;
        Ok(resolved.pop().unwrap_or_default())
    }

    /// Resolve the groups of several points with one group fetch and one
    /// item fetch for the whole set.
    ///
    /// Every placement is validated first. Missing group ids are reported
    /// together, de-duplicated, in request order across placements.
    pub async fn resolve_many(
        &self,
        placements: &[GroupPlacement<'_>],
    ) -> Result<Vec<Vec<ResolvedPointGroup>>, AppError> {
        for placement in placements {
            if placement.requests.is_empty() {
                continue;
            }
            let pole = placement.utility_pole.ok_or(AppError::UtilityPoleRequired)?;
            validate_group_levels(placement.requests, pole)?;
        }

        let group_ids = distinct_ids(
            placements
                .iter()
                .flat_map(|p| p.requests)
                .map(|r| r.group_id.as_str()),
        );
        if group_ids.is_empty() {
            return Ok(placements.iter().map(|_| Vec::new()).collect());
        }

        let found = self.groups.find_groups_by_ids(&group_ids).await?;
        let index = ResolvedIndex::resolve(&group_ids, found, |g| g.id.as_str())
            .map_err(AppError::GroupsNotFound)?;

        let items = self.groups.find_group_items_by_group_ids(&group_ids).await?;
        tracing::debug!(
            groups = group_ids.len(),
            items = items.len(),
            "Fetched group items"
        );

        let mut roles: HashMap<String, Vec<GroupItemRole>> = HashMap::new();
        for GroupItem { group_id, role, .. } in items {
            if index.get(&group_id).is_none() {
                return Err(AppError::Internal(format!(
                    "Group item references group {} outside the request",
                    group_id
                )));
            }
            roles.entry(group_id).or_default().push(role);
        }

        placements
            .iter()
            .map(|placement| {
                placement
                    .requests
                    .iter()
                    .map(|request| {
                        let group = index.get(&request.group_id).cloned().ok_or_else(|| {
                            AppError::Internal(format!(
                                "Group {} resolved but missing from index",
                                request.group_id
                            ))
                        })?;
                        let mut resolved = ResolvedPointGroup::new(request, group);
                        for role in roles.get(&request.group_id).into_iter().flatten() {
                            resolved.push(role.clone());
                        }
                        Ok(resolved)
                    })
                    .collect::<Result<Vec<_>, AppError>>()
            })
            .collect()
    }
}
