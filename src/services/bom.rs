//! BOM aggregation for a single point.
//!
//! Turns the resolved inputs of a point into its flat list of
//! [`ProjectMaterial`] records. Composition order:
//!
//! 1. Loose materials requested on the point
//! 2. Per group, in request order: materials, pole screws, cable connectors
//! 3. The utility pole, if newly acquired
//! 4. Each newly acquired cable, in slot order
//!
//! Records from different sources are never merged.

use crate::error::AppError;
use crate::models::{
    Cable, CableConnector, GroupCableConnector, GroupPoleScrew, GroupSpecs, ItemType, Material,
    PoleScrew, ProjectMaterial, TensionLevel, UtilityPole,
};
use crate::services::groups::ResolvedPointGroup;
use crate::services::matcher::{find_suitable_cable_connector, find_suitable_pole_screw};
use crate::services::section::SectionLengthModel;

// ============================================================================
// Resolved inputs
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedUtilityPole {
    pub pole: UtilityPole,
    /// Newly acquired for this point, so it is billed.
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPointCable {
    pub cable: Cable,
    pub is_new: bool,
}

/// Entrance and optional exit cable of one tension side.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCablePair {
    pub entrance: ResolvedPointCable,
    pub exit: Option<ResolvedPointCable>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedPointCables {
    pub low_tension: Option<ResolvedCablePair>,
    pub medium_tension: Option<ResolvedCablePair>,
}

impl ResolvedPointCables {
    pub fn for_tension(&self, tension: TensionLevel) -> Option<&ResolvedCablePair> {
        match tension {
            TensionLevel::Low => self.low_tension.as_ref(),
            TensionLevel::Medium => self.medium_tension.as_ref(),
        }
    }

    /// Filled slots: low entrance, low exit, medium entrance, medium exit.
    pub fn slots(&self) -> impl Iterator<Item = &ResolvedPointCable> {
        [self.low_tension.as_ref(), self.medium_tension.as_ref()]
            .into_iter()
            .flatten()
            .flat_map(|pair| std::iter::once(&pair.entrance).chain(pair.exit.as_ref()))
    }
}

/// A material requested directly on the point.
#[derive(Debug, Clone, PartialEq)]
pub struct UntiedMaterial {
    pub material: Material,
    pub quantity: u32,
}

/// Everything the aggregator needs for one point.
#[derive(Debug, Clone, Copy)]
pub struct BomInput<'a> {
    pub project_id: &'a str,
    pub point_id: &'a str,
    pub utility_pole: Option<&'a ResolvedUtilityPole>,
    pub cables: &'a ResolvedPointCables,
    pub groups: &'a [ResolvedPointGroup],
    pub untied_materials: &'a [UntiedMaterial],
    /// Ascending by length.
    pub pole_screws: &'a [PoleScrew],
    pub cable_connectors: &'a [CableConnector],
}

// ============================================================================
// Aggregator
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct BomAggregator {
    section_model: SectionLengthModel,
}

impl BomAggregator {
    pub fn new(section_model: SectionLengthModel) -> Self {
        Self { section_model }
    }

    /// Builds every record of the point or fails without partial output.
    pub fn assemble(&self, input: &BomInput<'_>) -> Result<Vec<ProjectMaterial>, AppError> {
        let mut records = Vec::new();
        let record = |item_id: &str, item_type, quantity, group_specs| ProjectMaterial {
            project_id: input.project_id.to_string(),
            point_id: input.point_id.to_string(),
            item_id: item_id.to_string(),
            item_type,
            quantity,
            group_specs,
        };

        for untied in input.untied_materials {
            records.push(record(&untied.material.id, ItemType::Material, untied.quantity, None));
        }

        for group in input.groups {
            let specs = GroupSpecs {
                group_id: group.group.id.clone(),
                utility_pole_level: group.level,
                tension_level: group.tension_level,
            };

            for material in &group.materials {
                records.push(record(
                    &material.material_id,
                    ItemType::Material,
                    material.quantity,
                    Some(specs.clone()),
                ));
            }

            for item in &group.pole_screws {
                let screw = self.pick_pole_screw(input, group, item)?;
                records.push(record(
                    &screw.id,
                    ItemType::PoleScrew,
                    item.quantity,
                    Some(specs.clone()),
                ));
            }

            for item in &group.cable_connectors {
                let connector = pick_cable_connector(input, group.tension_level, item)?;
                records.push(record(
                    &connector.id,
                    ItemType::CableConnector,
                    item.quantity,
                    Some(specs.clone()),
                ));
            }
        }

        if let Some(pole) = input.utility_pole.filter(|p| p.is_new) {
            records.push(record(&pole.pole.id, ItemType::UtilityPole, 1, None));
        }

        for slot in input.cables.slots().filter(|slot| slot.is_new) {
            records.push(record(&slot.cable.id, ItemType::Cable, 1, None));
        }

        Ok(records)
    }

    fn pick_pole_screw<'a>(
        &self,
        input: &BomInput<'a>,
        group: &ResolvedPointGroup,
        item: &GroupPoleScrew,
    ) -> Result<&'a PoleScrew, AppError> {
        let pole = input.utility_pole.ok_or(AppError::UtilityPoleRequired)?;
        let required_mm =
            self.section_model
                .section_length_mm(&pole.pole, group.tension_level, group.level);

        let screw = find_suitable_pole_screw(required_mm, input.pole_screws)
            .ok_or(AppError::NoSuitablePoleScrew { required_mm })?;
        tracing::debug!(
            group = %group.group.id,
            level = group.level,
            required_mm,
            length_add_mm = item.length_add_mm,
            screw = %screw.id,
            "Matched pole screw"
        );
        Ok(screw)
    }
}

fn pick_cable_connector<'a>(
    input: &BomInput<'a>,
    tension: TensionLevel,
    item: &GroupCableConnector,
) -> Result<&'a CableConnector, AppError> {
    let pair = input
        .cables
        .for_tension(tension)
        .ok_or(AppError::MissingTensionCables(tension))?;

    let entrance_mm = pair.entrance.cable.section_area_mm;
    let exit_mm = if item.one_side_connector {
        0.0
    } else {
        let exit_mm = item
            .exit_override_mm()
            .or_else(|| pair.exit.as_ref().map(|exit| exit.cable.section_area_mm))
            .unwrap_or(0.0);
        if exit_mm <= 0.0 {
            return Err(AppError::ExitCableSectionRequired);
        }
        exit_mm
    };

    let connector = find_suitable_cable_connector(entrance_mm, exit_mm, input.cable_connectors)
        .ok_or(AppError::NoSuitableCableConnector {
            entrance_mm,
            exit_mm,
        })?;
    tracing::debug!(
        %tension,
        entrance_mm,
        exit_mm,
        connector = %connector.id,
        "Matched cable connector"
    );
    Ok(connector)
}
