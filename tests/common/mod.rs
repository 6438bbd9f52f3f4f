//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use distbom::config::Config;
use distbom::context::Context;
use distbom::models::{
    Cable, CableConnector, Group, GroupCableConnector, GroupItem, GroupItemRole, GroupMaterial,
    GroupPoleScrew, Material, PoleScrew, Project, TensionLevel, UtilityPole, VoltageSection,
};
use distbom::repositories::backends::{Dataset, InMemoryStore};
use distbom::services::{
    CablePairRequest, CreatePointRequest, PointCableRequest, PointCablesRequest,
    PointGroupRequest, PointUtilityPoleRequest,
};

pub const PROJECT: &str = "project-1";
pub const POLE: &str = "pole-1";

/// Catalog with one project, one pole, screws of 50/100/150mm and groups
/// covering each item role.
///
/// Pole sections: LOW 2 levels from 100mm (+20 per level), MEDIUM 3 levels
/// from 150mm (+30 per level), strong side multiplier 2.
pub fn dataset(with_single_side_connector: bool) -> Dataset {
    let mut cable_connectors = vec![CableConnector {
        id: "cc-two".to_string(),
        code: 501,
        description: "CONNECTOR 10-16 / 10-16".to_string(),
        entrance_min_mm: 10.0,
        entrance_max_mm: 16.0,
        exit_min_mm: 10.0,
        exit_max_mm: 16.0,
    }];
    if with_single_side_connector {
        cable_connectors.push(CableConnector {
            id: "cc-one".to_string(),
            code: 502,
            description: "CONNECTOR 10-16 SINGLE".to_string(),
            entrance_min_mm: 10.0,
            entrance_max_mm: 16.0,
            exit_min_mm: 0.0,
            exit_max_mm: 0.0,
        });
    }

    Dataset {
        projects: vec![Project {
            id: PROJECT.to_string(),
            name: "Rua das Flores".to_string(),
        }],
        utility_poles: vec![UtilityPole {
            id: POLE.to_string(),
            code: 1001,
            description: "DT 11/300".to_string(),
            strong_side_section_multiplier: 2.0,
            low_voltage: VoltageSection {
                levels_count: 2,
                start_section_length_mm: 100.0,
                section_length_add_per_level_mm: 20.0,
            },
            medium_voltage: VoltageSection {
                levels_count: 3,
                start_section_length_mm: 150.0,
                section_length_add_per_level_mm: 30.0,
            },
        }],
        cables: vec![
            cable("c-low-16", 16.0, TensionLevel::Low),
            cable("c-low-10", 10.0, TensionLevel::Low),
            cable("c-med-35", 35.0, TensionLevel::Medium),
        ],
        materials: vec![material("m-tape", "M"), material("m-clamp", "UN")],
        pole_screws: [50.0, 100.0, 150.0]
            .iter()
            .map(|length| PoleScrew {
                id: format!("screw-{}", length),
                code: *length as u32,
                description: format!("SCREW {}MM", length),
                length_mm: *length,
            })
            .collect(),
        cable_connectors,
        groups: vec![
            group("g-screw", TensionLevel::Low),
            group("g-screw-long", TensionLevel::Low),
            group("g-conn-one", TensionLevel::Low),
            group("g-conn-two", TensionLevel::Low),
            group("g-tape-low", TensionLevel::Low),
            group("g-tape-medium", TensionLevel::Medium),
        ],
        group_items: vec![
            item(
                "i-1",
                "g-screw",
                GroupItemRole::PoleScrew(GroupPoleScrew {
                    quantity: 2,
                    length_add_mm: 0.0,
                }),
            ),
            item(
                "i-2",
                "g-screw-long",
                GroupItemRole::PoleScrew(GroupPoleScrew {
                    quantity: 1,
                    length_add_mm: 100.0,
                }),
            ),
            item(
                "i-3",
                "g-conn-one",
                GroupItemRole::CableConnector(GroupCableConnector {
                    quantity: 1,
                    local_cable_section_mm: None,
                    one_side_connector: true,
                }),
            ),
            item(
                "i-4",
                "g-conn-two",
                GroupItemRole::CableConnector(GroupCableConnector {
                    quantity: 2,
                    local_cable_section_mm: None,
                    one_side_connector: false,
                }),
            ),
            item(
                "i-5",
                "g-tape-low",
                GroupItemRole::Material(GroupMaterial {
                    material_id: "m-tape".to_string(),
                    quantity: 3,
                }),
            ),
            item(
                "i-6",
                "g-tape-medium",
                GroupItemRole::Material(GroupMaterial {
                    material_id: "m-tape".to_string(),
                    quantity: 3,
                }),
            ),
        ],
        ..Default::default()
    }
}

pub fn context(dataset: Dataset) -> (Arc<InMemoryStore>, Context) {
    let store = Arc::new(InMemoryStore::new(dataset));
    let ctx = Context::in_memory(store.clone(), Config::default());
    (store, ctx)
}

/// Bare request: existing project, no pole, no cables.
pub fn request(name: &str) -> CreatePointRequest {
    CreatePointRequest {
        project_id: PROJECT.to_string(),
        name: name.to_string(),
        description: None,
        utility_pole: None,
        cables: PointCablesRequest::default(),
        groups: Vec::new(),
        untied_materials: Vec::new(),
    }
}

pub fn with_pole(mut request: CreatePointRequest, is_new: bool) -> CreatePointRequest {
    request.utility_pole = Some(PointUtilityPoleRequest {
        utility_pole_id: POLE.to_string(),
        is_new,
    });
    request
}

pub fn cable_request(id: &str, is_new: bool) -> PointCableRequest {
    PointCableRequest {
        cable_id: id.to_string(),
        is_new,
    }
}

pub fn pair(entrance: PointCableRequest, exit: Option<PointCableRequest>) -> CablePairRequest {
    CablePairRequest { entrance, exit }
}

pub fn group_request(tension: TensionLevel, level: u32, group_id: &str) -> PointGroupRequest {
    PointGroupRequest {
        tension_level: tension,
        level,
        group_id: group_id.to_string(),
    }
}

fn cable(id: &str, section: f64, tension: TensionLevel) -> Cable {
    Cable {
        id: id.to_string(),
        code: 0,
        description: id.to_uppercase(),
        section_area_mm: section,
        tension,
    }
}

fn material(id: &str, unit: &str) -> Material {
    Material {
        id: id.to_string(),
        code: 0,
        description: id.to_uppercase(),
        unit: unit.to_string(),
    }
}

fn group(id: &str, tension: TensionLevel) -> Group {
    Group {
        id: id.to_string(),
        description: id.to_uppercase(),
        tension,
    }
}

fn item(id: &str, group_id: &str, role: GroupItemRole) -> GroupItem {
    GroupItem {
        id: id.to_string(),
        group_id: group_id.to_string(),
        role,
    }
}
