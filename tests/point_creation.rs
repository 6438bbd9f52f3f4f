//! Point creation through the in-memory backend.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{cable_request, context, dataset, group_request, pair, request, with_pole, PROJECT};
use distbom::config::Config;
use distbom::context::Context;
use distbom::error::{AppError, ErrorKind};
use distbom::models::{ItemType, ProjectMaterial, TensionLevel};
use distbom::repositories::backends::InMemoryStore;
use distbom::repositories::ProjectMaterialSink;
use distbom::services::{
    CreatePointRequest, PointIds, PointService, UntiedMaterialRequest,
};

/// Sink that rejects every batch.
struct RejectingSink;

#[async_trait]
impl ProjectMaterialSink for RejectingSink {
    async fn persist_project_materials(
        &self,
        _records: Vec<ProjectMaterial>,
    ) -> Result<(), AppError> {
        Err(AppError::Store("sink down".to_string()))
    }
}

/// Context backed by the fixture store, except for a sink that always fails.
fn rejecting_context() -> (Arc<InMemoryStore>, Context) {
    let store = Arc::new(InMemoryStore::new(dataset(false)));
    let ctx = Context::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(RejectingSink),
        Config::default(),
    );
    (store, ctx)
}

fn summary(records: &[ProjectMaterial]) -> Vec<(String, ItemType, u32, Option<String>)> {
    records
        .iter()
        .map(|r| {
            (
                r.item_id.clone(),
                r.item_type,
                r.quantity,
                r.group_specs.as_ref().map(|s| s.group_id.clone()),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_create_point_builds_full_bom() {
    let (store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    let mut req = with_pole(request("P-01"), true);
    req.cables.low_tension = Some(pair(
        cable_request("c-low-16", true),
        Some(cable_request("c-low-10", false)),
    ));
    req.groups = vec![
        group_request(TensionLevel::Low, 1, "g-tape-low"),
        group_request(TensionLevel::Low, 2, "g-screw"),
    ];
    req.untied_materials = vec![UntiedMaterialRequest {
        material_id: "m-clamp".to_string(),
        quantity: 2,
    }];

    let created = service.create_point(req).await.unwrap();

    // LOW level 2 is 120mm, rounded up to the 150mm screw
    assert_eq!(
        summary(&created.materials),
        vec![
            ("m-clamp".to_string(), ItemType::Material, 2, None),
            ("m-tape".to_string(), ItemType::Material, 3, Some("g-tape-low".to_string())),
            ("screw-150".to_string(), ItemType::PoleScrew, 2, Some("g-screw".to_string())),
            ("pole-1".to_string(), ItemType::UtilityPole, 1, None),
            ("c-low-16".to_string(), ItemType::Cable, 1, None),
        ]
    );
    assert!(created
        .materials
        .iter()
        .all(|r| r.point_id == created.point.id && r.project_id == PROJECT));

    let point = &created.point;
    assert_eq!(point.utility_pole_id.as_deref(), Some("pole-1"));
    assert_eq!(point.low_tension_entrance_cable_id.as_deref(), Some("c-low-16"));
    assert_eq!(point.low_tension_exit_cable_id.as_deref(), Some("c-low-10"));
    assert!(point.medium_tension_entrance_cable_id.is_none());

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.points, vec![created.point.clone()]);
    assert_eq!(snapshot.project_materials, created.materials);
    assert_eq!(store.persist_calls(), 1);
}

#[tokio::test]
async fn test_strong_side_section_is_scaled() {
    let (_store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    // MEDIUM level 1 is 150mm * 2 = 300mm, longer than any screw
    let mut req = with_pole(request("P-01"), false);
    req.groups = vec![group_request(TensionLevel::Medium, 1, "g-screw")];

    let err = service.create_point(req).await.unwrap_err();
    assert!(matches!(err, AppError::NoSuitablePoleScrew { required_mm } if required_mm == 300.0));
}

#[tokio::test]
async fn test_level_above_pole_capacity_is_rejected() {
    let (store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    let mut req = with_pole(request("P-01"), false);
    req.groups = vec![group_request(TensionLevel::Low, 3, "g-tape-low")];

    let err = service.create_point(req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert!(matches!(err, AppError::PoleCapacityExceeded(TensionLevel::Low)));

    let snapshot = store.snapshot().await;
    assert!(snapshot.points.is_empty());
    assert!(snapshot.project_materials.is_empty());
    assert_eq!(store.persist_calls(), 0);
}

#[tokio::test]
async fn test_screw_longer_than_catalog_is_not_found() {
    let (store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    // MEDIUM level 2 is (150mm + 30mm) * 2 = 360mm
    let mut req = with_pole(request("P-01"), true);
    req.groups = vec![group_request(TensionLevel::Medium, 2, "g-screw")];

    let err = service.create_point(req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        err.to_string(),
        "No suitable pole screw found for length 360mm"
    );
    assert!(store.snapshot().await.points.is_empty());
    assert_eq!(store.persist_calls(), 0);
}

#[tokio::test]
async fn test_screw_offset_does_not_change_match() {
    let (_store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    // LOW level 1 is exactly 100mm; the group's 100mm offset is not added
    let mut req = with_pole(request("P-01"), false);
    req.groups = vec![group_request(TensionLevel::Low, 1, "g-screw-long")];

    let created = service.create_point(req).await.unwrap();
    assert_eq!(
        summary(&created.materials),
        vec![(
            "screw-100".to_string(),
            ItemType::PoleScrew,
            1,
            Some("g-screw-long".to_string())
        )]
    );
}

#[tokio::test]
async fn test_one_side_connector_needs_single_side_catalog_entry() {
    let build = || {
        let mut req = with_pole(request("P-01"), false);
        req.cables.low_tension = Some(pair(cable_request("c-low-16", false), None));
        req.groups = vec![group_request(TensionLevel::Low, 1, "g-conn-one")];
        req
    };

    let (_store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();
    let err = service.create_point(build()).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::NoSuitableCableConnector { entrance_mm, exit_mm }
            if entrance_mm == 16.0 && exit_mm == 0.0
    ));

    let (_store, ctx) = context(dataset(true));
    let service: PointService = ctx.resolve();
    let created = service.create_point(build()).await.unwrap();
    assert_eq!(
        summary(&created.materials),
        vec![(
            "cc-one".to_string(),
            ItemType::CableConnector,
            1,
            Some("g-conn-one".to_string())
        )]
    );
}

#[tokio::test]
async fn test_two_side_connector_uses_exit_cable() {
    let (_store, ctx) = context(dataset(true));
    let service: PointService = ctx.resolve();

    let mut req = with_pole(request("P-01"), false);
    req.cables.low_tension = Some(pair(
        cable_request("c-low-16", false),
        Some(cable_request("c-low-10", false)),
    ));
    req.groups = vec![group_request(TensionLevel::Low, 1, "g-conn-two")];

    let created = service.create_point(req).await.unwrap();
    assert_eq!(created.materials.len(), 1);
    assert_eq!(created.materials[0].item_id, "cc-two");
    assert_eq!(created.materials[0].quantity, 2);
}

#[tokio::test]
async fn test_two_side_connector_without_exit_is_invalid() {
    let (_store, ctx) = context(dataset(true));
    let service: PointService = ctx.resolve();

    let mut req = with_pole(request("P-01"), false);
    req.cables.low_tension = Some(pair(cable_request("c-low-16", false), None));
    req.groups = vec![group_request(TensionLevel::Low, 1, "g-conn-two")];

    let err = service.create_point(req).await.unwrap_err();
    assert!(matches!(err, AppError::ExitCableSectionRequired));
}

#[tokio::test]
async fn test_connector_without_tension_cables_is_invalid() {
    let (_store, ctx) = context(dataset(true));
    let service: PointService = ctx.resolve();

    let mut req = with_pole(request("P-01"), false);
    req.cables.medium_tension = Some(pair(cable_request("c-med-35", false), None));
    req.groups = vec![group_request(TensionLevel::Low, 1, "g-conn-one")];

    let err = service.create_point(req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert!(matches!(err, AppError::MissingTensionCables(TensionLevel::Low)));
}

#[tokio::test]
async fn test_shared_group_material_is_not_merged() {
    let (_store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    let mut req = with_pole(request("P-01"), false);
    req.groups = vec![
        group_request(TensionLevel::Low, 1, "g-tape-low"),
        group_request(TensionLevel::Medium, 1, "g-tape-medium"),
    ];

    let created = service.create_point(req).await.unwrap();
    assert_eq!(created.materials.len(), 2);
    assert!(created
        .materials
        .iter()
        .all(|r| r.item_id == "m-tape" && r.quantity == 3));

    let tensions: Vec<TensionLevel> = created
        .materials
        .iter()
        .filter_map(|r| r.group_specs.as_ref().map(|s| s.tension_level))
        .collect();
    assert_eq!(tensions, vec![TensionLevel::Low, TensionLevel::Medium]);
}

#[tokio::test]
async fn test_same_inputs_give_same_records() {
    let (_store, ctx) = context(dataset(true));
    let service: PointService = ctx.resolve();

    let build = |name: &str| {
        let mut req = with_pole(request(name), true);
        req.cables.low_tension = Some(pair(
            cable_request("c-low-16", true),
            Some(cable_request("c-low-10", true)),
        ));
        req.groups = vec![
            group_request(TensionLevel::Low, 2, "g-screw"),
            group_request(TensionLevel::Low, 1, "g-conn-two"),
            group_request(TensionLevel::Medium, 3, "g-tape-medium"),
        ];
        req
    };

    let first = service.create_point(build("P-01")).await.unwrap();
    let second = service.create_point(build("P-02")).await.unwrap();

    assert_ne!(first.point.id, second.point.id);
    assert_eq!(summary(&first.materials), summary(&second.materials));
}

#[tokio::test]
async fn test_missing_cables_are_all_reported() {
    let (store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    let mut req = request("P-01");
    req.cables.low_tension = Some(pair(
        cable_request("c-x", false),
        Some(cable_request("c-low-10", false)),
    ));
    req.cables.medium_tension = Some(pair(
        cable_request("c-y", false),
        Some(cable_request("c-x", false)),
    ));

    let err = service.create_point(req).await.unwrap_err();
    match err {
        AppError::CablesNotFound(ids) => assert_eq!(ids, vec!["c-x", "c-y"]),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(store.persist_calls(), 0);
}

#[tokio::test]
async fn test_missing_materials_are_all_reported() {
    let (_store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    let mut req = request("P-01");
    req.untied_materials = ["m-x", "m-tape", "m-y"]
        .iter()
        .map(|id| UntiedMaterialRequest {
            material_id: id.to_string(),
            quantity: 1,
        })
        .collect();

    let err = service.create_point(req).await.unwrap_err();
    assert_eq!(err.to_string(), "Materials not found: m-x, m-y");
}

#[tokio::test]
async fn test_missing_groups_are_all_reported() {
    let (_store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    let mut req = with_pole(request("P-01"), false);
    req.groups = vec![
        group_request(TensionLevel::Low, 1, "g-x"),
        group_request(TensionLevel::Medium, 1, "g-tape-medium"),
        group_request(TensionLevel::Medium, 2, "g-y"),
    ];

    let err = service.create_point(req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Groups not found: g-x, g-y");
}

#[tokio::test]
async fn test_duplicate_group_level_is_conflict() {
    let (_store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    let mut req = with_pole(request("P-01"), false);
    req.groups = vec![
        group_request(TensionLevel::Medium, 2, "g-tape-medium"),
        group_request(TensionLevel::Medium, 2, "g-screw"),
    ];

    let err = service.create_point(req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.to_string(), "Duplicate medium tension group level 2 found");
}

#[tokio::test]
async fn test_groups_without_pole_are_invalid() {
    let (_store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    let mut req = request("P-01");
    req.groups = vec![group_request(TensionLevel::Low, 1, "g-tape-low")];

    let err = service.create_point(req).await.unwrap_err();
    assert!(matches!(err, AppError::UtilityPoleRequired));
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
}

#[tokio::test]
async fn test_unknown_project_and_pole() {
    let (_store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    let mut req = request("P-01");
    req.project_id = "project-x".to_string();
    let err = service.create_point(req).await.unwrap_err();
    assert!(matches!(err, AppError::ProjectNotFound(ref id) if id == "project-x"));

    let mut req = with_pole(request("P-01"), false);
    if let Some(pole) = req.utility_pole.as_mut() {
        pole.utility_pole_id = "pole-x".to_string();
    }
    let err = service.create_point(req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "Utility poles not found: pole-x");
}

#[tokio::test]
async fn test_rejected_records_leave_no_point() {
    let (store, ctx) = rejecting_context();
    let service: PointService = ctx.resolve();

    let err = service
        .create_point(with_pole(request("P-01"), true))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Store error: sink down");
    assert_eq!(err.kind(), ErrorKind::Internal);

    let snapshot = store.snapshot().await;
    assert!(snapshot.points.is_empty());
    assert!(snapshot.project_materials.is_empty());

    // The name is free again once the failed attempt is rolled back
    let (_store, ctx) = context(store.snapshot().await);
    let created = ctx
        .resolve::<PointService>()
        .create_point(request("P-01"))
        .await
        .unwrap();
    assert_eq!(created.point.name, "P-01");
}

#[tokio::test]
async fn test_point_name_taken_in_project() {
    let (store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    service.create_point(request("P-01")).await.unwrap();
    let err = service.create_point(request("P-01")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(store.snapshot().await.points.len(), 1);
    assert_eq!(store.persist_calls(), 1);
}

#[tokio::test]
async fn test_plain_ids_create_point_without_records() {
    let (store, ctx) = context(dataset(false));
    let service: PointService = ctx.resolve();

    let ids = PointIds {
        project_id: PROJECT.to_string(),
        name: "P-01".to_string(),
        utility_pole_id: Some("pole-1".to_string()),
        medium_tension_entrance_cable_id: Some("c-med-35".to_string()),
        ..Default::default()
    };
    let created = service
        .create_point(CreatePointRequest::try_from(ids).unwrap())
        .await
        .unwrap();

    assert!(created.materials.is_empty());
    assert_eq!(created.point.utility_pole_id.as_deref(), Some("pole-1"));
    assert_eq!(
        created.point.medium_tension_entrance_cable_id.as_deref(),
        Some("c-med-35")
    );
    assert_eq!(store.persist_calls(), 1);
}

mod batch {
    use super::*;

    #[tokio::test]
    async fn test_create_many_points_persists_once() {
        let (store, ctx) = context(dataset(false));
        let service: PointService = ctx.resolve();

        let mut first = with_pole(request("P-01"), true);
        first.groups = vec![group_request(TensionLevel::Low, 1, "g-tape-low")];
        let second = with_pole(request("P-02"), true);

        let created = service
            .create_many_points(vec![first, second])
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(created[0].materials.len(), 2);
        assert_eq!(created[1].materials.len(), 1);

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.points.len(), 2);
        assert_eq!(snapshot.project_materials.len(), 3);
        assert_eq!(store.persist_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch_persists_nothing() {
        let (store, ctx) = context(dataset(false));
        let service: PointService = ctx.resolve();

        let created = service.create_many_points(Vec::new()).await.unwrap();
        assert!(created.is_empty());
        assert_eq!(store.persist_calls(), 0);
    }

    #[tokio::test]
    async fn test_mixed_projects_are_invalid() {
        let (_store, ctx) = context(dataset(false));
        let service: PointService = ctx.resolve();

        let mut other = request("P-02");
        other.project_id = "project-2".to_string();
        let err = service
            .create_many_points(vec![request("P-01"), other])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MixedProjects));
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[tokio::test]
    async fn test_duplicate_names_in_batch_conflict() {
        let (_store, ctx) = context(dataset(false));
        let service: PointService = ctx.resolve();

        let err = service
            .create_many_points(vec![request("P-01"), request("P-02"), request("P-01")])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicatePointName(ref name) if name == "P-01"));
    }

    #[tokio::test]
    async fn test_existing_name_conflicts() {
        let (_store, ctx) = context(dataset(false));
        let service: PointService = ctx.resolve();

        service.create_point(request("P-02")).await.unwrap();
        let err = service
            .create_many_points(vec![request("P-01"), request("P-02")])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PointNameTaken { ref name, .. } if name == "P-02"));
    }

    #[tokio::test]
    async fn test_missing_cables_reported_across_points() {
        let (store, ctx) = context(dataset(false));
        let service: PointService = ctx.resolve();

        let mut first = request("P-01");
        first.cables.low_tension = Some(pair(cable_request("c-x", false), None));
        let mut second = request("P-02");
        second.cables.low_tension = Some(pair(
            cable_request("c-low-16", false),
            Some(cable_request("c-y", false)),
        ));
        let mut third = request("P-03");
        third.cables.medium_tension = Some(pair(cable_request("c-x", false), None));

        let err = service
            .create_many_points(vec![first, second, third])
            .await
            .unwrap_err();
        match err {
            AppError::CablesNotFound(ids) => assert_eq!(ids, vec!["c-x", "c-y"]),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(store.snapshot().await.points.is_empty());
        assert_eq!(store.persist_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_poles_and_materials_reported_across_points() {
        let (_store, ctx) = context(dataset(false));
        let service: PointService = ctx.resolve();

        let mut first = with_pole(request("P-01"), false);
        if let Some(pole) = first.utility_pole.as_mut() {
            pole.utility_pole_id = "pole-x".to_string();
        }
        let mut second = with_pole(request("P-02"), false);
        if let Some(pole) = second.utility_pole.as_mut() {
            pole.utility_pole_id = "pole-y".to_string();
        }
        let err = service
            .create_many_points(vec![first, with_pole(request("P-03"), false), second])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Utility poles not found: pole-x, pole-y");

        let loose = |name: &str, material_id: &str| {
            let mut req = request(name);
            req.untied_materials = vec![UntiedMaterialRequest {
                material_id: material_id.to_string(),
                quantity: 1,
            }];
            req
        };
        let err = service
            .create_many_points(vec![loose("P-01", "m-x"), loose("P-02", "m-y")])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Materials not found: m-x, m-y");
    }

    #[tokio::test]
    async fn test_rejected_records_leave_no_points() {
        let (store, ctx) = rejecting_context();
        let service: PointService = ctx.resolve();

        let err = service
            .create_many_points(vec![with_pole(request("P-01"), true), request("P-02")])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
        assert!(store.snapshot().await.points.is_empty());
    }

    #[tokio::test]
    async fn test_failing_point_aborts_batch() {
        let (store, ctx) = context(dataset(false));
        let service: PointService = ctx.resolve();

        let mut failing = with_pole(request("P-02"), false);
        failing.groups = vec![group_request(TensionLevel::Medium, 1, "g-screw")];

        let err = service
            .create_many_points(vec![with_pole(request("P-01"), true), failing])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let snapshot = store.snapshot().await;
        assert!(snapshot.points.is_empty());
        assert!(snapshot.project_materials.is_empty());
        assert_eq!(store.persist_calls(), 0);
    }
}
