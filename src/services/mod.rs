//! Business logic services for point budgeting.
//!
//! Pure engine pieces ([`section`], [`matcher`], [`bom`]) take resolved
//! values; services resolve them through the store adapters and use the
//! `FromContext` derive macro for dependency injection.

pub mod bom;
pub mod catalog;
pub mod groups;
mod lookup;
pub mod matcher;
pub mod point;
pub mod section;

pub use bom::{
    BomAggregator, BomInput, ResolvedCablePair, ResolvedPointCable, ResolvedPointCables,
    ResolvedUtilityPole, UntiedMaterial,
};
pub use catalog::{
    BulkCreateResult, CatalogService, EditedUtilityPole, FailedCreate, NewPoleScrew,
    NewUtilityPole, UtilityPoleEdit,
};
pub use groups::{
    validate_group_levels, GroupPlacement, GroupResolutionService, PointGroupRequest,
    ResolvedPointGroup,
};
pub use matcher::{find_suitable_cable_connector, find_suitable_pole_screw};
pub use point::{
    CablePairRequest, CreatePointRequest, CreatedPoint, PointCableRequest, PointCablesRequest,
    PointIds, PointService, PointUtilityPoleRequest, UntiedMaterialRequest,
};
pub use section::SectionLengthModel;
