//! Application error types with kind classification.

use thiserror::Error;

use crate::models::TensionLevel;

/// Caller-facing classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced id does not exist, or no catalog item fits a requirement.
    NotFound,
    /// The request collides with existing or sibling data.
    Conflict,
    /// The request is well-formed but cannot be satisfied as given.
    InvalidRequest,
    /// A defect or backend failure, not a user error.
    Internal,
}

/// Application-level errors for distbom.
#[derive(Error, Debug)]
pub enum AppError {
    // Lookup errors
    #[error("Project does not exist: {0}")]
    ProjectNotFound(String),

    #[error("Utility pole does not exist: {0}")]
    UtilityPoleNotFound(String),

    #[error("Utility poles not found: {}", .0.join(", "))]
    UtilityPolesNotFound(Vec<String>),

    #[error("Cables not found: {}", .0.join(", "))]
    CablesNotFound(Vec<String>),

    #[error("Materials not found: {}", .0.join(", "))]
    MaterialsNotFound(Vec<String>),

    #[error("Groups not found: {}", .0.join(", "))]
    GroupsNotFound(Vec<String>),

    // Catalog matching errors
    #[error("No suitable pole screw found for length {required_mm}mm")]
    NoSuitablePoleScrew { required_mm: f64 },

    #[error("No suitable cable connector found for config: Entrance {entrance_mm}mm, Exit {exit_mm}mm")]
    NoSuitableCableConnector { entrance_mm: f64, exit_mm: f64 },

    // Conflicts
    #[error("Point name '{name}' already registered in project {project_id}")]
    PointNameTaken { name: String, project_id: String },

    #[error("Duplicate point name '{0}' in the request")]
    DuplicatePointName(String),

    #[error("Duplicate {} tension group level {level} found", .tension.label())]
    DuplicateGroupLevel { tension: TensionLevel, level: u32 },

    #[error("{kind} code {code} already registered")]
    CodeAlreadyRegistered { kind: &'static str, code: u32 },

    // Invalid requests
    #[error("Utility pole does not support all {} voltage levels required by the groups", .0.label())]
    PoleCapacityExceeded(TensionLevel),

    #[error("A utility pole is required to attach groups to a point")]
    UtilityPoleRequired,

    #[error("No cables available for tension level {0} to calculate cable connectors")]
    MissingTensionCables(TensionLevel),

    #[error("Exit cable section is required to calculate cable connector for two-side connectors")]
    ExitCableSectionRequired,

    #[error("All points must belong to the same project")]
    MixedProjects,

    #[error("Validation error: {0}")]
    Validation(String),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl AppError {
    /// Classifies the error for the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ProjectNotFound(_)
            | AppError::UtilityPoleNotFound(_)
            | AppError::UtilityPolesNotFound(_)
            | AppError::CablesNotFound(_)
            | AppError::MaterialsNotFound(_)
            | AppError::GroupsNotFound(_)
            | AppError::NoSuitablePoleScrew { .. }
            | AppError::NoSuitableCableConnector { .. } => ErrorKind::NotFound,
            AppError::PointNameTaken { .. }
            | AppError::DuplicatePointName(_)
            | AppError::DuplicateGroupLevel { .. }
            | AppError::CodeAlreadyRegistered { .. } => ErrorKind::Conflict,
            AppError::PoleCapacityExceeded(_)
            | AppError::UtilityPoleRequired
            | AppError::MissingTensionCables(_)
            | AppError::ExitCableSectionRequired
            | AppError::MixedProjects
            | AppError::Validation(_) => ErrorKind::InvalidRequest,
            AppError::Internal(_)
            | AppError::Store(_)
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Config(_) => ErrorKind::Internal,
        }
    }

    /// Stable application code, e.g. `POLE_SCREW_NOT_FOUND`.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ProjectNotFound(_) => "PROJECT_NOT_FOUND",
            AppError::UtilityPoleNotFound(_) => "UTILITY_POLE_NOT_FOUND",
            AppError::UtilityPolesNotFound(_) => "UTILITY_POLES_NOT_FOUND",
            AppError::CablesNotFound(_) => "CABLES_NOT_FOUND",
            AppError::MaterialsNotFound(_) => "MATERIALS_NOT_FOUND",
            AppError::GroupsNotFound(_) => "GROUPS_NOT_FOUND",
            AppError::NoSuitablePoleScrew { .. } => "POLE_SCREW_NOT_FOUND",
            AppError::NoSuitableCableConnector { .. } => "CABLE_CONNECTOR_NOT_FOUND",
            AppError::PointNameTaken { .. } => "POINT_NAME_TAKEN",
            AppError::DuplicatePointName(_) => "DUPLICATE_POINT_NAME",
            AppError::DuplicateGroupLevel { .. } => "DUPLICATE_GROUP_LEVEL",
            AppError::CodeAlreadyRegistered { .. } => "CODE_ALREADY_REGISTERED",
            AppError::PoleCapacityExceeded(_) => "POLE_CAPACITY_EXCEEDED",
            AppError::UtilityPoleRequired => "UTILITY_POLE_REQUIRED",
            AppError::MissingTensionCables(_) => "MISSING_TENSION_CABLES",
            AppError::ExitCableSectionRequired => "EXIT_CABLE_SECTION_REQUIRED",
            AppError::MixedProjects => "MIXED_PROJECTS",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }
}
