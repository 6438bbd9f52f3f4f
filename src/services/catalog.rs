//! Catalog maintenance: utility poles and pole screws.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::context::{AppCatalog, Context};
use crate::di::FromContext;
use crate::error::AppError;
use crate::models::{generate_ulid, PoleScrew, UtilityPole, VoltageSection};

// ============================================================================
// Input Types
// ============================================================================

/// Parameters for registering a utility pole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUtilityPole {
    pub code: u32,
    pub description: String,
    pub strong_side_section_multiplier: f64,
    pub low_voltage: VoltageSection,
    pub medium_voltage: VoltageSection,
}

/// Partial update of a utility pole. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityPoleEdit {
    pub utility_pole_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub strong_side_section_multiplier: Option<f64>,
    #[serde(default)]
    pub low_voltage_levels_count: Option<u32>,
    #[serde(default)]
    pub low_voltage_start_section_length_mm: Option<f64>,
    #[serde(default)]
    pub low_voltage_section_length_add_per_level_mm: Option<f64>,
    #[serde(default)]
    pub medium_voltage_levels_count: Option<u32>,
    #[serde(default)]
    pub medium_voltage_start_section_length_mm: Option<f64>,
    #[serde(default)]
    pub medium_voltage_section_length_add_per_level_mm: Option<f64>,
}

impl UtilityPoleEdit {
    fn lengths(&self) -> [Option<f64>; 5] {
        [
            self.strong_side_section_multiplier,
            self.low_voltage_start_section_length_mm,
            self.low_voltage_section_length_add_per_level_mm,
            self.medium_voltage_start_section_length_mm,
            self.medium_voltage_section_length_add_per_level_mm,
        ]
    }

    fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.low_voltage_levels_count.is_none()
            && self.medium_voltage_levels_count.is_none()
            && self.lengths().iter().all(Option::is_none)
    }

    fn has_negative_values(&self) -> bool {
        self.lengths().iter().flatten().any(|value| *value < 0.0)
    }
}

/// One pole screw of a bulk registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPoleScrew {
    pub code: u32,
    pub description: String,
    pub length_mm: f64,
}

// ============================================================================
// Result Types
// ============================================================================

/// Outcome of an edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditedUtilityPole {
    pub utility_pole: UtilityPole,
    /// Whether anything differed and the pole was saved.
    pub changed: bool,
}

/// An item rejected from a bulk registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedCreate {
    /// Position in the input batch.
    pub index: usize,
    pub code: u32,
    pub reason: String,
}

/// Result of a bulk registration.
///
/// Rejected items do not stop the batch; the accepted ones are written
/// together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateResult {
    pub created: Vec<PoleScrew>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedCreate>,
}

impl BulkCreateResult {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

// ============================================================================
// Service
// ============================================================================

/// Maintains catalog entries under their invariants.
#[derive(FromContext, Clone)]
pub struct CatalogService {
    catalog: AppCatalog,
}

impl CatalogService {
    pub async fn create_utility_pole(&self, new: NewUtilityPole) -> Result<UtilityPole, AppError> {
        let pole = UtilityPole {
            id: generate_ulid(),
            code: new.code,
            description: new.description.to_uppercase(),
            strong_side_section_multiplier: new.strong_side_section_multiplier,
            low_voltage: new.low_voltage,
            medium_voltage: new.medium_voltage,
        };
        if pole.has_negative_dimensions() {
            return Err(AppError::Validation(
                "Utility pole lengths and multiplier must not be negative".to_string(),
            ));
        }

        if self
            .catalog
            .find_utility_pole_by_code(pole.code)
            .await?
            .is_some()
        {
            return Err(AppError::CodeAlreadyRegistered {
                kind: "Utility pole",
                code: pole.code,
            });
        }

        self.catalog.save_utility_pole(pole.clone()).await?;
        tracing::info!(id = %pole.id, code = pole.code, "Utility pole created");
        Ok(pole)
    }

    pub async fn edit_utility_pole(
        &self,
        edit: UtilityPoleEdit,
    ) -> Result<EditedUtilityPole, AppError> {
        if edit.is_empty() {
            return Err(AppError::Validation("No entries provided".to_string()));
        }
        if edit.has_negative_values() {
            return Err(AppError::Validation(
                "Utility pole lengths and multiplier must not be negative".to_string(),
            ));
        }

        let current = self
            .catalog
            .find_utility_pole_by_id(&edit.utility_pole_id)
            .await?
            .ok_or_else(|| AppError::UtilityPoleNotFound(edit.utility_pole_id.clone()))?;

        let edited = apply_edit(&current, &edit);
        let changed = edited != current;
        if changed {
            self.catalog.save_utility_pole(edited.clone()).await?;
            tracing::info!(id = %edited.id, "Utility pole edited");
        } else {
            tracing::debug!(id = %edited.id, "Utility pole edit changed nothing");
        }

        Ok(EditedUtilityPole {
            utility_pole: edited,
            changed,
        })
    }

    pub async fn create_pole_screws(
        &self,
        batch: Vec<NewPoleScrew>,
    ) -> Result<BulkCreateResult, AppError> {
        if batch.is_empty() {
            return Ok(BulkCreateResult::default());
        }

        let mut codes: HashSet<u32> = self
            .catalog
            .list_pole_screw_codes()
            .await?
            .into_iter()
            .collect();
        let mut result = BulkCreateResult::default();

        for (index, item) in batch.into_iter().enumerate() {
            let reason = if item.length_mm <= 0.0 {
                Some("Pole screw length must be greater than zero".to_string())
            } else if codes.contains(&item.code) {
                Some(
                    AppError::CodeAlreadyRegistered {
                        kind: "Pole screw",
                        code: item.code,
                    }
                    .to_string(),
                )
            } else {
                None
            };

            if let Some(reason) = reason {
                tracing::warn!(index, code = item.code, reason = %reason, "Pole screw rejected");
                result.failed.push(FailedCreate {
                    index,
                    code: item.code,
                    reason,
                });
                continue;
            }

            codes.insert(item.code);
            result.created.push(PoleScrew {
                id: generate_ulid(),
                code: item.code,
                description: item.description.to_uppercase(),
                length_mm: item.length_mm,
            });
        }

        if !result.created.is_empty() {
            self.catalog
                .create_pole_screws(result.created.clone())
                .await?;
        }
        tracing::info!(
            created = result.created.len(),
            failed = result.failed.len(),
            "Pole screws registered"
        );
        Ok(result)
    }
}

fn apply_edit(current: &UtilityPole, edit: &UtilityPoleEdit) -> UtilityPole {
    let section = |section: &VoltageSection,
                   levels_count: Option<u32>,
                   start: Option<f64>,
                   add_per_level: Option<f64>| VoltageSection {
        levels_count: levels_count.unwrap_or(section.levels_count),
        start_section_length_mm: start.unwrap_or(section.start_section_length_mm),
        section_length_add_per_level_mm: add_per_level
            .unwrap_or(section.section_length_add_per_level_mm),
    };

    UtilityPole {
        id: current.id.clone(),
        code: current.code,
        description: edit
            .description
            .as_ref()
            .map(|d| d.to_uppercase())
            .unwrap_or_else(|| current.description.clone()),
        strong_side_section_multiplier: edit
            .strong_side_section_multiplier
            .unwrap_or(current.strong_side_section_multiplier),
        low_voltage: section(
            &current.low_voltage,
            edit.low_voltage_levels_count,
            edit.low_voltage_start_section_length_mm,
            edit.low_voltage_section_length_add_per_level_mm,
        ),
        medium_voltage: section(
            &current.medium_voltage,
            edit.medium_voltage_levels_count,
            edit.medium_voltage_start_section_length_mm,
            edit.medium_voltage_section_length_add_per_level_mm,
        ),
    }
}
