//! Catalog matching: pick the catalog item that fits a numeric requirement.
//!
//! Both searches are pure and only read the candidate slices they are
//! given; determinism follows from the store's ordering.

use crate::models::{CableConnector, PoleScrew};

/// Shortest screw whose length is at least `required_mm`.
///
/// `screws` must be sorted ascending by length. Among screws of equal
/// length the first in slice order wins.
pub fn find_suitable_pole_screw(required_mm: f64, screws: &[PoleScrew]) -> Option<&PoleScrew> {
    let index = screws.partition_point(|screw| screw.length_mm < required_mm);
    screws.get(index)
}

/// First connector whose entrance and exit ranges contain the sections.
pub fn find_suitable_cable_connector(
    entrance_mm: f64,
    exit_mm: f64,
    connectors: &[CableConnector],
) -> Option<&CableConnector> {
    connectors
        .iter()
        .find(|connector| connector.accepts(entrance_mm, exit_mm))
}
