//! distbom - Bill of materials engine for electrical distribution points
//!
//! Computes the materials a distribution project point needs from its
//! utility pole, cables, hardware groups and loose materials.

pub mod cli;
pub mod config;
pub mod context;
pub mod di;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export FromRef at crate root for di-macros generated code
pub use di::FromRef;
