//! Data access layer.
//!
//! The engine talks to storage only through the traits defined here, held
//! as `Arc<dyn …>` in the [`Context`](crate::context::Context). Backends
//! live under [`backends`].

mod traits;

pub mod backends;

pub use traits::{CatalogStore, GroupStore, ProjectMaterialSink, ProjectStore};
