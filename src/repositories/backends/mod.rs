//! Store backend implementations.

pub mod memory;

pub use memory::{Dataset, InMemoryStore};
