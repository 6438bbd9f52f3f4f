//! Dependency injection infrastructure.
//!
//! Services never construct their own adapters. The [`Context`](crate::context::Context)
//! owns one `Arc` per store seam and each service declares the pieces it needs
//! as fields:
//!
//! ```ignore
//! use crate::di::{FromContext, FromRef};
//!
//! #[derive(FromContext, Clone)]
//! pub struct GroupResolutionService {
//!     groups: AppGroups,   // resolved via AppGroups::from_ref(ctx)
//! }
//!
//! let resolver = GroupResolutionService::from_ref(&ctx);
//! ```
//!
//! - `FromRef<T>`: extract a value from a reference to `T`
//! - `#[derive(Context)]`: makes each field of the root struct extractable
//! - `#[derive(FromContext)]`: builds a struct by extracting every field

/// Trait for extracting a value from a reference to another type.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}

pub use di_macros::{Context, FromContext};
