//! Application context providing dependency injection root.

use std::sync::Arc;

use crate::config::Config;
use crate::di::Context as ContextDerive;
use crate::repositories::backends::InMemoryStore;
use crate::repositories::{CatalogStore, GroupStore, ProjectMaterialSink, ProjectStore};

/// Catalog adapter shared by services.
pub type AppCatalog = Arc<dyn CatalogStore>;
/// Group template adapter shared by services.
pub type AppGroups = Arc<dyn GroupStore>;
/// Project/point adapter shared by services.
pub type AppProjects = Arc<dyn ProjectStore>;
/// BOM record sink shared by services.
pub type AppMaterialSink = Arc<dyn ProjectMaterialSink>;

/// Root application context for dependency injection.
///
/// The Context holds all shared dependencies and uses `#[derive(Context)]`
/// to generate `FromRef` implementations for each field, enabling
/// compile-time dependency resolution.
#[derive(ContextDerive, Clone)]
pub struct Context {
    pub catalog: AppCatalog,
    pub groups: AppGroups,
    pub projects: AppProjects,
    pub sink: AppMaterialSink,
    /// Application configuration.
    pub config: Arc<Config>,
}

impl Context {
    /// Creates a new context with the given adapters.
    pub fn new(
        catalog: AppCatalog,
        groups: AppGroups,
        projects: AppProjects,
        sink: AppMaterialSink,
        config: Config,
    ) -> Self {
        Self {
            catalog,
            groups,
            projects,
            sink,
            config: Arc::new(config),
        }
    }

    /// Creates a context where one in-memory store backs every adapter.
    pub fn in_memory(store: Arc<InMemoryStore>, config: Config) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            config,
        )
    }

    /// Resolve a dependency from the context.
    pub fn resolve<T: crate::FromRef<Context>>(&self) -> T {
        T::from_ref(self)
    }
}
