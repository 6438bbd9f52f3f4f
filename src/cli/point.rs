//! Point command handler.

use std::path::Path;
use std::sync::Arc;

use color_eyre::Result;
use serde::Deserialize;

use crate::config::Config;
use crate::context::Context;
use crate::repositories::backends::InMemoryStore;
use crate::services::{CreatePointRequest, PointService};

use super::{dataset_path, App};

/// A request file holds one point or a batch of points.
#[derive(Deserialize)]
#[serde(untagged)]
enum PointRequestFile {
    One(Box<CreatePointRequest>),
    Many(Vec<CreatePointRequest>),
}

impl App {
    /// Create the requested points and print them with their BOM as JSON.
    pub async fn run_point(
        &self,
        config: Config,
        request: &Path,
        dataset: Option<&Path>,
        save: bool,
    ) -> Result<()> {
        let dataset = dataset_path(dataset, &config)?;
        let content = tokio::fs::read_to_string(request).await?;
        let request: PointRequestFile = serde_json::from_str(&content)?;

        tracing::info!(dataset = %dataset.display(), "Loading dataset");
        let store = Arc::new(InMemoryStore::load(&dataset).await?);
        let ctx = Context::in_memory(store.clone(), config);
        let service: PointService = ctx.resolve();

        let output = match request {
            PointRequestFile::One(request) => {
                serde_json::to_string_pretty(&service.create_point(*request).await?)?
            }
            PointRequestFile::Many(requests) => {
                serde_json::to_string_pretty(&service.create_many_points(requests).await?)?
            }
        };
        println!("{}", output);

        if save {
            store.save(&dataset).await?;
            tracing::info!(dataset = %dataset.display(), "Dataset saved");
        }

        Ok(())
    }
}
