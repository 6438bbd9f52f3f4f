//! Section command handler.

use std::path::Path;

use color_eyre::Result;

use crate::config::Config;
use crate::models::TensionLevel;
use crate::repositories::backends::InMemoryStore;
use crate::repositories::CatalogStore;
use crate::services::SectionLengthModel;

use super::{dataset_path, App};

impl App {
    /// Print the section length of one pole level.
    pub async fn run_section(
        &self,
        config: Config,
        pole_id: &str,
        tension: TensionLevel,
        level: u32,
        dataset: Option<&Path>,
    ) -> Result<()> {
        let dataset = dataset_path(dataset, &config)?;
        let store = InMemoryStore::load(&dataset).await?;

        let pole = store
            .find_utility_pole_by_id(pole_id)
            .await?
            .ok_or_else(|| color_eyre::eyre::eyre!("Utility pole does not exist: {}", pole_id))?;
        if !pole.supports_level(tension, level) {
            return Err(color_eyre::eyre::eyre!(
                "Utility pole {} has {} {} levels, level {} requested",
                pole.id,
                pole.levels_count(tension),
                tension.label(),
                level
            ));
        }

        let model = SectionLengthModel::from_config(&config.engine);
        let length = model.section_length_mm(&pole, tension, level);
        tracing::debug!(
            pole = %pole.id,
            %tension,
            level,
            strong_side = %model.strong_side(),
            "Computed section length"
        );
        println!("{}", length);

        Ok(())
    }
}
