//! CLI module for distbom.
//!
//! Subcommands:
//! - `point`: Create one or more points from a JSON request and print their BOM
//! - `section`: Print the section length of a pole level

mod point;
mod section;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::models::TensionLevel;

/// distbom - Bill of materials for distribution project points
#[derive(Parser)]
#[command(name = "distbom")]
#[command(about = "Bill of materials engine for electrical distribution project points")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the point(s) described by a JSON request and print the BOM
    Point {
        /// JSON file with one point request or an array of them
        request: PathBuf,

        /// Dataset file (defaults to `dataset.path` from configuration)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Write the updated dataset back to its file
        #[arg(long)]
        save: bool,
    },

    /// Print the section length of a pole level in millimeters
    Section {
        /// Utility pole id
        #[arg(long)]
        pole: String,

        /// Tension side (LOW or MEDIUM)
        #[arg(long)]
        tension: TensionLevel,

        /// 1-based level
        #[arg(long)]
        level: u32,

        /// Dataset file (defaults to `dataset.path` from configuration)
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        let config = Config::load()?;
        match self.command {
            Command::Point {
                ref request,
                ref dataset,
                save,
            } => self.run_point(config, request, dataset.as_deref(), save).await,
            Command::Section {
                ref pole,
                tension,
                level,
                ref dataset,
            } => {
                self.run_section(config, pole, tension, level, dataset.as_deref())
                    .await
            }
        }
    }
}

/// Dataset path from the flag, falling back to configuration.
fn dataset_path(arg: Option<&Path>, config: &Config) -> color_eyre::Result<PathBuf> {
    arg.map(PathBuf::from)
        .or_else(|| config.dataset.path.clone())
        .ok_or_else(|| {
            color_eyre::eyre::eyre!("No dataset given: pass --dataset or set dataset.path")
        })
}
