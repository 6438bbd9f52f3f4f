//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/distbom/config.toml` (XDG) or platform config dir
//! 2. Project config: `.distbom.toml`
//! 3. Environment variables: `DISTBOM_*`, nested keys separated by `__`
//!
//! # Example
//!
//! ```toml
//! [engine]
//! strong_side = "MEDIUM"
//!
//! [dataset]
//! path = "/srv/budgets/dataset.json"
//! ```
//!
//! Every key is optional; an empty configuration uses the defaults below.

use std::ops::Deref;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::models::TensionLevel;

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
}

/// BOM engine settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Tension side mounted on the strong face of every pole.
    ///
    /// Sections on this side are scaled by the pole's
    /// `strong_side_section_multiplier`.
    #[serde(default = "default_strong_side")]
    pub strong_side: TensionLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strong_side: default_strong_side(),
        }
    }
}

fn default_strong_side() -> TensionLevel {
    TensionLevel::Medium
}

/// Location of the JSON dataset used by the in-memory store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load config with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        let user_config = Self::user_config_path();

        Self::extract(
            Figment::new()
                // Layer 1: User config (lowest priority)
                .merge(Toml::file(user_config))
                // Layer 2: Project config
                .merge(Toml::file(".distbom.toml"))
                // Layer 3: Environment variables (highest priority)
                .merge(Env::prefixed("DISTBOM_").split("__")),
        )
    }

    /// Extract a config from an already assembled figment.
    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(ConfigError::from)
    }

    /// User config path: ~/.config/distbom/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("distbom").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("distbom").join("config.toml"))
            .unwrap_or_default()
    }
}
