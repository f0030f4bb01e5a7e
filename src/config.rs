// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the training coach

pub mod fitness_config;

use crate::constants::env_config;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use fitness_config::{
    AnaerobicConfig, ChargeRecoveryThresholds, EngineConfig, LoadWindows, PlanConfig,
    PlanStrategy,
};

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "trail_coach.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub data: DataPaths,
}

/// Where the fetch layer leaves its output
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DataPaths {
    pub activities: PathBuf,
    pub goal: PathBuf,
    pub streams: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            activities: PathBuf::from("cache/activities.json"),
            goal: PathBuf::from("cache/goal.json"),
            streams: PathBuf::from("cache/streams.json"),
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// Lookup order: explicit path, `trail_coach.toml` in the working directory,
    /// `<config dir>/trail-coach/config.toml`, then built-in defaults. Environment
    /// overrides are applied last.
    pub fn load(path: Option<String>) -> Result<Self> {
        dotenv::dotenv().ok();

        let candidate = match path {
            Some(explicit) => Some(PathBuf::from(explicit)),
            None if Path::new(LOCAL_CONFIG_FILE).exists() => Some(PathBuf::from(LOCAL_CONFIG_FILE)),
            None => Some(Self::default_path()),
        };

        let mut config = match candidate {
            Some(config_path) if config_path.exists() => {
                let content =
                    fs::read_to_string(&config_path).context("Failed to read config file")?;
                toml::from_str(&content).context("Failed to parse config file")?
            }
            _ => Config::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Persist configuration as pretty TOML, creating parent directories
    pub fn save(&self, path: Option<String>) -> Result<()> {
        let config_path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);

        let parent = config_path.parent().context("Invalid config path")?;
        fs::create_dir_all(parent)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }

    fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("trail-coach/config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    fn apply_env_overrides(&mut self) {
        if let Some(max_hr) = env_config::max_heart_rate() {
            self.engine.max_heart_rate = max_hr;
        }
        if let Some(horizon) = env_config::horizon_days() {
            self.engine.horizon_days = horizon;
        }
        if let Some(ftp) = env_config::threshold_power() {
            self.engine.threshold_power = Some(ftp);
        }
    }
}
