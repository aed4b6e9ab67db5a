//! User configuration.
//!
//! Loaded from `surveyor/config.json` in the user's config directory. Environment
//! variables override the file:
//! - `SURVEYOR_DB` - Path of the SQLite database
//! - `SURVEYOR_EXPORT_DIR` - Directory export files are written to

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "surveyor";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database location. Defaults to the platform data directory.
    pub database_path: Option<PathBuf>,
    /// Where CSV and PDF exports are written.
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load the config file and apply environment overrides.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let config = match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    fn try_load() -> Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = var("SURVEYOR_DB").filter(|s| !s.is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = var("SURVEYOR_EXPORT_DIR").filter(|s| !s.is_empty()) {
            self.export_dir = PathBuf::from(dir);
        }
        self
    }

    /// Database location, resolving the platform default when none is configured.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => crate::db::default_path(),
        }
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
