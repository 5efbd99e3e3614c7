//! Configuration management for aerodesk.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "aerodesk";

/// Default catalog database file name.
const CATALOG_FILE_NAME: &str = "catalog.sqlite";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `AERODESK_`)
/// 2. TOML config file at `~/.config/aerodesk/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Constraint-analysis defaults.
    pub analysis: AnalysisConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory holding project folders.
    /// Defaults to `~/.local/share/aerodesk/projects`.
    pub projects_dir: Option<PathBuf>,
    /// Path to the shared aircraft catalog database.
    /// Defaults to `~/.local/share/aerodesk/catalog.sqlite`.
    pub catalog_path: Option<PathBuf>,
    /// Directory for exported files.
    /// Defaults to `~/.local/share/aerodesk/export`.
    pub export_dir: Option<PathBuf>,
}

/// Default sweep bounds for constraint analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Lowest wing loading evaluated, N/m^2.
    pub ws_min: f64,
    /// Highest wing loading evaluated, N/m^2.
    pub ws_max: f64,
    /// Wing-loading step, N/m^2.
    pub ws_step: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ws_min: 50.0,
            ws_max: 1_200.0,
            ws_step: 5.0,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("AERODESK_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.ws_min <= 0.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "analysis.ws_min ({}) must be greater than 0",
                    self.analysis.ws_min
                ),
            });
        }

        if self.analysis.ws_min >= self.analysis.ws_max {
            return Err(Error::ConfigValidation {
                message: format!(
                    "analysis.ws_min ({}) must be less than analysis.ws_max ({})",
                    self.analysis.ws_min, self.analysis.ws_max
                ),
            });
        }

        if self.analysis.ws_step <= 0.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "analysis.ws_step ({}) must be greater than 0",
                    self.analysis.ws_step
                ),
            });
        }

        Ok(())
    }

    /// Get the projects root directory, resolving defaults if not set.
    #[must_use]
    pub fn projects_dir(&self) -> PathBuf {
        self.storage
            .projects_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("projects"))
    }

    /// Get the catalog database path, resolving defaults if not set.
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.storage
            .catalog_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(CATALOG_FILE_NAME))
    }

    /// Get the export directory, resolving defaults if not set.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.storage
            .export_dir
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("export"))
    }
}
