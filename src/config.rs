//! Application configuration
//!
//! Paths and market constants live in one explicit struct that is handed to
//! the loader and the cache layer. Values come from a TOML file when present,
//! otherwise from defaults rooted at the platform data directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, ScreenerError};

pub const CONFIG_ENV: &str = "MARGINMINER_CONFIG";
pub const DATA_DIR_ENV: &str = "MARGINMINER_DATA_DIR";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// Defaults to `<data_dir>/csv/fii`
    pub csv_dir: Option<PathBuf>,
    /// Defaults to `<data_dir>/cache`
    pub cache_dir: Option<PathBuf>,
    /// Without the leading dot
    pub file_extension: String,
    pub history_years: u32,
    pub risk_free_rate: Decimal,
    pub trading_days: u32,
    pub benchmark: String,
    pub default_period: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            csv_dir: None,
            cache_dir: None,
            file_extension: "csv".to_string(),
            history_years: 10,
            risk_free_rate: Decimal::from_parts(13, 0, 0, false, 2),
            trading_days: 252,
            benchmark: "^IFIX".to_string(),
            default_period: "10y".to_string(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dir_spec::data_home()
        .map(|dir| dir.join("marginminer"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

impl AppConfig {
    /// Rooted at an explicit data directory, everything else default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    pub fn csv_dir(&self) -> PathBuf {
        self.csv_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("csv").join("fii"))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("cache"))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| ScreenerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Resolve configuration the way the binary does:
    /// explicit path, then `$MARGINMINER_CONFIG`, then the user config file,
    /// then defaults. A data dir override (flag or env) wins over the file.
    pub fn load(explicit: Option<&Path>, data_dir_override: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let config_path = explicit
            .map(Path::to_path_buf)
            .or(env_path)
            .or_else(|| user_config_path().filter(|p| p.exists()));

        let mut config = match config_path {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        let env_data_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        if let Some(dir) = data_dir_override.map(Path::to_path_buf).or(env_data_dir) {
            config.data_dir = dir;
        }

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.file_extension.trim().is_empty() {
            return Err(ScreenerError::Config("file_extension must not be empty".into()).into());
        }
        if self.trading_days == 0 {
            return Err(ScreenerError::Config("trading_days must be positive".into()).into());
        }
        Ok(())
    }
}

/// `<config_home>/marginminer/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join("marginminer").join(CONFIG_FILENAME))
}
