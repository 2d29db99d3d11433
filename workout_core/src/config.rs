//! Configuration file support for wkplan.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wkplan/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub upload: UploadConfig,
}

/// Where plan files live by default
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_plans_dir")]
    pub plans_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            plans_dir: default_plans_dir(),
        }
    }
}

/// Workout service connection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub base_url: Option<String>,

    /// Name of the environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token_env: default_token_env(),
        }
    }
}

/// Upload defaults
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UploadConfig {
    #[serde(default)]
    pub replace_existing: bool,
}

// Default value functions
fn default_plans_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("wkplan")
}

fn default_token_env() -> String {
    "WKPLAN_TOKEN".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("wkplan").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Bearer token for the backend, read from the configured variable
    pub fn backend_token(&self) -> Result<String> {
        std::env::var(&self.backend.token_env).map_err(|_| {
            Error::Config(format!(
                "environment variable {} is not set",
                self.backend.token_env
            ))
        })
    }

    /// Base URL of the backend, required for any remote operation
    pub fn backend_url(&self) -> Result<&str> {
        self.backend
            .base_url
            .as_deref()
            .ok_or_else(|| Error::Config("backend.base_url is not configured".into()))
    }
}
