//! Configuration management for Matricula
//!
//! Handles loading and saving `config.toml` from the user's config
//! directory. Environment variables override individual settings:
//! `MATRICULA_CONFIG_DIR` relocates the config directory and
//! `MATRICULA_VIACEP_URL` replaces the lookup service base URL.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cep::VIACEP_BASE_URL;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub lookup: LookupConfig,
    pub database: DatabaseSettings,
}

/// Settings for the CEP lookup service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Base URL of the ViaCEP-compatible endpoint
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Settings for the SQLite database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Optional override for the database file location
    pub path: Option<PathBuf>,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lookup: LookupConfig {
                base_url: VIACEP_BASE_URL.to_string(),
                timeout_secs: 10,
            },
            database: DatabaseSettings {
                path: None,
                max_connections: 5,
            },
        }
    }
}

impl LookupConfig {
    /// Base URL with the `MATRICULA_VIACEP_URL` environment override applied
    pub fn resolved_base_url(&self) -> String {
        std::env::var("MATRICULA_VIACEP_URL").unwrap_or_else(|_| self.base_url.clone())
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("MATRICULA_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("matricula");
        Ok(config_dir)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from disk, or return defaults if no file exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.validate()?;

        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.lookup.base_url.trim().is_empty() {
            anyhow::bail!("lookup.base_url must not be empty");
        }

        if self.lookup.timeout_secs == 0 {
            anyhow::bail!("lookup.timeout_secs must be greater than zero");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be greater than zero");
        }

        Ok(())
    }
}
