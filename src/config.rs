//! Daemon configuration loaded from `~/.workboard/config.toml`.
//!
//! The file is optional; when it does not exist all fields fall back to
//! their `Default` values. Command-line flags and environment variables
//! take precedence over anything set here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::logging::default_data_dir;

/// File name of the SQLite database inside the data directory.
pub const DEFAULT_DB_FILENAME: &str = "workboard.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// `[store]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Path of the SQLite database file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// `[server]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Allowed CORS origin prefixes. Empty means "use the CLI value".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl DaemonConfig {
    /// Database path from the file, or `~/.workboard/workboard.db`.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| default_data_dir().join(DEFAULT_DB_FILENAME))
    }
}

/// Canonical path for the config file (`~/.workboard/config.toml`).
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".workboard").join("config.toml"))
}

/// Load the daemon configuration.
///
/// `explicit` overrides the default location. A missing file yields
/// `DaemonConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_config(explicit: Option<&Path>) -> Result<DaemonConfig, ConfigError> {
    let path = match explicit.map(Path::to_path_buf).or_else(config_path) {
        Some(p) => p,
        None => {
            warn!("Could not determine config directory; using defaults");
            return Ok(DaemonConfig::default());
        }
    };

    if !path.exists() {
        debug!("Config not found at {}; using defaults", path.display());
        return Ok(DaemonConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config: DaemonConfig = toml::from_str(&content)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
