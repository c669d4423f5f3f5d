//! Configuration for the MySQL connector

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Connector configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub statements: StatementConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    /// Port used when the request has none (or zero)
    /// Default: 3306
    #[serde(default = "default_port")]
    pub default_port: u16,
}

fn default_port() -> u16 {
    3306
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            default_port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatementConfig {
    /// Only accept `name` or `schema.name` as object_name
    /// Default: false (object names are interpolated as given)
    #[serde(default)]
    pub strict_identifiers: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print the response document
    #[serde(default)]
    pub pretty: bool,
}

impl ConnectorConfig {
    /// Load configuration
    ///
    /// Looks for config in:
    /// 1. `explicit` (from `--config` or `MYSQL_CONNECTOR_CONFIG`), which must exist
    /// 2. `<config dir>/mysql-connector/config.toml` (e.g. `~/.config` on Linux), used only if present
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                tracing::debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config from {:?}", path))
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mysql-connector").join("config.toml"))
}
