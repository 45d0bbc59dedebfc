//! Configuration file structure
//!
//! Every section and field has a default, so an empty file (or no file) is a
//! valid configuration.

use crate::registry::ModelPaths;
use crate::server::ServerConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerSection,

    /// Model artifact locations
    pub models: ModelsSection,

    /// Logging settings
    pub logging: LoggingSection,
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Bind address
    pub bind: String,

    /// Server port
    pub port: u16,

    /// Permissive CORS headers
    pub cors_enabled: bool,

    /// Expose `POST /api/v1/models/reload`
    pub reload_endpoint: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5001,
            cors_enabled: true,
            reload_endpoint: true,
        }
    }
}

/// Model artifact locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsSection {
    /// Directory holding `hardness_model.json` and `oxidation_model.json`
    pub dir: PathBuf,

    /// Explicit hardness artifact path, overriding `dir`
    pub hardness_path: Option<PathBuf>,

    /// Explicit oxidation artifact path, overriding `dir`
    pub oxidation_path: Option<PathBuf>,

    /// Load both artifacts at startup instead of on first request
    pub eager_load: bool,
}

impl Default for ModelsSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            hardness_path: None,
            oxidation_path: None,
            eager_load: false,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Valid formats: text, json")),
        }
    }
}

impl AppConfig {
    /// Socket address from `server.bind` and `server.port`
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.server.bind.parse().map_err(|e| {
            Error::ConfigError(format!("Invalid bind address '{}': {e}", self.server.bind))
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Runtime settings for the HTTP server
    pub fn server_config(&self) -> Result<ServerConfig> {
        Ok(ServerConfig {
            address: self.socket_addr()?,
            cors_enabled: self.server.cors_enabled,
            reload_endpoint: self.server.reload_endpoint,
        })
    }

    /// Artifact paths, with per-target overrides applied
    pub fn model_paths(&self) -> ModelPaths {
        let mut paths = ModelPaths::from_dir(&self.models.dir);
        if let Some(path) = &self.models.hardness_path {
            paths.hardness = path.clone();
        }
        if let Some(path) = &self.models.oxidation_path {
            paths.oxidation = path.clone();
        }
        paths
    }
}
