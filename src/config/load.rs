//! Loading and validating configuration files

use super::cli::ServeArgs;
use super::schema::AppConfig;
use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Load and validate a YAML configuration file
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<AppConfig> {
    let path = config_path.as_ref();
    let yaml_content = fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {e}",
            path.display()
        ))
    })?;

    let config = parse_config(&yaml_content)?;
    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Parse and validate YAML configuration text
pub fn parse_config(yaml: &str) -> Result<AppConfig> {
    // An empty document deserializes as null, not as an empty mapping
    let config: AppConfig = if yaml.trim().is_empty() {
        AppConfig::default()
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))?
    };

    validate_config(&config).map_err(|e| Error::ConfigError(format!("Invalid config: {e}")))?;
    Ok(config)
}

/// Load `path` if given, else defaults
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(AppConfig::default()),
    }
}

/// Check values serde cannot
pub fn validate_config(config: &AppConfig) -> std::result::Result<(), String> {
    config.socket_addr().map_err(|e| e.to_string())?;

    if config.models.dir.as_os_str().is_empty() {
        return Err("models.dir must not be empty".to_string());
    }

    if config.logging.level.trim().is_empty() {
        return Err("logging.level must not be empty".to_string());
    }

    Ok(())
}

/// Apply `serve` flags on top of file values
pub fn apply_overrides(config: &mut AppConfig, args: &ServeArgs) {
    if let Some(bind) = &args.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = &args.model_dir {
        config.models.dir = dir.clone();
    }
    if args.eager {
        config.models.eager_load = true;
    }
}
