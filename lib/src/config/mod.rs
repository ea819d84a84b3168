// lib/src/config/mod.rs

pub mod config_defaults;
pub mod config_structs;

pub use config_defaults::*;
pub use config_structs::{ClinicConfig, ExportConfig};

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::errors::{ClinicError, Result};

/// Loads the configuration at `path`.
///
/// No path, or a path that does not exist, yields the defaults. A file that
/// exists but cannot be read or parsed is an error.
pub fn load_config(path: Option<&Path>) -> Result<ClinicConfig> {
    let path = match path {
        Some(path) if path.exists() => path,
        Some(path) => {
            info!("Config file {:?} not found, using defaults", path);
            return Ok(ClinicConfig::default());
        }
        None => return Ok(ClinicConfig::default()),
    };

    let content = fs::read_to_string(path).map_err(|e| {
        ClinicError::ConfigurationError(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    let config = parse_config(&content).map_err(|e| match e {
        ClinicError::ConfigurationError(msg) => {
            ClinicError::ConfigurationError(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;
    debug!("Loaded config from {:?}: {:?}", path, config);
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<ClinicConfig> {
    toml::from_str(content).map_err(|e| ClinicError::ConfigurationError(e.to_string()))
}
