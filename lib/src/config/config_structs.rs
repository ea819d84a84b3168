// lib/src/config/config_structs.rs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config_defaults::{default_log_level, default_output_directory};
use crate::storage_engine::StorageConfig;

/// Top-level configuration file.
///
/// ```toml
/// log_level = "debug"
///
/// [storage]
/// engine_type = "sled"
/// data_directory = "/var/lib/policlinico"
///
/// [export]
/// output_directory = "exports"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig { output_directory: default_output_directory() }
    }
}

impl Default for ClinicConfig {
    fn default() -> Self {
        ClinicConfig {
            storage: StorageConfig::default(),
            log_level: default_log_level(),
            export: ExportConfig::default(),
        }
    }
}
