// lib/src/config/config_defaults.rs

use std::path::PathBuf;

use crate::storage_engine::StorageEngineType;

pub const DEFAULT_DATA_DIRECTORY: &str = "./policlinico_data";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_CONFIG_FILE: &str = "policlinico.toml";

pub fn default_data_directory() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIRECTORY)
}
pub fn default_storage_engine_type() -> StorageEngineType { StorageEngineType::Sled }
pub fn default_log_level() -> String { DEFAULT_LOG_LEVEL.to_string() }
pub fn default_output_directory() -> PathBuf { PathBuf::from(".") }
