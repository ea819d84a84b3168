// server/src/cli/config.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lib::config::{load_config, ClinicConfig, DEFAULT_CONFIG_FILE};
use log::debug;

/// Picks the configuration file: `--config` / `POLICLINICO_CONFIG` first,
/// then `policlinico.toml` in the working directory if present.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.exists().then_some(local)
}

pub fn load_cli_config(explicit: Option<&Path>) -> Result<ClinicConfig> {
    let path = resolve_config_path(explicit);
    let config = load_config(path.as_deref())
        .with_context(|| format!("Failed to load configuration from {:?}", path))?;
    debug!("Using configuration {:?}", config);
    Ok(config)
}

/// `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &ClinicConfig) {
    let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
    let _ = env_logger::Builder::from_env(env).format_timestamp_millis().try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib::StorageEngineType;
    use std::fs;

    #[test]
    fn explicit_path_wins() {
        let path = PathBuf::from("/tmp/custom.toml");
        assert_eq!(resolve_config_path(Some(&path)), Some(path));
    }

    #[test]
    fn loads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.toml");
        fs::write(&path, "log_level = \"debug\"\n[storage]\nengine_type = \"inmemory\"\n").unwrap();

        let config = load_cli_config(Some(&path)).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.storage.engine_type, StorageEngineType::InMemory);
    }

    #[test]
    fn reports_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[storage\n").unwrap();
        assert!(load_cli_config(Some(&path)).is_err());
    }
}
