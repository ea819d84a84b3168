// lib/src/storage_engine/sled_storage.rs

use std::fs;
use std::path::Path;

use log::{debug, error, info};
use sled::{Db, Tree};

use super::storage_engine::StorageEngine;
use crate::errors::{ClinicError, Result};

/// Name of the tree that plays the role of the browser's local storage.
pub const LOCAL_STORAGE_TREE: &str = "local_storage";

/// Opens (creating if needed) the sled database under `path`.
pub fn open_sled_db(path: &Path) -> Result<Db> {
    if !path.exists() {
        info!("Creating database directory at {:?}", path);
        fs::create_dir_all(path).map_err(|e| {
            error!("Failed to create database directory at {:?}: {}", path, e);
            ClinicError::StorageError(format!("Failed to create database directory at {:?}: {}", path, e))
        })?;
    } else if !path.is_dir() {
        error!("Path {:?} exists but is not a directory", path);
        return Err(ClinicError::StorageError(format!("Path {:?} is not a directory", path)));
    }

    let db = sled::Config::new().path(path).open().map_err(|e| {
        error!("Failed to open Sled database at {:?}: {}", path, e);
        ClinicError::StorageError(format!(
            "Failed to open Sled database at {:?}: {}. Ensure the directory is accessible and not in use.",
            path, e
        ))
    })?;
    info!("Opened Sled database at {:?}", path);
    Ok(db)
}

/// Persistent scope backed by a sled tree.
#[derive(Clone)]
pub struct SledStorage {
    db: Db,
    tree: Tree,
}

impl SledStorage {
    pub fn new(db: Db) -> Result<Self> {
        let tree = db.open_tree(LOCAL_STORAGE_TREE)?;
        Ok(SledStorage { db, tree })
    }

    pub fn open(path: &Path) -> Result<Self> {
        SledStorage::new(open_sled_db(path)?)
    }
}

impl StorageEngine for SledStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.tree.get(key.as_bytes())? {
            Some(value) => Ok(Some(String::from_utf8(value.to_vec())?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        debug!("sled set {} ({} bytes)", key, value.len());
        self.tree.insert(key.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        debug!("sled remove {}", key);
        self.tree.remove(key.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    fn get_type(&self) -> &'static str {
        "Sled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn should_persist_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sled");
        {
            let store = SledStorage::open(&path).unwrap();
            store.set("pacientes_lista", "[]").unwrap();
            store.set("paciente_1315896547", "[{}]").unwrap();
            store.remove("paciente_1315896547").unwrap();
            store.flush().unwrap();
        }
        let store = SledStorage::open(&path).unwrap();
        assert_eq!(store.get("pacientes_lista").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("paciente_1315896547").unwrap(), None);
        assert_eq!(store.get_type(), "Sled");
    }

    #[test]
    fn should_refuse_a_file_as_data_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not_a_dir");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(SledStorage::open(&file), Err(ClinicError::StorageError(_))));
    }
}
