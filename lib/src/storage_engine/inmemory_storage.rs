// lib/src/storage_engine/inmemory_storage.rs

use std::collections::HashMap;
use std::sync::RwLock;

use super::storage_engine::StorageEngine;
use crate::errors::{ClinicError, Result};

#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageEngine for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| ClinicError::LockError(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| ClinicError::LockError(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| ClinicError::LockError(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }

    fn get_type(&self) -> &'static str {
        "InMemory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_set_get_and_remove() {
        let store = InMemoryStorage::new();
        assert_eq!(store.get("doctorName").unwrap(), None);
        store.set("doctorName", "Dr. (Sistema)").unwrap();
        assert_eq!(store.get("doctorName").unwrap().as_deref(), Some("Dr. (Sistema)"));
        store.set("doctorName", "Dra. Loor").unwrap();
        assert_eq!(store.len(), 1);
        store.remove("doctorName").unwrap();
        store.remove("doctorName").unwrap();
        assert!(store.is_empty());
    }
}
