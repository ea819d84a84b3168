// lib/src/storage_engine/storage_utils.rs

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::storage_engine::StorageEngine;
use crate::errors::{ClinicError, Result};

/// Reads and parses the JSON value under `key`.
///
/// An absent key is `Ok(None)`; text that does not parse as `T` is
/// `MalformedStoredData` so callers can tell "never written" from
/// "unreadable".
pub fn load_json<T: DeserializeOwned>(store: &dyn StorageEngine, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
            warn!("Stored value under '{}' is not readable: {}", key, e);
            ClinicError::malformed(key, e)
        }),
        None => Ok(None),
    }
}

/// Serializes `value` as JSON text and writes it under `key`.
pub fn save_json<T: Serialize + ?Sized>(store: &dyn StorageEngine, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
