// lib/src/storage_engine/storage_engine.rs

use crate::errors::Result;

/// Flat string key-value storage, the equivalent of one browser storage
/// scope.
///
/// Values are UTF-8 JSON text produced by the caller; engines never look
/// inside them. There is no multi-key atomicity: a caller doing
/// load-mutate-save holds no lock between the `get` and the `set`.
pub trait StorageEngine: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn get_type(&self) -> &'static str;
}

/// Lifetime of a storage scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// Survives restarts: identity collections and visit histories.
    Persistent,
    /// Lives as long as the process: the logged-in doctor's display name.
    Session,
}
