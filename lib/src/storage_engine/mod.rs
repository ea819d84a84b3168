// lib/src/storage_engine/mod.rs

pub mod config;
pub mod inmemory_storage;
pub mod keys;
pub mod sled_storage;
pub mod storage_engine;
pub mod storage_utils;

pub use config::{StorageConfig, StorageEngineType};
pub use inmemory_storage::InMemoryStorage;
pub use sled_storage::{open_sled_db, SledStorage};
pub use storage_engine::{StorageEngine, StorageScope};
pub use storage_utils::{load_json, save_json};

use std::sync::Arc;

use log::info;

use crate::errors::Result;

/// Creates the persistent-scope engine selected by `config`.
pub fn create_storage(config: &StorageConfig) -> Result<Arc<dyn StorageEngine>> {
    let storage: Arc<dyn StorageEngine> = match config.engine_type {
        StorageEngineType::Sled => Arc::new(SledStorage::open(&config.data_directory)?),
        StorageEngineType::InMemory => Arc::new(InMemoryStorage::new()),
    };
    info!("Persistent storage ready ({})", storage.get_type());
    Ok(storage)
}
