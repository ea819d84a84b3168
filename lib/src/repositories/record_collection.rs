// lib/src/repositories/record_collection.rs

use std::marker::PhantomData;
use std::sync::Arc;

use log::{debug, info, warn};
use models::Login;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{ClinicError, Result};
use crate::storage_engine::{load_json, save_json, StorageEngine};

/// A record kept in one of the top-level identity collections.
pub trait StoredRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Storage key of the whole collection.
    const COLLECTION_KEY: &'static str;
    /// Human readable kind, used in error messages and logs.
    const KIND: &'static str;

    fn national_id(&self) -> &str;
    fn username(&self) -> &str;
    fn password(&self) -> &str;

    /// Protected records refuse deletion.
    fn is_protected(&self) -> bool {
        false
    }
}

/// Ordered collection of records stored as one JSON array under
/// `R::COLLECTION_KEY`.
///
/// Every mutation is a single load-mutate-save: the whole array is read,
/// changed in memory and written back. A failed check returns before the
/// write, so nothing is persisted on error.
pub struct RecordCollection<R> {
    store: Arc<dyn StorageEngine>,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for RecordCollection<R> {
    fn clone(&self) -> Self {
        RecordCollection { store: Arc::clone(&self.store), _record: PhantomData }
    }
}

impl<R: StoredRecord> RecordCollection<R> {
    pub fn new(store: Arc<dyn StorageEngine>) -> Self {
        RecordCollection { store, _record: PhantomData }
    }

    /// Whether the collection key exists at all, even as an empty list.
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.store.get(R::COLLECTION_KEY)?.is_some())
    }

    /// All records in insertion order. A never-written collection is empty.
    pub fn list_all(&self) -> Result<Vec<R>> {
        Ok(load_json::<Vec<R>>(self.store.as_ref(), R::COLLECTION_KEY)?.unwrap_or_default())
    }

    pub fn find_by_national_id(&self, national_id: &str) -> Result<Option<R>> {
        Ok(self.list_all()?.into_iter().find(|r| r.national_id() == national_id))
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<R>> {
        Ok(self.list_all()?.into_iter().find(|r| r.username() == username))
    }

    /// First record whose username and password both match exactly.
    pub fn find_by_credentials(&self, login: &Login) -> Result<Option<R>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|r| login.matches(r.username(), r.password())))
    }

    /// Appends a record after checking national id and username uniqueness
    /// within this collection.
    pub fn create(&self, record: R) -> Result<()> {
        let mut records = self.list_all()?;
        if records.iter().any(|r| r.national_id() == record.national_id()) {
            warn!("Refusing {} with duplicate national id {}", R::KIND, record.national_id());
            return Err(ClinicError::DuplicateNationalId(format!(
                "a {} with national id {} already exists",
                R::KIND,
                record.national_id()
            )));
        }
        if records.iter().any(|r| r.username() == record.username()) {
            warn!("Refusing {} with duplicate username {}", R::KIND, record.username());
            return Err(ClinicError::DuplicateUsername(format!(
                "username '{}' is already used by another {}",
                record.username(),
                R::KIND
            )));
        }

        info!("Creating {} {}", R::KIND, record.national_id());
        records.push(record);
        self.save_all(&records)
    }

    /// Replaces the record identified by `national_id` in place, keeping its
    /// position in the list.
    ///
    /// The national id itself cannot change: it is the key the rest of the
    /// store (visit histories, navigation) hangs off.
    pub fn update(&self, national_id: &str, record: R) -> Result<()> {
        let mut records = self.list_all()?;
        let index = records
            .iter()
            .position(|r| r.national_id() == national_id)
            .ok_or_else(|| ClinicError::NotFound(format!("no {} with national id {}", R::KIND, national_id)))?;

        if record.national_id() != national_id {
            return Err(ClinicError::ImmutableField(format!(
                "national id of {} {} cannot change to {}",
                R::KIND,
                national_id,
                record.national_id()
            )));
        }
        let taken = records
            .iter()
            .enumerate()
            .any(|(i, r)| i != index && r.username() == record.username());
        if taken {
            warn!("Refusing update of {} {}: username {} taken", R::KIND, national_id, record.username());
            return Err(ClinicError::DuplicateUsername(format!(
                "username '{}' is already used by another {}",
                record.username(),
                R::KIND
            )));
        }

        info!("Updating {} {}", R::KIND, national_id);
        records[index] = record;
        self.save_all(&records)
    }

    /// Removes the record and returns it.
    pub fn delete(&self, national_id: &str) -> Result<R> {
        let mut records = self.list_all()?;
        let index = records
            .iter()
            .position(|r| r.national_id() == national_id)
            .ok_or_else(|| ClinicError::NotFound(format!("no {} with national id {}", R::KIND, national_id)))?;

        if records[index].is_protected() {
            warn!("Refusing to delete protected {} {}", R::KIND, national_id);
            return Err(ClinicError::Protected(format!(
                "the system {} '{}' cannot be deleted",
                R::KIND,
                records[index].username()
            )));
        }

        let removed = records.remove(index);
        info!("Deleted {} {}", R::KIND, national_id);
        self.save_all(&records)?;
        Ok(removed)
    }

    /// Writes the whole collection, replacing what is stored.
    pub fn save_all(&self, records: &[R]) -> Result<()> {
        debug!("Persisting {} {} record(s) under {}", records.len(), R::KIND, R::COLLECTION_KEY);
        save_json(self.store.as_ref(), R::COLLECTION_KEY, records)
    }
}
