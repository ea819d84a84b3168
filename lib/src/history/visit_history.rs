// lib/src/history/visit_history.rs

use std::sync::Arc;

use log::{debug, info, warn};
use models::identifiers::history_key;
use models::VisitRecord;

use crate::errors::{ClinicError, Result};
use crate::storage_engine::{load_json, save_json, StorageEngine};

/// What a profile page shows in place of the history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    /// No visits recorded (or the key was never written).
    Empty,
    Entries(Vec<VisitRecord>),
    /// Stored text could not be parsed; carries the parser message.
    Unreadable(String),
}

/// Per-patient, append-only list of visit records stored under
/// `paciente_<nationalId>`.
#[derive(Clone)]
pub struct VisitHistoryRepository {
    store: Arc<dyn StorageEngine>,
}

impl VisitHistoryRepository {
    pub fn new(store: Arc<dyn StorageEngine>) -> Self {
        VisitHistoryRepository { store }
    }

    /// Visits in insertion order. An unreadable entry is reported as
    /// `MalformedStoredData`.
    pub fn list_for_patient(&self, national_id: &str) -> Result<Vec<VisitRecord>> {
        let key = history_key(national_id);
        Ok(load_json::<Vec<VisitRecord>>(self.store.as_ref(), &key)?.unwrap_or_default())
    }

    /// Like `list_for_patient`, but folds the unreadable case into the
    /// returned view instead of failing.
    pub fn view_for_patient(&self, national_id: &str) -> Result<HistoryView> {
        match self.list_for_patient(national_id) {
            Ok(visits) if visits.is_empty() => Ok(HistoryView::Empty),
            Ok(visits) => Ok(HistoryView::Entries(visits)),
            Err(ClinicError::MalformedStoredData { reason, .. }) => {
                warn!("History of patient {} is unreadable: {}", national_id, reason);
                Ok(HistoryView::Unreadable(reason))
            }
            Err(e) => Err(e),
        }
    }

    /// Pushes one visit onto the end of the history. No cap, no dedup.
    pub fn append(&self, national_id: &str, record: VisitRecord) -> Result<()> {
        let key = history_key(national_id);
        let mut visits = self.list_for_patient(national_id)?;
        visits.push(record);
        debug!("Persisting {} visit(s) under {}", visits.len(), key);
        save_json(self.store.as_ref(), &key, &visits)?;
        info!("Appended visit #{} for patient {}", visits.len(), national_id);
        Ok(())
    }

    /// Drops the whole history. Only patient deletion calls this.
    pub fn delete_all_for_patient(&self, national_id: &str) -> Result<()> {
        info!("Removing visit history of patient {}", national_id);
        self.store.remove(&history_key(national_id))
    }
}
