// lib/src/database.rs

use std::sync::Arc;

use log::{debug, info};
use models::{Doctor, Patient};

use crate::bootstrap::{ensure_seeded, SeedReport};
use crate::config::ClinicConfig;
use crate::errors::Result;
use crate::export::ExportService;
use crate::history::{VisitHistoryRepository, VisitService};
use crate::repositories::{DoctorRepository, PatientRepository};
use crate::storage_engine::{create_storage, InMemoryStorage, StorageConfig, StorageEngine, StorageScope};

/// Result of the admin directory search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRecord {
    Patient(Patient),
    Doctor(Doctor),
}

impl UserRecord {
    pub fn full_name(&self) -> &str {
        match self {
            UserRecord::Patient(p) => &p.full_name,
            UserRecord::Doctor(d) => &d.full_name,
        }
    }

    pub fn role_label(&self) -> &'static str {
        match self {
            UserRecord::Patient(_) => "paciente",
            UserRecord::Doctor(d) => d.role.as_str(),
        }
    }
}

/// Entry point to the clinic data: owns both storage scopes and hands out
/// the repositories and services built on top of them.
///
/// Constructed once per process; everything it returns shares the same
/// engines.
#[derive(Clone)]
pub struct ClinicDatabase {
    persistent: Arc<dyn StorageEngine>,
    session: Arc<dyn StorageEngine>,
}

impl ClinicDatabase {
    /// Opens the persistent engine named in the configuration. The session
    /// scope is always process-local.
    pub fn open(config: &ClinicConfig) -> Result<Self> {
        Self::open_storage(&config.storage)
    }

    pub fn open_storage(storage: &StorageConfig) -> Result<Self> {
        let persistent = create_storage(storage)?;
        info!(
            "Clinic database opened ({} at {})",
            persistent.get_type(),
            storage.data_directory.display()
        );
        Ok(Self::with_engines(persistent, Arc::new(InMemoryStorage::new())))
    }

    /// Both scopes in memory; nothing survives the process.
    pub fn in_memory() -> Self {
        Self::with_engines(Arc::new(InMemoryStorage::new()), Arc::new(InMemoryStorage::new()))
    }

    pub fn with_engines(persistent: Arc<dyn StorageEngine>, session: Arc<dyn StorageEngine>) -> Self {
        ClinicDatabase { persistent, session }
    }

    pub fn storage(&self, scope: StorageScope) -> Arc<dyn StorageEngine> {
        match scope {
            StorageScope::Persistent => Arc::clone(&self.persistent),
            StorageScope::Session => Arc::clone(&self.session),
        }
    }

    pub fn doctors(&self) -> DoctorRepository {
        DoctorRepository::new(self.storage(StorageScope::Persistent))
    }

    pub fn patients(&self) -> PatientRepository {
        PatientRepository::new(self.storage(StorageScope::Persistent))
    }

    pub fn history(&self) -> VisitHistoryRepository {
        VisitHistoryRepository::new(self.storage(StorageScope::Persistent))
    }

    pub fn visits(&self) -> VisitService {
        VisitService::new(self.patients(), self.history())
    }

    pub fn export(&self) -> ExportService {
        ExportService::new(self.patients(), self.history())
    }

    pub fn ensure_seeded(&self) -> Result<SeedReport> {
        ensure_seeded(&self.doctors(), &self.patients())
    }

    /// Directory search by national id. Patients are checked first, so an
    /// id present in both collections resolves to the patient.
    pub fn lookup_by_national_id(&self, national_id: &str) -> Result<Option<UserRecord>> {
        let national_id = national_id.trim();
        if let Some(patient) = self.patients().find_by_national_id(national_id)? {
            return Ok(Some(UserRecord::Patient(patient)));
        }
        let found = self.doctors().find_by_national_id(national_id)?.map(UserRecord::Doctor);
        debug!("Lookup of {} found {}", national_id, if found.is_some() { "a doctor" } else { "nothing" });
        Ok(found)
    }

    pub fn flush(&self) -> Result<()> {
        self.persistent.flush()?;
        self.session.flush()
    }
}
