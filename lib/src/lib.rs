// lib/src/lib.rs

pub mod bootstrap;
pub mod config;
pub mod database;
pub mod errors;
pub mod export;
pub mod history;
pub mod repositories;
pub mod storage_engine;

pub use models::{Age, Doctor, DoctorForm, Login, NationalId, Patient, PatientForm, Role, VisitRecord};

pub use crate::bootstrap::{ensure_seeded, SeedReport};
pub use crate::config::{load_config, ClinicConfig};
pub use crate::database::{ClinicDatabase, UserRecord};
pub use crate::errors::{ClinicError, Result};
pub use crate::export::{ExportAudience, ExportDocument, ExportFormat, ExportService};
pub use crate::history::{HistoryView, VisitHistoryRepository, VisitService};
pub use crate::repositories::{DoctorRepository, PatientRepository};
pub use crate::storage_engine::{create_storage, StorageConfig, StorageEngine, StorageEngineType, StorageScope};
