// lib/src/repositories/mod.rs

pub mod doctor_repository;
pub mod patient_repository;
pub mod record_collection;

pub use doctor_repository::DoctorRepository;
pub use patient_repository::PatientRepository;
pub use record_collection::{RecordCollection, StoredRecord};
