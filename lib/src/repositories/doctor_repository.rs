// lib/src/repositories/doctor_repository.rs

use models::Doctor;

use super::record_collection::{RecordCollection, StoredRecord};
use crate::storage_engine::keys::DOCTORS_KEY;

impl StoredRecord for Doctor {
    const COLLECTION_KEY: &'static str = DOCTORS_KEY;
    const KIND: &'static str = "doctor";

    fn national_id(&self) -> &str {
        &self.national_id
    }

    fn username(&self) -> &str {
        &self.username
    }

    fn password(&self) -> &str {
        &self.password
    }

    fn is_protected(&self) -> bool {
        Doctor::is_protected(self)
    }
}

/// Doctors have no dependent data, so the plain collection is the repository.
pub type DoctorRepository = RecordCollection<Doctor>;
