// models/src/lib.rs

pub mod errors;
pub mod identifiers;
pub mod medical;

pub use errors::{ValidationError, ValidationResult};
pub use identifiers::{NationalId, PATIENT_HISTORY_KEY_PREFIX};
pub use medical::{Age, Doctor, DoctorForm, Login, Patient, PatientForm, Role, VisitRecord};
