// lib/src/storage_engine/keys.rs
// Key layout shared by every page of the clinic.

pub use models::identifiers::{history_key, PATIENT_HISTORY_KEY_PREFIX};

/// Persistent scope: ordered list of doctors.
pub const DOCTORS_KEY: &str = "doctores_lista";

/// Persistent scope: ordered list of patients.
pub const PATIENTS_KEY: &str = "pacientes_lista";

/// Session scope: display name of the logged-in doctor.
pub const DOCTOR_SESSION_KEY: &str = "doctorName";
