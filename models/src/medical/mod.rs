// models/src/medical/mod.rs

pub mod doctor;
pub mod encounter;
pub mod login;
pub mod patient;
pub mod role;

pub use doctor::{Doctor, DoctorForm, PROTECTED_DOCTOR_USERNAME};
pub use encounter::VisitRecord;
pub use login::Login;
pub use patient::{Age, Patient, PatientForm};
pub use role::Role;
