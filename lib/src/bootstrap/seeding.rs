// lib/src/bootstrap/seeding.rs

use log::{debug, info};
use models::{Age, Doctor, Patient, Role};

use crate::errors::Result;
use crate::repositories::{DoctorRepository, PatientRepository};

/// Which collections a seeding pass wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub doctors_seeded: bool,
    pub patients_seeded: bool,
}

impl SeedReport {
    pub fn changed(&self) -> bool {
        self.doctors_seeded || self.patients_seeded
    }
}

/// The one system doctor every fresh installation starts with.
pub fn default_doctors() -> Vec<Doctor> {
    vec![Doctor {
        full_name: "Dr. (Sistema)".to_string(),
        national_id: "9999999999".to_string(),
        phone: "N/A".to_string(),
        username: "doctor".to_string(),
        password: "12345".to_string(),
        role: Role::Doctor,
    }]
}

pub fn default_patients() -> Vec<Patient> {
    let sample = |name: &str, ci: &str, age: u32, phone: &str, email: &str, allergies: &str| Patient {
        full_name: name.to_string(),
        national_id: ci.to_string(),
        age: Age::Years(age),
        phone: phone.to_string(),
        email: email.to_string(),
        allergies: allergies.to_string(),
        username: ci.to_string(),
        password: "123".to_string(),
    };
    vec![
        sample("Carlos Andrade Vera", "1315896547", 34, "0987654321", "candrade@email.com", "Penicilina"),
        sample("Ana Zambrano Ponce", "1309874563", 28, "0991234567", "azambrano@email.com", "Ninguna"),
        sample("Luis Mendoza Cedeño", "1311223344", 45, "0988776655", "lmendoza@email.com", "Polvo"),
    ]
}

/// Writes the default collections whose key has never been written.
///
/// A key holding an empty list counts as initialised: a clinic that deleted
/// every record does not get the samples back.
pub fn ensure_seeded(doctors: &DoctorRepository, patients: &PatientRepository) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if doctors.is_initialized()? {
        debug!("Doctor collection already initialised");
    } else {
        info!("Seeding default doctor collection");
        doctors.save_all(&default_doctors())?;
        report.doctors_seeded = true;
    }

    if patients.is_initialized()? {
        debug!("Patient collection already initialised");
    } else {
        info!("Seeding default patient collection");
        patients.save_all(&default_patients())?;
        report.patients_seeded = true;
    }

    Ok(report)
}
