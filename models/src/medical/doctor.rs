// models/src/medical/doctor.rs

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::identifiers::{validate_password, validate_phone, NationalId};
use crate::medical::role::{default_doctor_role, Role};

/// Username of the system doctor created by seeding. That record can never
/// be deleted.
pub const PROTECTED_DOCTOR_USERNAME: &str = "doctor";

/// A doctor as persisted in the `doctores_lista` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "nombre")]
    pub full_name: String,
    #[serde(rename = "ci")]
    pub national_id: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(rename = "usuario")]
    pub username: String,
    pub password: String,
    #[serde(rename = "rol", default = "default_doctor_role")]
    pub role: Role,
}

impl Doctor {
    pub fn is_protected(&self) -> bool {
        self.username == PROTECTED_DOCTOR_USERNAME
    }
}

/// Raw input of the Add-User (doctor) and Modify-Doctor forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorForm {
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    /// Defaults to the national id when left blank, as the form pre-fills it.
    pub username: Option<String>,
    pub password: String,
}

impl DoctorForm {
    /// Checks every field and produces the record to persist. Nothing is
    /// coerced: a malformed field is an error.
    pub fn validate(self) -> ValidationResult<Doctor> {
        self.build(None)
    }

    /// Validation for the Modify-Doctor flow. The phone is only checked when
    /// it changes; the role of `current` is kept.
    pub fn validate_update(self, current: &Doctor) -> ValidationResult<Doctor> {
        let role = current.role;
        let mut doctor = self.build(Some(current))?;
        doctor.role = role;
        Ok(doctor)
    }

    fn build(self, current: Option<&Doctor>) -> ValidationResult<Doctor> {
        let national_id = NationalId::new(&self.national_id)?;
        let phone = self.phone.trim().to_string();
        if current.map_or(true, |c| c.phone != phone) {
            validate_phone(&phone)?;
        }

        let username = match self.username.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            Some(_) => return Err(ValidationError::MissingUsername),
            None => national_id.as_str().to_string(),
        };
        validate_password(&self.password)?;

        Ok(Doctor {
            full_name: self.full_name.trim().to_string(),
            national_id: national_id.into_inner(),
            phone,
            username,
            password: self.password,
            role: Role::Doctor,
        })
    }
}
