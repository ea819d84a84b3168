// models/src/medical/patient.rs

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::identifiers::{validate_email, validate_password, validate_phone, NationalId};

/// Age as found in storage: seed data writes a JSON number, form input
/// writes a string. Both are read back and re-emitted unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Age {
    Years(u32),
    Text(String),
}

impl Age {
    pub fn is_empty(&self) -> bool {
        matches!(self, Age::Text(text) if text.trim().is_empty())
    }
}

impl Default for Age {
    fn default() -> Self {
        Age::Text(String::new())
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::Years(years) => write!(f, "{}", years),
            Age::Text(text) => f.write_str(text),
        }
    }
}

/// A patient as persisted in the `pacientes_lista` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "nombre")]
    pub full_name: String,
    #[serde(rename = "ci")]
    pub national_id: String,
    #[serde(rename = "edad", default)]
    pub age: Age,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "alergias", default)]
    pub allergies: String,
    #[serde(rename = "usuario")]
    pub username: String,
    pub password: String,
}

/// Raw input of the Add-Patient, Add-User (patient) and Modify-Patient forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientForm {
    pub full_name: String,
    pub national_id: String,
    pub age: String,
    pub phone: String,
    pub email: String,
    pub allergies: String,
    /// `None` means "use the national id", which is what Add-Patient does.
    pub username: Option<String>,
    pub password: String,
}

impl PatientForm {
    /// Checks every field and produces the record to persist. Age is kept as
    /// typed, trimmed.
    pub fn validate(self) -> ValidationResult<Patient> {
        self.build(None)
    }

    /// Validation for the Modify-Patient flow. Phone and e-mail are only
    /// checked when they differ from `current`, so a stored value written
    /// before the format rules applied does not block other edits.
    pub fn validate_update(self, current: &Patient) -> ValidationResult<Patient> {
        self.build(Some(current))
    }

    fn build(self, current: Option<&Patient>) -> ValidationResult<Patient> {
        let national_id = NationalId::new(&self.national_id)?;
        let phone = self.phone.trim().to_string();
        if current.map_or(true, |c| c.phone != phone) {
            validate_phone(&phone)?;
        }
        let email = self.email.trim().to_string();
        if current.map_or(true, |c| c.email != email) {
            validate_email(&email)?;
        }

        let username = match self.username.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            Some(_) => return Err(ValidationError::MissingUsername),
            None => national_id.as_str().to_string(),
        };
        validate_password(&self.password)?;

        Ok(Patient {
            full_name: self.full_name.trim().to_string(),
            national_id: national_id.into_inner(),
            age: Age::Text(self.age.trim().to_string()),
            phone,
            email,
            allergies: self.allergies,
            username,
            password: self.password,
        })
    }
}
