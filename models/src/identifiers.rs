// models/src/identifiers.rs

use core::fmt;
use core::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

/// Prefix of the key under which a patient's visit history is stored.
pub const PATIENT_HISTORY_KEY_PREFIX: &str = "paciente_";

static TEN_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));
static SIMPLE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// A validated national identifier (cédula): exactly ten ASCII digits.
///
/// Records keep the id as a plain string so stored data round-trips
/// untouched; this type is what the form boundary hands out once the
/// input has been checked.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    /// Validates and wraps a national id. Surrounding whitespace is trimmed
    /// first, the same way the input forms do.
    pub fn new(raw: &str) -> ValidationResult<Self> {
        let trimmed = raw.trim();
        if is_ten_digits(trimmed) {
            Ok(NationalId(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidNationalId(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the visit history owned by the patient with this id.
    pub fn history_key(&self) -> String {
        history_key(&self.0)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NationalId {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        NationalId::new(s)
    }
}

impl TryFrom<String> for NationalId {
    type Error = ValidationError;

    fn try_from(value: String) -> ValidationResult<Self> {
        NationalId::new(&value)
    }
}

impl From<NationalId> for String {
    fn from(id: NationalId) -> Self {
        id.0
    }
}

impl AsRef<str> for NationalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derives the visit-history key for a raw national id.
pub fn history_key(national_id: &str) -> String {
    format!("{}{}", PATIENT_HISTORY_KEY_PREFIX, national_id)
}

pub fn is_ten_digits(value: &str) -> bool {
    TEN_DIGITS.is_match(value)
}

/// Empty phones are allowed; anything else must be ten digits.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if phone.is_empty() || is_ten_digits(phone) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone(phone.to_string()))
    }
}

/// Empty e-mails are allowed; anything else must match `local@domain.tld`.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.is_empty() || SIMPLE_EMAIL.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        Err(ValidationError::MissingPassword)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_ten_digit_national_id() {
        let id = NationalId::new(" 1315896547 ").unwrap();
        assert_eq!(id.as_str(), "1315896547");
        assert_eq!(id.history_key(), "paciente_1315896547");
    }

    #[test]
    fn should_reject_short_or_alphabetic_national_id() {
        assert_eq!(
            NationalId::new("123456789"),
            Err(ValidationError::InvalidNationalId("123456789".to_string()))
        );
        assert!(NationalId::new("13158965a7").is_err());
        assert!(NationalId::new("131589654712").is_err());
        assert!("".parse::<NationalId>().is_err());
    }

    #[test]
    fn should_reject_national_id_on_deserialize() {
        let parsed: Result<NationalId, _> = serde_json::from_str("\"12\"");
        assert!(parsed.is_err());
        let parsed: NationalId = serde_json::from_str("\"0987654321\"").unwrap();
        assert_eq!(parsed.to_string(), "0987654321");
    }

    #[test]
    fn should_allow_empty_phone_and_email() {
        assert!(validate_phone("").is_ok());
        assert!(validate_email("").is_ok());
    }

    #[test]
    fn should_validate_phone_shape() {
        assert!(validate_phone("0987654321").is_ok());
        assert_eq!(
            validate_phone("099-123-4567"),
            Err(ValidationError::InvalidPhone("099-123-4567".to_string()))
        );
    }

    #[test]
    fn should_validate_email_shape() {
        assert!(validate_email("candrade@email.com").is_ok());
        assert!(validate_email("candrade@email").is_err());
        assert!(validate_email("c andrade@email.com").is_err());
        assert!(validate_email("@email.com").is_err());
    }

    #[test]
    fn should_require_password() {
        assert_eq!(validate_password(""), Err(ValidationError::MissingPassword));
        assert!(validate_password(" ").is_ok());
    }
}
