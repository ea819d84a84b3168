// models/src/errors.rs

use thiserror::Error;

/// A validation error raised at the form boundary, before any record
/// reaches a repository.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The national id (CI) is not exactly ten numeric digits.
    #[error("national id '{0}' must have exactly 10 numeric digits")]
    InvalidNationalId(String),
    /// A non-empty phone number is not exactly ten numeric digits.
    #[error("phone '{0}' must have exactly 10 numeric digits")]
    InvalidPhone(String),
    /// A non-empty e-mail does not look like `local@domain.tld`.
    #[error("e-mail '{0}' is not a valid address")]
    InvalidEmail(String),
    #[error("a password is required")]
    MissingPassword,
    #[error("a username is required")]
    MissingUsername,
}

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;
