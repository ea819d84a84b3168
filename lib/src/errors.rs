// lib/src/errors.rs

use std::string::FromUtf8Error;

use models::errors::ValidationError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClinicError {
    /// A record or history lookup missed.
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Duplicate national id: {0}")]
    DuplicateNationalId(String),

    #[error("Duplicate username: {0}")]
    DuplicateUsername(String),

    /// Attempt to delete the system doctor.
    #[error("Protected record: {0}")]
    Protected(String),

    /// The value stored under `key` is not the JSON the reader expects.
    #[error("Unreadable data under key '{key}': {reason}")]
    MalformedStoredData { key: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Field cannot be changed: {0}")]
    ImmutableField(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Storage operation failed: {0}")]
    StorageError(String),

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    /// The PDF backend failed to build or serialize a document.
    #[error("Export failed: {0}")]
    ExportError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    JsonError(#[from] SerdeJsonError),

    #[error("UTF-8 conversion error: {0}")]
    FromUtf8(#[from] FromUtf8Error),
}

impl ClinicError {
    pub fn malformed(key: &str, reason: impl ToString) -> Self {
        ClinicError::MalformedStoredData {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for failures caused by the request itself rather than by the
    /// storage layer.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ClinicError::NotFound(_)
                | ClinicError::DuplicateNationalId(_)
                | ClinicError::DuplicateUsername(_)
                | ClinicError::Protected(_)
                | ClinicError::Validation(_)
                | ClinicError::ImmutableField(_)
                | ClinicError::PermissionDenied(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ClinicError>;

impl From<sled::Error> for ClinicError {
    fn from(err: sled::Error) -> Self {
        ClinicError::StorageError(err.to_string())
    }
}
