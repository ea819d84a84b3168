// models/src/medical/login.rs

use serde::{Deserialize, Serialize};

/// A username/password pair as typed on the login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String, // Plaintext, compared verbatim
}

impl Login {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Login {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Exact match against a stored credential pair. No trimming and no
    /// case folding.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}
