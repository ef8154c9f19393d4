//! User identity as supplied by the external identity provider.
//!
//! There is no local user table: a user is an `(email, name)` pair taken from
//! the verified token on every request and copied onto the rows it creates.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub email: String,
    pub name: String,
}

impl UserIdentity {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }

    /// Emails are compared case-insensitively; providers differ on casing.
    pub fn same_email(&self, email: &str) -> bool {
        emails_match(&self.email, email)
    }
}

/// Full Unicode case folding, matching the `lower()` used in SQL lookups.
pub fn emails_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
