use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::error::DirectoryError;

/// A chat participant's profile: unique id, display name, and email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
    })
}

impl UserProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Checks that id, name, and email are non-empty and the email is
    /// well-formed.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.name.is_empty() {
            return Err(DirectoryError::invalid("name cannot be empty"));
        }
        if self.email.is_empty() {
            return Err(DirectoryError::invalid("email cannot be empty"));
        }
        if !email_regex().is_match(&self.email) {
            return Err(DirectoryError::invalid("invalid email format"));
        }
        if self.id.is_empty() {
            return Err(DirectoryError::invalid("id cannot be empty"));
        }
        Ok(())
    }
}
