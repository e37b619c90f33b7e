//! Email gate in front of the quiz
//!
//! Only institutional addresses may sit the quiz: `<local>@vit.<tld>` or
//! `<local>@vitstudent.ac.in`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Message shown to the user when the address is refused
pub const LOGIN_ERROR_MESSAGE: &str = "Please enter a valid VIT email address.";

static VIT_EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@(vit\.[a-zA-Z]+|vitstudent\.ac\.in)$")
        .expect("Invalid regex pattern for VIT email")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Please enter a valid VIT email address.")]
    InvalidEmail,
}

/// An address that passed the gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedEmail(String);

impl AuthenticatedEmail {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check a free-text email against the allowed domains.
///
/// Surrounding whitespace is ignored.
pub fn authenticate(email: &str) -> Result<AuthenticatedEmail, AuthError> {
    let email = email.trim();
    if VIT_EMAIL_REGEX.is_match(email) {
        Ok(AuthenticatedEmail(email.to_string()))
    } else {
        Err(AuthError::InvalidEmail)
    }
}
