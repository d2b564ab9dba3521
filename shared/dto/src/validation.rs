//! Field-level input checks shared by request and patch payloads.

use serde::Serialize;
use std::sync::LazyLock;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 32;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 32;
const EMAIL_MAX: usize = 254;

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$",
    )
    .expect("EMAIL_REGEX is a valid regex pattern")
});

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= EMAIL_MAX && EMAIL_REGEX.is_match(email)
}

/// Collects errors for a single payload, then converts to a `Result`.
#[derive(Debug, Default)]
pub(crate) struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn required(&mut self, field: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.fail(field, format!("{field} cannot be empty"));
            return false;
        }
        true
    }

    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min || len > max {
            self.fail(
                field,
                format!("{field} must be at least {min} characters with a max of {max} characters"),
            );
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if self.required(field, value) && !is_valid_email(value) {
            self.fail(field, format!("{field} must be a valid email address"));
        }
    }

    pub fn rooms(&mut self, field: &str, value: i32) {
        if value < 0 {
            self.fail(field, format!("{field} must be a non-negative integer"));
        }
    }

    pub fn errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
