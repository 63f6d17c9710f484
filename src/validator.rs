// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission validator.
//!
//! Checks run against the literal input in a fixed order and stop at the
//! first failure:
//! 1. name, email, subject and message are present and non-empty
//! 2. name length
//! 3. subject length
//! 4. message minimum length
//! 5. message maximum length
//! 6. email format
//!
//! Lengths are counted in characters.

use crate::config::ValidationConfig;
use crate::submission::{ContactRequest, Submission};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingField(&'static str),

    #[error("Name is too long")]
    NameTooLong { len: usize, max: usize },

    #[error("Subject is too long")]
    SubjectTooLong { len: usize, max: usize },

    #[error("Message is too short")]
    MessageTooShort { len: usize, min: usize },

    #[error("Message is too long")]
    MessageTooLong { len: usize, max: usize },

    #[error("Invalid email address")]
    InvalidEmail,
}

/// Contact submission validator.
pub struct SubmissionValidator {
    config: ValidationConfig,
}

impl SubmissionValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a raw request, returning the unsanitized fields on success.
    pub fn validate(&self, request: &ContactRequest) -> Result<Submission, ValidationError> {
        let name = required("name", &request.name)?;
        let email = required("email", &request.email)?;
        let subject = required("subject", &request.subject)?;
        let message = required("message", &request.message)?;

        let len = name.chars().count();
        if len > self.config.max_name_len {
            return Err(ValidationError::NameTooLong {
                len,
                max: self.config.max_name_len,
            });
        }

        let len = subject.chars().count();
        if len > self.config.max_subject_len {
            return Err(ValidationError::SubjectTooLong {
                len,
                max: self.config.max_subject_len,
            });
        }

        let len = message.chars().count();
        if len < self.config.min_message_len {
            return Err(ValidationError::MessageTooShort {
                len,
                min: self.config.min_message_len,
            });
        }
        if len > self.config.max_message_len {
            return Err(ValidationError::MessageTooLong {
                len,
                max: self.config.max_message_len,
            });
        }

        if !is_valid_email(email) {
            debug!("Email address failed format check");
            return Err(ValidationError::InvalidEmail);
        }

        Ok(Submission {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        })
    }
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, ValidationError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => {
            debug!(field, "Missing required field");
            Err(ValidationError::MissingField(field))
        }
    }
}

/// Simple `local@domain.tld` shape check.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}
