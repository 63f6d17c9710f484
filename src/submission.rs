// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form data as it moves through the pipeline.
//!
//! Submissions are request-scoped and never persisted.

use crate::sanitizer::sanitize;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Raw contact form body. Every field is optional on the wire so that
/// presence is reported by the validator rather than the JSON decoder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Hidden decoy field; humans leave it empty
    #[serde(default)]
    pub honeypot: Option<String>,
}

/// Fields that passed validation, still exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Values actually sent onward. The email is passed through verbatim
/// since it already matched the address pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub origin: IpAddr,
}

impl Submission {
    pub fn sanitize(self, origin: IpAddr) -> SanitizedSubmission {
        SanitizedSubmission {
            name: sanitize(&self.name),
            email: self.email,
            subject: sanitize(&self.subject),
            message: sanitize(&self.message),
            origin,
        }
    }
}

/// Success body, shared by genuine and simulated acceptance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: "Message sent successfully".to_string(),
        }
    }
}
