// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound mail collaborator.
//!
//! The pipeline only sees [`MailSender`]. Provider failures come back as a
//! [`ProviderErrorCode`] parsed from the provider's opaque code string in
//! one place, [`ProviderErrorCode::from_code`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// A fully rendered notification ready to hand to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Provider error identifiers the service distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderErrorCode {
    MessageRejected,
    InvalidParameterValue,
    Throttling,
    Other(String),
}

const PROVIDER_CODES: &[(&str, ProviderErrorCode)] = &[
    ("MessageRejected", ProviderErrorCode::MessageRejected),
    ("InvalidParameterValue", ProviderErrorCode::InvalidParameterValue),
    ("Throttling", ProviderErrorCode::Throttling),
];

impl ProviderErrorCode {
    pub fn from_code(code: &str) -> Self {
        PROVIDER_CODES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, parsed)| parsed.clone())
            .unwrap_or_else(|| ProviderErrorCode::Other(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::MessageRejected => "MessageRejected",
            Self::InvalidParameterValue => "InvalidParameterValue",
            Self::Throttling => "Throttling",
            Self::Other(code) => code,
        }
    }
}

impl std::fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a mail provider.
#[derive(Debug, Clone, Error)]
#[error("mail provider error {code}: {message}")]
pub struct MailError {
    pub code: ProviderErrorCode,
    pub message: String,
}

impl MailError {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Anything that can deliver an [`OutboundEmail`].
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}

/// Error body returned by the mail relay.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    code: Option<String>,
    #[serde(default)]
    message: String,
}

/// Mail relay client speaking JSON over HTTP.
pub struct HttpMailSender {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpMailSender {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl MailSender for HttpMailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let mut request = self.client.post(&self.endpoint).json(email);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            let code = if e.is_timeout() { "Timeout" } else { "TransportError" };
            MailError::new(ProviderErrorCode::Other(code.to_string()), e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(%status, "Mail relay accepted message");
            return Ok(());
        }

        let body: Option<ProviderErrorBody> = response.json().await.ok();
        let (code, message) = match body {
            Some(ProviderErrorBody {
                code: Some(code),
                message,
            }) => (ProviderErrorCode::from_code(&code), message),
            Some(ProviderErrorBody { code: None, message }) => (status_code(status), message),
            None => (status_code(status), status.to_string()),
        };

        Err(MailError::new(code, message))
    }
}

fn status_code(status: reqwest::StatusCode) -> ProviderErrorCode {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        ProviderErrorCode::Throttling
    } else {
        ProviderErrorCode::Other(format!("Http{}", status.as_u16()))
    }
}

/// Development transport: logs the notification instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailSender;

#[async_trait]
impl MailSender for LogMailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        info!(
            from = %email.from,
            to = ?email.to,
            reply_to = ?email.reply_to,
            subject = %email.subject,
            body = %email.text,
            "Mail transport is 'log'; notification not sent"
        );
        Ok(())
    }
}
