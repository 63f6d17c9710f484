// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Notification rendering and dispatch.
//!
//! One send attempt per accepted submission. Nothing here retries; a
//! provider failure is classified and handed back to the pipeline.

use crate::config::ContactConfig;
use crate::mailer::{MailError, MailSender, OutboundEmail, ProviderErrorCode};
use crate::submission::SanitizedSubmission;
use html_escape::encode_text;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

/// Classified dispatch failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Email could not be sent. Please try again later.")]
    Rejected,

    #[error("Invalid email configuration. Please contact the site administrator.")]
    InvalidConfig,

    #[error("Too many requests. Please try again later.")]
    Throttled,

    #[error("Failed to send message. Please try again later.")]
    Unknown { code: String },
}

impl From<&MailError> for DispatchError {
    fn from(err: &MailError) -> Self {
        match &err.code {
            ProviderErrorCode::MessageRejected => DispatchError::Rejected,
            ProviderErrorCode::InvalidParameterValue => DispatchError::InvalidConfig,
            ProviderErrorCode::Throttling => DispatchError::Throttled,
            ProviderErrorCode::Other(code) => DispatchError::Unknown { code: code.clone() },
        }
    }
}

/// Renders submissions into notifications and sends them.
pub struct NotificationDispatcher {
    sender: Arc<dyn MailSender>,
    contact: ContactConfig,
    timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(sender: Arc<dyn MailSender>, contact: ContactConfig, timeout: Duration) -> Self {
        Self {
            sender,
            contact,
            timeout,
        }
    }

    /// Build the outbound message for a sanitized submission.
    pub fn render(&self, submission: &SanitizedSubmission) -> OutboundEmail {
        let recipient = self.contact.recipient.clone();
        OutboundEmail {
            from: self.contact.source_address().to_string(),
            to: vec![recipient],
            reply_to: vec![submission.email.clone()],
            subject: format!("{}: {}", self.contact.subject_prefix, submission.subject),
            text: render_text(submission, &self.contact.site_name),
            html: render_html(submission, &self.contact.site_name),
        }
    }

    /// Render and send. Expiry of the send timeout counts as an
    /// unclassified failure.
    pub async fn dispatch(&self, submission: &SanitizedSubmission) -> Result<(), DispatchError> {
        let email = self.render(submission);

        match tokio::time::timeout(self.timeout, self.sender.send(&email)).await {
            Ok(Ok(())) => {
                debug!(reply_to = %submission.email, "Notification sent");
                Ok(())
            }
            Ok(Err(err)) => {
                error!(code = %err.code, error = %err.message, "Mail provider rejected notification");
                Err(DispatchError::from(&err))
            }
            Err(_) => {
                error!(timeout_ms = self.timeout.as_millis() as u64, "Mail send timed out");
                Err(DispatchError::Unknown {
                    code: "Timeout".to_string(),
                })
            }
        }
    }
}

fn render_text(s: &SanitizedSubmission, site_name: &str) -> String {
    format!(
        "New contact form submission from your portfolio website:\n\n\
         Name: {name}\n\
         Email: {email}\n\
         Subject: {subject}\n\n\
         Message:\n{message}\n\n\
         ---\n\
         This message was sent from the contact form on {site}\n\
         IP: {origin}",
        name = s.name,
        email = s.email,
        subject = s.subject,
        message = s.message,
        site = site_name,
        origin = s.origin,
    )
}

fn render_html(s: &SanitizedSubmission, site_name: &str) -> String {
    let message = encode_text(&s.message).replace('\n', "<br>");
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: #000; color: #fff; padding: 20px; border-radius: 5px 5px 0 0; }}
    .content {{ background: #f9f9f9; padding: 20px; border-radius: 0 0 5px 5px; }}
    .field {{ margin-bottom: 15px; }}
    .label {{ font-weight: bold; color: #555; }}
    .message-box {{ background: #fff; padding: 15px; border-left: 4px solid #000; margin-top: 10px; }}
    .footer {{ text-align: center; color: #888; font-size: 12px; margin-top: 20px; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header"><h2>New Contact Form Submission</h2></div>
    <div class="content">
      <div class="field">
        <div class="label">From:</div>
        <div class="value">{name} &lt;{email}&gt;</div>
      </div>
      <div class="field">
        <div class="label">Subject:</div>
        <div class="value">{subject}</div>
      </div>
      <div class="field">
        <div class="label">Message:</div>
        <div class="message-box">{message}</div>
      </div>
      <div class="footer">
        This message was sent from the contact form on {site}<br>
        IP: {origin}
      </div>
    </div>
  </div>
</body>
</html>"#,
        name = encode_text(&s.name),
        email = encode_text(&s.email),
        subject = encode_text(&s.subject),
        message = message,
        site = encode_text(site_name),
        origin = s.origin,
    )
}
