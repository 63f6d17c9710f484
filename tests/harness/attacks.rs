// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Abuse patterns for contact form security testing.

use super::generators;
use portfolio_api::submission::ContactRequest;
use std::time::Duration;

/// What each simulated request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Genuine,
    Honeypot,
    KeywordSpam,
    LinkSpam { links: usize },
}

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Number of unique IPs to simulate; requests rotate through them
    pub unique_ips: usize,
    /// Simulated time between consecutive submissions
    pub spacing: Duration,
    pub payload: Payload,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            unique_ips: 1,
            spacing: Duration::ZERO,
            payload: Payload::Genuine,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single IP flood of otherwise valid submissions.
    pub fn single_ip_flood() -> Self {
        Self {
            total_requests: 200,
            unique_ips: 1,
            ..Default::default()
        }
    }

    /// Distributed flood: many IPs, five submissions each.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 500,
            unique_ips: 100,
            ..Default::default()
        }
    }

    /// Bots that fill in the hidden field.
    pub fn honeypot_wave() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 1,
            payload: Payload::Honeypot,
            ..Default::default()
        }
    }

    /// Keyword spam from fresh addresses, so every request reaches the
    /// classifier.
    pub fn keyword_spam_wave() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 50,
            payload: Payload::KeywordSpam,
            ..Default::default()
        }
    }

    /// Link spam from fresh addresses.
    pub fn link_spam_wave() -> Self {
        Self {
            total_requests: 50,
            unique_ips: 50,
            payload: Payload::LinkSpam { links: 5 },
            ..Default::default()
        }
    }

    /// Slow drip: one submission every five minutes from one address.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 12,
            unique_ips: 1,
            spacing: Duration::from_secs(301),
            ..Default::default()
        }
    }

    /// Request body for submission `i`.
    pub fn request(&self, i: usize) -> ContactRequest {
        match self.payload {
            Payload::Genuine => generators::genuine(i),
            Payload::Honeypot => generators::honeypot(i),
            Payload::KeywordSpam => generators::keyword_spam(i),
            Payload::LinkSpam { links } => generators::link_spam(i, links),
        }
    }

    /// Simulated time covered by the whole attack.
    pub fn simulated_duration(&self) -> Duration {
        self.spacing * self.total_requests as u32
    }
}

/// Expected outcome for an attack pattern.
pub struct AttackExpectations {
    /// Most notifications the attack may cause
    pub max_delivered: usize,
    /// Description of expected behavior
    pub description: &'static str,
}

impl AttackConfig {
    /// Expected outcome under a limit of `max_per_window` per address,
    /// assuming the attack fits in one window.
    pub fn expectations(&self, max_per_window: usize) -> AttackExpectations {
        match self.payload {
            Payload::Honeypot => AttackExpectations {
                max_delivered: 0,
                description: "Honeypot hits are simulated, never delivered",
            },
            Payload::KeywordSpam | Payload::LinkSpam { .. } => AttackExpectations {
                max_delivered: 0,
                description: "Spam is stopped by the classifier",
            },
            Payload::Genuine => AttackExpectations {
                max_delivered: self.unique_ips.min(self.total_requests) * max_per_window,
                description: "Each address is capped per window",
            },
        }
    }
}
