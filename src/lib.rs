// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio API
//!
//! Backend for a personal portfolio site:
//!
//! - Contact form pipeline: honeypot, per-address rate limiting
//!   (3 per 15 minutes by default), validation, sanitization, spam
//!   classification and notification dispatch
//! - Blog post and testimonial storage with admin-only writes
//! - Health and Prometheus endpoints

pub mod auth;
pub mod clock;
pub mod config;
pub mod content;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod honeypot;
pub mod limiter;
pub mod mailer;
pub mod metrics;
pub mod models;
pub mod origin;
pub mod pipeline;
pub mod sanitizer;
pub mod server;
pub mod spam;
pub mod store;
pub mod submission;
pub mod validator;

pub use config::Config;
pub use limiter::{RateLimitResult, RateLimiter};
pub use pipeline::{Acceptance, ContactPipeline, Stage};
pub use server::{build_router, build_state, Collaborators};
pub use validator::{SubmissionValidator, ValidationError};
