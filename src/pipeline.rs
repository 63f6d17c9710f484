// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact submission pipeline.
//!
//! Stages run strictly in [`Stage::ORDER`]. A submission ends either
//! accepted (one notification sent, or a simulated acceptance for a
//! honeypot hit) or rejected with no notification sent. Nothing is retried.

use crate::dispatcher::NotificationDispatcher;
use crate::error::ContactError;
use crate::honeypot::{self, HoneypotVerdict};
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::metrics::{Metrics, SubmissionOutcome};
use crate::spam::{Classification, SpamClassifier};
use crate::submission::ContactRequest;
use crate::validator::SubmissionValidator;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Pipeline states, in the order a submission passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Received,
    HoneypotChecked,
    RateChecked,
    Validated,
    Sanitized,
    Classified,
    Dispatched,
}

impl Stage {
    pub const ORDER: [Stage; 7] = [
        Stage::Received,
        Stage::HoneypotChecked,
        Stage::RateChecked,
        Stage::Validated,
        Stage::Sanitized,
        Stage::Classified,
        Stage::Dispatched,
    ];
}

/// How a submission was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// Notification handed to the mail provider
    Delivered,
    /// Honeypot hit; the caller sees success but nothing was sent
    Simulated,
}

/// Sequences the contact stages for one request at a time.
pub struct ContactPipeline {
    validator: SubmissionValidator,
    classifier: SpamClassifier,
    limiter: Arc<RateLimiter>,
    dispatcher: NotificationDispatcher,
    metrics: Metrics,
}

impl ContactPipeline {
    pub fn new(
        validator: SubmissionValidator,
        classifier: SpamClassifier,
        limiter: Arc<RateLimiter>,
        dispatcher: NotificationDispatcher,
        metrics: Metrics,
    ) -> Self {
        Self {
            validator,
            classifier,
            limiter,
            dispatcher,
            metrics,
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Run a submission from `origin` through every stage.
    pub async fn submit(
        &self,
        request: ContactRequest,
        origin: IpAddr,
    ) -> Result<Acceptance, ContactError> {
        let result = self.run(request, origin).await;

        let outcome = match &result {
            Ok(Acceptance::Delivered) => SubmissionOutcome::Accepted,
            Ok(Acceptance::Simulated) => SubmissionOutcome::Honeypot,
            Err(ContactError::RateLimited { .. }) => SubmissionOutcome::RateLimited,
            Err(ContactError::Validation(_) | ContactError::MalformedBody(_)) => {
                SubmissionOutcome::Invalid
            }
            Err(ContactError::ContentPolicy(_)) => SubmissionOutcome::ContentPolicy,
            Err(ContactError::Dispatch(_)) => SubmissionOutcome::DispatchFailed,
        };
        self.metrics.record(outcome);

        if let Err(err) = &result {
            info!(
                %origin,
                stage = ?err.stage(),
                status = err.status().as_u16(),
                reason = ?err,
                "Contact submission rejected"
            );
        }

        result
    }

    async fn run(&self, request: ContactRequest, origin: IpAddr) -> Result<Acceptance, ContactError> {
        enter(Stage::Received, origin);

        if honeypot::inspect(request.honeypot.as_deref()) == HoneypotVerdict::LikelyAutomated {
            warn!(
                target: "audit",
                %origin,
                "Honeypot triggered - likely bot submission, returning simulated success"
            );
            return Ok(Acceptance::Simulated);
        }
        enter(Stage::HoneypotChecked, origin);

        if let RateLimitResult::Limited { retry_after } = self.limiter.check(origin).await {
            return Err(ContactError::RateLimited { retry_after });
        }
        enter(Stage::RateChecked, origin);

        let submission = self.validator.validate(&request)?;
        enter(Stage::Validated, origin);

        let sanitized = submission.sanitize(origin);
        enter(Stage::Sanitized, origin);

        if let Classification::Flagged(reason) = self
            .classifier
            .classify(&sanitized.subject, &sanitized.message)
        {
            return Err(reason.into());
        }
        enter(Stage::Classified, origin);

        let started = Instant::now();
        let sent = self.dispatcher.dispatch(&sanitized).await;
        self.metrics
            .observe_dispatch(started.elapsed().as_secs_f64());
        sent?;
        enter(Stage::Dispatched, origin);

        info!(
            reply_to = %sanitized.email,
            %origin,
            "Contact form submission sent successfully"
        );
        Ok(Acceptance::Delivered)
    }
}

fn enter(stage: Stage, origin: IpAddr) {
    debug!(?stage, %origin, "Contact pipeline stage");
}
