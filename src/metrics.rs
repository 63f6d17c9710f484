// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the contact pipeline.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

/// Terminal outcome of a contact submission, used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted,
    Honeypot,
    RateLimited,
    Invalid,
    ContentPolicy,
    DispatchFailed,
}

impl SubmissionOutcome {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Honeypot => "honeypot",
            Self::RateLimited => "rate_limited",
            Self::Invalid => "invalid",
            Self::ContentPolicy => "content_policy",
            Self::DispatchFailed => "dispatch_failed",
        }
    }
}

/// Metric handles plus the registry they are registered in.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
    dispatch_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new(
                "contact_submissions_total",
                "Contact form submissions by terminal outcome",
            ),
            &["outcome"],
        )?;
        let dispatch_seconds = Histogram::with_opts(HistogramOpts::new(
            "contact_dispatch_seconds",
            "Time spent handing notifications to the mail provider",
        ))?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(dispatch_seconds.clone()))?;

        Ok(Self {
            registry,
            submissions,
            dispatch_seconds,
        })
    }

    pub fn record(&self, outcome: SubmissionOutcome) {
        self.submissions
            .with_label_values(&[outcome.as_label()])
            .inc();
    }

    pub fn observe_dispatch(&self, seconds: f64) {
        self.dispatch_seconds.observe(seconds);
    }

    pub fn count(&self, outcome: SubmissionOutcome) -> u64 {
        self.submissions
            .with_label_values(&[outcome.as_label()])
            .get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
