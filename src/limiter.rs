// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for contact form submissions.
//!
//! Each origin address gets a window that opens on its first allowed
//! submission and resets once the configured duration has elapsed. Only
//! allowed checks count against the window. Counters live in a
//! [`WindowStore`] passed in at construction; the in-memory store does not
//! survive restarts and is not shared between processes.

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining submissions in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Time until the window resets
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Submission count for one address.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitWindow {
    pub count: u32,
    pub started_at: Instant,
}

impl RateLimitWindow {
    fn open(now: Instant) -> Self {
        Self {
            count: 0,
            started_at: now,
        }
    }

    pub fn is_expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.started_at) >= window
    }

    pub fn resets_at(&self, window: Duration) -> Instant {
        self.started_at + window
    }
}

/// Outcome of an atomic check-and-increment.
#[derive(Debug, Clone, Copy)]
pub struct WindowDecision {
    pub allowed: bool,
    /// Count after the decision was applied
    pub count: u32,
    pub resets_at: Instant,
}

/// Per-address counter storage.
///
/// `try_acquire` must check and increment as one step with respect to
/// concurrent callers for the same address.
#[async_trait]
pub trait WindowStore: Send + Sync {
    async fn try_acquire(
        &self,
        address: IpAddr,
        now: Instant,
        window: Duration,
        limit: u32,
    ) -> WindowDecision;

    /// Drop windows that have expired. Returns how many were removed.
    async fn purge_expired(&self, now: Instant, window: Duration) -> usize;

    async fn len(&self) -> usize;
}

/// Window store backed by a process-local map.
#[derive(Debug, Default)]
pub struct InMemoryWindowStore {
    windows: RwLock<HashMap<IpAddr, RateLimitWindow>>,
}

impl InMemoryWindowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WindowStore for InMemoryWindowStore {
    async fn try_acquire(
        &self,
        address: IpAddr,
        now: Instant,
        window: Duration,
        limit: u32,
    ) -> WindowDecision {
        let mut windows = self.windows.write().await;
        let entry = windows
            .entry(address)
            .or_insert_with(|| RateLimitWindow::open(now));

        if entry.is_expired(now, window) {
            *entry = RateLimitWindow::open(now);
        }

        let allowed = entry.count < limit;
        if allowed {
            entry.count += 1;
        }

        WindowDecision {
            allowed,
            count: entry.count,
            resets_at: entry.resets_at(window),
        }
    }

    async fn purge_expired(&self, now: Instant, window: Duration) -> usize {
        let mut windows = self.windows.write().await;
        let before = windows.len();
        windows.retain(|_, w| !w.is_expired(now, window));
        before - windows.len()
    }

    async fn len(&self) -> usize {
        self.windows.read().await.len()
    }
}

/// Thread-safe rate limiter.
pub struct RateLimiter {
    config: RateLimitConfig,
    store: Arc<dyn WindowStore>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create a rate limiter over a fresh in-memory store.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_store(config, Arc::new(InMemoryWindowStore::new()), Arc::new(SystemClock))
    }

    pub fn with_store(
        config: RateLimitConfig,
        store: Arc<dyn WindowStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            store,
            clock,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check and count a submission from `address` at the current time.
    pub async fn check(&self, address: IpAddr) -> RateLimitResult {
        self.check_at(address, self.clock.now()).await
    }

    /// Check and count a submission from `address` at `now`.
    pub async fn check_at(&self, address: IpAddr, now: Instant) -> RateLimitResult {
        let decision = self
            .store
            .try_acquire(
                address,
                now,
                self.config.window_duration(),
                self.config.max_submissions,
            )
            .await;

        let until_reset = decision.resets_at.saturating_duration_since(now);

        if decision.allowed {
            RateLimitResult::Allowed {
                remaining: self.config.max_submissions.saturating_sub(decision.count),
                reset_in: until_reset,
            }
        } else {
            debug!(%address, retry_after = ?until_reset, "Contact rate limit exceeded");
            RateLimitResult::Limited {
                retry_after: until_reset,
            }
        }
    }

    /// Clean up expired windows (should be called periodically).
    pub async fn cleanup(&self) -> usize {
        let removed = self
            .store
            .purge_expired(self.clock.now(), self.config.window_duration())
            .await;
        if removed > 0 {
            debug!(removed, "Purged expired rate limit windows");
        }
        removed
    }

    /// Number of addresses currently tracked.
    pub async fn tracked(&self) -> usize {
        self.store.len().await
    }
}
