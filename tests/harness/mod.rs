// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for the portfolio API.
//!
//! Provides recording and failing collaborators plus abuse simulation
//! helpers for the contact pipeline.

#![allow(dead_code)]

pub mod attacks;
pub mod generators;
pub mod metrics;

use async_trait::async_trait;
use axum::Router;
use portfolio_api::{
    auth::{Identity, IdentityError, IdentityVerifier},
    build_router, build_state,
    clock::ManualClock,
    config::Config,
    handlers::AppState,
    mailer::{MailError, MailSender, OutboundEmail, ProviderErrorCode},
    store::{DocumentStore, InMemoryDocumentStore, StoreError},
    Collaborators,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const EDITOR_TOKEN: &str = "editor-token";

/// Mail sender that keeps every message instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailSender {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
    fail_with: Option<ProviderErrorCode>,
}

impl RecordingMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sender whose every attempt fails with `code`. Attempts are still
    /// recorded.
    pub fn failing(code: ProviderErrorCode) -> Self {
        Self {
            fail_with: Some(code),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailSender for RecordingMailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        match &self.fail_with {
            Some(code) => Err(MailError::new(code.clone(), "simulated provider failure")),
            None => Ok(()),
        }
    }
}

/// Identity provider with a fixed token table.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityVerifier {
    tokens: HashMap<String, Identity>,
}

impl StaticIdentityVerifier {
    /// `admin-token` is an admin, `editor-token` is a plain user.
    pub fn standard() -> Self {
        Self::default()
            .with(ADMIN_TOKEN, "louie", &["admin"])
            .with(EDITOR_TOKEN, "sam", &["editors"])
    }

    pub fn with(mut self, token: &str, username: &str, groups: &[&str]) -> Self {
        self.tokens.insert(
            token.to_string(),
            Identity {
                username: username.to_string(),
                groups: groups.iter().map(|g| g.to_string()).collect(),
            },
        );
        self
    }
}

#[async_trait]
impl IdentityVerifier for StaticIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        Ok(self.tokens.get(token).cloned())
    }
}

/// Document store whose backend is always down.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl UnavailableStore {
    fn error() -> StoreError {
        StoreError::Backend("connection refused".to_string())
    }
}

#[async_trait]
impl DocumentStore for UnavailableStore {
    async fn get(&self, _table: &str, _id: &str) -> Result<Option<Value>, StoreError> {
        Err(Self::error())
    }

    async fn list(&self, _table: &str) -> Result<Vec<Value>, StoreError> {
        Err(Self::error())
    }

    async fn put(&self, _table: &str, _document: Value) -> Result<Value, StoreError> {
        Err(Self::error())
    }

    async fn update_fields(
        &self,
        _table: &str,
        _id: &str,
        _fields: Map<String, Value>,
    ) -> Result<Option<Value>, StoreError> {
        Err(Self::error())
    }

    async fn delete(&self, _table: &str, _id: &str) -> Result<bool, StoreError> {
        Err(Self::error())
    }
}

/// Document store that panics on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingStore;

#[async_trait]
impl DocumentStore for PanickingStore {
    async fn get(&self, _table: &str, _id: &str) -> Result<Option<Value>, StoreError> {
        panic!("document store poisoned")
    }

    async fn list(&self, _table: &str) -> Result<Vec<Value>, StoreError> {
        panic!("document store poisoned")
    }

    async fn put(&self, _table: &str, _document: Value) -> Result<Value, StoreError> {
        panic!("document store poisoned")
    }

    async fn update_fields(
        &self,
        _table: &str,
        _id: &str,
        _fields: Map<String, Value>,
    ) -> Result<Option<Value>, StoreError> {
        panic!("document store poisoned")
    }

    async fn delete(&self, _table: &str, _id: &str) -> Result<bool, StoreError> {
        panic!("document store poisoned")
    }
}

/// Fully wired application over test collaborators.
pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    pub mail: RecordingMailSender,
    pub clock: ManualClock,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(Config::default(), RecordingMailSender::new(), Arc::new(InMemoryDocumentStore::new()))
    }

    pub fn with_config(config: Config) -> Self {
        Self::build(config, RecordingMailSender::new(), Arc::new(InMemoryDocumentStore::new()))
    }

    pub fn with_mail(mail: RecordingMailSender) -> Self {
        Self::build(Config::default(), mail, Arc::new(InMemoryDocumentStore::new()))
    }

    pub fn build(
        config: Config,
        mail: RecordingMailSender,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        let clock = ManualClock::default();
        let collaborators = Collaborators {
            mail: Arc::new(mail.clone()),
            identity: Arc::new(StaticIdentityVerifier::standard()),
            documents,
            clock: Arc::new(clock.clone()),
        };
        let state = build_state(config, collaborators).expect("state");
        let router = build_router(state.clone()).expect("router");

        Self {
            state,
            router,
            mail,
            clock,
        }
    }
}
