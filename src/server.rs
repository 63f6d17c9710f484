// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Application wiring: collaborators, shared state and the router.

use crate::auth::{DisabledIdentityVerifier, HttpIdentityVerifier, IdentityVerifier};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, CorsConfig, MailTransport};
use crate::content::Repository;
use crate::dispatcher::NotificationDispatcher;
use crate::error::panic_response;
use crate::handlers::{self, AppState};
use crate::limiter::{InMemoryWindowStore, RateLimiter};
use crate::mailer::{HttpMailSender, LogMailSender, MailSender};
use crate::metrics::Metrics;
use crate::pipeline::ContactPipeline;
use crate::spam::SpamClassifier;
use crate::store::{DocumentStore, InMemoryDocumentStore};
use crate::validator::SubmissionValidator;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to build mail client: {0}")]
    MailClient(#[source] reqwest::Error),

    #[error("Failed to build identity client: {0}")]
    IdentityClient(#[source] reqwest::Error),

    #[error("Failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Invalid CORS origin {0:?}")]
    CorsOrigin(String),
}

/// External collaborators the service talks to.
pub struct Collaborators {
    pub mail: Arc<dyn MailSender>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub documents: Arc<dyn DocumentStore>,
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    /// Production collaborators selected by configuration.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let mail: Arc<dyn MailSender> = match (config.mail.transport, &config.mail.endpoint) {
            (MailTransport::Http, Some(endpoint)) => Arc::new(
                HttpMailSender::new(
                    endpoint.clone(),
                    config.mail.api_key.clone(),
                    config.mail.timeout(),
                )
                .map_err(StartupError::MailClient)?,
            ),
            _ => Arc::new(LogMailSender),
        };

        let identity: Arc<dyn IdentityVerifier> = match &config.identity.endpoint {
            Some(endpoint) => Arc::new(
                HttpIdentityVerifier::new(endpoint.clone(), config.identity.timeout())
                    .map_err(StartupError::IdentityClient)?,
            ),
            None => Arc::new(DisabledIdentityVerifier),
        };

        info!(
            transport = ?config.mail.transport,
            identity = config.identity.endpoint.is_some(),
            "Collaborators configured"
        );

        Ok(Self {
            mail,
            identity,
            documents: Arc::new(InMemoryDocumentStore::new()),
            clock: Arc::new(SystemClock),
        })
    }
}

/// Assemble the shared state from configuration and collaborators.
pub fn build_state(config: Config, with: Collaborators) -> Result<Arc<AppState>, StartupError> {
    let metrics = Metrics::new()?;

    let limiter = Arc::new(RateLimiter::with_store(
        config.rate_limit.clone(),
        Arc::new(InMemoryWindowStore::new()),
        with.clock,
    ));
    let dispatcher =
        NotificationDispatcher::new(with.mail, config.contact.clone(), config.mail.timeout());
    let pipeline = ContactPipeline::new(
        SubmissionValidator::new(config.validation.clone()),
        SpamClassifier::new(config.spam.clone()),
        limiter,
        dispatcher,
        metrics.clone(),
    );

    Ok(Arc::new(AppState {
        pipeline,
        blog: Repository::new(with.documents.clone()),
        testimonials: Repository::new(with.documents),
        identity: with.identity,
        metrics,
        config,
    }))
}

/// Build the HTTP router for `state`.
pub fn build_router(state: Arc<AppState>) -> Result<Router, StartupError> {
    let config = &state.config;

    let api = Router::new()
        .route("/contact", post(handlers::contact))
        .route(
            "/blog",
            get(handlers::list_blog_posts).post(handlers::create_blog_post),
        )
        .route(
            "/blog/:id",
            get(handlers::get_blog_post)
                .put(handlers::update_blog_post)
                .delete(handlers::delete_blog_post),
        )
        .route(
            "/testimonials",
            get(handlers::list_testimonials).post(handlers::create_testimonial),
        )
        .route(
            "/testimonials/:id",
            get(handlers::get_testimonial)
                .put(handlers::update_testimonial)
                .delete(handlers::delete_testimonial),
        );

    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::health));

    router = if config.api_prefix == "/" {
        router.merge(api)
    } else {
        router.nest(&config.api_prefix, api)
    };

    if config.metrics.enabled {
        router = router.route(&config.metrics.path, get(handlers::metrics));
    }

    let expose_detail = config.environment.is_development();
    router = router
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| panic_response(panic, expose_detail),
        ))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&config.cors)? {
        router = router.layer(cors);
    }

    Ok(router.with_state(state))
}

fn cors_layer(config: &CorsConfig) -> Result<Option<CorsLayer>, StartupError> {
    if config.allowed_origins.is_empty() {
        return Ok(None);
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| StartupError::CorsOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    ))
}
