// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types and their HTTP translation.
//!
//! Every error body is `{ "error": message }`. Content-route errors may add
//! a `message` with internal detail, but only in development.

use crate::dispatcher::DispatchError;
use crate::pipeline::Stage;
use crate::spam::ContentPolicyError;
use crate::store::StoreError;
use crate::validator::ValidationError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;
use std::time::Duration;
use thiserror::Error;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

/// Why a contact submission was rejected.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Too many contact form submissions. Please try again later.")]
    RateLimited { retry_after: Duration },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    ContentPolicy(#[from] ContentPolicyError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Request body was not a JSON object of strings
    #[error("Invalid request body")]
    MalformedBody(String),
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Validation(_) | Self::ContentPolicy(_) | Self::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Dispatch(DispatchError::Rejected | DispatchError::InvalidConfig) => {
                StatusCode::BAD_REQUEST
            }
            Self::Dispatch(DispatchError::Throttled) => StatusCode::TOO_MANY_REQUESTS,
            Self::Dispatch(DispatchError::Unknown { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Pipeline stage at which the rejection fired.
    pub fn stage(&self) -> Stage {
        match self {
            Self::MalformedBody(_) => Stage::Received,
            Self::RateLimited { .. } => Stage::RateChecked,
            Self::Validation(_) => Stage::Validated,
            Self::ContentPolicy(_) => Stage::Classified,
            Self::Dispatch(_) => Stage::Dispatched,
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse::new(self.to_string()));

        match self {
            Self::RateLimited { retry_after } => {
                // Round up so clients never retry a moment too early.
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                (status, [(header::RETRY_AFTER, secs.to_string())], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

/// Errors raised by the content routes.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Forbidden")]
    Forbidden,

    /// Store failure, reported with a route-specific public message
    #[error("{public}")]
    Store {
        public: &'static str,
        #[source]
        source: StoreError,
        expose_detail: bool,
    },

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn store(public: &'static str, expose_detail: bool) -> impl FnOnce(StoreError) -> Self {
        move |source| AppError::Store {
            public,
            source,
            expose_detail,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Store { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = ErrorResponse::new(self.to_string());

        match &self {
            Self::Store {
                source,
                expose_detail: true,
                ..
            } => body.message = Some(source.to_string()),
            Self::Store { source, .. } => {
                tracing::error!(error = %source, "Content store failure");
            }
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
            }
            _ => {}
        }

        (status, Json(body)).into_response()
    }
}

/// Response for a handler that panicked. Detail is included only when
/// `expose_detail` is set.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>, expose_detail: bool) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    let mut body = ErrorResponse::new("Internal server error");
    if expose_detail {
        body.message = Some(detail);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
