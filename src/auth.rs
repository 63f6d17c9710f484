// SPDX-License-Identifier: PMPL-1.0-or-later
// Bearer-token authentication for the admin content routes
//
// Tokens are checked against an external identity provider, which returns
// the user's name and group memberships. Only members of the configured
// admin group may create, update or delete content.

use crate::error::AppError;
use crate::handlers::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Verified user returned by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Identity {
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Identity provider returned status {0}")]
    Status(u16),
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Resolve a bearer token. `Ok(None)` means the token is not valid.
    async fn verify(&self, token: &str) -> Result<Option<Identity>, IdentityError>;
}

/// Used when no identity provider is configured: no token is valid.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledIdentityVerifier;

#[async_trait]
impl IdentityVerifier for DisabledIdentityVerifier {
    async fn verify(&self, _token: &str) -> Result<Option<Identity>, IdentityError> {
        Ok(None)
    }
}

/// Identity provider client
pub struct HttpIdentityVerifier {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpIdentityVerifier {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            endpoint,
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(Some(response.json().await?))
        } else if matches!(status.as_u16(), 401 | 403 | 404) {
            Ok(None)
        } else {
            Err(IdentityError::Status(status.as_u16()))
        }
    }
}

/// Strip an optional `Bearer ` scheme from an Authorization value
pub fn bearer_token(value: &str) -> &str {
    value.strip_prefix("Bearer ").unwrap_or(value)
}

/// Extractor that admits only verified members of the admin group
#[derive(Debug, Clone)]
pub struct AdminUser(pub Identity);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AppError::Unauthorized("No authorization header"))?;

        let token = header
            .to_str()
            .map(bearer_token)
            .map_err(|_| AppError::Unauthorized("Invalid token"))?;

        let identity = match state.identity.verify(token).await {
            Ok(Some(identity)) => identity,
            Ok(None) => return Err(AppError::Unauthorized("Invalid token")),
            Err(e) => {
                warn!(error = %e, "Token verification failed");
                return Err(AppError::Unauthorized("Invalid token"));
            }
        };

        if !identity.in_group(&state.config.identity.admin_group) {
            warn!(user = %identity.username, "Admin route refused for non-admin user");
            return Err(AppError::Forbidden);
        }

        Ok(AdminUser(identity))
    }
}
