// SPDX-License-Identifier: PMPL-1.0-or-later
//! Client address extraction

use crate::error::AppError;
use crate::handlers::AppState;
use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Address the rate limiter keys on.
///
/// Behind a trusted proxy this is the left-most `X-Forwarded-For` entry,
/// otherwise the peer address of the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginAddress(pub IpAddr);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for OriginAddress {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if state.config.trust_proxy {
            if let Some(ip) = forwarded_for(&parts.headers) {
                return Ok(OriginAddress(ip));
            }
        }

        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| OriginAddress(addr.ip()))
            .ok_or_else(|| AppError::Internal("Peer address unavailable".to_string()))
    }
}

/// First address in `X-Forwarded-For`, if it parses.
pub fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get(FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}
