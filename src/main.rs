// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio API Service
//!
//! Serves the contact form, blog posts and testimonials for a portfolio
//! site.
//!
//! ## Configuration
//!
//! Loaded from `portfolio.toml` (or the file named by `PORTFOLIO_CONFIG`)
//! and `PORTFOLIO_*` environment variables, nested keys joined by `__`:
//!
//! - `PORTFOLIO_BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `PORTFOLIO_RATE_LIMIT__MAX_SUBMISSIONS`: Submissions per window (default: 3)
//! - `PORTFOLIO_RATE_LIMIT__WINDOW_SECS`: Window length (default: 900)
//! - `PORTFOLIO_MAIL__TRANSPORT`: `log` or `http` (default: log)
//! - `CONTACT_EMAIL`: Notification recipient

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use portfolio_api::{build_router, build_state, Collaborators, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::load()?;
    info!(
        bind_addr = %config.bind_addr,
        api_prefix = %config.api_prefix,
        environment = ?config.environment,
        max_submissions = config.rate_limit.max_submissions,
        window_secs = config.rate_limit.window_secs,
        "Starting portfolio API"
    );

    let addr = config.socket_addr()?;
    let collaborators = Collaborators::from_config(&config)?;
    let state = build_state(config, collaborators)?;

    // Spawn cleanup task
    let limiter = state.pipeline.limiter().clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(limiter.config().cleanup_interval());
        loop {
            interval.tick().await;
            let removed = limiter.cleanup().await;
            if removed > 0 {
                info!(removed, "Expired rate limit windows purged");
            }
        }
    });

    let app = build_router(state)?;

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
