// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar Bridge API Server
//!
//! Lets callers create Google Calendar events with Meet links without
//! handling Google's OAuth flow themselves.

use calendar_bridge::{
    config::Config,
    services::{build_http_client, GoogleCalendarClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Calendar Bridge");

    // Missing credentials only fail the requests that need them
    if let Err(e) = config.require_google_oauth() {
        tracing::warn!(error = %e, "OAuth endpoints and event creation are unavailable");
    }
    if config.google_refresh_token.is_none() {
        tracing::warn!("No refresh token configured; visit /oauth/start to obtain one");
    }

    let http = build_http_client()?;
    let calendar = Arc::new(GoogleCalendarClient::new(
        http.clone(),
        config.endpoints.calendar_api_base.clone(),
    ));

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        http,
        calendar,
    });

    // Build router
    let app = calendar_bridge::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("calendar_bridge=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
