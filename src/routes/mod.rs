// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod events;
pub mod oauth;

use crate::middleware::auth::require_api_key;
use crate::AppState;
use axum::{extract::Request, middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

pub const SERVICE_NAME: &str = "tass-calendar-bridge";

#[derive(Serialize)]
pub struct RootResponse {
    pub service: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        service: SERVICE_NAME.to_string(),
        status: "up".to_string(),
    })
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Span for one HTTP request.
///
/// Records the path only: the OAuth callback query carries a one-time
/// authorization code.
pub fn request_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        version = ?request.version(),
    )
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no API key required)
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(oauth::routes());

    // Event creation is gated when BRIDGE_API_KEY is set
    let event_routes = events::routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .merge(public_routes)
        .merge(event_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
