// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Server misconfigured, missing environment variables: {}", .0.join(", "))]
    MissingConfig(Vec<&'static str>),

    #[error("Authentication required: {0}")]
    Unauthorized(String),

    #[error("Invalid or expired OAuth state")]
    InvalidState,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Google authentication failed: {0}")]
    UpstreamAuth(String),

    #[error("Google Calendar API error: {0}")]
    CalendarApi(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::MissingConfig(names) => {
                tracing::error!(missing = ?names, "Required configuration missing");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_error",
                    Some(format!("missing environment variables: {}", names.join(", "))),
                )
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", Some(msg.clone()))
            }
            AppError::InvalidState => (StatusCode::BAD_REQUEST, "invalid_state", None),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::UpstreamAuth(msg) => {
                tracing::warn!(error = %msg, "Google authentication failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_auth_error",
                    Some(msg.clone()),
                )
            }
            AppError::CalendarApi(msg) => {
                tracing::warn!(error = %msg, "Google Calendar API error");
                (StatusCode::BAD_GATEWAY, "calendar_error", Some(msg.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
