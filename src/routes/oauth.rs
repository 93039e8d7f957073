// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth routes that hand out a refresh token.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::GOOGLE_REFRESH_TOKEN;
use crate::error::{AppError, Result};
use crate::services::OAuthFlow;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/oauth/start", get(oauth_start))
        .route("/oauth/callback", get(oauth_callback))
}

/// Start OAuth flow - redirect to Google's consent page.
async fn oauth_start(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let settings = state.config.require_google_oauth()?;
    let flow = OAuthFlow::new(settings, &state.config.endpoints, &state.http)?;
    let auth_url = flow.authorize_url()?;

    tracing::info!(
        redirect_url = %flow.redirect_url(),
        "Starting OAuth flow, redirecting to Google"
    );

    Ok(Redirect::temporary(auth_url.as_str()))
}

/// Query parameters Google appends to the redirect.
#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Refresh token handed back to the operator.
#[derive(Debug, Serialize, Deserialize)]
pub struct CallbackResponse {
    pub ok: bool,
    pub message: String,
    pub refresh_token: String,
    pub note: String,
}

/// OAuth callback - exchange code for a refresh token and return it.
///
/// Nothing is stored server-side: if the caller loses this response the
/// flow has to be repeated.
async fn oauth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<CallbackResponse>> {
    let settings = state.config.require_google_oauth()?;

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Google");
        return Err(AppError::BadRequest(format!(
            "Google returned an OAuth error: {}",
            error
        )));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'code' parameter".to_string()))?;

    let flow = OAuthFlow::new(settings, &state.config.endpoints, &state.http)?;
    flow.verify_state(params.state.as_deref().unwrap_or_default())?;

    tracing::info!(
        redirect_url = %flow.redirect_url(),
        "Exchanging authorization code for tokens"
    );
    let refresh_token = flow.exchange_code(&code).await?;
    tracing::info!("OAuth successful, refresh token issued");

    Ok(Json(CallbackResponse {
        ok: true,
        message: format!(
            "Store refresh_token as the {} secret of this deployment and restart it.",
            GOOGLE_REFRESH_TOKEN
        ),
        refresh_token,
        note: "This token grants full read/write access to the calendar. \
               Keep it secret; it is not stored by this service."
            .to_string(),
    }))
}
