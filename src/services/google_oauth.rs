// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth2 flow built on the `oauth2` crate.
//!
//! Handles:
//! - Consent URL generation (offline access, forced consent, signed state)
//! - Authorization code exchange for a refresh token
//! - Minting short-lived access tokens from the configured refresh token
//!
//! An [`OAuthFlow`] is cheap to build and is constructed per request from
//! configuration that already passed the guard, then dropped.

use oauth2::basic::{BasicClient, BasicErrorResponse};
use oauth2::url::Url;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet,
    EndpointSet, RedirectUrl, RefreshToken, RequestTokenError, Scope, TokenResponse, TokenUrl,
};

use crate::config::{Config, GoogleEndpoints, GoogleOAuthSettings, GOOGLE_REFRESH_TOKEN};
use crate::error::{AppError, Result};
use crate::services::oauth_state;

/// Full read/write access to the user's calendars.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// `BasicClient` with the authorization and token endpoints set.
type GoogleOAuthClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Per-request OAuth client for the Google authorization-code flow.
pub struct OAuthFlow {
    client: GoogleOAuthClient,
    http: reqwest::Client,
    settings: GoogleOAuthSettings,
}

impl OAuthFlow {
    /// Build the flow. `settings` must come from [`Config::require_google_oauth`].
    ///
    /// `http` must not follow redirects; see [`crate::services::build_http_client`].
    pub fn new(
        settings: GoogleOAuthSettings,
        endpoints: &GoogleEndpoints,
        http: &reqwest::Client,
    ) -> Result<Self> {
        let auth_url = AuthUrl::new(endpoints.auth_url.clone())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid auth URL: {}", e)))?;
        let token_url = TokenUrl::new(endpoints.token_url.clone())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid token URL: {}", e)))?;
        let redirect_url = RedirectUrl::new(settings.redirect_url())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid BASE_URL: {}", e)))?;

        let client = BasicClient::new(ClientId::new(settings.client_id.clone()))
            .set_client_secret(ClientSecret::new(settings.client_secret.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_auth_type(AuthType::RequestBody)
            .set_redirect_uri(redirect_url);

        Ok(Self {
            client,
            http: http.clone(),
            settings,
        })
    }

    /// The callback URL this flow sends to Google.
    pub fn redirect_url(&self) -> String {
        self.settings.redirect_url()
    }

    /// Build the consent page URL with a freshly signed state.
    pub fn authorize_url(&self) -> Result<Url> {
        let nonce = CsrfToken::new_random();
        let state = oauth_state::sign_state(
            nonce.secret(),
            oauth_state::now_millis()?,
            self.settings.client_secret.as_bytes(),
        )?;

        let (url, _state) = self
            .client
            .authorize_url(move || CsrfToken::new(state))
            .add_scope(Scope::new(CALENDAR_SCOPE.to_string()))
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .url();

        Ok(url)
    }

    /// Reject callback states this deployment did not issue recently.
    pub fn verify_state(&self, state: &str) -> Result<()> {
        let now = oauth_state::now_millis()?;
        if oauth_state::verify_state(state, self.settings.client_secret.as_bytes(), now) {
            Ok(())
        } else {
            Err(AppError::InvalidState)
        }
    }

    /// Exchange an authorization code and return the issued refresh token.
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| {
                AppError::UpstreamAuth(format!(
                    "Authorization code exchange failed: {}",
                    describe_token_error(e)
                ))
            })?;

        token
            .refresh_token()
            .map(|t| t.secret().clone())
            .ok_or_else(|| {
                AppError::UpstreamAuth(
                    "Google did not issue a refresh token; revoke the app's access \
                     in your Google account and repeat /oauth/start"
                        .to_string(),
                )
            })
    }

    /// Force a refresh-token grant and return a new access token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String> {
        let token = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| {
                AppError::UpstreamAuth(format!(
                    "Token refresh failed: {}",
                    describe_token_error(e)
                ))
            })?;

        Ok(token.access_token().secret().clone())
    }
}

/// Obtain a fresh access token from the configured refresh token.
///
/// Nothing is cached: every call performs one refresh-token grant.
pub async fn mint_access_token(config: &Config, http: &reqwest::Client) -> Result<String> {
    let settings = config.require_google_oauth()?;

    let refresh_token = config.google_refresh_token.as_deref().ok_or_else(|| {
        AppError::Unauthorized(format!(
            "No refresh token configured. Complete the flow at /oauth/start \
             and set {} to the returned refresh_token.",
            GOOGLE_REFRESH_TOKEN
        ))
    })?;

    let flow = OAuthFlow::new(settings, &config.endpoints, http)?;
    flow.refresh_access_token(refresh_token).await
}

fn describe_token_error<RE>(err: RequestTokenError<RE, BasicErrorResponse>) -> String
where
    RE: std::error::Error + 'static,
{
    match err {
        RequestTokenError::ServerResponse(response) => response.to_string(),
        RequestTokenError::Request(e) => format!("request failed: {}", e),
        other => other.to_string(),
    }
}
