// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded once from environment variables.
//!
//! Provider credentials are optional at startup so the liveness endpoints
//! keep working on a half-configured deployment. Handlers that need them go
//! through [`Config::require_google_oauth`], which reports every missing
//! variable by name.

use crate::error::AppError;
use std::env;

pub const GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
pub const GOOGLE_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
pub const BASE_URL: &str = "BASE_URL";
pub const GOOGLE_REFRESH_TOKEN: &str = "GOOGLE_REFRESH_TOKEN";

const DEFAULT_PORT: u16 = 10000;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Google endpoints used by the OAuth flow and the Calendar client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleEndpoints {
    pub auth_url: String,
    pub token_url: String,
    pub calendar_api_base: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            calendar_api_base: CALENDAR_API_BASE.to_string(),
        }
    }
}

/// Application configuration, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google OAuth client ID
    pub google_client_id: Option<String>,
    /// Google OAuth client secret
    pub google_client_secret: Option<String>,
    /// Public base URL of this service, without trailing slash
    pub base_url: Option<String>,
    /// Refresh token obtained through /oauth/callback
    pub google_refresh_token: Option<String>,
    /// Bearer key required on POST /events when set
    pub api_key: Option<String>,
    /// Server port
    pub port: u16,
    pub endpoints: GoogleEndpoints,
}

/// Credentials that passed the configuration guard.
#[derive(Debug, Clone)]
pub struct GoogleOAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
}

impl GoogleOAuthSettings {
    /// The OAuth redirect target registered with Google.
    pub fn redirect_url(&self) -> String {
        format!("{}/oauth/callback", self.base_url)
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let defaults = GoogleEndpoints::default();

        Ok(Self {
            google_client_id: get(GOOGLE_CLIENT_ID),
            google_client_secret: get(GOOGLE_CLIENT_SECRET),
            base_url: get(BASE_URL).map(|url| url.trim_end_matches('/').to_string()),
            google_refresh_token: get(GOOGLE_REFRESH_TOKEN),
            api_key: get("BRIDGE_API_KEY"),
            port,
            endpoints: GoogleEndpoints {
                auth_url: get("GOOGLE_AUTH_URL").unwrap_or(defaults.auth_url),
                token_url: get("GOOGLE_TOKEN_URL").unwrap_or(defaults.token_url),
                calendar_api_base: get("GOOGLE_CALENDAR_API_BASE")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.calendar_api_base),
            },
        })
    }

    /// Fully populated config for tests.
    pub fn test_default() -> Self {
        Self {
            google_client_id: Some("test-client-id.apps.googleusercontent.com".to_string()),
            google_client_secret: Some("test_client_secret".to_string()),
            base_url: Some("https://bridge.example.com".to_string()),
            google_refresh_token: Some("test_refresh_token".to_string()),
            api_key: None,
            port: DEFAULT_PORT,
            endpoints: GoogleEndpoints::default(),
        }
    }

    /// Configuration guard: every OAuth credential must be present.
    ///
    /// Runs before any OAuth client or credential is constructed.
    pub fn require_google_oauth(&self) -> Result<GoogleOAuthSettings, AppError> {
        match (
            &self.google_client_id,
            &self.google_client_secret,
            &self.base_url,
        ) {
            (Some(client_id), Some(client_secret), Some(base_url)) => Ok(GoogleOAuthSettings {
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                base_url: base_url.clone(),
            }),
            _ => {
                let missing = [
                    (GOOGLE_CLIENT_ID, self.google_client_id.is_none()),
                    (GOOGLE_CLIENT_SECRET, self.google_client_secret.is_none()),
                    (BASE_URL, self.base_url.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(AppError::MissingConfig(missing))
            }
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
