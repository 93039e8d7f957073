// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - Google integration layer.

pub mod calendar;
pub mod google_oauth;
pub mod oauth_state;

pub use calendar::{CalendarApi, GoogleCalendarClient};
pub use google_oauth::{mint_access_token, OAuthFlow};

/// Build the outbound HTTP client shared by the OAuth flow and Calendar calls.
///
/// Redirects are disabled: token endpoint responses must not be followed
/// anywhere else.
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
}
