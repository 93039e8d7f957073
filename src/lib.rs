// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Calendar Bridge: create Google Calendar events with Meet links over HTTP
//!
//! This crate runs the OAuth handshake that yields a refresh token and uses
//! that token to insert events on the caller's behalf.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::CalendarApi;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Outbound client shared by token and Calendar requests
    pub http: reqwest::Client,
    pub calendar: Arc<dyn CalendarApi>,
}
