// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event creation route.

use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

use crate::error::Result;
use crate::models::{CreateEventRequest, CreateEventResponse};
use crate::services::calendar::EventInsert;
use crate::services::mint_access_token;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/events", post(create_event))
}

/// Create a calendar event with a Meet link.
///
/// Not idempotent: every call inserts a new event.
async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateEventRequest>,
) -> Result<Json<CreateEventResponse>> {
    request.validate()?;

    let access_token = mint_access_token(&state.config, &state.http).await?;

    let calendar_id = request.calendar_id();
    let event = EventInsert::from_request(&request);
    let inserted = state
        .calendar
        .insert_event(&access_token, calendar_id, &event)
        .await?;

    tracing::info!(
        calendar_id,
        event_id = %inserted.id,
        has_meet_link = inserted.meet_link().is_some(),
        "Calendar event created"
    );

    Ok(Json(CreateEventResponse::from(inserted)))
}
