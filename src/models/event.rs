// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event creation request and response bodies.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::services::calendar::InsertedEvent;

/// Calendar used when the request names none.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Body of `POST /events`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub summary: String,
    /// ISO 8601 date-time with offset; Google validates it.
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub calendar_id: Option<String>,
}

impl CreateEventRequest {
    /// Reject requests Google would refuse for obvious reasons.
    pub fn validate(&self) -> Result<()> {
        if self.summary.trim().is_empty() {
            return Err(AppError::BadRequest("'summary' must not be empty".to_string()));
        }
        if self.start.trim().is_empty() || self.end.trim().is_empty() {
            return Err(AppError::BadRequest(
                "'start' and 'end' must be ISO 8601 date-times".to_string(),
            ));
        }
        Ok(())
    }

    /// Target calendar, falling back to the caller's primary calendar.
    ///
    /// A supplied id is forwarded verbatim; Google decides whether it exists.
    pub fn calendar_id(&self) -> &str {
        self.calendar_id.as_deref().unwrap_or(DEFAULT_CALENDAR_ID)
    }
}

/// Body returned by `POST /events`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventResponse {
    pub event_id: String,
    pub html_link: String,
    /// Always serialized; `null` when Google created no video entry point.
    pub meet_link: Option<String>,
    pub status: String,
}

impl From<InsertedEvent> for CreateEventResponse {
    fn from(event: InsertedEvent) -> Self {
        let meet_link = event.meet_link().map(str::to_string);
        Self {
            event_id: event.id,
            html_link: event.html_link,
            meet_link,
            status: event.status,
        }
    }
}
