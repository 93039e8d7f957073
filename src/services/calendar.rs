// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Calendar API client.
//!
//! The bridge needs exactly one capability from Google Calendar: inserting an
//! event with an auto-created Meet conference. That capability is the
//! [`CalendarApi`] trait so handlers can be exercised against a fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::CreateEventRequest;

/// Conference solution Google uses for Meet links.
const MEET_SOLUTION: &str = "hangoutsMeet";

/// Insert-event capability of a calendar provider.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Insert `event` into `calendar_id`, authorized by `access_token`.
    async fn insert_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: &EventInsert,
    ) -> Result<InsertedEvent, AppError>;
}

/// Google Calendar v3 REST client.
#[derive(Clone)]
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Create a client for the Calendar API rooted at `base_url`.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::CalendarApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::CalendarApi(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn insert_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: &EventInsert,
    ) -> Result<InsertedEvent, AppError> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .query(&[("conferenceDataVersion", "1")])
            .json(event)
            .send()
            .await
            .map_err(|e| AppError::CalendarApi(e.to_string()))?;

        Self::check_response_json(response).await
    }
}

// ─── Request body ────────────────────────────────────────────

/// Event resource sent to `events.insert`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInsert {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub conference_data: ConferenceDataRequest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceDataRequest {
    pub create_request: CreateConferenceRequest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConferenceRequest {
    /// Deduplicates conference creation on Google's side only.
    pub request_id: String,
    pub conference_solution_key: ConferenceSolutionKey,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConferenceSolutionKey {
    #[serde(rename = "type")]
    pub solution_type: String,
}

impl EventInsert {
    /// Build the insert body, attaching a fresh conference request id.
    pub fn from_request(request: &CreateEventRequest) -> Self {
        Self {
            summary: request.summary.clone(),
            description: request.description.clone(),
            start: EventDateTime {
                date_time: request.start.clone(),
            },
            end: EventDateTime {
                date_time: request.end.clone(),
            },
            conference_data: ConferenceDataRequest {
                create_request: CreateConferenceRequest {
                    request_id: uuid::Uuid::new_v4().to_string(),
                    conference_solution_key: ConferenceSolutionKey {
                        solution_type: MEET_SOLUTION.to_string(),
                    },
                },
            },
        }
    }
}

// ─── Response body ───────────────────────────────────────────

/// Subset of the event resource returned by `events.insert`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertedEvent {
    pub id: String,
    #[serde(default)]
    pub html_link: String,
    #[serde(default)]
    pub status: String,
    pub conference_data: Option<ConferenceData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceData {
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
}

/// A way to join the conference ("video", "phone", "sip", "more").
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    #[serde(default)]
    pub entry_point_type: String,
    pub uri: Option<String>,
}

impl InsertedEvent {
    /// URI of the first video entry point, if Google created one.
    pub fn meet_link(&self) -> Option<&str> {
        self.conference_data
            .as_ref()?
            .entry_points
            .iter()
            .find(|ep| ep.entry_point_type == "video")?
            .uri
            .as_deref()
    }
}
