// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: app construction, a fake Google server, and a
//! recording calendar.

use async_trait::async_trait;
use axum::{
    extract::{Form, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use calendar_bridge::config::{Config, GoogleEndpoints};
use calendar_bridge::error::AppError;
use calendar_bridge::routes::create_router;
use calendar_bridge::services::calendar::{
    CalendarApi, ConferenceData, EntryPoint, EventInsert, InsertedEvent,
};
use calendar_bridge::services::{build_http_client, GoogleCalendarClient};
use calendar_bridge::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_CLIENT_ID: &str = "test-client-id.apps.googleusercontent.com";
pub const TEST_CLIENT_SECRET: &str = "test_client_secret";
pub const TEST_BASE_URL: &str = "https://bridge.example.com";

/// Authorization code for which the fake omits the refresh token.
#[allow(dead_code)]
pub const CODE_WITHOUT_REFRESH: &str = "no-refresh";
/// Refresh token the fake treats as revoked.
#[allow(dead_code)]
pub const REVOKED_REFRESH_TOKEN: &str = "revoked";
/// Calendar the fake refuses to write to.
#[allow(dead_code)]
pub const FORBIDDEN_CALENDAR: &str = "forbidden@example.com";

/// Build the router around `config` and `calendar`.
#[allow(dead_code)]
pub fn create_test_app(config: Config, calendar: Arc<dyn CalendarApi>) -> axum::Router {
    let state = Arc::new(AppState {
        config,
        http: build_http_client().unwrap(),
        calendar,
    });
    create_router(state)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// ─── Recording calendar ──────────────────────────────────────

/// Calendar fake that records inserts and answers with a Meet link.
#[derive(Default)]
pub struct RecordingCalendar {
    calls: AtomicUsize,
    pub inserts: Mutex<Vec<(String, String)>>,
}

impl RecordingCalendar {
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarApi for RecordingCalendar {
    async fn insert_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: &EventInsert,
    ) -> Result<InsertedEvent, AppError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.inserts
            .lock()
            .unwrap()
            .push((access_token.to_string(), calendar_id.to_string()));

        Ok(InsertedEvent {
            id: format!("recorded-{}", n),
            html_link: format!("https://calendar.google.com/event?eid=recorded-{}", n),
            status: "confirmed".to_string(),
            conference_data: Some(ConferenceData {
                entry_points: vec![EntryPoint {
                    entry_point_type: "video".to_string(),
                    uri: Some(format!("https://meet.example/{}", event.summary)),
                }],
            }),
        })
    }
}

// ─── Fake Google ─────────────────────────────────────────────

/// What the fake Google server has seen.
#[derive(Default)]
pub struct FakeGoogleLog {
    pub token_requests: Mutex<Vec<HashMap<String, String>>>,
    pub inserts: Mutex<Vec<(String, Value)>>,
    issued: AtomicUsize,
}

/// In-process stand-in for Google's token and Calendar endpoints.
pub struct FakeGoogle {
    pub base_url: String,
    pub log: Arc<FakeGoogleLog>,
}

impl FakeGoogle {
    /// Serve the fake on an ephemeral localhost port.
    pub async fn spawn() -> Self {
        let log = Arc::new(FakeGoogleLog::default());
        let app = Router::new()
            .route("/token", post(fake_token))
            .route(
                "/calendar/v3/calendars/{calendar_id}/events",
                post(fake_insert),
            )
            .with_state(log.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            log,
        }
    }

    /// Config whose Google endpoints point at this fake.
    #[allow(dead_code)]
    pub fn config(&self) -> Config {
        Config {
            google_client_id: Some(TEST_CLIENT_ID.to_string()),
            google_client_secret: Some(TEST_CLIENT_SECRET.to_string()),
            base_url: Some(TEST_BASE_URL.to_string()),
            google_refresh_token: Some("valid-refresh-token".to_string()),
            api_key: None,
            port: 10000,
            endpoints: GoogleEndpoints {
                auth_url: format!("{}/auth", self.base_url),
                token_url: format!("{}/token", self.base_url),
                calendar_api_base: format!("{}/calendar/v3", self.base_url),
            },
        }
    }

    /// Real Calendar client aimed at this fake.
    #[allow(dead_code)]
    pub fn calendar_client(&self) -> Arc<dyn CalendarApi> {
        Arc::new(GoogleCalendarClient::new(
            build_http_client().unwrap(),
            format!("{}/calendar/v3", self.base_url),
        ))
    }

    #[allow(dead_code)]
    pub fn token_request_count(&self) -> usize {
        self.log.token_requests.lock().unwrap().len()
    }

    #[allow(dead_code)]
    pub fn insert_count(&self) -> usize {
        self.log.inserts.lock().unwrap().len()
    }
}

fn oauth_error(status: StatusCode, error: &str, description: &str) -> Response {
    (
        status,
        Json(json!({"error": error, "error_description": description})),
    )
        .into_response()
}

async fn fake_token(
    State(log): State<Arc<FakeGoogleLog>>,
    Form(params): Form<HashMap<String, String>>,
) -> Response {
    log.token_requests.lock().unwrap().push(params.clone());

    let get = |key: &str| params.get(key).map(String::as_str).unwrap_or_default();

    if get("client_id") != TEST_CLIENT_ID || get("client_secret") != TEST_CLIENT_SECRET {
        return oauth_error(
            StatusCode::UNAUTHORIZED,
            "invalid_client",
            "The OAuth client was not found.",
        );
    }

    let n = log.issued.fetch_add(1, Ordering::SeqCst) + 1;
    let access_token = format!("access-{}", n);

    match get("grant_type") {
        "authorization_code" if get("code") == CODE_WITHOUT_REFRESH => Json(json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 3599,
            "scope": "https://www.googleapis.com/auth/calendar"
        }))
        .into_response(),
        "authorization_code" => Json(json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 3599,
            "refresh_token": format!("refresh-for-{}", get("code")),
            "scope": "https://www.googleapis.com/auth/calendar"
        }))
        .into_response(),
        "refresh_token" if get("refresh_token") == REVOKED_REFRESH_TOKEN => oauth_error(
            StatusCode::BAD_REQUEST,
            "invalid_grant",
            "Token has been expired or revoked.",
        ),
        "refresh_token" => Json(json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 3599
        }))
        .into_response(),
        _ => oauth_error(
            StatusCode::BAD_REQUEST,
            "unsupported_grant_type",
            "Invalid grant_type",
        ),
    }
}

async fn fake_insert(
    State(log): State<Arc<FakeGoogleLog>>,
    Path(calendar_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|h| h.starts_with("Bearer access-"));
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"code": 401, "message": "Invalid Credentials"}})),
        )
            .into_response();
    }

    if calendar_id == FORBIDDEN_CALENDAR {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"code": 403, "message": "Forbidden"}})),
        )
            .into_response();
    }

    log.inserts
        .lock()
        .unwrap()
        .push((calendar_id.clone(), body.clone()));

    let event_id = uuid::Uuid::new_v4().simple().to_string();
    let with_conference = query.get("conferenceDataVersion").map(String::as_str) == Some("1")
        && body["conferenceData"]["createRequest"]["requestId"].is_string();

    let mut event = json!({
        "kind": "calendar#event",
        "id": event_id,
        "status": "confirmed",
        "htmlLink": format!("https://www.google.com/calendar/event?eid={}", event_id),
        "summary": body["summary"],
        "start": body["start"],
        "end": body["end"],
    });
    if with_conference {
        event["conferenceData"] = json!({
            "entryPoints": [
                {"entryPointType": "video", "uri": format!("https://meet.google.com/{}", &event_id[..10])},
                {"entryPointType": "phone", "uri": "tel:+1-555-0100", "pin": "123456"}
            ],
            "conferenceSolution": {"key": {"type": "hangoutsMeet"}, "name": "Google Meet"}
        });
    }

    Json(event).into_response()
}
