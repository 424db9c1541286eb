// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fake Runk backend for integration tests.
//!
//! Serves the real endpoint paths on an ephemeral localhost port. Behavior is
//! switched through the shared [`FakeBackend`] flags.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use runk_client::config::Config;
use runk_client::db::{LocalStore, SessionCookies};
use runk_client::services::{ApiClient, RunkApi};
use runk_client::AppState;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering};
use std::sync::Arc;

/// Switches and counters of the fake backend.
pub struct FakeBackend {
    /// Requests served, all endpoints included
    pub hits: AtomicUsize,
    /// Status returned by `GET /user`
    pub user_status: AtomicU16,
    /// Status returned by the callback exchange
    pub callback_status: AtomicU16,
    /// Whether the callback exchange sets the session cookies
    pub set_cookies: AtomicBool,
    /// Status returned by the forced sync
    pub sync_status: AtomicU16,
    /// Status returned by `GET /auth/strava`
    pub auth_url_status: AtomicU16,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            hits: AtomicUsize::new(0),
            user_status: AtomicU16::new(200),
            callback_status: AtomicU16::new(200),
            set_cookies: AtomicBool::new(true),
            sync_status: AtomicU16::new(200),
            auth_url_status: AtomicU16::new(200),
        }
    }
}

impl FakeBackend {
    #[allow(dead_code)]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct TestBackend {
    pub url: String,
    pub state: Arc<FakeBackend>,
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("sessionId="))
}

fn status(code: &AtomicU16) -> StatusCode {
    StatusCode::from_u16(code.load(Ordering::SeqCst)).unwrap()
}

async fn auth_url(State(state): State<Arc<FakeBackend>>) -> Response {
    state.hit();
    let code = status(&state.auth_url_status);
    if !code.is_success() {
        return code.into_response();
    }
    Json(json!({ "url": "https://www.strava.com/oauth/authorize?client_id=1" })).into_response()
}

async fn current_user(State(state): State<Arc<FakeBackend>>, headers: HeaderMap) -> Response {
    state.hit();
    let code = status(&state.user_status);
    if !code.is_success() {
        return (code, "backend unavailable").into_response();
    }
    if !has_session(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "id": 42,
        "firstName": "Ada",
        "avatar": "https://example.com/ada.png",
        "conquests": 3,
        "defenses": 1
    }))
    .into_response()
}

async fn force_sync(State(state): State<Arc<FakeBackend>>, headers: HeaderMap) -> Response {
    state.hit();
    if !has_session(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let code = status(&state.sync_status);
    if !code.is_success() {
        return (code, Json(json!({ "error": "sync failed" }))).into_response();
    }
    Json(json!({ "message": "Sync completed", "territories": [] })).into_response()
}

#[derive(Deserialize)]
struct CallbackQuery {
    code: String,
}

async fn callback(
    State(state): State<Arc<FakeBackend>>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    state.hit();
    let code = status(&state.callback_status);

    let cookies: Vec<(header::HeaderName, &'static str)> = if state.set_cookies.load(Ordering::SeqCst) {
        vec![
            (header::SET_COOKIE, "authenticated=true; Path=/; SameSite=None; Secure"),
            (header::SET_COOKIE, "userId=42; Path=/; SameSite=None; Secure"),
            (header::SET_COOKIE, "sessionId=s-123; Path=/; HttpOnly; SameSite=None; Secure"),
        ]
    } else {
        Vec::new()
    };

    let body = match query.code.as_str() {
        "garbage" => return (code, "<html>oops</html>").into_response(),
        "bad" => json!({ "message": "invalid code" }),
        _ => json!({
            "message": "Strava connected",
            "user": { "id": 42, "name": "Ada", "avatar": "https://example.com/ada.png" }
        }),
    };

    (code, AppendHeaders(cookies), Json(body)).into_response()
}

async fn territories(
    State(state): State<Arc<FakeBackend>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    state.hit();
    if !has_session(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "userId": id,
        "territories": [
            {
                "areaId": 1,
                "area": 10000.0,
                "coordinates": [[45.40, 9.10], [45.45, 9.10], [45.45, 9.15]],
                "centerPoint": [45.43, 9.12],
                "status": "conquered",
                "conqueredAt": "2026-05-01T08:00:00Z",
                "lastActivityDate": "2026-06-01T08:00:00Z"
            },
            {
                "areaId": 2,
                "area": 4280.0,
                "coordinates": [[45.50, 9.20], [45.55, 9.25], [45.50, 9.30]],
                "centerPoint": [45.52, 9.25],
                "status": "defended",
                "conqueredAt": "2026-04-01T08:00:00Z",
                "lastActivityDate": "2026-06-03T08:00:00Z"
            }
        ]
    }))
    .into_response()
}

/// Echo the request cookie header (and POST body) back.
async fn whoami(State(state): State<Arc<FakeBackend>>, headers: HeaderMap) -> Json<serde_json::Value> {
    state.hit();
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({ "cookie": cookie }))
}

async fn echo(
    State(state): State<Arc<FakeBackend>>,
    headers: HeaderMap,
    body: String,
) -> Json<serde_json::Value> {
    state.hit();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({ "body": body, "contentType": content_type }))
}

async fn status_of(
    State(state): State<Arc<FakeBackend>>,
    Query(query): Query<HashMap<String, u16>>,
) -> Response {
    state.hit();
    let code = StatusCode::from_u16(query.get("code").copied().unwrap_or(200)).unwrap();
    (code, Json(json!({ "detail": "should be discarded" }))).into_response()
}

async fn not_json(State(state): State<Arc<FakeBackend>>) -> &'static str {
    state.hit();
    "definitely not json"
}

/// Start the fake backend on `127.0.0.1:0`.
pub async fn spawn_backend() -> TestBackend {
    let state = Arc::new(FakeBackend::default());

    let app = Router::new()
        .route("/auth/strava", get(auth_url))
        .route("/auth/strava/callback", get(callback))
        .route("/user", get(current_user))
        .route("/api/territories/sync/force", post(force_sync))
        .route("/api/territories/user/{id}", get(territories))
        .route("/whoami", get(whoami))
        .route("/echo", post(echo))
        .route("/status", get(status_of))
        .route("/not-json", get(not_json))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBackend {
        url: format!("http://{}", addr),
        state,
    }
}

/// An origin nothing listens on.
#[allow(dead_code)]
pub async fn dead_origin() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Cookie jar already holding a backend session.
#[allow(dead_code)]
pub fn logged_in_cookies() -> Arc<SessionCookies> {
    let cookies = Arc::new(SessionCookies::in_memory());
    cookies.set_cookie_str("authenticated=true; Path=/");
    cookies.set_cookie_str("userId=42; Path=/");
    cookies.set_cookie_str("sessionId=s-123; Path=/");
    cookies
}

#[allow(dead_code)]
pub fn test_api(base_url: &str, cookies: Arc<SessionCookies>) -> RunkApi {
    RunkApi::new(ApiClient::new(base_url, cookies).unwrap())
}

/// App state against `base_url` with in-memory stores.
#[allow(dead_code)]
pub fn test_state(base_url: &str, cookies: Arc<SessionCookies>) -> Arc<AppState> {
    let config = Config {
        backend_url: base_url.to_string(),
        ..Config::default()
    };
    Arc::new(AppState::new(config, cookies, Arc::new(LocalStore::in_memory())).unwrap())
}
