// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth callback and logout routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::auth::{complete_callback, CallbackOutcome};
use crate::db::CachedUserStore;
use crate::error::Result;
use crate::services::CallbackParams;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/strava/callback", get(auth_callback))
        .route("/auth/logout", post(logout))
}

/// OAuth callback - hand the code to the backend, then go to the dashboard.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    match complete_callback(&state.api, &params).await? {
        CallbackOutcome::NoCode => Ok(Redirect::to("/")),
        CallbackOutcome::Connected { user, .. } => {
            CachedUserStore::new(&state.local_store).save(&user);
            state.session.refresh().await;
            Ok(Redirect::to("/dashboard"))
        }
    }
}

/// Client-only logout: expire the session cookies, no backend call.
async fn logout(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.logout();
    CachedUserStore::new(&state.local_store).clear();
    StatusCode::NO_CONTENT
}
