// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session-gating middleware for the local dashboard routes.

use crate::error::AppError;
use crate::models::UserInfo;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Logged-in user extracted from the reconciled session.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// Value of the `userId` cookie
    pub user_id: String,
    pub info: Option<UserInfo>,
}

/// Middleware that requires an authenticated session.
///
/// Runs a reconciliation pass first, so the decision reflects the cookies as
/// they are right now.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = state.session.refresh().await;
    if !session.is_authenticated() {
        return Err(AppError::NotAuthenticated);
    }

    let user_id = state
        .session
        .cookie_snapshot()
        .user_id()
        .map(str::to_string)
        .ok_or(AppError::NotAuthenticated)?;

    request.extensions_mut().insert(SessionUser {
        user_id,
        info: session.user,
    });

    Ok(next.run(request).await)
}
