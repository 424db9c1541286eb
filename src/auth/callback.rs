// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth callback completion.
//!
//! The backend sets the session cookies as a side effect of the exchange
//! response; the client only notices by re-reading its cookie jar afterwards.

use crate::db::cookies::AUTHENTICATED_COOKIE;
use crate::error::{AppError, Result};
use crate::models::{CallbackResponse, StravaUser};
use crate::services::{CallbackParams, RunkApi};

/// Result of handling a callback request.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    /// The redirect carried no authorization code; nothing was sent.
    NoCode,
    Connected {
        user: StravaUser,
        message: String,
        /// Whether the `authenticated` cookie was present after the exchange
        cookies_set: bool,
    },
}

/// Forward the authorization code to the backend and interpret the answer.
///
/// A body with both a user and a message is accepted even when the status is
/// not 2xx. A missing session cookie afterwards is logged, not returned.
pub async fn complete_callback(api: &RunkApi, params: &CallbackParams) -> Result<CallbackOutcome> {
    let Some(exchange) = api.exchange_callback(params).await else {
        tracing::debug!("Callback without authorization code");
        return Ok(CallbackOutcome::NoCode);
    };
    let (status, body) = exchange?;
    tracing::debug!(status, "Callback exchange answered");

    let data: CallbackResponse =
        serde_json::from_str(&body).map_err(|_| AppError::MalformedBody(body.clone()))?;

    let success = (200..300).contains(&status);
    if data.carries_user() {
        if !success {
            tracing::warn!(status, "Callback returned an error status with valid user data, continuing");
        }
    } else if !success {
        tracing::error!(status, body = %body, "Backend rejected callback");
        return Err(AppError::CallbackRejected { status, body });
    }

    let (Some(user), message) = (data.user, data.message.unwrap_or_default()) else {
        return Err(AppError::MalformedBody(body));
    };

    let cookies_set = api
        .client()
        .cookies()
        .snapshot()
        .get(AUTHENTICATED_COOKIE)
        .is_some();
    if !cookies_set {
        tracing::error!(
            "Backend did not set the authentication cookies; it must send them with \
             SameSite=None, Secure and a Domain valid for cross-origin requests"
        );
    }

    tracing::info!(user_id = user.id, cookies_set, "Strava account connected");
    Ok(CallbackOutcome::Connected {
        user,
        message,
        cookies_set,
    })
}
