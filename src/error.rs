// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type shared by the API client, the session layer and the
/// local frontend server.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The backend origin could not be reached at all.
    #[error("Connection error: check that the backend is running at {origin}")]
    Connection { origin: String },

    /// Any HTTP status outside the 2xx range. The response body is discarded.
    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("Failed to parse response: {0}")]
    MalformedBody(String),

    #[error("HTTP error: {status} - {body}")]
    CallbackRejected { status: u16, body: String },

    #[error("Territories can only be synced once a day, try again tomorrow")]
    SyncCooldown,

    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Local storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether this error came from the transport rather than from the backend.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, AppError::Connection { .. })
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::SyncCooldown => (StatusCode::TOO_MANY_REQUESTS, "sync_cooldown"),
            AppError::Connection { .. } => (StatusCode::BAD_GATEWAY, "connection_error"),
            AppError::HttpStatus(_)
            | AppError::MalformedBody(_)
            | AppError::CallbackRejected { .. } => (StatusCode::BAD_GATEWAY, "backend_error"),
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Local storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let details = match &self {
            AppError::Storage(_) | AppError::Internal(_) => None,
            other => Some(other.to_string()),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, AppError>;
