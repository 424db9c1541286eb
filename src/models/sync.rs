//! Payloads of the auth-URL and forced-sync endpoints.

use serde::{Deserialize, Serialize};

/// Body of `GET /auth/strava`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUrlResponse {
    /// Strava authorization endpoint the browser should be sent to
    pub url: String,
}

/// Body of `POST /api/territories/sync/force`.
///
/// The nested payloads are opaque to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub territories: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<serde_json::Value>>,
}
