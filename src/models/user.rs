//! User models returned by the backend.

use serde::{Deserialize, Serialize};

/// Current-user record returned by `GET /user`.
///
/// Never locally authoritative: it is rebuilt from a remote call on every
/// reconciliation pass that confirms the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Strava athlete ID
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Profile picture URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_territories: Option<u32>,
    /// Square meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_conquered_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conquests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defenses: Option<u32>,
}

impl UserInfo {
    /// Name shown on the dashboard header.
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Runner")
    }
}

/// Athlete summary returned by the OAuth callback exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StravaUser {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

/// Body of `GET /auth/strava/callback`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<StravaUser>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl CallbackResponse {
    /// A body carrying both a user and a message counts as a successful
    /// exchange regardless of the HTTP status it arrived with.
    pub fn carries_user(&self) -> bool {
        self.user.is_some() && self.message.as_deref().is_some_and(|m| !m.is_empty())
    }
}
