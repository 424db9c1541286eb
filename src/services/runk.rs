// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed facade over the Runk backend endpoints.

use serde::Deserialize;

use crate::error::Result;
use crate::models::{AuthUrlResponse, SyncResponse, TerritoriesResponse, UserInfo};
use crate::services::client::ApiClient;

/// OAuth redirect parameters forwarded from Strava to the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl CallbackParams {
    /// Query string for the backend exchange. `None` without a code.
    pub fn to_query(&self) -> Option<String> {
        let code = self.code.as_deref().filter(|c| !c.is_empty())?;

        let mut pairs = vec![format!("code={}", urlencoding::encode(code))];
        if let Some(state) = self.state.as_deref() {
            pairs.push(format!("state={}", urlencoding::encode(state)));
        }
        if let Some(scope) = self.scope.as_deref() {
            pairs.push(format!("scope={}", urlencoding::encode(scope)));
        }
        Some(pairs.join("&"))
    }
}

/// Runk backend API.
#[derive(Clone)]
pub struct RunkApi {
    client: ApiClient,
}

impl RunkApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Strava authorization URL. Sent without credentials.
    pub async fn get_auth_url(&self) -> Result<AuthUrlResponse> {
        self.client.get("/auth/strava", false).await
    }

    /// Whether `GET /user` answers 2xx with the current cookies.
    ///
    /// Any failure, including a transient 5xx or an unreachable backend,
    /// reads as "not authenticated".
    pub async fn check_auth_status(&self) -> bool {
        match self.client.get::<serde_json::Value>("/user", true).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Auth status probe failed");
                false
            }
        }
    }

    /// Force a territory sync. Repeated calls re-trigger backend work.
    pub async fn sync_territories(&self) -> Result<SyncResponse> {
        self.client
            .post::<SyncResponse, ()>("/api/territories/sync/force", None, true)
            .await
    }

    pub async fn get_user_info(&self) -> Result<UserInfo> {
        self.client.get("/user", true).await
    }

    pub async fn get_territories(&self, user_id: &str) -> Result<TerritoriesResponse> {
        let path = format!("/api/territories/user/{}", urlencoding::encode(user_id));
        self.client.get(&path, true).await
    }

    /// Forward the OAuth code to the backend, returning `(status, raw body)`.
    ///
    /// Returns `None` when there is no code to forward.
    pub async fn exchange_callback(&self, params: &CallbackParams) -> Option<Result<(u16, String)>> {
        let query = params.to_query()?;
        let path = format!("/auth/strava/callback?{}", query);
        tracing::debug!(url = %format!("{}{}", self.client.base_url(), path), "Exchanging OAuth callback code");
        Some(self.client.get_text(&path, true).await)
    }
}
