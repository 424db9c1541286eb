// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session controller: gathers evidence and drives the auth store.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::auth::reconcile::{Evidence, RemoteStatus, SessionState};
use crate::auth::store::AuthStore;
use crate::db::cookies::SESSION_COOKIES;
use crate::db::{CookieSnapshot, SessionCookies};
use crate::error::Result;
use crate::models::UserInfo;
use crate::services::RunkApi;

/// Delay before the single retry of a failed status probe.
const PROBE_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Terminal result of a login: the browser must be sent to `url`.
///
/// Nothing in the session is expected to happen after this is produced; the
/// OAuth round trip resumes in a fresh context via the callback.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the login flow only completes once the browser is sent to the URL"]
pub struct LoginRedirect {
    url: String,
}

impl LoginRedirect {
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Owns the auth store and feeds it cookie and remote evidence.
pub struct AuthSession {
    api: RunkApi,
    cookies: Arc<SessionCookies>,
    store: AuthStore,
    probe_retry_delay: Duration,
}

impl AuthSession {
    pub fn new(api: RunkApi) -> Self {
        let cookies = api.client().cookies().clone();
        Self {
            api,
            cookies,
            store: AuthStore::new(),
            probe_retry_delay: PROBE_RETRY_DELAY,
        }
    }

    /// Override the status-probe retry delay (tests use zero).
    pub fn with_probe_retry_delay(mut self, delay: Duration) -> Self {
        self.probe_retry_delay = delay;
        self
    }

    pub fn state(&self) -> SessionState {
        self.store.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.store.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.state().is_authenticated()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.store.state().user
    }

    pub fn cookie_snapshot(&self) -> CookieSnapshot {
        self.cookies.snapshot()
    }

    /// Run one full reconciliation pass.
    ///
    /// Cookies are polled before and after the remote calls; user info is
    /// only requested once the status probe says yes.
    pub async fn refresh(&self) -> SessionState {
        if !self.cookie_snapshot().has_session_evidence() {
            tracing::debug!("No session cookies, not authenticated");
            self.store.apply(Evidence {
                cookies_present: false,
                remote_status: RemoteStatus::Pending,
                user_info: None,
            });
            return self.state();
        }

        self.store.apply(Evidence {
            cookies_present: true,
            remote_status: RemoteStatus::Pending,
            user_info: None,
        });

        let status = self.probe_status().await;
        let user_info = if status {
            match self.api.get_user_info().await {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "User info fetch failed, keeping cached user");
                    None
                }
            }
        } else {
            None
        };

        let result = self.store.apply(Evidence {
            cookies_present: self.cookie_snapshot().has_session_evidence(),
            remote_status: RemoteStatus::Confirmed(status),
            user_info,
        });

        tracing::info!(
            phase = ?result.state.phase,
            rule = ?result.rule,
            remote_status = status,
            "Session reconciled"
        );
        result.state
    }

    /// Status probe with one delayed retry on a negative answer.
    async fn probe_status(&self) -> bool {
        if self.api.check_auth_status().await {
            return true;
        }

        tracing::debug!(delay_ms = self.probe_retry_delay.as_millis() as u64, "Retrying auth status probe");
        tokio::time::sleep(self.probe_retry_delay).await;
        self.api.check_auth_status().await
    }

    /// Fetch the Strava authorization URL.
    ///
    /// On failure the error is logged and returned; the session is unchanged.
    pub async fn login(&self) -> Result<LoginRedirect> {
        match self.api.get_auth_url().await {
            Ok(response) => {
                tracing::info!("Obtained Strava authorization URL");
                Ok(LoginRedirect { url: response.url })
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to obtain authorization URL");
                Err(e)
            }
        }
    }

    /// Client-only logout: expire the session cookies and clear the state.
    ///
    /// The backend session is not invalidated.
    pub fn logout(&self) {
        for name in SESSION_COOKIES {
            self.cookies.expire(name);
        }
        self.store.reset();
        tracing::info!("Logged out");
    }
}
