// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Once-per-calendar-day gate on forced territory syncs.
//!
//! The gate is advisory: it lives in local storage, so another process or a
//! direct API call can still trigger a second sync the same day. The backend
//! is the real authority.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::db::keys::LAST_SYNC_PREFIX;
use crate::db::LocalStore;
use crate::error::{AppError, Result};
use crate::models::SyncResponse;
use crate::services::runk::RunkApi;
use crate::time_utils::calendar_day;

/// Per-user daily sync marker.
#[derive(Clone)]
pub struct SyncGate {
    store: Arc<LocalStore>,
}

impl SyncGate {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    fn key(user_id: &str) -> String {
        format!("{}{}", LAST_SYNC_PREFIX, user_id)
    }

    /// Calendar day of the last successful sync, as stored.
    pub fn last_sync(&self, user_id: &str) -> Option<String> {
        self.store.get(&Self::key(user_id))
    }

    /// Whether a sync may be triggered on `today`.
    pub fn can_sync(&self, user_id: &str, today: NaiveDate) -> bool {
        self.last_sync(user_id).as_deref() != Some(calendar_day(today).as_str())
    }

    pub fn record(&self, user_id: &str, today: NaiveDate) -> Result<()> {
        self.store.set(&Self::key(user_id), &calendar_day(today))
    }

    /// Forget the marker so the next trigger is allowed again.
    pub fn reset(&self, user_id: &str) -> Result<()> {
        self.store.remove(&Self::key(user_id))
    }
}

/// Forced sync guarded by the daily gate.
#[derive(Clone)]
pub struct SyncService {
    api: RunkApi,
    gate: SyncGate,
}

impl SyncService {
    pub fn new(api: RunkApi, gate: SyncGate) -> Self {
        Self { api, gate }
    }

    pub fn gate(&self) -> &SyncGate {
        &self.gate
    }

    /// Trigger a forced sync for `user_id`, at most once per calendar day.
    ///
    /// The marker is written only after the backend accepts the sync, so a
    /// failed attempt can be retried the same day.
    pub async fn sync(&self, user_id: &str, today: NaiveDate) -> Result<SyncResponse> {
        if !self.gate.can_sync(user_id, today) {
            tracing::info!(user_id, "Sync blocked by daily cooldown");
            return Err(AppError::SyncCooldown);
        }

        let response = self.api.sync_territories().await.map_err(|e| {
            tracing::error!(user_id, error = %e, "Territory sync failed");
            e
        })?;

        self.gate.record(user_id, today)?;
        tracing::info!(user_id, message = %response.message, "Territory sync completed");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_gate_allows_once_per_day() {
        let gate = SyncGate::new(Arc::new(LocalStore::in_memory()));

        assert!(gate.can_sync("42", day(19)));
        gate.record("42", day(19)).unwrap();
        assert!(!gate.can_sync("42", day(19)));
        assert_eq!(gate.last_sync("42").as_deref(), Some("Mon Oct 19 2026"));

        // Next calendar day opens the gate again
        assert!(gate.can_sync("42", day(20)));
    }

    #[test]
    fn test_gate_is_per_user() {
        let gate = SyncGate::new(Arc::new(LocalStore::in_memory()));
        gate.record("42", day(19)).unwrap();

        assert!(gate.can_sync("43", day(19)));
    }

    #[test]
    fn test_gate_reset() {
        let gate = SyncGate::new(Arc::new(LocalStore::in_memory()));
        gate.record("42", day(19)).unwrap();
        gate.reset("42").unwrap();

        assert!(gate.can_sync("42", day(19)));
        assert_eq!(gate.last_sync("42"), None);
    }
}
