// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Observable session store.
//!
//! The store is the single writer of [`SessionState`]. Views hold a
//! [`watch::Receiver`] and are notified whenever the state actually changes.

use tokio::sync::watch;

use crate::auth::reconcile::{reconcile, Evidence, Reconciliation, SessionState};

/// Single-writer session store with change notification.
#[derive(Debug)]
pub struct AuthStore {
    tx: watch::Sender<SessionState>,
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self { tx }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Run one reconciliation pass against the current state and publish the
    /// result. Subscribers are only woken when the state changes.
    pub fn apply(&self, evidence: Evidence) -> Reconciliation {
        let result = reconcile(&self.tx.borrow(), evidence);
        let next = result.state.clone();

        self.tx.send_if_modified(|state| {
            if *state == next {
                return false;
            }
            tracing::debug!(from = ?state.phase, to = ?next.phase, rule = ?result.rule, "Session state changed");
            *state = next;
            true
        });
        result
    }

    /// Drop to `Unauthenticated` with no user.
    pub fn reset(&self) {
        self.tx.send_if_modified(|state| {
            let cleared = SessionState::unauthenticated();
            let changed = *state != cleared;
            *state = cleared;
            changed
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::reconcile::{AuthPhase, RemoteStatus};

    fn evidence(cookies_present: bool, remote_status: RemoteStatus) -> Evidence {
        Evidence {
            cookies_present,
            remote_status,
            user_info: None,
        }
    }

    #[test]
    fn test_store_starts_unknown() {
        let store = AuthStore::new();
        assert_eq!(store.state().phase, AuthPhase::Unknown);
        assert!(!store.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_subscribers_notified_on_change_only() {
        let store = AuthStore::new();
        let mut rx = store.subscribe();

        store.apply(evidence(true, RemoteStatus::Confirmed(true)));
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());

        // Same evidence again: no state change, no wakeup
        store.apply(evidence(true, RemoteStatus::Confirmed(true)));
        assert!(!rx.has_changed().unwrap());

        store.reset();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().phase, AuthPhase::Unauthenticated);
    }

    #[test]
    fn test_apply_returns_reprobe_hint() {
        let store = AuthStore::new();
        let result = store.apply(evidence(true, RemoteStatus::Pending));

        assert!(result.reprobe);
        assert_eq!(store.state().phase, AuthPhase::PendingVerification);
    }
}
