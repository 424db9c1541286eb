// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pure reconciliation of the three auth evidence signals.
//!
//! `reconcile` is an ordered decision list over
//! `(cookie evidence, remote status, fetched user)`. First match wins:
//!
//! 1. cookies + status confirmed true  -> `Authenticated`, user refreshed
//! 2. cookies + status pending         -> re-probe, phase held
//! 3. cookies + status confirmed false -> `Authenticated` anyway
//! 4. no cookies                       -> `Unauthenticated`, user cleared
//!
//! Rule 3 lets cookies outrank a failing remote check so that cross-origin
//! cookie quirks on the backend do not log the user out. It also means an
//! expired backend session keeps looking authenticated until the cookies go.

use serde::Serialize;

use crate::models::UserInfo;

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    /// Nothing has been reconciled yet.
    #[default]
    Unknown,
    Unauthenticated,
    /// Cookies were seen but the remote check has not answered yet.
    PendingVerification,
    Authenticated,
}

/// Result of the remote `GET /user` probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    /// Not issued yet, or still in flight.
    Pending,
    Confirmed(bool),
}

/// Session state shared with every consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub phase: AuthPhase,
    pub user: Option<UserInfo>,
}

impl SessionState {
    pub fn unauthenticated() -> Self {
        Self {
            phase: AuthPhase::Unauthenticated,
            user: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }
}

/// Evidence gathered during one reconciliation pass.
#[derive(Debug, Clone)]
pub struct Evidence {
    /// `authenticated=true` and a `userId` cookie are both present
    pub cookies_present: bool,
    pub remote_status: RemoteStatus,
    /// Latest user-info payload, only fetched once status is confirmed true
    pub user_info: Option<UserInfo>,
}

/// Which rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Confirmed,
    AwaitingProbe,
    CookiesOverrideProbe,
    NoCookies,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub state: SessionState,
    pub rule: Rule,
    /// The caller should (re-)issue the status probe.
    pub reprobe: bool,
}

/// Merge `evidence` into the `prior` state.
pub fn reconcile(prior: &SessionState, evidence: Evidence) -> Reconciliation {
    if !evidence.cookies_present {
        return Reconciliation {
            state: SessionState::unauthenticated(),
            rule: Rule::NoCookies,
            reprobe: false,
        };
    }

    match evidence.remote_status {
        RemoteStatus::Confirmed(true) => Reconciliation {
            state: SessionState {
                phase: AuthPhase::Authenticated,
                user: evidence.user_info.or_else(|| prior.user.clone()),
            },
            rule: Rule::Confirmed,
            reprobe: false,
        },
        RemoteStatus::Pending => {
            let phase = match prior.phase {
                AuthPhase::Unknown => AuthPhase::PendingVerification,
                held => held,
            };
            Reconciliation {
                state: SessionState {
                    phase,
                    user: prior.user.clone(),
                },
                rule: Rule::AwaitingProbe,
                reprobe: true,
            }
        }
        RemoteStatus::Confirmed(false) => Reconciliation {
            state: SessionState {
                phase: AuthPhase::Authenticated,
                user: prior.user.clone(),
            },
            rule: Rule::CookiesOverrideProbe,
            reprobe: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64) -> UserInfo {
        UserInfo {
            id,
            first_name: Some(format!("user{}", id)),
            name: None,
            avatar: None,
            total_territories: None,
            total_conquered_area: None,
            conquests: None,
            defenses: None,
        }
    }

    fn all_statuses() -> [RemoteStatus; 3] {
        [
            RemoteStatus::Pending,
            RemoteStatus::Confirmed(true),
            RemoteStatus::Confirmed(false),
        ]
    }

    fn all_priors() -> Vec<SessionState> {
        [
            AuthPhase::Unknown,
            AuthPhase::Unauthenticated,
            AuthPhase::PendingVerification,
            AuthPhase::Authenticated,
        ]
        .into_iter()
        .flat_map(|phase| {
            [
                SessionState { phase, user: None },
                SessionState {
                    phase,
                    user: Some(user(1)),
                },
            ]
        })
        .collect()
    }

    #[test]
    fn test_no_cookies_always_unauthenticated() {
        for prior in all_priors() {
            for status in all_statuses() {
                for fetched in [None, Some(user(2))] {
                    let result = reconcile(
                        &prior,
                        Evidence {
                            cookies_present: false,
                            remote_status: status,
                            user_info: fetched,
                        },
                    );
                    assert_eq!(result.state, SessionState::unauthenticated());
                    assert_eq!(result.rule, Rule::NoCookies);
                    assert!(!result.reprobe);
                }
            }
        }
    }

    #[test]
    fn test_confirmed_status_authenticates_with_fetched_user() {
        for prior in all_priors() {
            let result = reconcile(
                &prior,
                Evidence {
                    cookies_present: true,
                    remote_status: RemoteStatus::Confirmed(true),
                    user_info: Some(user(2)),
                },
            );
            assert!(result.state.is_authenticated());
            assert_eq!(result.state.user, Some(user(2)));
        }
    }

    #[test]
    fn test_confirmed_status_keeps_prior_user_until_fetch_resolves() {
        let prior = SessionState {
            phase: AuthPhase::Authenticated,
            user: Some(user(1)),
        };
        let result = reconcile(
            &prior,
            Evidence {
                cookies_present: true,
                remote_status: RemoteStatus::Confirmed(true),
                user_info: None,
            },
        );
        assert!(result.state.is_authenticated());
        assert_eq!(result.state.user, Some(user(1)));
    }

    #[test]
    fn test_pending_status_reprobes_and_holds_phase() {
        for prior in all_priors() {
            let result = reconcile(
                &prior,
                Evidence {
                    cookies_present: true,
                    remote_status: RemoteStatus::Pending,
                    user_info: None,
                },
            );
            assert!(result.reprobe);
            assert_eq!(result.rule, Rule::AwaitingProbe);
            assert_eq!(result.state.user, prior.user);
            let expected = if prior.phase == AuthPhase::Unknown {
                AuthPhase::PendingVerification
            } else {
                prior.phase
            };
            assert_eq!(result.state.phase, expected);
        }
    }

    /// Cookies outrank a failed remote probe. If this test starts failing,
    /// the change to the session policy must be deliberate.
    #[test]
    fn test_cookies_with_failed_probe_stay_authenticated() {
        for prior in all_priors() {
            let result = reconcile(
                &prior,
                Evidence {
                    cookies_present: true,
                    remote_status: RemoteStatus::Confirmed(false),
                    user_info: None,
                },
            );
            assert_eq!(result.state.phase, AuthPhase::Authenticated);
            assert_eq!(result.rule, Rule::CookiesOverrideProbe);
            assert_eq!(result.state.user, prior.user);
        }
    }
}
