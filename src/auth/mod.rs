// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side authentication: evidence reconciliation, the session store and
//! the OAuth callback.

pub mod callback;
pub mod reconcile;
pub mod session;
pub mod store;

pub use callback::{complete_callback, CallbackOutcome};
pub use reconcile::{reconcile, AuthPhase, Evidence, RemoteStatus, SessionState};
pub use session::{AuthSession, LoginRedirect};
pub use store::AuthStore;
