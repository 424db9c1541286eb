// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - backend access and sync policy.

pub mod client;
pub mod runk;
pub mod sync;

pub use client::ApiClient;
pub use runk::{CallbackParams, RunkApi};
pub use sync::{SyncGate, SyncService};
