// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod stats;
pub mod sync;
pub mod territory;
pub mod user;

pub use stats::DashboardStats;
pub use sync::{AuthUrlResponse, SyncResponse};
pub use territory::{LatLng, TerritoriesResponse, Territory, TerritoryStatus};
pub use user::{CallbackResponse, StravaUser, UserInfo};
