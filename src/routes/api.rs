// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard routes for the logged-in user.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::map::{GeoJsonWidget, TerritoryMap, ViewMode};
use crate::middleware::auth::SessionUser;
use crate::models::{DashboardStats, SyncResponse};
use crate::time_utils::today;
use crate::AppState;

/// API routes (require an authenticated session).
/// The session middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/map.geojson", get(get_map))
        .route("/sync", post(post_sync))
}

// ─── Dashboard ───────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user_id: String,
    pub stats: DashboardStats,
    pub last_sync: Option<String>,
    pub can_sync: bool,
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<DashboardResponse>> {
    let territories = state.api.get_territories(&user.user_id).await?;
    let gate = state.sync.gate();

    Ok(Json(DashboardResponse {
        stats: DashboardStats::new(&territories.territories, user.info.as_ref()),
        last_sync: gate.last_sync(&user.user_id),
        can_sync: gate.can_sync(&user.user_id, today()),
        user_id: user.user_id,
    }))
}

// ─── Map ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MapQuery {
    #[serde(default)]
    view: ViewMode,
}

/// Territories rendered through the map adapter, as GeoJSON.
async fn get_map(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<MapQuery>,
) -> Result<Json<FeatureCollection>> {
    let territories = state.api.get_territories(&user.user_id).await?;

    let mut map = TerritoryMap::new(GeoJsonWidget::new(), query.view);
    map.set_territories(&territories.territories, false);
    let collection = map.widget().to_geojson();
    map.dispose();

    Ok(Json(collection))
}

// ─── Sync ────────────────────────────────────────────────────

async fn post_sync(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<SyncResponse>> {
    let response = state.sync.sync(&user.user_id, today()).await?;
    Ok(Json(response))
}
