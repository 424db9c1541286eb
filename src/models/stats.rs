//! Dashboard statistics derived from the fetched territory set.
//!
//! Nothing here is stored: the numbers are recomputed from the latest
//! territory fetch and user-info payload every time the dashboard renders.

use serde::Serialize;

use crate::models::{Territory, TerritoryStatus, UserInfo};

/// Area of a regulation football pitch, used for the "≈ N fields" hint.
pub const FOOTBALL_FIELD_M2: f64 = 7140.0;

/// Summary shown on the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub display_name: String,
    pub territory_count: usize,
    pub conquered_count: usize,
    pub defended_count: usize,
    pub total_area_m2: f64,
    /// Formatted with two decimals, e.g. `"1.25"`
    pub total_area_km2: String,
    pub football_fields: i64,
    pub conquests: u32,
    pub defenses: u32,
}

impl DashboardStats {
    pub fn new(territories: &[Territory], user: Option<&UserInfo>) -> Self {
        let total_area_m2: f64 = territories.iter().map(|t| t.area).sum();
        let conquered_count = territories
            .iter()
            .filter(|t| t.status == TerritoryStatus::Conquered)
            .count();

        Self {
            display_name: user.map_or("Runner", UserInfo::display_name).to_string(),
            territory_count: territories.len(),
            conquered_count,
            defended_count: territories.len() - conquered_count,
            total_area_m2,
            total_area_km2: format!("{:.2}", total_area_m2 / 1_000_000.0),
            football_fields: football_fields(total_area_m2),
            conquests: user.and_then(|u| u.conquests).unwrap_or(0),
            defenses: user.and_then(|u| u.defenses).unwrap_or(0),
        }
    }
}

/// Number of football pitches covering `area_m2`, rounded to nearest.
pub fn football_fields(area_m2: f64) -> i64 {
    (area_m2 / FOOTBALL_FIELD_M2).round() as i64
}
