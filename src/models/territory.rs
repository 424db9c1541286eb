// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Territory model and geometry conversion.

use geo::{Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

/// A `(lat, lon)` pair as sent by the backend.
pub type LatLng = (f64, f64);

/// Territory status as decided by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerritoryStatus {
    Conquered,
    Defended,
}

impl TerritoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerritoryStatus::Conquered => "conquered",
            TerritoryStatus::Defended => "defended",
        }
    }

    /// Human label used in popups.
    pub fn label(&self) -> &'static str {
        match self {
            TerritoryStatus::Conquered => "Conquered",
            TerritoryStatus::Defended => "Defended",
        }
    }
}

/// A closed polygon claimed by the user's running activity.
///
/// Owned by the backend. The full set is replaced on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Territory {
    pub area_id: i64,
    /// Square meters
    pub area: f64,
    /// Ordered vertices of the polygon boundary
    pub coordinates: Vec<LatLng>,
    pub center_point: LatLng,
    pub status: TerritoryStatus,
    /// ISO 8601
    pub conquered_at: String,
    /// ISO 8601
    pub last_activity_date: String,
}

impl Territory {
    /// Boundary as a `geo` polygon (x = lon, y = lat).
    pub fn polygon(&self) -> Polygon<f64> {
        let ring: Vec<Coord<f64>> = self
            .coordinates
            .iter()
            .map(|&(lat, lon)| Coord { x: lon, y: lat })
            .collect();
        // LineString -> Polygon closes the ring if needed
        Polygon::new(LineString::from(ring), vec![])
    }
}

/// Body of `GET /api/territories/user/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoriesResponse {
    pub user_id: u64,
    #[serde(default)]
    pub territories: Vec<Territory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "areaId": 12,
        "area": 15000.5,
        "coordinates": [[45.46, 9.19], [45.47, 9.19], [45.47, 9.20]],
        "centerPoint": [45.466, 9.193],
        "status": "defended",
        "conqueredAt": "2026-05-01T08:00:00Z",
        "lastActivityDate": "2026-06-01T08:00:00Z"
    }"#;

    #[test]
    fn test_territory_parses_backend_payload() {
        let territory: Territory = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(territory.area_id, 12);
        assert_eq!(territory.status, TerritoryStatus::Defended);
        assert_eq!(territory.coordinates[1], (45.47, 9.19));
        assert_eq!(territory.center_point, (45.466, 9.193));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let bad = SAMPLE.replace("defended", "lost");
        assert!(serde_json::from_str::<Territory>(&bad).is_err());
    }

    #[test]
    fn test_polygon_swaps_axes_and_closes_ring() {
        let territory: Territory = serde_json::from_str(SAMPLE).unwrap();
        let polygon = territory.polygon();
        let exterior = polygon.exterior();

        assert_eq!(exterior.0.first(), Some(&Coord { x: 9.19, y: 45.46 }));
        assert_eq!(exterior.0.first(), exterior.0.last());
        assert_eq!(exterior.0.len(), 4);
    }
}
