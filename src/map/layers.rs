// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Base tile layers, polygon styling and territory popups.

use geo::{BoundingRect, MultiPoint, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::models::stats::football_fields;
use crate::models::{LatLng, Territory, TerritoryStatus};
use crate::time_utils::format_short_date;

const STREET_TILES: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const STREET_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
const SATELLITE_TILES: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
const SATELLITE_ATTRIBUTION: &str = "&copy; <a href=\"https://www.esri.com/\">Esri</a> &mdash; \
     Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, Aerogrid, IGN, IGP, UPR-EGP, \
     and the GIS User Community";

/// Which base layer sits under the territories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Satellite,
    Street,
}

/// Identity of one tile layer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

/// A base tile layer instance.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub id: LayerId,
    pub mode: ViewMode,
    pub url_template: &'static str,
    pub attribution: &'static str,
}

impl TileLayer {
    pub fn new(id: LayerId, mode: ViewMode) -> Self {
        let (url_template, attribution) = match mode {
            ViewMode::Satellite => (SATELLITE_TILES, SATELLITE_ATTRIBUTION),
            ViewMode::Street => (STREET_TILES, STREET_ATTRIBUTION),
        };
        Self {
            id,
            mode,
            url_template,
            attribution,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolygonStyle {
    pub color: &'static str,
    pub weight: u32,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
}

impl PolygonStyle {
    pub fn for_status(status: TerritoryStatus) -> Self {
        let color = match status {
            TerritoryStatus::Conquered => "#10b981",
            TerritoryStatus::Defended => "#f59e0b",
        };
        Self {
            color,
            weight: 2,
            fill_color: color,
            fill_opacity: 0.3,
        }
    }
}

/// One territory polygon ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub area_id: i64,
    pub status: TerritoryStatus,
    pub polygon: Polygon<f64>,
    pub style: PolygonStyle,
    pub popup: String,
}

impl From<&Territory> for PolygonShape {
    fn from(territory: &Territory) -> Self {
        Self {
            area_id: territory.area_id,
            status: territory.status,
            polygon: territory.polygon(),
            style: PolygonStyle::for_status(territory.status),
            popup: popup_text(territory),
        }
    }
}

/// Popup summary bound to each polygon.
pub fn popup_text(territory: &Territory) -> String {
    format!(
        "Territory #{}\nStatus: {}\nArea: {} m²\n≈ {} football fields\nConquered: {}\nLast activity: {}",
        territory.area_id,
        territory.status.label(),
        format_area(territory.area),
        football_fields(territory.area),
        format_short_date(&territory.conquered_at),
        format_short_date(&territory.last_activity_date),
    )
}

/// Whole square meters with thousands separators, e.g. `1,234,568`.
pub fn format_area(area_m2: f64) -> String {
    let rounded = area_m2.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Viewport bounds in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Bounding box of every vertex. `None` when there are no vertices.
    pub fn around<'a>(points: impl IntoIterator<Item = &'a LatLng>) -> Option<Self> {
        let points: MultiPoint<f64> = points
            .into_iter()
            .map(|&(lat, lon)| Point::new(lon, lat))
            .collect();
        let rect = points.bounding_rect()?;
        Some(Self {
            south: rect.min().y,
            west: rect.min().x,
            north: rect.max().y,
            east: rect.max().x,
        })
    }

    pub fn contains(&self, (lat, lon): LatLng) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }

    /// GeoJSON bbox order: `[west, south, east, north]`.
    pub fn to_bbox(&self) -> Vec<f64> {
        vec![self.west, self.south, self.east, self.north]
    }
}
