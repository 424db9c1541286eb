// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map widget abstraction and the built-in headless GeoJSON widget.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde_json::json;

use crate::map::layers::{Bounds, LayerId, PolygonShape, TileLayer};
use crate::models::LatLng;

/// Imperative surface of a stateful map widget.
///
/// Only [`TerritoryMap`](crate::map::TerritoryMap) calls these; the rest of
/// the crate never touches a widget directly.
pub trait MapWidget {
    fn set_view(&mut self, center: LatLng, zoom: u8);
    fn add_tile_layer(&mut self, layer: TileLayer);
    fn remove_tile_layer(&mut self, id: LayerId);
    /// Tile layers currently attached, bottom first.
    fn tile_layers(&self) -> Vec<LayerId>;
    /// Attach the territory overlay group on top of everything else.
    fn attach_overlay(&mut self);
    fn clear_overlay(&mut self);
    fn add_polygon(&mut self, shape: PolygonShape);
    fn fit_bounds(&mut self, bounds: Bounds, padding: (u32, u32));
    /// Release everything the widget holds.
    fn destroy(&mut self);
}

/// Entry in the widget's layer stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackEntry {
    Tile(LayerId),
    Overlay,
}

/// Headless widget that records its state and exports the overlay as GeoJSON.
#[derive(Debug, Default)]
pub struct GeoJsonWidget {
    center: Option<LatLng>,
    zoom: u8,
    tiles: Vec<TileLayer>,
    stack: Vec<StackEntry>,
    shapes: Vec<PolygonShape>,
    fitted: Option<(Bounds, (u32, u32))>,
    fit_calls: usize,
    destroyed: bool,
}

impl GeoJsonWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn center(&self) -> Option<LatLng> {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn tiles(&self) -> &[TileLayer] {
        &self.tiles
    }

    /// Layer stack, bottom first.
    pub fn stack(&self) -> &[StackEntry] {
        &self.stack
    }

    pub fn shapes(&self) -> &[PolygonShape] {
        &self.shapes
    }

    /// Last viewport fit and its padding.
    pub fn fitted(&self) -> Option<(Bounds, (u32, u32))> {
        self.fitted
    }

    pub fn fit_calls(&self) -> usize {
        self.fit_calls
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Overlay shapes as a FeatureCollection, `[lon, lat]` ordered, with the
    /// fitted viewport as its bbox.
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .shapes
            .iter()
            .map(|shape| {
                let properties = json!({
                    "areaId": shape.area_id,
                    "status": shape.status.as_str(),
                    "color": shape.style.color,
                    "weight": shape.style.weight,
                    "fillColor": shape.style.fill_color,
                    "fillOpacity": shape.style.fill_opacity,
                    "popup": shape.popup,
                });
                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(geojson::Value::from(&shape.polygon))),
                    id: Some(geojson::feature::Id::Number(shape.area_id.into())),
                    properties: properties.as_object().cloned(),
                    foreign_members: None,
                }
            })
            .collect();

        let mut foreign_members = JsonObject::new();
        if let Some(tile) = self.tiles.last() {
            foreign_members.insert("baseLayer".to_string(), json!(tile.mode));
        }

        FeatureCollection {
            bbox: self.fitted.map(|(bounds, _)| bounds.to_bbox()),
            features,
            foreign_members: (!foreign_members.is_empty()).then_some(foreign_members),
        }
    }
}

impl MapWidget for GeoJsonWidget {
    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.center = Some(center);
        self.zoom = zoom;
    }

    fn add_tile_layer(&mut self, layer: TileLayer) {
        // Tiles always render below the overlay
        let position = self
            .stack
            .iter()
            .position(|entry| *entry == StackEntry::Overlay)
            .unwrap_or(self.stack.len());
        self.stack.insert(position, StackEntry::Tile(layer.id));
        self.tiles.push(layer);
    }

    fn remove_tile_layer(&mut self, id: LayerId) {
        self.tiles.retain(|tile| tile.id != id);
        self.stack.retain(|entry| *entry != StackEntry::Tile(id));
    }

    fn tile_layers(&self) -> Vec<LayerId> {
        self.tiles.iter().map(|tile| tile.id).collect()
    }

    fn attach_overlay(&mut self) {
        self.stack.retain(|entry| *entry != StackEntry::Overlay);
        self.stack.push(StackEntry::Overlay);
    }

    fn clear_overlay(&mut self) {
        self.shapes.clear();
    }

    fn add_polygon(&mut self, shape: PolygonShape) {
        self.shapes.push(shape);
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: (u32, u32)) {
        self.fitted = Some((bounds, padding));
        self.fit_calls += 1;
    }

    fn destroy(&mut self) {
        self.tiles.clear();
        self.stack.clear();
        self.shapes.clear();
        self.destroyed = true;
    }
}
