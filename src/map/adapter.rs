// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Adapter that owns a map widget and keeps it in sync with the territory set
//! and the selected view mode.

use crate::map::layers::{Bounds, LayerId, PolygonShape, TileLayer, ViewMode};
use crate::map::widget::MapWidget;
use crate::models::{LatLng, Territory};

/// Milan.
pub const DEFAULT_CENTER: LatLng = (45.4642, 9.19);
pub const DEFAULT_ZOOM: u8 = 10;
/// Padding in pixels applied when fitting the viewport to the territories.
pub const FIT_PADDING: (u32, u32) = (20, 20);

/// Exclusive owner of one map widget instance.
///
/// The widget is destroyed by [`dispose`](Self::dispose) or, failing that,
/// when the adapter is dropped.
pub struct TerritoryMap<W: MapWidget> {
    widget: W,
    view_mode: ViewMode,
    /// The base layer not currently attached
    standby: TileLayer,
    next_layer_id: u64,
    disposed: bool,
}

impl<W: MapWidget> TerritoryMap<W> {
    /// Center the widget on the default view and attach the base layer for
    /// `view_mode` with the territory overlay above it.
    pub fn new(mut widget: W, view_mode: ViewMode) -> Self {
        widget.set_view(DEFAULT_CENTER, DEFAULT_ZOOM);

        let mut map = Self {
            widget,
            view_mode,
            standby: TileLayer::new(LayerId(0), ViewMode::Street),
            next_layer_id: 0,
            disposed: false,
        };
        let (active, standby) = map.create_base_layers(view_mode);
        map.standby = standby;
        map.widget.add_tile_layer(active);
        map.widget.attach_overlay();

        tracing::debug!(view_mode = ?view_mode, "Map initialized");
        map
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// The base layer created alongside the attached one but left detached.
    pub fn standby_layer(&self) -> &TileLayer {
        &self.standby
    }

    /// Read-only access for rendering or export.
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Fresh satellite and street layers, returned as `(selected, other)`.
    fn create_base_layers(&mut self, selected: ViewMode) -> (TileLayer, TileLayer) {
        let satellite = TileLayer::new(self.allocate_id(), ViewMode::Satellite);
        let street = TileLayer::new(self.allocate_id(), ViewMode::Street);
        match selected {
            ViewMode::Satellite => (satellite, street),
            ViewMode::Street => (street, satellite),
        }
    }

    fn allocate_id(&mut self) -> LayerId {
        self.next_layer_id += 1;
        LayerId(self.next_layer_id)
    }

    /// Swap the base layer. Every attached tile layer is removed, a newly
    /// created layer for `mode` is attached and the overlay is put back on top.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        for id in self.widget.tile_layers() {
            self.widget.remove_tile_layer(id);
        }

        let (active, standby) = self.create_base_layers(mode);
        self.standby = standby;
        self.widget.add_tile_layer(active);
        self.widget.attach_overlay();
        self.view_mode = mode;

        tracing::debug!(view_mode = ?mode, "Map view mode changed");
    }

    /// Replace the overlay contents with `territories`.
    ///
    /// The overlay is always cleared first. While `loading`, or for an empty
    /// set, nothing is drawn and the viewport is left alone.
    pub fn set_territories(&mut self, territories: &[Territory], loading: bool) {
        self.widget.clear_overlay();
        if loading || territories.is_empty() {
            return;
        }

        for territory in territories {
            self.widget.add_polygon(PolygonShape::from(territory));
        }

        if let Some(bounds) = Bounds::around(territories.iter().flat_map(|t| t.coordinates.iter())) {
            self.widget.fit_bounds(bounds, FIT_PADDING);
        }

        tracing::debug!(count = territories.len(), "Territories rendered");
    }

    /// Destroy the widget.
    pub fn dispose(mut self) {
        self.destroy_widget();
    }

    fn destroy_widget(&mut self) {
        if !self.disposed {
            self.widget.destroy();
            self.disposed = true;
        }
    }
}

impl<W: MapWidget> Drop for TerritoryMap<W> {
    fn drop(&mut self) {
        self.destroy_widget();
    }
}
