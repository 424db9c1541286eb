// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Territory map rendering.

pub mod adapter;
pub mod layers;
pub mod widget;

pub use adapter::TerritoryMap;
pub use layers::{Bounds, PolygonShape, PolygonStyle, TileLayer, ViewMode};
pub use widget::{GeoJsonWidget, MapWidget};
