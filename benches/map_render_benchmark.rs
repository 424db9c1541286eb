use criterion::{criterion_group, criterion_main, Criterion};
use runk_client::map::{GeoJsonWidget, TerritoryMap, ViewMode};
use runk_client::models::{Territory, TerritoryStatus};
use std::hint::black_box;

/// A grid of small hexagon-ish territories around Milan.
fn synthetic_territories(count: usize) -> Vec<Territory> {
    (0..count)
        .map(|i| {
            let lat = 45.30 + (i / 40) as f64 * 0.01;
            let lon = 9.00 + (i % 40) as f64 * 0.01;
            let coordinates = (0..6)
                .map(|k| {
                    let angle = k as f64 * std::f64::consts::PI / 3.0;
                    (lat + 0.004 * angle.sin(), lon + 0.004 * angle.cos())
                })
                .collect();
            Territory {
                area_id: i as i64,
                area: 5000.0 + i as f64,
                coordinates,
                center_point: (lat, lon),
                status: if i % 3 == 0 {
                    TerritoryStatus::Defended
                } else {
                    TerritoryStatus::Conquered
                },
                conquered_at: "2026-05-01T08:00:00Z".to_string(),
                last_activity_date: "2026-06-01T08:00:00Z".to_string(),
            }
        })
        .collect()
}

fn benchmark_map_render(c: &mut Criterion) {
    let territories = synthetic_territories(1000);

    let mut group = c.benchmark_group("territory_map");

    group.bench_function("set_territories_1000", |b| {
        let mut map = TerritoryMap::new(GeoJsonWidget::new(), ViewMode::Satellite);
        b.iter(|| map.set_territories(black_box(&territories), false))
    });

    group.bench_function("render_geojson_1000", |b| {
        b.iter(|| {
            let mut map = TerritoryMap::new(GeoJsonWidget::new(), ViewMode::Street);
            map.set_territories(black_box(&territories), false);
            let collection = map.widget().to_geojson();
            map.dispose();
            collection
        })
    });

    group.bench_function("toggle_view_mode", |b| {
        let mut map = TerritoryMap::new(GeoJsonWidget::new(), ViewMode::Satellite);
        map.set_territories(&territories, false);
        let mut mode = ViewMode::Satellite;
        b.iter(|| {
            mode = match mode {
                ViewMode::Satellite => ViewMode::Street,
                ViewMode::Street => ViewMode::Satellite,
            };
            map.set_view_mode(black_box(mode));
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_map_render);
criterion_main!(benches);
