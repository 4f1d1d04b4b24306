use bar_chart_layout::api::{ChartEngine, ChartEngineConfig};
use bar_chart_layout::core::bar_geometry::compute_bar_rects;
use bar_chart_layout::core::domain::calculate_axes_domains;
use bar_chart_layout::core::label_placement::suppress_overlapping_labels;
use bar_chart_layout::core::scale::build_axes;
use bar_chart_layout::core::{ChartSettings, DataPoint, PlacedLabel, Rect, Size, Viewport};
use bar_chart_layout::render::NullRenderer;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn continuous_points(count: usize) -> Vec<DataPoint> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            DataPoint::new(t * 0.5, 10.0 + (t * 0.37).sin() * 8.0)
        })
        .collect()
}

fn bench_continuous_geometry_10k(c: &mut Criterion) {
    let points = continuous_points(10_000);
    let refs: Vec<&DataPoint> = points.iter().collect();
    let settings = ChartSettings::default();
    let domains = calculate_axes_domains(&refs, &settings, true);
    let axes = build_axes(&domains, Size::new(1_600.0, 900.0), true, 0.8);

    c.bench_function("continuous_bar_geometry_10k", |b| {
        b.iter(|| {
            let _ = compute_bar_rects(black_box(&refs), black_box(&axes), 5.0, 5.0);
        })
    });
}

fn bench_label_collision_2k(c: &mut Criterion) {
    let labels: Vec<Option<PlacedLabel>> = (0..2_000)
        .map(|i| {
            Some(PlacedLabel {
                text: format!("{i}"),
                rect: Rect::new((i % 40) as f64 * 30.0, (i / 40) as f64 * 9.0, 36.0, 12.0),
            })
        })
        .collect();

    c.bench_function("label_collision_2k", |b| {
        b.iter(|| {
            let mut candidates = labels.clone();
            suppress_overlapping_labels(black_box(&mut candidates));
        })
    });
}

fn bench_engine_update_categorical_500(c: &mut Criterion) {
    let config = ChartEngineConfig::new(Viewport::new(1_200, 800));
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    let points: Vec<DataPoint> = (0..500)
        .map(|i| DataPoint::new(format!("category {i}"), (i % 17) as f64 * 3.5))
        .collect();
    engine.set_data(points).expect("set data");

    c.bench_function("engine_update_categorical_500", |b| {
        b.iter(|| {
            let _ = engine.update().expect("update");
        })
    });
}

fn bench_small_multiple_update_4x4(c: &mut Criterion) {
    let config = ChartEngineConfig::new(Viewport::new(1_600, 1_200));
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    let points: Vec<DataPoint> = (0..1_600)
        .map(|i| {
            DataPoint::new(format!("c{}", i % 25), (i % 13) as f64)
                .with_row_key(format!("row {}", i % 4))
                .with_column_key(format!("col {}", (i / 4) % 4))
        })
        .collect();
    engine.set_data(points).expect("set data");

    c.bench_function("small_multiple_update_4x4", |b| {
        b.iter(|| {
            let _ = engine.update().expect("update");
        })
    });
}

criterion_group!(
    benches,
    bench_continuous_geometry_10k,
    bench_label_collision_2k,
    bench_engine_update_categorical_500,
    bench_small_multiple_update_4x4
);
criterion_main!(benches);
