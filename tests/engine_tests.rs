use bar_chart_layout::api::{AXIS_LABEL_GAP_PX, ChartLayout, MAX_LAYOUT_PASSES};
use bar_chart_layout::core::{
    ChartSettings, DataPoint, LabelPosition, Rect, Size, TextSize, TextStyle, Viewport,
};
use bar_chart_layout::render::{LayoutBody, NullRenderer};
use bar_chart_layout::{ChartEngine, ChartEngineConfig, LayoutError};
use rust_decimal::Decimal;
use std::cell::Cell;
use std::rc::Rc;

fn six_px_glyphs(text: &str, _style: &TextStyle) -> TextSize {
    TextSize::new(text.chars().count() as f64 * 6.0, 10.0)
}

fn engine_with(config: ChartEngineConfig, points: Vec<DataPoint>) -> ChartEngine<NullRenderer> {
    let mut engine = ChartEngine::new(NullRenderer::default(), config)
        .expect("engine init")
        .with_text_measurer(Box::new(six_px_glyphs));
    engine.set_data(points).expect("valid data");
    engine
}

fn single(engine: &ChartEngine<NullRenderer>) -> &ChartLayout {
    match &engine.frame().expect("frame").body {
        LayoutBody::Single(chart) => chart,
        LayoutBody::SmallMultiple(_) => panic!("expected single chart body"),
    }
}

#[test]
fn zero_sized_viewport_is_rejected() {
    let result = ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::new(Viewport::new(0, 300)),
    );
    assert!(matches!(
        result,
        Err(LayoutError::InvalidViewport {
            width: 0,
            height: 300
        })
    ));
}

#[test]
fn negative_legend_is_rejected() {
    let config = ChartEngineConfig::new(Viewport::new(400, 300)).with_legend(Size::new(-1.0, 0.0));
    let result = ChartEngine::new(NullRenderer::default(), config);
    assert!(matches!(result, Err(LayoutError::InvalidSettings(_))));
}

#[test]
fn non_finite_batch_is_rejected_and_previous_data_kept() {
    let mut engine = engine_with(
        ChartEngineConfig::new(Viewport::new(400, 300)),
        vec![DataPoint::new("a", 1.0)],
    );

    let err = engine
        .set_data(vec![DataPoint::new("b", 2.0), DataPoint::new("c", f64::NAN)])
        .expect_err("nan value must be rejected");
    assert!(matches!(err, LayoutError::InvalidData(_)));
    assert_eq!(engine.points().len(), 1);

    let err = engine
        .set_data(vec![DataPoint::new(f64::INFINITY, 2.0)])
        .expect_err("infinite category must be rejected");
    assert!(matches!(err, LayoutError::InvalidData(_)));
    assert_eq!(engine.points()[0].category.to_string(), "a");
}

#[test]
fn decimal_values_are_accepted() {
    let point = DataPoint::from_decimal("a", Decimal::new(12_345, 2)).expect("decimal point");
    assert!((point.value - 123.45).abs() <= 1e-9);
}

#[test]
fn update_is_deterministic() {
    let points = vec![
        DataPoint::new("alpha", 12.0).with_score(10.0),
        DataPoint::new("beta", 48.5).with_range(30.0, 60.0),
        DataPoint::new("gamma", -7.0),
    ];
    let mut engine = engine_with(ChartEngineConfig::new(Viewport::new(640, 360)), points);

    let first = engine.update().expect("first update").clone();
    let second = engine.update().expect("second update").clone();
    assert_eq!(first, second);
}

#[test]
fn simple_chart_converges_in_one_pass() {
    let mut engine = engine_with(
        ChartEngineConfig::new(Viewport::new(800, 400)),
        vec![DataPoint::new("aa", 50.0), DataPoint::new("bbbb", 100.0)],
    );
    engine.update().expect("update");

    let chart = single(&engine);
    assert!(chart.converged);
    assert_eq!(chart.passes, 1);
    assert_eq!(chart.margins.left, 24.0 + AXIS_LABEL_GAP_PX);
    assert_eq!(chart.margins.bottom, 10.0 + AXIS_LABEL_GAP_PX);
    assert_eq!(chart.plot_origin.x, chart.margins.left);
    assert_eq!(
        chart.plot.plot_size.width,
        800.0 - chart.margins.left - chart.margins.right
    );
}

#[test]
fn layout_passes_never_exceed_the_cap() {
    let points: Vec<DataPoint> = (0..30)
        .map(|i| DataPoint::new("w".repeat(i % 17 + 1), (i as f64 - 10.0) * 1_234.5))
        .collect();
    let mut engine = engine_with(ChartEngineConfig::new(Viewport::new(300, 500)), points);
    engine.update().expect("update");

    let chart = single(&engine);
    assert!(chart.passes >= 1 && chart.passes <= MAX_LAYOUT_PASSES);
    assert_eq!(chart.left_margin_history.len(), chart.passes);
    assert_eq!(chart.left_margin_history.last().copied(), Some(chart.margins.left));
}

#[test]
fn drifting_label_widths_stop_at_the_pass_cap() {
    let measured = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&measured);
    // Every measurement of the category label comes back 25px wider.
    let drifting = move |text: &str, _style: &TextStyle| {
        let mut width = text.chars().count() as f64 * 6.0;
        if text == "aa" {
            counter.set(counter.get() + 1);
            width += counter.get() as f64 * 25.0;
        }
        TextSize::new(width, 10.0)
    };

    let mut settings = ChartSettings::default();
    settings.category_axis.max_label_width_ratio = 50.0;
    let config = ChartEngineConfig::new(Viewport::new(1_600, 400)).with_settings(settings);
    let mut engine = ChartEngine::new(NullRenderer::default(), config)
        .expect("engine init")
        .with_text_measurer(Box::new(drifting));
    engine
        .set_data(vec![DataPoint::new("aa", 10.0)])
        .expect("valid data");
    engine.update().expect("update");

    let chart = single(&engine);
    assert!(!chart.converged);
    assert_eq!(chart.passes, MAX_LAYOUT_PASSES);
    assert_eq!(chart.left_margin_history.len(), MAX_LAYOUT_PASSES);
    assert!(
        chart
            .left_margin_history
            .windows(2)
            .all(|pair| pair[1] > pair[0] + 0.5)
    );
    assert_eq!(chart.left_margin_history.last().copied(), Some(chart.margins.left));
    assert_eq!(chart.plot_origin.x, chart.margins.left);
    assert!(measured.get() >= MAX_LAYOUT_PASSES);
}

#[test]
fn long_category_labels_are_capped_by_width_ratio() {
    let mut engine = engine_with(
        ChartEngineConfig::new(Viewport::new(800, 400)),
        vec![DataPoint::new("x".repeat(100), 5.0), DataPoint::new("y", 3.0)],
    );
    engine.update().expect("update");

    let chart = single(&engine);
    let cap = 0.25 * 800.0;
    assert!(chart.margins.left <= cap + AXIS_LABEL_GAP_PX);
    let label = &chart.plot.category_ticks[0].label;
    assert!(label.ends_with('\u{2026}'));
}

#[test]
fn legend_shrinks_the_chart_area() {
    let points = vec![DataPoint::new("a", 5.0), DataPoint::new("b", 9.0)];
    let mut plain = engine_with(ChartEngineConfig::new(Viewport::new(800, 400)), points.clone());
    let mut with_legend = engine_with(
        ChartEngineConfig::new(Viewport::new(800, 400)).with_legend(Size::new(120.0, 30.0)),
        points,
    );
    plain.update().expect("update");
    with_legend.update().expect("update");

    let plain_plot = single(&plain).plot.plot_size;
    let legend_plot = single(&with_legend).plot.plot_size;
    assert!((plain_plot.width - legend_plot.width - 120.0).abs() <= 1e-9);
    assert!((plain_plot.height - legend_plot.height - 30.0).abs() <= 1e-9);
}

#[test]
fn render_reports_bars_and_labels() {
    let mut settings = ChartSettings::default();
    settings.data_labels.show = true;
    settings.data_labels.position = LabelPosition::OutsideEnd;
    let config = ChartEngineConfig::new(Viewport::new(800, 400)).with_settings(settings);
    let mut engine = engine_with(
        config,
        vec![
            DataPoint::new("a", 10.0),
            DataPoint::new("b", 20.0),
            DataPoint::new("c", 40.0),
        ],
    );

    engine.render().expect("render");
    let renderer = engine.renderer();
    assert_eq!(renderer.render_count, 1);
    assert_eq!(renderer.last_bar_count, 3);
    assert_eq!(renderer.last_label_count, 2);

    let chart = single(&engine);
    for bar in &chart.plot.bars {
        if let Some(label) = &bar.label {
            assert_eq!(label.rect.x, bar.bar.right() + 4.0);
        }
    }
}

#[test]
fn custom_position_shift_is_used() {
    let mut settings = ChartSettings::default();
    settings.data_labels.show = true;
    let config = ChartEngineConfig::new(Viewport::new(800, 400)).with_settings(settings);
    let mut engine = engine_with(
        config,
        vec![DataPoint::new("a", 10.0), DataPoint::new("b", 20.0)],
    )
    .with_position_shift(Box::new(
        |_width: f64, bar: Rect, _chart: f64, _legend: bool| Some(bar.x),
    ));

    engine.update().expect("update");
    let chart = single(&engine);
    assert!(chart.plot.bars.iter().all(|bar| {
        bar.label
            .as_ref()
            .is_some_and(|label| label.rect.x == bar.bar.x)
    }));
}

#[test]
fn empty_data_produces_an_empty_frame() {
    let mut engine = engine_with(ChartEngineConfig::new(Viewport::new(400, 300)), Vec::new());
    engine.render().expect("render");
    assert!(engine.frame().expect("frame").is_empty());
    assert_eq!(engine.renderer().last_bar_count, 0);
}

#[test]
fn clear_data_drops_the_frame() {
    let mut engine = engine_with(
        ChartEngineConfig::new(Viewport::new(400, 300)),
        vec![DataPoint::new("a", 1.0)],
    );
    engine.update().expect("update");
    engine.clear_data();
    assert!(engine.frame().is_none());
    assert!(engine.points().is_empty());
}

#[test]
fn settings_are_sanitized_on_the_way_in() {
    let mut settings = ChartSettings::default();
    settings.category_axis.inner_padding = 90.0;
    settings.category_axis.max_label_width_ratio = 1.0;
    let mut engine = engine_with(ChartEngineConfig::new(Viewport::new(400, 300)), Vec::new());
    engine.set_settings(settings);

    assert_eq!(engine.settings().category_axis.inner_padding, 50.0);
    assert_eq!(engine.settings().category_axis.max_label_width_ratio, 15.0);
}

#[test]
fn viewport_changes_are_validated() {
    let mut engine = engine_with(ChartEngineConfig::new(Viewport::new(400, 300)), Vec::new());
    assert!(engine.set_viewport(Viewport::new(0, 0)).is_err());
    assert_eq!(engine.viewport(), Viewport::new(400, 300));

    engine.set_viewport(Viewport::new(500, 200)).expect("valid viewport");
    assert_eq!(engine.viewport(), Viewport::new(500, 200));
}
