use bar_chart_layout::api::{
    LAYOUT_SNAPSHOT_JSON_SCHEMA_V1, LayoutSnapshot, LayoutSnapshotJsonContractV1,
};
use bar_chart_layout::core::{ChartSettings, DataPoint, Size, Viewport};
use bar_chart_layout::render::NullRenderer;
use bar_chart_layout::{ChartEngine, ChartEngineConfig, LayoutError};

fn rendered_engine() -> ChartEngine<NullRenderer> {
    let mut settings = ChartSettings::default();
    settings.data_labels.show = true;
    let config = ChartEngineConfig::new(Viewport::new(720, 420))
        .with_settings(settings)
        .with_legend(Size::new(80.0, 0.0));
    let mut engine = ChartEngine::new(NullRenderer::default(), config).expect("engine init");
    engine
        .set_data(vec![
            DataPoint::new("north", 120.0).with_score(100.0),
            DataPoint::new("south", 75.5).with_range(60.0, 90.0),
            DataPoint::new("east", -20.0).with_selected(true),
        ])
        .expect("valid data");
    engine.render().expect("render");
    engine
}

#[test]
fn snapshot_contract_roundtrip_preserves_state() {
    let engine = rendered_engine();
    let snapshot = engine.snapshot();
    assert!(snapshot.frame.is_some());

    let json = snapshot.to_json_contract_v1_pretty().expect("serialize");
    let parsed = LayoutSnapshot::from_json_compat_str(&json).expect("parse contract");
    assert_eq!(parsed, snapshot);
}

#[test]
fn contract_carries_schema_version() {
    let json = rendered_engine()
        .snapshot()
        .to_json_contract_v1_pretty()
        .expect("serialize");
    let payload: LayoutSnapshotJsonContractV1 = serde_json::from_str(&json).expect("payload");
    assert_eq!(payload.schema_version, LAYOUT_SNAPSHOT_JSON_SCHEMA_V1);
    assert!(json.contains("\"mode\": \"single\""));
}

#[test]
fn bare_snapshot_json_is_accepted() {
    let snapshot = rendered_engine().snapshot();
    let bare = serde_json::to_string(&snapshot).expect("serialize bare");
    let parsed = LayoutSnapshot::from_json_compat_str(&bare).expect("parse bare");
    assert_eq!(parsed, snapshot);
}

#[test]
fn unknown_schema_version_is_rejected() {
    let snapshot = rendered_engine().snapshot();
    let mut value = serde_json::to_value(LayoutSnapshotJsonContractV1 {
        schema_version: LAYOUT_SNAPSHOT_JSON_SCHEMA_V1,
        snapshot,
    })
    .expect("to value");
    value["schema_version"] = serde_json::json!(99);

    let err = LayoutSnapshot::from_json_compat_str(&value.to_string()).expect_err("must fail");
    assert!(matches!(err, LayoutError::InvalidData(message) if message.contains("99")));
}

#[test]
fn snapshot_before_update_has_no_frame() {
    let engine = ChartEngine::new(
        NullRenderer::default(),
        ChartEngineConfig::new(Viewport::new(300, 200)),
    )
    .expect("engine init");
    let snapshot = engine.snapshot();
    assert!(snapshot.frame.is_none());
    assert!(snapshot.points.is_empty());

    let json = snapshot.to_json_contract_v1_pretty().expect("serialize");
    assert_eq!(
        LayoutSnapshot::from_json_compat_str(&json).expect("parse"),
        snapshot
    );
}
