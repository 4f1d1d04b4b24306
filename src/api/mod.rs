mod axis_layout_pass_resolver;
mod axis_ticks;
mod data_controller;
mod engine;
mod engine_config;
mod engine_snapshot;
mod json_contract;
mod layout_pipeline;
mod small_multiple_layout;

pub use axis_layout_pass_resolver::{
    AXIS_LABEL_GAP_PX, BASE_RIGHT_MARGIN_PX, ChartLayout, MARGIN_STABILITY_EPSILON_PX,
    MAX_LAYOUT_PASSES, Margins, TOP_MARGIN_PX,
};
pub use axis_ticks::AxisTick;
pub use engine::ChartEngine;
pub use engine_config::ChartEngineConfig;
pub use engine_snapshot::LayoutSnapshot;
pub use json_contract::{LAYOUT_SNAPSHOT_JSON_SCHEMA_V1, LayoutSnapshotJsonContractV1};
pub use layout_pipeline::{BarLayout, PlotLayout};
pub use small_multiple_layout::{CellLayout, SmallMultipleLayout};
