//! bar-chart-layout: deterministic layout engine for bar charts.
//!
//! Turns data points and axis settings into pixel geometry: axis domains and
//! scales, bar rectangles, collision-free data labels, and small-multiple
//! grids. Drawing is left to a [`render::Renderer`] implementation.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig};
pub use error::{LayoutError, LayoutResult};
