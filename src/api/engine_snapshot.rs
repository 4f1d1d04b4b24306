use serde::{Deserialize, Serialize};

use crate::core::settings::ChartSettings;
use crate::core::types::{DataPoint, Size, Viewport};
use crate::render::{LayoutFrame, Renderer};

use super::ChartEngine;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub viewport: Viewport,
    pub legend: Option<Size>,
    pub scroll_offset: usize,
    pub settings: ChartSettings,
    pub points: Vec<DataPoint>,
    pub frame: Option<LayoutFrame>,
}

impl<R: Renderer> ChartEngine<R> {
    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            viewport: self.config.viewport,
            legend: self.config.legend,
            scroll_offset: self.config.scroll_offset,
            settings: self.config.settings.clone(),
            points: self.points.clone(),
            frame: self.frame.clone(),
        }
    }
}
