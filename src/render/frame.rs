use serde::{Deserialize, Serialize};

use crate::api::{BarLayout, ChartLayout, PlotLayout, SmallMultipleLayout};
use crate::core::types::{Rect, Size, Viewport};
use crate::error::{LayoutError, LayoutResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LayoutBody {
    Single(ChartLayout),
    SmallMultiple(SmallMultipleLayout),
}

/// Complete output of one engine update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFrame {
    pub viewport: Viewport,
    pub legend: Option<Size>,
    pub body: LayoutBody,
}

impl LayoutFrame {
    #[must_use]
    pub fn new(viewport: Viewport, legend: Option<Size>, body: LayoutBody) -> Self {
        Self {
            viewport,
            legend,
            body,
        }
    }

    /// Every plot in the frame, one per cell in small-multiple mode.
    pub fn plots(&self) -> impl Iterator<Item = &PlotLayout> {
        let (single, cells) = match &self.body {
            LayoutBody::Single(chart) => (Some(&chart.plot), None),
            LayoutBody::SmallMultiple(grid) => (None, Some(grid.cells.iter().map(|cell| &cell.plot))),
        };
        single.into_iter().chain(cells.into_iter().flatten())
    }

    pub fn bars(&self) -> impl Iterator<Item = &BarLayout> {
        self.plots().flat_map(|plot| plot.bars.iter())
    }

    #[must_use]
    pub fn bar_count(&self) -> usize {
        self.bars().count()
    }

    #[must_use]
    pub fn label_count(&self) -> usize {
        self.plots().map(PlotLayout::label_count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bar_count() == 0
    }

    /// Rejects frames with non-finite or negative geometry.
    pub fn validate(&self) -> LayoutResult<()> {
        if !self.viewport.is_valid() {
            return Err(LayoutError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for bar in self.bars() {
            validate_rect(bar.bar, "bar", bar.point_index)?;
            if let Some(label) = &bar.label {
                validate_rect(label.rect, "label", bar.point_index)?;
            }
        }
        Ok(())
    }
}

fn validate_rect(rect: Rect, kind: &str, point_index: usize) -> LayoutResult<()> {
    if rect.is_finite_non_negative() {
        Ok(())
    } else {
        Err(LayoutError::InvalidData(format!(
            "{kind} rect for point {point_index} must be finite and non-negative"
        )))
    }
}
