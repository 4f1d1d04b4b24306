use serde::{Deserialize, Serialize};

use crate::core::types::Rect;

pub const LABEL_PADDING_PX: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPosition {
    InsideStart,
    InsideEnd,
    OutsideEnd,
    #[default]
    Auto,
}

/// Horizontal placement of a data label next to its bar.
///
/// Returns the label's left edge in plot coordinates, or `None` when the
/// label cannot be placed.
pub trait LabelPositionShift {
    fn shift(&self, text_width: f64, bar: Rect, chart_width: f64, legend_present: bool)
    -> Option<f64>;
}

impl<F> LabelPositionShift for F
where
    F: Fn(f64, Rect, f64, bool) -> Option<f64>,
{
    fn shift(
        &self,
        text_width: f64,
        bar: Rect,
        chart_width: f64,
        legend_present: bool,
    ) -> Option<f64> {
        self(text_width, bar, chart_width, legend_present)
    }
}

/// Default shift driven by the configured [`LabelPosition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolicyPositionShift {
    pub position: LabelPosition,
    pub allow_overflow: bool,
}

impl PolicyPositionShift {
    #[must_use]
    pub fn new(position: LabelPosition, allow_overflow: bool) -> Self {
        Self {
            position,
            allow_overflow,
        }
    }

    fn inside_start(text_width: f64, bar: Rect) -> Option<f64> {
        fits_inside(text_width, bar).then_some(bar.x + LABEL_PADDING_PX)
    }

    fn inside_end(text_width: f64, bar: Rect) -> Option<f64> {
        fits_inside(text_width, bar).then_some(bar.right() - LABEL_PADDING_PX - text_width)
    }

    fn outside_end(text_width: f64, bar: Rect, chart_width: f64) -> Option<f64> {
        let x = bar.right() + LABEL_PADDING_PX;
        (x + text_width <= chart_width).then_some(x)
    }

    fn auto(text_width: f64, bar: Rect, chart_width: f64) -> Option<f64> {
        Self::outside_end(text_width, bar, chart_width)
            .or_else(|| Self::inside_end(text_width, bar))
    }
}

impl LabelPositionShift for PolicyPositionShift {
    fn shift(
        &self,
        text_width: f64,
        bar: Rect,
        chart_width: f64,
        legend_present: bool,
    ) -> Option<f64> {
        let position = match self.position {
            LabelPosition::OutsideEnd if legend_present => LabelPosition::Auto,
            other => other,
        };
        let placed = match position {
            LabelPosition::InsideStart => Self::inside_start(text_width, bar),
            LabelPosition::InsideEnd => Self::inside_end(text_width, bar),
            LabelPosition::OutsideEnd => Self::outside_end(text_width, bar, chart_width),
            LabelPosition::Auto => Self::auto(text_width, bar, chart_width),
        };
        if placed.is_some() || !self.allow_overflow {
            return placed;
        }
        // Overflow keeps the preferred anchor even when the text does not fit.
        Some(match position {
            LabelPosition::InsideStart => bar.x + LABEL_PADDING_PX,
            LabelPosition::InsideEnd => bar.right() - LABEL_PADDING_PX - text_width,
            LabelPosition::OutsideEnd | LabelPosition::Auto => bar.right() + LABEL_PADDING_PX,
        })
    }
}

fn fits_inside(text_width: f64, bar: Rect) -> bool {
    text_width + 2.0 * LABEL_PADDING_PX <= bar.width
}
