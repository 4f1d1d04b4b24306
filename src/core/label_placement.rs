use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::label_format::ResolvedValueFormat;
use crate::core::label_position::LabelPositionShift;
use crate::core::settings::DataLabelSettings;
use crate::core::text_metrics::TextMeasurer;
use crate::core::types::Rect;

/// Horizontal margin around accepted labels for the collision test.
pub const LABEL_COLLISION_MARGIN_X_PX: f64 = 8.0;
/// Vertical margin around accepted labels for the collision test.
pub const LABEL_COLLISION_MARGIN_Y_PX: f64 = 2.0;
/// Extra height a label background needs inside the bar.
pub const LABEL_BACKGROUND_PADDING_PX: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLabel {
    pub text: String,
    pub rect: Rect,
}

/// Everything the placer needs besides the bars themselves.
pub struct LabelPlacementContext<'a> {
    pub settings: &'a DataLabelSettings,
    pub format: ResolvedValueFormat,
    pub chart_width: f64,
    pub legend_present: bool,
    pub measurer: &'a dyn TextMeasurer,
    pub position_shift: &'a dyn LabelPositionShift,
}

/// Candidate label per bar, before collision filtering.
///
/// `values[i]` is the value printed for `bars[i]`. Hidden bars, labels that
/// do not fit the bar thickness (without overflow) and labels the position
/// policy rejects produce `None`.
#[must_use]
pub fn compute_label_candidates(
    values: &[f64],
    bars: &[Rect],
    ctx: &LabelPlacementContext<'_>,
) -> Vec<Option<PlacedLabel>> {
    if !ctx.settings.show {
        return vec![None; bars.len()];
    }
    let background_padding = if ctx.settings.show_background {
        LABEL_BACKGROUND_PADDING_PX
    } else {
        0.0
    };

    bars.iter()
        .zip(values.iter().copied())
        .map(|(bar, value)| {
            if bar.is_hidden() {
                return None;
            }
            let text = ctx.format.format(value);
            let size = ctx.measurer.measure(&text, &ctx.settings.font);
            let fits = size.height + background_padding < bar.height;
            if !(ctx.settings.overflow_text || fits) {
                return None;
            }
            let x = ctx
                .position_shift
                .shift(size.width, *bar, ctx.chart_width, ctx.legend_present)?;
            let y = bar.center_y() - size.height / 2.0;
            Some(PlacedLabel {
                text,
                rect: Rect::new(x, y, size.width, size.height),
            })
        })
        .collect()
}

/// Whether `candidate` comes too close to an already accepted label.
///
/// The margins are one-sided: the accepted rect is grown by 8px on its right
/// and shrunk by 8px on its left; vertically it grows 2px at the bottom and
/// shrinks 2px at the top. A candidate to the right of `accepted` collides
/// across a gap of up to 8px, while one to the left may overlap it by up to
/// 8px and still pass. Placement output depends on this exact shape.
#[must_use]
pub fn labels_collide(candidate: Rect, accepted: Rect) -> bool {
    candidate.x < accepted.right() + LABEL_COLLISION_MARGIN_X_PX
        && candidate.right() > accepted.x + LABEL_COLLISION_MARGIN_X_PX
        && candidate.y < accepted.bottom() + LABEL_COLLISION_MARGIN_Y_PX
        && candidate.bottom() > accepted.y + LABEL_COLLISION_MARGIN_Y_PX
}

/// Greedy first-fit filter in input order: a label survives only when it
/// collides with none of the labels accepted before it.
pub fn suppress_overlapping_labels(labels: &mut [Option<PlacedLabel>]) {
    let mut accepted: Vec<Rect> = Vec::with_capacity(labels.len());
    for (index, slot) in labels.iter_mut().enumerate() {
        let Some(label) = slot else {
            continue;
        };
        if accepted.iter().any(|rect| labels_collide(label.rect, *rect)) {
            trace!(index, "label suppressed by collision");
            *slot = None;
        } else {
            accepted.push(label.rect);
        }
    }
}

/// Candidate generation followed by collision suppression.
#[must_use]
pub fn place_labels(
    values: &[f64],
    bars: &[Rect],
    ctx: &LabelPlacementContext<'_>,
) -> Vec<Option<PlacedLabel>> {
    let mut labels = compute_label_candidates(values, bars, ctx);
    suppress_overlapping_labels(&mut labels);
    labels
}
