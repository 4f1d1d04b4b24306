use serde::{Deserialize, Serialize};

use crate::core::domain::Domain;
use crate::core::label_format::{ResolvedValueFormat, format_category_label, format_decimal, format_time_label};
use crate::core::scale::{CategoryScale, LinearScale};
use crate::core::text_metrics::{TextMeasurer, TextStyle, tailor_text};
use crate::core::types::CategoryValue;

pub(super) const VALUE_TICK_MIN_TARGET_SPACING_PX: f64 = 60.0;
pub(super) const VALUE_TICK_LABEL_GAP_PX: f64 = 16.0;
pub(super) const CATEGORY_TICK_TARGET_SPACING_PX: f64 = 40.0;
pub(super) const MIN_TICKS: usize = 2;
pub(super) const MAX_TICKS: usize = 12;

/// One labelled tick on an axis; `position_px` is relative to the plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub value: f64,
    pub position_px: f64,
    pub label: String,
    pub label_width: f64,
}

pub(super) fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Round-number tick values inside `domain`, roughly `count` of them.
pub(super) fn nice_tick_values(domain: Domain, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let intervals = count.saturating_sub(1).max(1);
    let step = nice_step(domain.span() / intervals as f64);
    if step == 0.0 {
        return vec![domain.min, domain.max];
    }

    let first = (domain.min / step).ceil();
    let last = (domain.max / step).floor();
    let n = last - first;
    if !n.is_finite() || n < 0.0 {
        return vec![domain.min, domain.max];
    }
    let n = n.min(1_000.0) as usize;
    (0..=n)
        .map(|i| (first + i as f64) * step)
        // Snap float noise like 0.30000000000000004 onto the step grid.
        .map(|value| (value / step).round() * step)
        .collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// Drops ticks closer than `min_spacing_px` to the previously kept one,
/// preferring to keep the last tick.
pub(super) fn select_ticks_with_min_spacing(
    mut ticks: Vec<AxisTick>,
    min_spacing_px: f64,
) -> Vec<AxisTick> {
    ticks.sort_by(|left, right| left.position_px.total_cmp(&right.position_px));
    if ticks.len() <= 1 || !min_spacing_px.is_finite() || min_spacing_px <= 0.0 {
        return ticks;
    }

    let mut selected: Vec<AxisTick> = Vec::with_capacity(ticks.len());
    let mut last_kept = f64::NEG_INFINITY;
    for tick in &ticks {
        if tick.position_px - last_kept >= min_spacing_px {
            last_kept = tick.position_px;
            selected.push(tick.clone());
        }
    }

    if let (Some(last_tick), Some(selected_last)) = (ticks.last(), selected.last()) {
        if selected_last.position_px != last_tick.position_px {
            let len = selected.len();
            if len == 1 {
                // On very narrow axes a single label is clearer than overlapping pairs.
                selected[0] = last_tick.clone();
            } else if last_tick.position_px - selected[len - 2].position_px >= min_spacing_px {
                selected[len - 1] = last_tick.clone();
            }
        }
    }

    selected
}

/// Value axis ticks for a plot `scale` wide.
pub(super) fn value_axis_ticks(
    scale: LinearScale,
    format: ResolvedValueFormat,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> Vec<AxisTick> {
    let domain = scale.domain();
    let (range_start, range_end) = scale.range();
    let plot_width = (range_end - range_start).abs();

    let widest_bound = [domain.min, domain.max]
        .iter()
        .map(|value| measurer.measure(&format.format(*value), style).width)
        .fold(0.0, f64::max);
    let target_spacing = (widest_bound + VALUE_TICK_LABEL_GAP_PX).max(VALUE_TICK_MIN_TARGET_SPACING_PX);
    let count = axis_tick_target_count(plot_width, target_spacing, MIN_TICKS, MAX_TICKS);

    let ticks: Vec<AxisTick> = nice_tick_values(domain, count)
        .into_iter()
        .map(|value| {
            let label = format.format(value);
            let label_width = measurer.measure(&label, style).width;
            AxisTick {
                value,
                position_px: scale.domain_to_pixel(value),
                label,
                label_width,
            }
        })
        .collect();
    let widest = ticks.iter().map(|tick| tick.label_width).fold(0.0, f64::max);
    select_ticks_with_min_spacing(ticks, widest + VALUE_TICK_LABEL_GAP_PX / 2.0)
}

/// Category ticks: one per visible band on ordinal scales, round values on
/// continuous ones. Labels wider than `max_label_width` get an ellipsis.
pub(super) fn category_axis_ticks(
    scale: &CategoryScale,
    visible: &[CategoryValue],
    temporal: bool,
    style: &TextStyle,
    max_label_width: f64,
    measurer: &dyn TextMeasurer,
) -> Vec<AxisTick> {
    match scale {
        CategoryScale::Band(band) => visible
            .iter()
            .enumerate()
            .filter_map(|(index, category)| {
                let top = band.position(category)?;
                let label = tailor_text(
                    &format_category_label(category),
                    style,
                    max_label_width,
                    measurer,
                );
                let label_width = measurer.measure(&label, style).width;
                Some(AxisTick {
                    value: category.as_scalar().unwrap_or(index as f64),
                    position_px: top + band.band_width() / 2.0,
                    label,
                    label_width,
                })
            })
            .collect(),
        CategoryScale::Linear(linear) => {
            let (range_start, range_end) = linear.range();
            let count = axis_tick_target_count(
                (range_end - range_start).abs(),
                CATEGORY_TICK_TARGET_SPACING_PX,
                MIN_TICKS,
                MAX_TICKS,
            );
            let ticks: Vec<AxisTick> = nice_tick_values(linear.domain(), count)
                .into_iter()
                .map(|value| {
                    let raw = if temporal {
                        format_time_label(value)
                    } else {
                        format_decimal(value, None)
                    };
                    let label = tailor_text(&raw, style, max_label_width, measurer);
                    let label_width = measurer.measure(&label, style).width;
                    AxisTick {
                        value,
                        position_px: linear.domain_to_pixel(value),
                        label,
                        label_width,
                    }
                })
                .collect();
            let line_height = measurer.measure("0", style).height;
            select_ticks_with_min_spacing(ticks, line_height)
        }
    }
}
