use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::scale::{CategoryScale, ResolvedAxes, ValueAxis};
use crate::core::types::{DataPoint, Rect};

/// Lower bound for resolved bar thickness on a dense continuous axis.
pub const MIN_CONTINUOUS_BAR_THICKNESS_PX: f64 = 1.5;
/// Share of the closest bar spacing left empty between continuous bars.
pub const CONTINUOUS_BAR_PADDING_RATIO: f64 = 0.2;
/// Bars with a non-zero value are never thinner than this.
pub const MIN_VISIBLE_BAR_WIDTH_PX: f64 = 1.0;

const DISTINCT_POSITION_EPSILON: f64 = 1e-9;

/// Vertical tick drawn at the score position across the bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreMarker {
    pub x: f64,
    pub y1: f64,
    pub y2: f64,
}

/// Horizontal whisker through the bar center covering the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeMarker {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
}

/// Computes one bar rectangle per point, in input order.
///
/// `requested_thickness` only matters on a continuous scalar category axis,
/// where it is capped at `thickness_ceiling` and then reduced by the overlap
/// pass so neighbouring bars never overlap.
#[must_use]
pub fn compute_bar_rects(
    points: &[&DataPoint],
    axes: &ResolvedAxes,
    requested_thickness: f64,
    thickness_ceiling: f64,
) -> Vec<Rect> {
    if points.is_empty() {
        return Vec::new();
    }

    match &axes.category.scale {
        CategoryScale::Band(scale) => points
            .iter()
            .map(|point| {
                let (x, width) = horizontal_extent(point, &axes.value);
                match scale.position(&point.category) {
                    Some(y) => Rect::new(x, y, width, scale.band_width()),
                    None => Rect::new(x, 0.0, width, 0.0),
                }
            })
            .collect(),
        CategoryScale::Linear(_) => {
            let thickness = sanitize_thickness(requested_thickness.min(thickness_ceiling));
            let mut rects: Vec<Rect> = points
                .iter()
                .map(|point| initial_continuous_rect(point, axes, thickness))
                .collect();
            resolve_continuous_overlap(&mut rects, thickness);
            rects
        }
    }
}

/// `(x, width)` of a point's stacked span on the value axis.
///
/// Width is zero when the span misses the value domain or only touches one
/// of its edges; any other non-zero value gets at least
/// [`MIN_VISIBLE_BAR_WIDTH_PX`].
#[must_use]
pub fn horizontal_extent(point: &DataPoint, value_axis: &ValueAxis) -> (f64, f64) {
    let domain = value_axis.domain;
    let scale = value_axis.scale;
    let (low, high) = point.stacked_span();

    let touches_edge_only = low < high && (low >= domain.max || high <= domain.min);
    if !domain.intersects(low, high) || touches_edge_only {
        return (scale.domain_to_pixel(domain.clamp(point.shift_value)), 0.0);
    }

    let x = scale.domain_to_pixel(domain.clamp(low));
    let end = scale.domain_to_pixel(domain.clamp(high));
    let mut width = (end - x).max(0.0);
    if width < MIN_VISIBLE_BAR_WIDTH_PX && point.value != 0.0 {
        width = MIN_VISIBLE_BAR_WIDTH_PX;
    }
    (x, width)
}

fn sanitize_thickness(thickness: f64) -> f64 {
    if thickness.is_finite() { thickness.max(0.0) } else { 0.0 }
}

fn initial_continuous_rect(point: &DataPoint, axes: &ResolvedAxes, thickness: f64) -> Rect {
    let (x, width) = horizontal_extent(point, &axes.value);
    let in_domain = axes
        .category
        .domain
        .continuous()
        .zip(point.category.as_scalar())
        .is_some_and(|(domain, value)| domain.contains(value));
    let center = axes.category.scale.map(&point.category).unwrap_or(0.0);
    if in_domain {
        Rect::new(x, center - thickness / 2.0, width, thickness)
    } else {
        Rect::new(x, center, width, 0.0)
    }
}

/// Uniform thickness for every bar on a continuous axis.
///
/// `0.8 * d_min` clamped into `[1.5, requested]`, where `d_min` is the
/// smallest gap between distinct bar centers. A single position keeps the
/// requested thickness.
#[must_use]
pub fn resolved_continuous_thickness(centers: &[f64], requested: f64) -> f64 {
    let requested = sanitize_thickness(requested);
    let floor = MIN_CONTINUOUS_BAR_THICKNESS_PX.min(requested);

    let mut sorted: Vec<OrderedFloat<f64>> = centers
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .map(OrderedFloat)
        .collect();
    sorted.sort_unstable();
    sorted.dedup_by(|a, b| (a.0 - b.0).abs() <= DISTINCT_POSITION_EPSILON);

    let min_distance = sorted
        .windows(2)
        .map(|pair| pair[1].0 - pair[0].0)
        .fold(f64::INFINITY, f64::min);

    if min_distance.is_finite() {
        (min_distance * (1.0 - CONTINUOUS_BAR_PADDING_RATIO)).clamp(floor, requested)
    } else {
        requested
    }
}

fn resolve_continuous_overlap(rects: &mut [Rect], requested: f64) {
    let centers: Vec<f64> = rects
        .iter()
        .filter(|rect| rect.height > 0.0)
        .map(|rect| rect.center_y())
        .collect();
    let thickness = resolved_continuous_thickness(&centers, requested);

    for rect in rects.iter_mut() {
        let center = rect.center_y();
        if rect.height <= 0.0 || rect.width <= 0.0 {
            rect.y = center;
            rect.height = 0.0;
        } else {
            rect.y = center - thickness / 2.0;
            rect.height = thickness;
        }
    }
}

/// Score and range markers for a laid-out bar. Hidden bars get none.
#[must_use]
pub fn compute_markers(
    point: &DataPoint,
    bar: Rect,
    value_axis: &ValueAxis,
) -> (Option<ScoreMarker>, Option<RangeMarker>) {
    if bar.height <= 0.0 {
        return (None, None);
    }
    let domain = value_axis.domain;
    let scale = value_axis.scale;

    let score = point.score.map(|score| ScoreMarker {
        x: scale.domain_to_pixel(domain.clamp(score)),
        y1: bar.y,
        y2: bar.bottom(),
    });
    let range = point.range.map(|(low, high)| {
        let a = scale.domain_to_pixel(domain.clamp(low));
        let b = scale.domain_to_pixel(domain.clamp(high));
        RangeMarker {
            x1: a.min(b),
            x2: a.max(b),
            y: bar.center_y(),
        }
    });
    (score, range)
}
