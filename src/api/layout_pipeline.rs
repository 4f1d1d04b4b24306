use serde::{Deserialize, Serialize};

use crate::core::bar_geometry::{RangeMarker, ScoreMarker, compute_bar_rects, compute_markers};
use crate::core::bar_thickness::{
    categorical_bar_thickness, continuous_bar_thickness, distinct_scalar_categories_in_domain,
};
use crate::core::domain::{AxesDomains, CategoryDomain};
use crate::core::label_placement::{LabelPlacementContext, PlacedLabel, place_labels};
use crate::core::label_position::LabelPositionShift;
use crate::core::scale::{ResolvedAxes, build_axes};
use crate::core::settings::ChartSettings;
use crate::core::text_metrics::TextMeasurer;
use crate::core::types::{DataPoint, Rect, Size};

use super::axis_ticks::{AxisTick, category_axis_ticks, value_axis_ticks};

/// Collaborators shared by every layout stage of one update.
#[derive(Clone, Copy)]
pub struct LayoutServices<'a> {
    pub measurer: &'a dyn TextMeasurer,
    pub position_shift: &'a dyn LabelPositionShift,
    pub legend_present: bool,
}

/// Geometry of one data point, in plot coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    /// Index of the point in the engine's data.
    pub point_index: usize,
    pub bar: Rect,
    pub label: Option<PlacedLabel>,
    pub score_marker: Option<ScoreMarker>,
    pub range_marker: Option<RangeMarker>,
}

/// Scales, bars and ticks of one plot area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotLayout {
    pub plot_size: Size,
    pub axes: ResolvedAxes,
    pub requested_thickness: f64,
    pub bars: Vec<BarLayout>,
    pub value_ticks: Vec<AxisTick>,
    pub category_ticks: Vec<AxisTick>,
}

impl PlotLayout {
    #[must_use]
    pub fn label_count(&self) -> usize {
        self.bars.iter().filter(|bar| bar.label.is_some()).count()
    }
}

pub(super) struct PlotRequest<'a> {
    /// Points drawn in this plot, paired with `indices`.
    pub points: &'a [&'a DataPoint],
    pub indices: &'a [usize],
    pub domains: &'a AxesDomains,
    pub plot_size: Size,
    pub is_scalar: bool,
    pub temporal: bool,
    pub category_label_cap: f64,
    pub settings: &'a ChartSettings,
}

/// Runs scale building, bar geometry and label placement for one plot.
pub(super) fn layout_plot(request: &PlotRequest<'_>, services: LayoutServices<'_>) -> PlotLayout {
    let settings = request.settings;
    let plot_size = request.plot_size.non_negative();
    let axes = build_axes(
        request.domains,
        plot_size,
        request.is_scalar,
        settings.category_axis.band_fill_ratio(),
    );

    let requested_thickness = match &axes.category.domain {
        CategoryDomain::Ordinal(categories) => categorical_bar_thickness(
            plot_size.height,
            categories.len(),
            &settings.category_axis,
        ),
        CategoryDomain::Continuous(domain) => continuous_bar_thickness(
            plot_size.height,
            distinct_scalar_categories_in_domain(request.points, *domain),
        ),
    };

    let rects = compute_bar_rects(
        request.points,
        &axes,
        requested_thickness,
        settings.category_axis.bar_thickness_ceiling,
    );

    let values: Vec<f64> = request.points.iter().map(|point| point.value).collect();
    let label_context = LabelPlacementContext {
        settings: &settings.data_labels,
        format: settings.data_labels.format.resolve(axes.value.domain.magnitude()),
        chart_width: plot_size.width,
        legend_present: services.legend_present,
        measurer: services.measurer,
        position_shift: services.position_shift,
    };
    let labels = place_labels(&values, &rects, &label_context);

    let bars = request
        .points
        .iter()
        .zip(request.indices.iter().copied())
        .zip(rects)
        .zip(labels)
        .map(|(((point, point_index), bar), label)| {
            let (score_marker, range_marker) = compute_markers(point, bar, &axes.value);
            BarLayout {
                point_index,
                bar,
                label,
                score_marker,
                range_marker,
            }
        })
        .collect();

    let value_ticks = if settings.value_axis.show_labels {
        value_axis_ticks(
            axes.value.scale,
            settings.value_axis.format.resolve(axes.value.domain.magnitude()),
            &settings.value_axis.font,
            services.measurer,
        )
    } else {
        Vec::new()
    };
    let category_ticks = if settings.category_axis.show_labels {
        category_axis_ticks(
            &axes.category.scale,
            axes.category.domain.categories(),
            request.temporal,
            &settings.category_axis.font,
            request.category_label_cap,
            services.measurer,
        )
    } else {
        Vec::new()
    };

    PlotLayout {
        plot_size,
        axes,
        requested_thickness,
        bars,
        value_ticks,
        category_ticks,
    }
}
