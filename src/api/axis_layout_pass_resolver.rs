use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::core::domain::{
    AxesDomains, calculate_category_domain, calculate_value_domain, categories_are_scalar,
    distinct_categories, uses_continuous_category_axis,
};
use crate::core::label_format::format_category_label;
use crate::core::settings::{ChartSettings, ScrollDomainMode};
use crate::core::small_multiple::VERTICAL_SCROLLBAR_WIDTH_PX;
use crate::core::text_metrics::{TextStyle, max_text_width, tailor_text};
use crate::core::types::{CategoryValue, DataPoint, Point, Size};
use crate::core::windowing::{
    ScrollState, visible_categories, visible_point_indices, window_size_for_height,
};

use super::layout_pipeline::{LayoutServices, PlotLayout, PlotRequest, layout_plot};

/// Upper bound on measure/layout passes per update.
pub const MAX_LAYOUT_PASSES: usize = 3;
/// Margins moving less than this between passes count as stable.
pub const MARGIN_STABILITY_EPSILON_PX: f64 = 0.5;
pub const TOP_MARGIN_PX: f64 = 5.0;
pub const BASE_RIGHT_MARGIN_PX: f64 = 15.0;
/// Gap between tick labels and the plot edge.
pub const AXIS_LABEL_GAP_PX: f64 = 8.0;
pub const AXIS_TITLE_GAP_PX: f64 = 5.0;

const TITLE_PROBE_TEXT: &str = "Xy";
const VALUE_PROBE_TEXT: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    #[must_use]
    pub fn plot_size(self, chart: Size) -> Size {
        Size::new(
            chart.width - self.left - self.right,
            chart.height - self.top - self.bottom,
        )
        .non_negative()
    }

    #[must_use]
    pub fn max_delta(self, other: Self) -> f64 {
        [
            self.top - other.top,
            self.right - other.right,
            self.bottom - other.bottom,
            self.left - other.left,
        ]
        .iter()
        .fold(0.0, |acc, delta| acc.max(delta.abs()))
    }
}

/// Layout of a single (non small-multiple) chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub margins: Margins,
    pub plot_origin: Point,
    pub plot: PlotLayout,
    pub scroll: ScrollState,
    /// Whether the category window is virtualized at all.
    pub scroll_active: bool,
    pub passes: usize,
    pub converged: bool,
    /// Left margin used by each pass, in order.
    pub left_margin_history: SmallVec<[f64; MAX_LAYOUT_PASSES]>,
}

impl ChartLayout {
    #[must_use]
    pub fn scrollbar_needed(&self) -> bool {
        self.scroll_active && self.scroll.is_scrollbar_needed()
    }
}

pub(super) struct ChartLayoutRequest<'a> {
    pub chart_size: Size,
    pub points: &'a [DataPoint],
    pub settings: &'a ChartSettings,
    pub scroll_offset: usize,
}

struct PassOutcome {
    plot: PlotLayout,
    scroll: ScrollState,
    measured: Margins,
}

/// Runs the measure/layout loop until the margins settle or
/// [`MAX_LAYOUT_PASSES`] is reached.
///
/// Category label widths decide the left margin, the remaining width
/// decides value tick density, and the tick labels feed back into the
/// margins. Without convergence the last pass is kept as is.
pub(super) fn resolve_chart_layout(
    request: &ChartLayoutRequest<'_>,
    services: LayoutServices<'_>,
) -> ChartLayout {
    let all: Vec<&DataPoint> = request.points.iter().collect();
    let settings = request.settings;
    let is_scalar = categories_are_scalar(&all);
    let continuous = uses_continuous_category_axis(settings, is_scalar);
    let scroll_active = settings.scroll.enabled && !continuous;
    let temporal = is_scalar && all.iter().all(|p| matches!(p.category, CategoryValue::Time(_)));
    let categories = distinct_categories(&all);
    let label_cap = category_label_cap(settings, request.chart_size.width);

    let context = PassContext {
        request,
        services,
        all: &all,
        categories: &categories,
        is_scalar,
        temporal,
        scroll_active,
        label_cap,
    };

    let mut margins = initial_margins(&context);
    let mut history: SmallVec<[f64; MAX_LAYOUT_PASSES]> = SmallVec::new();
    let mut passes = 0;
    loop {
        passes += 1;
        history.push(margins.left);
        let outcome = run_pass(&context, margins);
        let delta = outcome.measured.max_delta(margins);
        trace!(pass = passes, delta, left = margins.left, "axis layout pass");

        let converged = delta < MARGIN_STABILITY_EPSILON_PX;
        if converged || passes >= MAX_LAYOUT_PASSES {
            if !converged {
                warn!(
                    passes,
                    delta,
                    left = margins.left,
                    "axis margins did not converge; keeping last pass"
                );
            }
            return ChartLayout {
                margins,
                plot_origin: Point::new(margins.left, margins.top),
                plot: outcome.plot,
                scroll: outcome.scroll,
                scroll_active,
                passes,
                converged,
                left_margin_history: history,
            };
        }
        margins = outcome.measured;
    }
}

struct PassContext<'a> {
    request: &'a ChartLayoutRequest<'a>,
    services: LayoutServices<'a>,
    all: &'a [&'a DataPoint],
    categories: &'a [CategoryValue],
    is_scalar: bool,
    temporal: bool,
    scroll_active: bool,
    label_cap: f64,
}

fn category_label_cap(settings: &ChartSettings, width: f64) -> f64 {
    (settings.category_axis.max_label_width_ratio / 100.0 * width).max(0.0)
}

fn title_thickness(show: bool, style: &TextStyle, services: LayoutServices<'_>) -> f64 {
    if show {
        services.measurer.measure(TITLE_PROBE_TEXT, style).height + AXIS_TITLE_GAP_PX
    } else {
        0.0
    }
}

fn bottom_margin(settings: &ChartSettings, services: LayoutServices<'_>) -> f64 {
    let axis = &settings.value_axis;
    let labels = if axis.show_labels {
        services.measurer.measure(VALUE_PROBE_TEXT, &axis.font).height
    } else {
        0.0
    };
    labels + AXIS_LABEL_GAP_PX + title_thickness(axis.show_title, &axis.font, services)
}

fn category_column(widest_label: f64, settings: &ChartSettings, services: LayoutServices<'_>) -> f64 {
    let axis = &settings.category_axis;
    let labels = if axis.show_labels {
        widest_label + AXIS_LABEL_GAP_PX
    } else {
        0.0
    };
    labels + title_thickness(axis.show_title, &axis.font, services)
}

/// First estimate: every category label, capped, and no tick overhang.
fn initial_margins(context: &PassContext<'_>) -> Margins {
    let settings = context.request.settings;
    let font = &settings.category_axis.font;
    let measurer = context.services.measurer;
    let labels: Vec<String> = context
        .categories
        .iter()
        .map(|category| tailor_text(&format_category_label(category), font, context.label_cap, measurer))
        .collect();
    let widest = max_text_width(labels.iter().map(String::as_str), font, measurer);

    Margins {
        top: TOP_MARGIN_PX,
        right: BASE_RIGHT_MARGIN_PX,
        bottom: bottom_margin(settings, context.services),
        left: category_column(widest, settings, context.services),
    }
}

fn run_pass(context: &PassContext<'_>, margins: Margins) -> PassOutcome {
    let request = context.request;
    let settings = request.settings;
    let plot_size = margins.plot_size(request.chart_size);

    let scroll = if context.scroll_active {
        let window = window_size_for_height(
            plot_size.height,
            settings.category_axis.min_category_thickness,
        );
        ScrollState::new(context.categories.len(), window, request.scroll_offset)
    } else {
        ScrollState::full(context.categories.len())
    };

    let indices: Vec<usize> = if context.scroll_active {
        visible_point_indices(context.all, visible_categories(context.categories, scroll))
    } else {
        (0..context.all.len()).collect()
    };
    let visible: Vec<&DataPoint> = indices.iter().map(|&index| context.all[index]).collect();

    let value_points = match settings.scroll.domain_mode {
        ScrollDomainMode::FullData => context.all,
        ScrollDomainMode::VisibleWindow => visible.as_slice(),
    };
    let domains = AxesDomains {
        category: calculate_category_domain(&visible, settings, context.is_scalar),
        value: calculate_value_domain(value_points, settings),
    };

    let plot = layout_plot(
        &PlotRequest {
            points: &visible,
            indices: &indices,
            domains: &domains,
            plot_size,
            is_scalar: context.is_scalar,
            temporal: context.temporal,
            category_label_cap: context.label_cap,
            settings,
        },
        context.services,
    );

    let measured = measure_margins(context, &plot, scroll);
    PassOutcome {
        plot,
        scroll,
        measured,
    }
}

fn measure_margins(context: &PassContext<'_>, plot: &PlotLayout, scroll: ScrollState) -> Margins {
    let settings = context.request.settings;
    let widest_category = plot
        .category_ticks
        .iter()
        .map(|tick| tick.label_width)
        .fold(0.0, f64::max);

    let first_overhang = plot
        .value_ticks
        .first()
        .map_or(0.0, |tick| (tick.label_width / 2.0 - tick.position_px).max(0.0));
    let last_overhang = plot.value_ticks.last().map_or(0.0, |tick| {
        (tick.label_width / 2.0 - (plot.plot_size.width - tick.position_px)).max(0.0)
    });
    let scrollbar = if context.scroll_active && scroll.is_scrollbar_needed() {
        VERTICAL_SCROLLBAR_WIDTH_PX
    } else {
        0.0
    };

    Margins {
        top: TOP_MARGIN_PX,
        right: BASE_RIGHT_MARGIN_PX.max(last_overhang) + scrollbar,
        bottom: bottom_margin(settings, context.services),
        left: category_column(widest_category, settings, context.services).max(first_overhang),
    }
}
