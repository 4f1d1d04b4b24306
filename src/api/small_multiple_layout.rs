use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::domain::{calculate_axes_domains, categories_are_scalar, distinct_categories};
use crate::core::label_format::format_category_label;
use crate::core::settings::{ChartSettings, SmallMultipleLayoutMode};
use crate::core::small_multiple::{
    CELL_GAP_PX, FLOW_TITLE_EXTRA_PX, GroupKeys, PartitionRequest, ROW_TITLE_WIDTH_PX,
    ScrollbarFlags, assign_points_to_cells, partition_viewport, resolve_cell_domains,
};
use crate::core::text_metrics::{max_text_width, tailor_text};
use crate::core::types::{CategoryValue, DataPoint, GroupKey, Point, Size};

use super::axis_layout_pass_resolver::AXIS_LABEL_GAP_PX;
use super::layout_pipeline::{LayoutServices, PlotLayout, PlotRequest, layout_plot};

const TITLE_PROBE_TEXT: &str = "Xy";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellLayout {
    pub row_key: GroupKey,
    pub column_key: GroupKey,
    pub row_index: usize,
    pub column_index: usize,
    /// Cell origin in viewport coordinates.
    pub origin: Point,
    pub size: Size,
    /// Plot origin relative to the cell origin.
    pub plot_origin: Point,
    pub title: String,
    pub plot: PlotLayout,
}

impl CellLayout {
    #[must_use]
    pub fn point_indices(&self) -> Vec<usize> {
        self.plot.bars.iter().map(|bar| bar.point_index).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmallMultipleLayout {
    pub layout_mode: SmallMultipleLayoutMode,
    pub columns: usize,
    pub rows: usize,
    pub cell_size: Size,
    pub scrollbars: ScrollbarFlags,
    pub content_size: Size,
    /// Width reserved left of the grid for row titles.
    pub row_title_width: f64,
    /// One title per row key, empty when row titles are off.
    pub row_titles: Vec<String>,
    pub title_height: f64,
    pub cells: Vec<CellLayout>,
}

pub(super) struct SmallMultipleRequest<'a> {
    pub viewport: Size,
    pub legend: Size,
    pub points: &'a [DataPoint],
    pub settings: &'a ChartSettings,
}

/// Partitions the viewport and lays out every `(row, column)` cell.
pub(super) fn resolve_small_multiple_layout(
    request: &SmallMultipleRequest<'_>,
    services: LayoutServices<'_>,
) -> SmallMultipleLayout {
    let settings = request.settings;
    let small_multiple = &settings.small_multiple;
    let all: Vec<&DataPoint> = request.points.iter().collect();
    let keys = GroupKeys::from_points(&all);
    let is_scalar = categories_are_scalar(&all);
    let temporal = is_scalar && all.iter().all(|p| matches!(p.category, CategoryValue::Time(_)));

    let title_height = if small_multiple.show_titles {
        let base = services
            .measurer
            .measure(TITLE_PROBE_TEXT, &small_multiple.title_font)
            .height;
        match small_multiple.layout_mode {
            SmallMultipleLayoutMode::Grid => base,
            SmallMultipleLayoutMode::Flow => base + FLOW_TITLE_EXTRA_PX,
        }
    } else {
        0.0
    };
    let row_title_width = if small_multiple.show_titles && keys.has_row_keys() {
        ROW_TITLE_WIDTH_PX
    } else {
        0.0
    };

    let partition = partition_viewport(&PartitionRequest {
        viewport: request.viewport,
        row_count: keys.rows.len(),
        column_count: keys.columns.len(),
        layout_mode: small_multiple.layout_mode,
        max_columns_per_row: small_multiple.max_columns_per_row,
        min_cell: Size::new(small_multiple.min_cell_width, small_multiple.min_cell_height),
        left_space: row_title_width,
        top_space: title_height,
        legend: request.legend,
    });

    let shared = calculate_axes_domains(&all, settings, is_scalar);
    let cell = partition.cell_size;
    let label_cap = (settings.category_axis.max_label_width_ratio / 100.0 * cell.width).max(0.0);
    let y_axis_width = category_axis_width(&all, settings, label_cap, services);
    let x_axis_height = if settings.value_axis.show_labels {
        services.measurer.measure("0", &settings.value_axis.font).height + AXIS_LABEL_GAP_PX
    } else {
        0.0
    };
    let plot_origin = Point::new(CELL_GAP_PX + y_axis_width, 0.0);
    let plot_size = Size::new(
        cell.width - y_axis_width - 2.0 * CELL_GAP_PX,
        cell.height - x_axis_height - CELL_GAP_PX,
    )
    .non_negative();

    let row_titles: Vec<String> = if row_title_width > 0.0 {
        keys.rows
            .iter()
            .map(|key| {
                let raw = key.as_ref().map(format_category_label).unwrap_or_default();
                tailor_text(&raw, &small_multiple.title_font, row_title_width, services.measurer)
            })
            .collect()
    } else {
        Vec::new()
    };

    let assignments = assign_points_to_cells(&all, &keys);
    let columns = keys.columns.len();
    let cells = partition
        .slots
        .iter()
        .map(|slot| {
            let indices = assignments
                .get(slot.row_index * columns + slot.column_index)
                .cloned()
                .unwrap_or_default();
            let cell_points: Vec<&DataPoint> = indices.iter().map(|&index| all[index]).collect();
            let domains = resolve_cell_domains(&shared, &cell_points, settings, is_scalar);
            let plot = layout_plot(
                &PlotRequest {
                    points: &cell_points,
                    indices: &indices,
                    domains: &domains,
                    plot_size,
                    is_scalar,
                    temporal,
                    category_label_cap: label_cap,
                    settings,
                },
                services,
            );
            let row_key = keys.rows.get_index(slot.row_index).cloned().flatten();
            let column_key = keys.columns.get_index(slot.column_index).cloned().flatten();
            trace!(
                row = slot.row_index,
                column = slot.column_index,
                points = cell_points.len(),
                "small multiple cell laid out"
            );
            CellLayout {
                title: cell_title(column_key.as_ref(), settings, cell.width, services),
                row_key,
                column_key,
                row_index: slot.row_index,
                column_index: slot.column_index,
                origin: slot.origin,
                size: cell,
                plot_origin,
                plot,
            }
        })
        .collect();

    SmallMultipleLayout {
        layout_mode: small_multiple.layout_mode,
        columns: partition.columns,
        rows: partition.rows,
        cell_size: cell,
        scrollbars: partition.scrollbars,
        content_size: partition.content_size,
        row_title_width,
        row_titles,
        title_height,
        cells,
    }
}

/// Widest category label over all data, capped, plus the label gap.
fn category_axis_width(
    all: &[&DataPoint],
    settings: &ChartSettings,
    label_cap: f64,
    services: LayoutServices<'_>,
) -> f64 {
    let axis = &settings.category_axis;
    if !axis.show_labels {
        return 0.0;
    }
    let labels: Vec<String> = distinct_categories(all)
        .iter()
        .map(|category| {
            tailor_text(&format_category_label(category), &axis.font, label_cap, services.measurer)
        })
        .collect();
    max_text_width(labels.iter().map(String::as_str), &axis.font, services.measurer)
        + AXIS_LABEL_GAP_PX
}

fn cell_title(
    column_key: Option<&CategoryValue>,
    settings: &ChartSettings,
    width: f64,
    services: LayoutServices<'_>,
) -> String {
    if !settings.small_multiple.show_titles {
        return String::new();
    }
    let raw = column_key.map(format_category_label).unwrap_or_default();
    tailor_text(&raw, &settings.small_multiple.title_font, width, services.measurer)
}
