use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::domain::{
    AxesDomains, CategoryDomain, calculate_category_domain, calculate_value_domain,
};
use crate::core::settings::{ChartSettings, SmallMultipleLayoutMode};
use crate::core::types::{DataPoint, GroupKey, Point, Size};

pub const CELL_GAP_PX: f64 = 10.0;
pub const VERTICAL_SCROLLBAR_WIDTH_PX: f64 = 20.0;
pub const HORIZONTAL_SCROLLBAR_HEIGHT_PX: f64 = 23.0;
/// Width of the row-title column left of the grid.
pub const ROW_TITLE_WIDTH_PX: f64 = 120.0;
/// Extra title band height per row in flow mode.
pub const FLOW_TITLE_EXTRA_PX: f64 = 15.0;

/// Distinct row and column keys in first-appearance order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupKeys {
    pub rows: IndexSet<GroupKey>,
    pub columns: IndexSet<GroupKey>,
}

impl GroupKeys {
    #[must_use]
    pub fn from_points(points: &[&DataPoint]) -> Self {
        let mut keys = Self::default();
        for point in points {
            keys.rows.insert(point.row_key.clone());
            keys.columns.insert(point.column_key.clone());
        }
        keys
    }

    /// Whether any point carries a row key.
    #[must_use]
    pub fn has_row_keys(&self) -> bool {
        self.rows.iter().any(Option::is_some)
    }
}

/// Splits point indices into row-major cells, `cells[row * columns + column]`.
///
/// Every point lands in exactly one cell; empty combinations stay empty.
#[must_use]
pub fn assign_points_to_cells(points: &[&DataPoint], keys: &GroupKeys) -> Vec<Vec<usize>> {
    let columns = keys.columns.len();
    let mut cells = vec![Vec::new(); keys.rows.len() * columns];
    for (index, point) in points.iter().enumerate() {
        let row = keys.rows.get_index_of(&point.row_key);
        let column = keys.columns.get_index_of(&point.column_key);
        if let (Some(row), Some(column)) = (row, column) {
            cells[row * columns + column].push(index);
        }
    }
    cells
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionRequest {
    pub viewport: Size,
    pub row_count: usize,
    pub column_count: usize,
    pub layout_mode: SmallMultipleLayoutMode,
    pub max_columns_per_row: usize,
    pub min_cell: Size,
    /// Space left of the grid (row titles).
    pub left_space: f64,
    /// Title band above the grid (grid) or above every row (flow).
    pub top_space: f64,
    pub legend: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollbarFlags {
    pub horizontal: bool,
    pub vertical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSlot {
    pub row_index: usize,
    pub column_index: usize,
    pub origin: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPartition {
    pub columns: usize,
    pub rows: usize,
    pub row_bands: usize,
    pub cell_size: Size,
    pub scrollbars: ScrollbarFlags,
    /// Total laid-out size, for the host scroll container.
    pub content_size: Size,
    /// Row-major by `(row_index, column_index)`.
    pub slots: Vec<CellSlot>,
}

/// Divides the viewport into cells.
///
/// Scrollbar space is reserved only on axes where the cells would shrink
/// below the minimum; such axes use the minimum size and raise their flag.
#[must_use]
pub fn partition_viewport(request: &PartitionRequest) -> GridPartition {
    let row_keys = request.row_count.max(1);
    let column_keys = request.column_count.max(1);
    let max_columns = request.max_columns_per_row.max(1);

    let (columns, row_bands) = match request.layout_mode {
        SmallMultipleLayoutMode::Grid => (column_keys, 1),
        SmallMultipleLayoutMode::Flow => {
            (column_keys.min(max_columns), column_keys.div_ceil(max_columns))
        }
    };
    let rows = row_bands * row_keys;

    let cell_width = |vertical_bar: bool| {
        let reserved = if vertical_bar { VERTICAL_SCROLLBAR_WIDTH_PX } else { 0.0 };
        let client = request.viewport.width - request.left_space - reserved - request.legend.width;
        (client - CELL_GAP_PX * columns as f64) / columns as f64
    };
    let cell_height = |horizontal_bar: bool| {
        let reserved = if horizontal_bar { HORIZONTAL_SCROLLBAR_HEIGHT_PX } else { 0.0 };
        match request.layout_mode {
            SmallMultipleLayoutMode::Grid => {
                let client =
                    request.viewport.height - request.top_space - reserved - request.legend.height;
                (client - CELL_GAP_PX * rows as f64) / rows as f64
            }
            SmallMultipleLayoutMode::Flow => {
                let client = request.viewport.height - reserved - request.legend.height;
                client / rows as f64 - CELL_GAP_PX - request.top_space
            }
        }
    };

    let mut vertical = cell_height(false) < request.min_cell.height;
    let horizontal = cell_width(vertical) < request.min_cell.width;
    if horizontal && !vertical {
        vertical = cell_height(true) < request.min_cell.height;
    }

    let mut width = cell_width(vertical);
    let mut height = cell_height(horizontal);
    if horizontal {
        width = width.max(request.min_cell.width);
    }
    if vertical {
        height = height.max(request.min_cell.height);
    }
    let cell_size = Size::new(width, height).non_negative();

    let slots = cell_slots(request, row_bands, max_columns, cell_size);
    let content_size = match request.layout_mode {
        SmallMultipleLayoutMode::Grid => Size::new(
            request.left_space + columns as f64 * (cell_size.width + CELL_GAP_PX),
            request.top_space + rows as f64 * (cell_size.height + CELL_GAP_PX),
        ),
        SmallMultipleLayoutMode::Flow => Size::new(
            request.left_space + columns as f64 * (cell_size.width + CELL_GAP_PX),
            rows as f64 * (cell_size.height + CELL_GAP_PX + request.top_space),
        ),
    };

    GridPartition {
        columns,
        rows,
        row_bands,
        cell_size,
        scrollbars: ScrollbarFlags {
            horizontal,
            vertical,
        },
        content_size,
        slots,
    }
}

fn cell_slots(
    request: &PartitionRequest,
    row_bands: usize,
    max_columns: usize,
    cell: Size,
) -> Vec<CellSlot> {
    let row_keys = request.row_count.max(1);
    let column_keys = request.column_count.max(1);
    let mut slots = Vec::with_capacity(row_keys * column_keys);

    for row_index in 0..row_keys {
        for column_index in 0..column_keys {
            let origin = match request.layout_mode {
                SmallMultipleLayoutMode::Grid => Point::new(
                    request.left_space
                        + CELL_GAP_PX / 2.0
                        + column_index as f64 * (cell.width + CELL_GAP_PX),
                    request.top_space + row_index as f64 * (cell.height + CELL_GAP_PX),
                ),
                SmallMultipleLayoutMode::Flow => {
                    let column = column_index % max_columns;
                    let row = column_index / max_columns + row_index * row_bands;
                    Point::new(
                        request.left_space + column as f64 * (cell.width + CELL_GAP_PX),
                        row as f64 * (cell.height + CELL_GAP_PX + request.top_space)
                            + request.top_space
                            + CELL_GAP_PX / 2.0,
                    )
                }
            };
            slots.push(CellSlot {
                row_index,
                column_index,
                origin,
            });
        }
    }
    slots
}

/// Axis domains for one cell.
///
/// An axis in [`RangeMode::PerCellIndependent`] gets a domain over the
/// cell's own points; every other mode reuses `shared`. Empty cells always
/// fall back to `shared`.
///
/// [`RangeMode::PerCellIndependent`]: crate::core::settings::RangeMode::PerCellIndependent
#[must_use]
pub fn resolve_cell_domains(
    shared: &AxesDomains,
    cell_points: &[&DataPoint],
    settings: &ChartSettings,
    is_scalar: bool,
) -> AxesDomains {
    if cell_points.is_empty() {
        return shared.clone();
    }
    let category = if settings.category_axis.range_mode.is_per_cell() {
        match calculate_category_domain(cell_points, settings, is_scalar) {
            CategoryDomain::Ordinal(categories) if categories.is_empty() => shared.category.clone(),
            domain => domain,
        }
    } else {
        shared.category.clone()
    };
    let value = if settings.value_axis.range_mode.is_per_cell() {
        calculate_value_domain(cell_points, settings)
    } else {
        shared.value
    };
    AxesDomains { category, value }
}
