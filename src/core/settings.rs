use serde::{Deserialize, Serialize};

use crate::core::label_format::{MAX_PRECISION, ValueFormat};
use crate::core::label_position::LabelPosition;
use crate::core::text_metrics::TextStyle;
use crate::error::{LayoutError, LayoutResult};

pub const MIN_CATEGORY_THICKNESS_PX: f64 = 20.0;
pub const MAX_CATEGORY_THICKNESS_PX: f64 = 180.0;
pub const MAX_INNER_PADDING_PERCENT: f64 = 50.0;
pub const DEFAULT_INNER_PADDING_PERCENT: f64 = 20.0;
pub const MIN_LABEL_WIDTH_RATIO_PERCENT: f64 = 15.0;
pub const MAX_LABEL_WIDTH_RATIO_PERCENT: f64 = 50.0;
pub const DEFAULT_LABEL_WIDTH_RATIO_PERCENT: f64 = 25.0;
pub const BAR_THICKNESS_CEILING_PX: f64 = 5.0;
pub const MIN_CELL_WIDTH_PX: f64 = 150.0;
pub const MIN_CELL_HEIGHT_PX: f64 = 120.0;
pub const DEFAULT_MAX_COLUMNS_PER_ROW: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisType {
    Categorical,
    #[default]
    Continuous,
}

/// Where an axis domain comes from.
///
/// `SharedAcrossCells` and `PerCellIndependent` only differ in small-multiple
/// mode; a single chart treats both like `Auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeMode {
    #[default]
    Auto,
    Custom,
    SharedAcrossCells,
    PerCellIndependent,
}

impl RangeMode {
    #[must_use]
    pub fn is_custom(self) -> bool {
        self == Self::Custom
    }

    #[must_use]
    pub fn is_per_cell(self) -> bool {
        self == Self::PerCellIndependent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmallMultipleLayoutMode {
    #[default]
    Grid,
    Flow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDomainMode {
    /// The value domain covers every point; scrolling only re-lays out.
    #[default]
    FullData,
    /// The value domain is recomputed over the visible window.
    VisibleWindow,
}

fn default_true() -> bool {
    true
}

fn default_min_category_thickness() -> f64 {
    MIN_CATEGORY_THICKNESS_PX
}

fn default_max_category_thickness() -> f64 {
    MAX_CATEGORY_THICKNESS_PX
}

fn default_inner_padding() -> f64 {
    DEFAULT_INNER_PADDING_PERCENT
}

fn default_label_width_ratio() -> f64 {
    DEFAULT_LABEL_WIDTH_RATIO_PERCENT
}

fn default_bar_thickness_ceiling() -> f64 {
    BAR_THICKNESS_CEILING_PX
}

fn default_min_cell_width() -> f64 {
    MIN_CELL_WIDTH_PX
}

fn default_min_cell_height() -> f64 {
    MIN_CELL_HEIGHT_PX
}

fn default_max_columns_per_row() -> usize {
    DEFAULT_MAX_COLUMNS_PER_ROW
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAxisSettings {
    #[serde(default)]
    pub axis_type: AxisType,
    #[serde(default)]
    pub range_mode: RangeMode,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default = "default_min_category_thickness")]
    pub min_category_thickness: f64,
    #[serde(default = "default_max_category_thickness")]
    pub max_category_thickness: f64,
    /// Gap between bands, percent of the band step.
    #[serde(default = "default_inner_padding")]
    pub inner_padding: f64,
    /// Cap on the category label column, percent of the chart width.
    #[serde(default = "default_label_width_ratio")]
    pub max_label_width_ratio: f64,
    #[serde(default = "default_bar_thickness_ceiling")]
    pub bar_thickness_ceiling: f64,
    #[serde(default = "default_true")]
    pub show_labels: bool,
    #[serde(default)]
    pub show_title: bool,
    #[serde(default)]
    pub font: TextStyle,
}

impl Default for CategoryAxisSettings {
    fn default() -> Self {
        Self {
            axis_type: AxisType::default(),
            range_mode: RangeMode::default(),
            start: None,
            end: None,
            min_category_thickness: default_min_category_thickness(),
            max_category_thickness: default_max_category_thickness(),
            inner_padding: default_inner_padding(),
            max_label_width_ratio: default_label_width_ratio(),
            bar_thickness_ceiling: default_bar_thickness_ceiling(),
            show_labels: true,
            show_title: false,
            font: TextStyle::default(),
        }
    }
}

impl CategoryAxisSettings {
    /// Fraction of each band left for the bar.
    #[must_use]
    pub fn band_fill_ratio(&self) -> f64 {
        1.0 - self.inner_padding / 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueAxisSettings {
    #[serde(default)]
    pub range_mode: RangeMode,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default = "default_true")]
    pub show_labels: bool,
    #[serde(default)]
    pub show_title: bool,
    #[serde(default)]
    pub font: TextStyle,
    #[serde(default)]
    pub format: ValueFormat,
}

impl Default for ValueAxisSettings {
    fn default() -> Self {
        Self {
            range_mode: RangeMode::default(),
            start: None,
            end: None,
            show_labels: true,
            show_title: false,
            font: TextStyle::default(),
            format: ValueFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataLabelSettings {
    #[serde(default)]
    pub show: bool,
    #[serde(default)]
    pub overflow_text: bool,
    #[serde(default)]
    pub show_background: bool,
    #[serde(default)]
    pub position: LabelPosition,
    #[serde(default)]
    pub font: TextStyle,
    #[serde(default)]
    pub format: ValueFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmallMultipleSettings {
    #[serde(default)]
    pub layout_mode: SmallMultipleLayoutMode,
    #[serde(default = "default_max_columns_per_row")]
    pub max_columns_per_row: usize,
    #[serde(default = "default_min_cell_width")]
    pub min_cell_width: f64,
    #[serde(default = "default_min_cell_height")]
    pub min_cell_height: f64,
    #[serde(default = "default_true")]
    pub show_titles: bool,
    #[serde(default)]
    pub title_font: TextStyle,
}

impl Default for SmallMultipleSettings {
    fn default() -> Self {
        Self {
            layout_mode: SmallMultipleLayoutMode::default(),
            max_columns_per_row: default_max_columns_per_row(),
            min_cell_width: default_min_cell_width(),
            min_cell_height: default_min_cell_height(),
            show_titles: true,
            title_font: TextStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub domain_mode: ScrollDomainMode,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            domain_mode: ScrollDomainMode::default(),
        }
    }
}

/// Immutable per-update configuration handed to every layout stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSettings {
    #[serde(default)]
    pub category_axis: CategoryAxisSettings,
    #[serde(default)]
    pub value_axis: ValueAxisSettings,
    #[serde(default)]
    pub data_labels: DataLabelSettings,
    #[serde(default)]
    pub small_multiple: SmallMultipleSettings,
    #[serde(default)]
    pub scroll: ScrollSettings,
}

impl ChartSettings {
    /// Parses settings JSON; absent fields take their defaults and the
    /// result is sanitized.
    pub fn from_json_str(input: &str) -> LayoutResult<Self> {
        let settings: Self = serde_json::from_str(input)
            .map_err(|e| LayoutError::InvalidSettings(format!("failed to parse settings: {e}")))?;
        Ok(settings.sanitized())
    }

    pub fn to_json_pretty(&self) -> LayoutResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            LayoutError::InvalidSettings(format!("failed to serialize settings: {e}"))
        })
    }

    /// Returns a copy with every numeric field clamped into its legal range.
    /// Non-finite values fall back to defaults.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();

        let category = &mut out.category_axis;
        category.inner_padding =
            finite_or(category.inner_padding, DEFAULT_INNER_PADDING_PERCENT)
                .clamp(0.0, MAX_INNER_PADDING_PERCENT);
        category.min_category_thickness =
            finite_or(category.min_category_thickness, MIN_CATEGORY_THICKNESS_PX)
                .clamp(MIN_CATEGORY_THICKNESS_PX, MAX_CATEGORY_THICKNESS_PX);
        category.max_category_thickness =
            finite_or(category.max_category_thickness, MAX_CATEGORY_THICKNESS_PX)
                .max(category.min_category_thickness);
        category.max_label_width_ratio =
            finite_or(category.max_label_width_ratio, DEFAULT_LABEL_WIDTH_RATIO_PERCENT)
                .clamp(MIN_LABEL_WIDTH_RATIO_PERCENT, MAX_LABEL_WIDTH_RATIO_PERCENT);
        category.bar_thickness_ceiling =
            finite_or(category.bar_thickness_ceiling, BAR_THICKNESS_CEILING_PX).max(0.0);
        category.start = category.start.filter(|v| v.is_finite());
        category.end = category.end.filter(|v| v.is_finite());
        sanitize_style(&mut category.font);

        let value = &mut out.value_axis;
        value.start = value.start.filter(|v| v.is_finite());
        value.end = value.end.filter(|v| v.is_finite());
        value.format.precision = value.format.precision.map(|p| p.min(MAX_PRECISION));
        sanitize_style(&mut value.font);

        let labels = &mut out.data_labels;
        labels.format.precision = labels.format.precision.map(|p| p.min(MAX_PRECISION));
        sanitize_style(&mut labels.font);

        let small_multiple = &mut out.small_multiple;
        small_multiple.max_columns_per_row = small_multiple.max_columns_per_row.max(1);
        small_multiple.min_cell_width =
            finite_or(small_multiple.min_cell_width, MIN_CELL_WIDTH_PX).max(MIN_CELL_WIDTH_PX);
        small_multiple.min_cell_height =
            finite_or(small_multiple.min_cell_height, MIN_CELL_HEIGHT_PX).max(MIN_CELL_HEIGHT_PX);
        sanitize_style(&mut small_multiple.title_font);

        out
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

fn sanitize_style(style: &mut TextStyle) {
    if !style.font_size_px.is_finite() || style.font_size_px <= 0.0 {
        style.font_size_px = TextStyle::default().font_size_px;
    }
}
