use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64, ensure_finite};
use crate::error::LayoutResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[must_use]
    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Returns the size with both dimensions floored at zero.
    #[must_use]
    pub fn non_negative(self) -> Self {
        Self::new(self.width.max(0.0), self.height.max(0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pixel space with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center_y(self) -> f64 {
        self.y + self.height / 2.0
    }

    /// A bar with zero width or zero height is not drawn.
    #[must_use]
    pub fn is_hidden(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    #[must_use]
    pub fn is_finite_non_negative(self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// Category of a data point.
///
/// `Number` and `Time` are scalar and can drive a continuous category axis;
/// `Time` stores unix seconds. Equality and hashing are total so categories
/// can key distinct-value sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CategoryValue {
    Text(String),
    Number(f64),
    Time(f64),
}

impl CategoryValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    #[must_use]
    pub fn from_datetime(time: DateTime<Utc>) -> Self {
        Self::Time(datetime_to_unix_seconds(time))
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Text(_) => None,
            Self::Number(value) | Self::Time(value) => Some(*value),
        }
    }

    fn ordered_key(&self) -> (u8, Option<&str>, OrderedFloat<f64>) {
        match self {
            Self::Text(text) => (0, Some(text.as_str()), OrderedFloat(0.0)),
            Self::Number(value) => (1, None, OrderedFloat(*value)),
            Self::Time(value) => (2, None, OrderedFloat(*value)),
        }
    }
}

impl PartialEq for CategoryValue {
    fn eq(&self, other: &Self) -> bool {
        self.ordered_key() == other.ordered_key()
    }
}

impl Eq for CategoryValue {}

impl Hash for CategoryValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered_key().hash(state);
    }
}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::core::label_format::format_category_label(self))
    }
}

impl From<&str> for CategoryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CategoryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CategoryValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<DateTime<Utc>> for CategoryValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_datetime(value)
    }
}

/// Grouping key for small multiples. `None` forms its own group.
pub type GroupKey = Option<CategoryValue>;

/// One input row of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub category: CategoryValue,
    pub value: f64,
    #[serde(default)]
    pub shift_value: f64,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub range: Option<(f64, f64)>,
    #[serde(default)]
    pub row_key: GroupKey,
    #[serde(default)]
    pub column_key: GroupKey,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub highlight: bool,
}

impl DataPoint {
    #[must_use]
    pub fn new(category: impl Into<CategoryValue>, value: f64) -> Self {
        Self {
            category: category.into(),
            value,
            shift_value: 0.0,
            score: None,
            range: None,
            row_key: None,
            column_key: None,
            selected: false,
            highlight: false,
        }
    }

    pub fn try_new(category: impl Into<CategoryValue>, value: f64) -> LayoutResult<Self> {
        let point = Self::new(category, value);
        point.validate()?;
        Ok(point)
    }

    pub fn from_decimal(category: impl Into<CategoryValue>, value: Decimal) -> LayoutResult<Self> {
        Self::try_new(category, decimal_to_f64(value, "value")?)
    }

    #[must_use]
    pub fn with_shift(mut self, shift_value: f64) -> Self {
        self.shift_value = shift_value;
        self
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    #[must_use]
    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.range = Some((low, high));
        self
    }

    #[must_use]
    pub fn with_row_key(mut self, key: impl Into<CategoryValue>) -> Self {
        self.row_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_column_key(mut self, key: impl Into<CategoryValue>) -> Self {
        self.column_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    /// Stacked end position `shift_value + value`.
    #[must_use]
    pub fn stacked_end(&self) -> f64 {
        self.shift_value + self.value
    }

    /// Stacked span ordered low to high.
    #[must_use]
    pub fn stacked_span(&self) -> (f64, f64) {
        let end = self.stacked_end();
        (self.shift_value.min(end), self.shift_value.max(end))
    }

    pub fn validate(&self) -> LayoutResult<()> {
        ensure_finite(self.value, "value")?;
        ensure_finite(self.shift_value, "shift_value")?;
        if let Some(score) = self.score {
            ensure_finite(score, "score")?;
        }
        if let Some((low, high)) = self.range {
            ensure_finite(low, "range start")?;
            ensure_finite(high, "range end")?;
        }
        if let Some(scalar) = self.category.as_scalar() {
            ensure_finite(scalar, "category")?;
        }
        Ok(())
    }
}
