use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::settings::{AxisType, ChartSettings};
use crate::core::types::{CategoryValue, DataPoint};

/// Half-width used to widen single-value domains.
pub const DOMAIN_EPSILON: f64 = 1e-6;

/// Closed numeric interval with `min < max` once widened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    /// Builds a domain from two bounds in any order.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Whether the closed interval `[low, high]` touches the domain.
    #[must_use]
    pub fn intersects(self, low: f64, high: f64) -> bool {
        high >= self.min && low <= self.max
    }

    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.min.abs().max(self.max.abs())
    }

    /// Widens a zero-span domain by [`DOMAIN_EPSILON`] on each side.
    #[must_use]
    pub fn widened_if_degenerate(self) -> Self {
        if self.span() > 0.0 {
            self
        } else {
            Self {
                min: self.min - DOMAIN_EPSILON,
                max: self.max + DOMAIN_EPSILON,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CategoryDomain {
    /// Distinct categories in first-appearance order.
    Ordinal(Vec<CategoryValue>),
    Continuous(Domain),
}

impl CategoryDomain {
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Continuous(_))
    }

    #[must_use]
    pub fn continuous(&self) -> Option<Domain> {
        match self {
            Self::Continuous(domain) => Some(*domain),
            Self::Ordinal(_) => None,
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[CategoryValue] {
        match self {
            Self::Ordinal(categories) => categories,
            Self::Continuous(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxesDomains {
    pub category: CategoryDomain,
    pub value: Domain,
}

/// Every category is numeric or temporal, and there is at least one.
#[must_use]
pub fn categories_are_scalar(points: &[&DataPoint]) -> bool {
    !points.is_empty() && points.iter().all(|point| point.category.is_scalar())
}

/// Whether the category axis is laid out as a continuous scale.
#[must_use]
pub fn uses_continuous_category_axis(settings: &ChartSettings, is_scalar: bool) -> bool {
    is_scalar && settings.category_axis.axis_type == AxisType::Continuous
}

/// Distinct categories in first-appearance order.
#[must_use]
pub fn distinct_categories(points: &[&DataPoint]) -> Vec<CategoryValue> {
    points
        .iter()
        .map(|point| point.category.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Derives both axis domains for the given point set.
#[must_use]
pub fn calculate_axes_domains(
    points: &[&DataPoint],
    settings: &ChartSettings,
    is_scalar: bool,
) -> AxesDomains {
    AxesDomains {
        category: calculate_category_domain(points, settings, is_scalar),
        value: calculate_value_domain(points, settings),
    }
}

#[must_use]
pub fn calculate_category_domain(
    points: &[&DataPoint],
    settings: &ChartSettings,
    is_scalar: bool,
) -> CategoryDomain {
    if !uses_continuous_category_axis(settings, is_scalar) {
        return CategoryDomain::Ordinal(distinct_categories(points));
    }

    let extent = extent(points.iter().filter_map(|point| point.category.as_scalar()));
    let axis = &settings.category_axis;
    let (start, end) = if axis.range_mode.is_custom() {
        (axis.start, axis.end)
    } else {
        (None, None)
    };
    CategoryDomain::Continuous(resolve_bounds(extent, start, end))
}

/// Value domain over the stacked span of every point.
#[must_use]
pub fn calculate_value_domain(points: &[&DataPoint], settings: &ChartSettings) -> Domain {
    let extent = extent(points.iter().flat_map(|point| {
        let (low, high) = point.stacked_span();
        [low, high]
    }));
    let axis = &settings.value_axis;
    let (start, end) = if axis.range_mode.is_custom() {
        (axis.start, axis.end)
    } else {
        (None, None)
    };
    resolve_bounds(extent, start, end)
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}

fn resolve_bounds(extent: Option<(f64, f64)>, start: Option<f64>, end: Option<f64>) -> Domain {
    let (data_min, data_max) = extent.unwrap_or((0.0, 0.0));
    let min = start.filter(|v| v.is_finite()).unwrap_or(data_min);
    let max = end.filter(|v| v.is_finite()).unwrap_or(data_max);
    Domain::new(min, max).widened_if_degenerate()
}
