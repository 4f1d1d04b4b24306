use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::domain::{AxesDomains, CategoryDomain, Domain};
use crate::core::types::{CategoryValue, Size};

/// Linear mapping from a [`Domain`] onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: Domain,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    #[must_use]
    pub fn new(domain: Domain, range_start: f64, range_end: f64) -> Self {
        Self {
            domain,
            range_start,
            range_end,
        }
    }

    #[must_use]
    pub fn domain(self) -> Domain {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn domain_to_pixel(self, value: f64) -> f64 {
        let span = self.domain.span();
        if span == 0.0 || !span.is_finite() {
            return self.range_start;
        }
        let normalized = (value - self.domain.min) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn pixel_to_domain(self, pixel: f64) -> f64 {
        let pixel_span = self.range_end - self.range_start;
        if pixel_span == 0.0 {
            return self.domain.min;
        }
        let normalized = (pixel - self.range_start) / pixel_span;
        self.domain.min + normalized * self.domain.span()
    }
}

/// Equal-width bands over distinct categories.
///
/// `step = length / count`; the bar band is `step * fill_ratio`, centered
/// inside its step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    categories: IndexSet<CategoryValue>,
    range_start: f64,
    step: f64,
    band_width: f64,
}

impl BandScale {
    #[must_use]
    pub fn new(categories: &[CategoryValue], range_start: f64, range_end: f64, fill_ratio: f64) -> Self {
        let categories: IndexSet<CategoryValue> = categories.iter().cloned().collect();
        let step = if categories.is_empty() {
            0.0
        } else {
            (range_end - range_start).abs() / categories.len() as f64
        };
        Self {
            categories,
            range_start: range_start.min(range_end),
            step,
            band_width: step * fill_ratio.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn band_width(&self) -> f64 {
        self.band_width
    }

    #[must_use]
    pub fn index_of(&self, category: &CategoryValue) -> Option<usize> {
        self.categories.get_index_of(category)
    }

    /// Top edge of the band for `category`.
    #[must_use]
    pub fn position(&self, category: &CategoryValue) -> Option<f64> {
        self.index_of(category).map(|index| self.position_at(index))
    }

    #[must_use]
    pub fn position_at(&self, index: usize) -> f64 {
        self.range_start + index as f64 * self.step + (self.step - self.band_width) / 2.0
    }

    /// Nearest band for a pixel position; pixels outside the range snap to
    /// the first or last band.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> Option<&CategoryValue> {
        if self.categories.is_empty() || self.step <= 0.0 {
            return None;
        }
        let raw = ((pixel - self.range_start) / self.step).floor();
        let last = self.categories.len() - 1;
        let index = if raw.is_nan() || raw <= 0.0 {
            0
        } else {
            (raw as usize).min(last)
        };
        self.categories.get_index(index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryScale {
    Band(BandScale),
    Linear(LinearScale),
}

impl CategoryScale {
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::Linear(_))
    }

    /// Band top edge for ordinal scales, center position for linear ones.
    #[must_use]
    pub fn map(&self, category: &CategoryValue) -> Option<f64> {
        match self {
            Self::Band(scale) => scale.position(category),
            Self::Linear(scale) => category.as_scalar().map(|v| scale.domain_to_pixel(v)),
        }
    }

    #[must_use]
    pub fn band_width(&self) -> Option<f64> {
        match self {
            Self::Band(scale) => Some(scale.band_width()),
            Self::Linear(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAxis {
    pub domain: CategoryDomain,
    pub scale: CategoryScale,
    pub is_scalar: bool,
}

impl CategoryAxis {
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        self.scale.is_continuous()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueAxis {
    pub domain: Domain,
    pub scale: LinearScale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAxes {
    pub category: CategoryAxis,
    pub value: ValueAxis,
}

/// Builds both scales for a plot area of `plot` pixels.
///
/// Values map onto `[0, plot.width]`; categories onto `[0, plot.height]`,
/// top to bottom.
#[must_use]
pub fn build_axes(domains: &AxesDomains, plot: Size, is_scalar: bool, fill_ratio: f64) -> ResolvedAxes {
    let plot = plot.non_negative();
    let scale = match &domains.category {
        CategoryDomain::Ordinal(categories) => {
            CategoryScale::Band(BandScale::new(categories, 0.0, plot.height, fill_ratio))
        }
        CategoryDomain::Continuous(domain) => {
            CategoryScale::Linear(LinearScale::new(*domain, 0.0, plot.height))
        }
    };
    ResolvedAxes {
        category: CategoryAxis {
            domain: domains.category.clone(),
            scale,
            is_scalar,
        },
        value: ValueAxis {
            domain: domains.value,
            scale: LinearScale::new(domains.value, 0.0, plot.width),
        },
    }
}
