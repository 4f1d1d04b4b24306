use std::collections::HashSet;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::types::{CategoryValue, DataPoint};

/// Contiguous window over the ordered distinct categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollState {
    pub offset: usize,
    pub window_size: usize,
    pub total: usize,
}

impl ScrollState {
    /// Builds a state with the offset clamped to `[0, total - window]`.
    #[must_use]
    pub fn new(total: usize, window_size: usize, offset: usize) -> Self {
        let window_size = window_size.min(total);
        let max_offset = total - window_size;
        Self {
            offset: offset.min(max_offset),
            window_size,
            total,
        }
    }

    /// A window that shows everything.
    #[must_use]
    pub fn full(total: usize) -> Self {
        Self::new(total, total, 0)
    }

    #[must_use]
    pub fn max_offset(self) -> usize {
        self.total - self.window_size
    }

    #[must_use]
    pub fn is_scrollbar_needed(self) -> bool {
        self.total > self.window_size
    }

    #[must_use]
    pub fn scrolled_by(self, delta: i64) -> Self {
        Self::new(self.total, self.window_size, shift_offset(self.offset, delta))
    }

    #[must_use]
    pub fn scrolled_to(self, offset: usize) -> Self {
        Self::new(self.total, self.window_size, offset)
    }

    #[must_use]
    pub fn visible_range(self) -> Range<usize> {
        self.offset..self.offset + self.window_size
    }
}

/// `offset + delta`, saturating at zero and `usize::MAX`.
#[must_use]
pub fn shift_offset(offset: usize, delta: i64) -> usize {
    if delta.is_negative() {
        offset.saturating_sub(usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX))
    } else {
        offset.saturating_add(usize::try_from(delta).unwrap_or(usize::MAX))
    }
}

/// Number of categories that fit at the minimum thickness, at least one.
#[must_use]
pub fn window_size_for_height(plot_height: f64, min_category_thickness: f64) -> usize {
    if !(plot_height > 0.0) || !(min_category_thickness > 0.0) {
        return 1;
    }
    let fitted = (plot_height / min_category_thickness).floor();
    if fitted >= usize::MAX as f64 {
        usize::MAX
    } else {
        (fitted as usize).max(1)
    }
}

#[must_use]
pub fn visible_categories(categories: &[CategoryValue], state: ScrollState) -> &[CategoryValue] {
    let range = state.visible_range();
    let end = range.end.min(categories.len());
    let start = range.start.min(end);
    &categories[start..end]
}

/// Indices of the points whose category is visible, in input order.
#[must_use]
pub fn visible_point_indices(points: &[&DataPoint], visible: &[CategoryValue]) -> Vec<usize> {
    let visible: HashSet<&CategoryValue> = visible.iter().collect();
    points
        .iter()
        .enumerate()
        .filter(|(_, point)| visible.contains(&point.category))
        .map(|(index, _)| index)
        .collect()
}
