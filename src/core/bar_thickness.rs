use indexmap::IndexSet;
use ordered_float::OrderedFloat;

use crate::core::domain::Domain;
use crate::core::settings::CategoryAxisSettings;
use crate::core::types::DataPoint;

/// Requested bar thickness on a categorical (banded) axis.
#[must_use]
pub fn categorical_bar_thickness(
    plot_height: f64,
    category_count: usize,
    settings: &CategoryAxisSettings,
) -> f64 {
    if category_count == 0 || plot_height <= 0.0 {
        return 0.0;
    }
    let per_category = plot_height / category_count as f64;
    per_category
        .max(settings.min_category_thickness)
        .min(settings.max_category_thickness)
        * settings.band_fill_ratio()
}

/// Requested bar thickness on a continuous scalar axis, from the number of
/// distinct categories inside the domain.
#[must_use]
pub fn continuous_bar_thickness(plot_height: f64, distinct_in_domain: usize) -> f64 {
    if distinct_in_domain == 0 || plot_height <= 0.0 {
        return 0.0;
    }
    let divisor = if distinct_in_domain > 2 {
        distinct_in_domain + 1
    } else {
        distinct_in_domain
    };
    plot_height / divisor as f64
}

#[must_use]
pub fn distinct_scalar_categories_in_domain(points: &[&DataPoint], domain: Domain) -> usize {
    points
        .iter()
        .filter_map(|point| point.category.as_scalar())
        .filter(|value| domain.contains(*value))
        .map(OrderedFloat)
        .collect::<IndexSet<_>>()
        .len()
}
