use bar_chart_layout::core::bar_geometry::{
    MIN_CONTINUOUS_BAR_THICKNESS_PX, compute_bar_rects, resolved_continuous_thickness,
};
use bar_chart_layout::core::domain::calculate_axes_domains;
use bar_chart_layout::core::scale::build_axes;
use bar_chart_layout::core::{AxisType, ChartSettings, DataPoint, Rect, Size};
use proptest::prelude::*;

fn rects_for(
    points: &[DataPoint],
    settings: &ChartSettings,
    plot: Size,
    requested: f64,
) -> Vec<Rect> {
    let refs: Vec<&DataPoint> = points.iter().collect();
    let is_scalar = points.iter().all(|p| p.category.is_scalar()) && !points.is_empty();
    let domains = calculate_axes_domains(&refs, settings, is_scalar);
    let axes = build_axes(&domains, plot, is_scalar, settings.category_axis.band_fill_ratio());
    compute_bar_rects(&refs, &axes, requested, settings.category_axis.bar_thickness_ceiling)
}

proptest! {
    #[test]
    fn ordinal_bars_stay_inside_the_plot(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 1..40),
        shifts in prop::collection::vec(-500.0f64..500.0, 40),
        width in 50.0f64..2_000.0,
        height in 50.0f64..2_000.0
    ) {
        let points: Vec<DataPoint> = values
            .iter()
            .zip(&shifts)
            .enumerate()
            .map(|(i, (value, shift))| {
                DataPoint::new(format!("c{}", i % 7), *value).with_shift(*shift)
            })
            .collect();
        let rects = rects_for(&points, &ChartSettings::default(), Size::new(width, height), 0.0);

        prop_assert_eq!(rects.len(), points.len());
        for (rect, point) in rects.iter().zip(&points) {
            prop_assert!(rect.is_finite_non_negative());
            prop_assert!(rect.x >= -1e-9);
            prop_assert!(rect.x <= width + 1e-9);
            prop_assert!(rect.bottom() <= height + 1e-9);
            if point.value != 0.0 {
                prop_assert!(rect.width >= 1.0 - 1e-9);
            }
        }
    }

    #[test]
    fn continuous_bars_share_one_bounded_thickness(
        categories in prop::collection::vec(-10_000.0f64..10_000.0, 1..60),
        height in 20.0f64..1_500.0,
        requested in 0.5f64..400.0
    ) {
        let mut settings = ChartSettings::default();
        settings.category_axis.axis_type = AxisType::Continuous;
        let points: Vec<DataPoint> = categories
            .iter()
            .map(|category| DataPoint::new(*category, 1.0))
            .collect();
        let rects = rects_for(&points, &settings, Size::new(400.0, height), requested);

        let ceiling = requested.min(settings.category_axis.bar_thickness_ceiling);
        let heights: Vec<f64> = rects.iter().map(|r| r.height).filter(|h| *h > 0.0).collect();
        prop_assert_eq!(heights.len(), points.len());
        for h in &heights {
            prop_assert!((h - heights[0]).abs() <= 1e-9);
            prop_assert!(*h <= ceiling + 1e-9);
            prop_assert!(*h >= MIN_CONTINUOUS_BAR_THICKNESS_PX.min(ceiling) - 1e-9);
        }
    }

    #[test]
    fn resolved_thickness_separates_distinct_centers(
        centers in prop::collection::vec(0.0f64..1_000.0, 2..50),
        requested in 0.0f64..10.0
    ) {
        let thickness = resolved_continuous_thickness(&centers, requested);
        let floor = MIN_CONTINUOUS_BAR_THICKNESS_PX.min(requested);
        prop_assert!(thickness <= requested + 1e-9);
        prop_assert!(thickness >= floor - 1e-9);

        let mut sorted = centers.clone();
        sorted.sort_by(f64::total_cmp);
        let gap = sorted
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .filter(|gap| *gap > 1e-9)
            .fold(f64::INFINITY, f64::min);
        if gap.is_finite() && thickness > floor + 1e-9 {
            prop_assert!(thickness <= gap + 1e-9);
        }
    }
}
