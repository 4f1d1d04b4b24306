use bar_chart_layout::core::{BandScale, CategoryScale, CategoryValue, Domain, LinearScale};

fn categories(names: &[&str]) -> Vec<CategoryValue> {
    names.iter().map(|name| CategoryValue::text(*name)).collect()
}

#[test]
fn linear_scale_maps_domain_ends_to_range_ends() {
    let scale = LinearScale::new(Domain::new(-50.0, 150.0), 0.0, 400.0);
    assert_eq!(scale.domain_to_pixel(-50.0), 0.0);
    assert_eq!(scale.domain_to_pixel(150.0), 400.0);
    assert_eq!(scale.domain_to_pixel(0.0), 100.0);
    assert!((scale.pixel_to_domain(300.0) - 100.0).abs() <= 1e-9);
}

#[test]
fn linear_scale_is_monotonic() {
    let scale = LinearScale::new(Domain::new(0.0, 10.0), 0.0, 250.0);
    let pixels: Vec<f64> = (0..=10).map(|v| scale.domain_to_pixel(f64::from(v))).collect();
    assert!(pixels.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn zero_span_domain_collapses_to_range_start() {
    let scale = LinearScale::new(Domain::new(5.0, 5.0), 10.0, 90.0);
    assert_eq!(scale.domain_to_pixel(5.0), 10.0);
    assert_eq!(scale.domain_to_pixel(50.0), 10.0);
}

#[test]
fn band_scale_divides_range_into_equal_steps() {
    let scale = BandScale::new(&categories(&["a", "b", "c"]), 0.0, 300.0, 0.5);
    assert_eq!(scale.len(), 3);
    assert_eq!(scale.step(), 100.0);
    assert_eq!(scale.band_width(), 50.0);
    assert_eq!(scale.position(&CategoryValue::text("a")), Some(25.0));
    assert_eq!(scale.position(&CategoryValue::text("c")), Some(225.0));
    assert_eq!(scale.position(&CategoryValue::text("missing")), None);
}

#[test]
fn band_scale_dedups_categories_in_order() {
    let scale = BandScale::new(&categories(&["b", "a", "b"]), 0.0, 100.0, 1.0);
    assert_eq!(scale.len(), 2);
    assert_eq!(scale.index_of(&CategoryValue::text("b")), Some(0));
    assert_eq!(scale.index_of(&CategoryValue::text("a")), Some(1));
}

#[test]
fn band_invert_snaps_to_nearest_band() {
    let scale = BandScale::new(&categories(&["a", "b", "c", "d"]), 0.0, 400.0, 0.8);
    assert_eq!(scale.invert(150.0), Some(&CategoryValue::text("b")));
    assert_eq!(scale.invert(-20.0), Some(&CategoryValue::text("a")));
    assert_eq!(scale.invert(4_000.0), Some(&CategoryValue::text("d")));
    assert_eq!(scale.invert(f64::NAN), Some(&CategoryValue::text("a")));
}

#[test]
fn empty_band_scale_has_no_bands() {
    let scale = BandScale::new(&[], 0.0, 400.0, 0.8);
    assert!(scale.is_empty());
    assert_eq!(scale.step(), 0.0);
    assert_eq!(scale.invert(10.0), None);
}

#[test]
fn category_scale_maps_by_kind() {
    let band = CategoryScale::Band(BandScale::new(&categories(&["a"]), 0.0, 100.0, 0.8));
    assert_eq!(band.map(&CategoryValue::text("a")), Some(10.0));
    assert_eq!(band.band_width(), Some(80.0));
    assert!(!band.is_continuous());

    let linear = CategoryScale::Linear(LinearScale::new(Domain::new(0.0, 10.0), 0.0, 100.0));
    assert_eq!(linear.map(&CategoryValue::number(2.5)), Some(25.0));
    assert_eq!(linear.map(&CategoryValue::text("a")), None);
    assert_eq!(linear.band_width(), None);
    assert!(linear.is_continuous());
}
