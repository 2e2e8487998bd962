use clusterbar::core::TickFormat;
use clusterbar::scale::{BandScale, LinearScale};

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn bands_partition_the_range() {
    let scale = BandScale::new(keys(&["a", "b", "c", "d"]), (0.0, 5.0));
    assert_eq!(scale.bandwidth(), 1.25);
    assert_eq!(scale.position("a"), Some(0.0));
    assert_eq!(scale.position("b"), Some(1.25));
    assert_eq!(scale.position("d"), Some(3.75));
    assert_eq!(scale.position("missing"), None);
}

#[test]
fn reversed_range_lays_bands_back_to_front() {
    let scale = BandScale::new(keys(&["2020", "2021", "2022"]), (6.0, 0.0));
    let p0 = scale.position("2020").unwrap();
    let p1 = scale.position("2021").unwrap();
    let p2 = scale.position("2022").unwrap();

    // First category sits deepest; every band stays inside the range.
    assert_eq!(p0, 4.0);
    assert_eq!(p1, 2.0);
    assert_eq!(p2, 0.0);
    for p in [p0, p1, p2] {
        assert!(p >= 0.0 && p + scale.bandwidth() <= 6.0);
    }
}

#[test]
fn empty_band_domain_has_zero_bandwidth() {
    let scale = BandScale::new(Vec::new(), (0.0, 5.0));
    assert_eq!(scale.bandwidth(), 0.0);
    assert_eq!(scale.position("anything"), None);
}

#[test]
fn linear_domain_is_the_observed_extent() {
    let scale = LinearScale::from_values(&[10.0, 20.0, 5.0], (0.0, 2.0));
    assert_eq!(scale.domain(), (5.0, 20.0));
    assert_eq!(scale.position(5.0), 0.0);
    assert_eq!(scale.position(20.0), 2.0);
    assert_eq!(scale.position(12.5), 1.0);
}

#[test]
fn linear_ignores_non_finite_values() {
    let scale = LinearScale::from_values(&[f64::NAN, 3.0, f64::INFINITY, 7.0], (0.0, 1.0));
    assert_eq!(scale.domain(), (3.0, 7.0));
}

#[test]
fn collapsed_domain_maps_to_range_start() {
    let scale = LinearScale::from_values(&[4.0, 4.0, 4.0], (0.0, 2.0));
    assert_eq!(scale.domain(), (4.0, 4.0));
    assert_eq!(scale.position(4.0), 0.0);
    assert_eq!(scale.position(100.0), 0.0);
}

#[test]
fn no_values_yields_a_zero_domain() {
    let scale = LinearScale::from_values(&[], (0.0, 2.0));
    assert_eq!(scale.domain(), (0.0, 0.0));
}

#[test]
fn ticks_land_on_round_steps() {
    let scale = LinearScale::new((0.0, 100.0), (0.0, 2.0));
    let ticks = scale.ticks(10);
    assert_eq!(ticks.len(), 11);
    assert_eq!(ticks[0], 0.0);
    assert_eq!(ticks[1], 10.0);
    assert_eq!(*ticks.last().unwrap(), 100.0);
}

#[test]
fn ticks_cover_offset_domains() {
    let scale = LinearScale::new((7.0, 43.0), (0.0, 2.0));
    let ticks = scale.ticks(10);
    assert!(ticks.iter().all(|t| *t >= 7.0 && *t <= 43.0));
    assert_eq!(ticks[0], 10.0);
    assert!(ticks.windows(2).all(|w| w[1] - w[0] == 5.0));
}

#[test]
fn degenerate_tick_domain_yields_single_tick() {
    let scale = LinearScale::new((3.0, 3.0), (0.0, 2.0));
    assert_eq!(scale.ticks(10), vec![3.0]);
}

#[test]
fn si_format_scales_and_trims() {
    assert_eq!(TickFormat::Si.format(1500.0), "1.5k");
    assert_eq!(TickFormat::Si.format(2_000_000.0), "2M");
    assert_eq!(TickFormat::Si.format(3_500_000_000.0), "3.5G");
    assert_eq!(TickFormat::Si.format(950.0), "950");
    assert_eq!(TickFormat::Si.format(-1500.0), "-1.5k");
    assert_eq!(TickFormat::Si.format(0.0), "0");
}

#[test]
fn si_format_covers_sub_unit_prefixes() {
    assert_eq!(TickFormat::Si.format(0.005), "5m");
    assert_eq!(TickFormat::Si.format(0.5), "500m");
    assert_eq!(TickFormat::Si.format(2.5e-6), "2.5µ");
    assert_eq!(TickFormat::Si.format(3e-9), "3n");
    assert_eq!(TickFormat::Si.format(-0.25), "-250m");
}

#[test]
fn plain_and_fixed_formats() {
    assert_eq!(TickFormat::Plain.format(12.5), "12.5");
    assert_eq!(TickFormat::Plain.format(3.0), "3");
    assert_eq!(TickFormat::Fixed(2).format(3.0), "3.00");
}
