use approx::assert_relative_eq;
use units::{Density, Length, Mass, Pressure, Temperature, Time};

use crate::config::SublimationConfig;
use crate::constants::{PI, R_GAS};
use crate::particles::SizeBins;
use crate::physics::{
    PsatSelector, SublimationModel, SublimationRates, hkl_mass_flux, shrink_loss_fraction, sublimation_timescale,
};
use crate::timescale::Timescale;

#[test]
fn hkl_flux_matches_formula() {
    let t = Temperature::from_kelvin(2000.0);
    let flux = hkl_mass_flux(Pressure::from_pa(100.0), Pressure::zero(), t, 0.007, 0.044);
    let expected = 0.007 * 100.0 * (0.044 / (2.0 * PI * R_GAS * 2000.0)).sqrt();
    assert_relative_eq!(flux, expected, max_relative = 1e-12);
}

#[test]
fn ambient_pressure_above_saturation_stops_sublimation() {
    let t = Temperature::from_kelvin(2000.0);
    assert_eq!(
        hkl_mass_flux(Pressure::from_pa(10.0), Pressure::from_pa(20.0), t, 0.007, 0.044),
        0.0
    );
}

#[test]
fn shrink_removes_volume_fraction() {
    assert_relative_eq!(shrink_loss_fraction(1.0, 0.5), 0.875);
    assert_eq!(shrink_loss_fraction(1.0, 2.0), 1.0);
    assert_eq!(shrink_loss_fraction(1.0, 0.0), 0.0);
}

#[test]
fn timescale_compares_rate_with_floor() {
    let t = sublimation_timescale(Length::from_microns(1.0), 1e-9);
    assert_relative_eq!(t.seconds().unwrap(), 1000.0, max_relative = 1e-12);
    assert_eq!(sublimation_timescale(Length::from_microns(1.0), 0.0), Timescale::Infinite);
}

#[test]
fn disabled_model_is_inactive() {
    let cfg = SublimationConfig {
        enabled: false,
        ..SublimationConfig::default()
    };
    let selector = PsatSelector::from_config(&cfg).unwrap();
    let t = Temperature::from_kelvin(2500.0);
    let psat = selector.select(t).unwrap();
    let rates = SublimationModel::new(&cfg, 3000.0).evaluate(&psat, t, Length::from_microns(1.0));
    assert_eq!(rates.t_solid, Timescale::Infinite);
    assert_eq!(rates.shrink_rate, 0.0);
}

#[test]
fn apply_removes_small_grains_first() {
    let cfg = SublimationConfig::default();
    let selector = PsatSelector::from_config(&cfg).unwrap();
    let t = Temperature::from_kelvin(2000.0);
    let psat = selector.select(t).unwrap();
    let model = SublimationModel::new(&cfg, 3000.0);
    let floor = 1e-6;
    let rates = model.evaluate(&psat, t, Length::from_m(floor));
    assert!(rates.t_solid.is_finite());

    let mut bins = SizeBins::log_spaced(
        Length::from_m(1e-6),
        Length::from_m(1.0),
        12,
        Density::from_kg_per_m3(3000.0),
    )
    .unwrap()
    .with_power_law(Mass::from_kg(1e10), 3.5, Length::from_m(1e-6))
    .unwrap();
    let before = bins.clone();
    let removed = model.apply(&mut bins, &rates, Time::from_seconds(10.0), floor);

    assert!(removed > 0.0);
    assert_relative_eq!(
        before.total_mass().to_kg() - bins.total_mass().to_kg(),
        removed,
        max_relative = 1e-9
    );
    let lost_fraction = |bin: usize| 1.0 - bins.masses()[bin] / before.masses()[bin];
    assert!(lost_fraction(0) > lost_fraction(11));
}

#[test]
fn straddling_bin_loses_only_its_active_share() {
    let model = SublimationModel::new(&SublimationConfig::default(), 3000.0);
    let rates = SublimationRates {
        mass_flux: 1.0,
        shrink_rate: 1e-9,
        t_solid: Timescale::Infinite,
    };
    let mut bins = SizeBins::log_spaced(
        Length::from_m(1e-6),
        Length::from_m(1e-2),
        8,
        Density::from_kg_per_m3(3000.0),
    )
    .unwrap()
    .with_power_law(Mass::from_kg(1e10), 3.5, Length::from_m(1e-6))
    .unwrap();
    let floor = (bins.edges()[2] * bins.edges()[3]).sqrt();
    assert_relative_eq!(bins.active_weight(2, floor), 0.5, max_relative = 1e-12);
    let before = bins.clone();

    let dt = Time::from_seconds(100.0);
    model.apply(&mut bins, &rates, dt, floor);

    assert_eq!(bins.masses()[..2], before.masses()[..2]);
    let expected = 0.5 * before.masses()[2] * shrink_loss_fraction(before.centres()[2], 1e-7);
    assert_relative_eq!(before.masses()[2] - bins.masses()[2], expected, max_relative = 1e-9);
    let full = before.masses()[3] * shrink_loss_fraction(before.centres()[3], 1e-7);
    assert_relative_eq!(before.masses()[3] - bins.masses()[3], full, max_relative = 1e-9);
}
