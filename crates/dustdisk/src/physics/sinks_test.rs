use approx::assert_relative_eq;
use units::{Density, Length, Mass, Temperature, Time};

use crate::particles::SizeBins;
use crate::physics::{
    AuxiliarySinks, GasDragConfig, HydroEscapeConfig, PhaseTag, gas_drag_timescale,
    hydro_escape_timescale,
};
use crate::timescale::Timescale;

fn escape_config() -> HydroEscapeConfig {
    HydroEscapeConfig {
        enabled: true,
        strength_per_s: 1e-7,
        t_ref_k: 2000.0,
        temp_power: 2.0,
        f_vap_floor: 1e-3,
    }
}

#[test]
fn epstein_stopping_time() {
    let t = gas_drag_timescale(1e-3, 3000.0, 1e-6, 500.0);
    assert_relative_eq!(t.seconds().unwrap(), 3000.0 * 1e-3 / (1e-6 * 500.0), max_relative = 1e-12);
}

#[test]
fn escape_scales_with_temperature_and_vapor() {
    let cfg = escape_config();
    let t_ref = hydro_escape_timescale(&cfg, Temperature::from_kelvin(2000.0), 1.0);
    assert_relative_eq!(t_ref.seconds().unwrap(), 1e7, max_relative = 1e-12);

    let hot = hydro_escape_timescale(&cfg, Temperature::from_kelvin(4000.0), 1.0);
    assert_relative_eq!(hot.seconds().unwrap(), 2.5e6, max_relative = 1e-12);

    let floored = hydro_escape_timescale(&cfg, Temperature::from_kelvin(2000.0), 1e-6);
    assert_relative_eq!(floored.seconds().unwrap(), 1e10, max_relative = 1e-12);

    assert_eq!(
        hydro_escape_timescale(&cfg, Temperature::from_kelvin(2000.0), 0.0),
        Timescale::Infinite
    );
}

#[test]
fn escape_only_acts_on_vapor() {
    let sinks = AuxiliarySinks::new(GasDragConfig::default(), escape_config(), 3000.0);
    let t = Temperature::from_kelvin(3000.0);
    assert_eq!(sinks.escape(PhaseTag::Solid, t, 0.9), Timescale::Infinite);
    assert!(sinks.escape(PhaseTag::Vapor, t, 0.9).is_finite());
}

#[test]
fn drag_removes_small_grains_faster() {
    let drag = GasDragConfig {
        enabled: true,
        rho_gas_kg_m3: 1e-6,
        sound_speed_m_s: 500.0,
    };
    let sinks = AuxiliarySinks::new(drag, HydroEscapeConfig::default(), 3000.0);
    let mut bins = SizeBins::log_spaced(
        Length::from_microns(1.0),
        Length::from_m(1.0),
        6,
        Density::from_kg_per_m3(3000.0),
    )
    .unwrap()
    .with_power_law(Mass::from_kg(1e9), 3.5, Length::from_microns(1.0))
    .unwrap();
    let before = bins.clone();

    let removed = sinks.apply_drag(&mut bins, Time::from_seconds(1e3), 1e-6);
    assert_relative_eq!(
        before.total_mass().to_kg() - bins.total_mass().to_kg(),
        removed,
        max_relative = 1e-9
    );
    let kept = |bin: usize| bins.masses()[bin] / before.masses()[bin];
    assert!(kept(0) < kept(5));
}

#[test]
fn straddling_bin_loses_only_its_active_share() {
    let drag = GasDragConfig {
        enabled: true,
        rho_gas_kg_m3: 1e-6,
        sound_speed_m_s: 500.0,
    };
    let sinks = AuxiliarySinks::new(drag, HydroEscapeConfig::default(), 3000.0);
    let mut bins = SizeBins::log_spaced(
        Length::from_microns(1.0),
        Length::from_m(1.0),
        6,
        Density::from_kg_per_m3(3000.0),
    )
    .unwrap()
    .with_power_law(Mass::from_kg(1e9), 3.5, Length::from_microns(1.0))
    .unwrap();
    let floor = (bins.edges()[1] * bins.edges()[2]).sqrt();
    assert_relative_eq!(bins.active_weight(1, floor), 0.5, max_relative = 1e-12);
    let dt = Time::from_seconds(1e3);

    let before = bins.clone();
    sinks.apply_drag(&mut bins, dt, floor);
    assert_eq!(bins.masses()[0], before.masses()[0]);
    let t_drag = gas_drag_timescale(before.centres()[1], 3000.0, 1e-6, 500.0);
    let expected = 0.5 * before.masses()[1] * t_drag.decay_fraction(dt.to_seconds());
    assert_relative_eq!(before.masses()[1] - bins.masses()[1], expected, max_relative = 1e-9);

    let before = bins.clone();
    let t_escape = Timescale::from_seconds(1e4);
    sinks.apply_escape(&mut bins, t_escape, dt, floor);
    let fraction = t_escape.decay_fraction(dt.to_seconds());
    assert_eq!(bins.masses()[0], before.masses()[0]);
    assert_relative_eq!(
        before.masses()[1] - bins.masses()[1],
        0.5 * before.masses()[1] * fraction,
        max_relative = 1e-9
    );
    assert_relative_eq!(
        before.masses()[4] - bins.masses()[4],
        before.masses()[4] * fraction,
        max_relative = 1e-9
    );
}
