use approx::assert_relative_eq;
use units::Temperature;

use crate::config::SublimationConfig;
use crate::error::{ConfigError, StepError};
use crate::physics::{PsatModel, PsatModelKind, PsatRow, PsatSelector};

fn table() -> Vec<PsatRow> {
    // log10 P = 13.0 - 17000/T sampled between 1500 K and 1800 K
    [1500.0, 1600.0, 1700.0, 1800.0]
        .iter()
        .map(|&t| PsatRow {
            temperature_k: t,
            log10_p_pa: 13.0 - 17_000.0 / t,
        })
        .collect()
}

fn config(model: PsatModel, rows: Vec<PsatRow>) -> SublimationConfig {
    SublimationConfig {
        psat_model: model,
        psat_table: rows,
        ..SublimationConfig::default()
    }
}

fn selected(selector: &PsatSelector, t_k: f64) -> PsatModelKind {
    selector.select(Temperature::from_kelvin(t_k)).unwrap().model
}

#[test]
fn auto_ladder_prefers_table_then_fit_then_baseline() {
    let selector = PsatSelector::from_config(&config(PsatModel::Auto, table())).unwrap();

    assert_eq!(selected(&selector, 1650.0), PsatModelKind::Tabulated);
    assert_eq!(selected(&selector, 1500.0), PsatModelKind::Tabulated);
    assert_eq!(selected(&selector, 2000.0), PsatModelKind::LocalFit);
    assert_eq!(selected(&selector, 1250.0), PsatModelKind::LocalFit);
    assert_eq!(selected(&selector, 2500.0), PsatModelKind::ClausiusClapeyron);
    assert_eq!(selected(&selector, 900.0), PsatModelKind::ClausiusClapeyron);
}

#[test]
fn auto_ladder_is_deterministic() {
    let selector = PsatSelector::from_config(&config(PsatModel::Auto, table())).unwrap();
    for t in [900.0, 1250.0, 1650.0, 2000.0, 2500.0] {
        let first = selector.select(Temperature::from_kelvin(t)).unwrap();
        for _ in 0..5 {
            assert_eq!(selector.select(Temperature::from_kelvin(t)).unwrap(), first);
        }
    }
}

#[test]
fn auto_without_table_uses_baseline_everywhere() {
    let selector = PsatSelector::from_config(&SublimationConfig::default()).unwrap();
    for t in [100.0, 1500.0, 6000.0] {
        let eval = selector.select(Temperature::from_kelvin(t)).unwrap();
        assert_eq!(eval.model, PsatModelKind::ClausiusClapeyron);
        assert_relative_eq!(eval.log10_p_pa, 13.613 - 17_850.0 / t, max_relative = 1e-12);
    }
}

#[test]
fn local_fit_recovers_clausius_coefficients() {
    let selector = PsatSelector::from_config(&config(PsatModel::LocalFit, table())).unwrap();
    let eval = selector.select(Temperature::from_kelvin(1900.0)).unwrap();
    assert_eq!(eval.model, PsatModelKind::LocalFit);
    assert_relative_eq!(eval.log10_p_pa, 13.0 - 17_000.0 / 1900.0, epsilon = 1e-9);
}

#[test]
fn tabulated_interpolates_in_log_pressure() {
    let selector = PsatSelector::from_config(&config(PsatModel::Tabulated, table())).unwrap();
    let eval = selector.select(Temperature::from_kelvin(1550.0)).unwrap();
    let expected = 0.5 * ((13.0 - 17_000.0 / 1500.0) + (13.0 - 17_000.0 / 1600.0));
    assert_relative_eq!(eval.log10_p_pa, expected, epsilon = 1e-12);
    assert_relative_eq!(eval.pressure.to_pa(), 10f64.powf(expected), max_relative = 1e-12);
}

#[test]
fn fixed_model_outside_domain_is_fatal() {
    let selector = PsatSelector::from_config(&config(PsatModel::Tabulated, table())).unwrap();
    let err = selector.select(Temperature::from_kelvin(2500.0)).unwrap_err();
    assert!(matches!(
        err,
        StepError::ModelDomainExhausted {
            model: PsatModelKind::Tabulated,
            ..
        }
    ));
}

#[test]
fn fixed_table_models_need_a_table() {
    let err = PsatSelector::from_config(&config(PsatModel::Tabulated, Vec::new())).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "sublimation.psat_table", .. }));
    assert!(PsatSelector::from_config(&config(PsatModel::LocalFit, Vec::new())).is_err());
}

#[test]
fn liquid_branch_switches_above_threshold() {
    let mut cfg = SublimationConfig::default();
    cfg.liquid_branch = Some(Default::default());
    let selector = PsatSelector::from_config(&cfg).unwrap();

    let solid = selector.select(Temperature::from_kelvin(1800.0)).unwrap();
    assert_relative_eq!(solid.log10_p_pa, 13.613 - 17_850.0 / 1800.0, epsilon = 1e-12);
    let liquid = selector.select(Temperature::from_kelvin(2200.0)).unwrap();
    assert_relative_eq!(liquid.log10_p_pa, 13.203 - 25_898.9 / 2200.0, epsilon = 1e-12);
}

#[test]
fn unsorted_table_is_rejected() {
    let mut rows = table();
    rows.swap(0, 1);
    assert!(PsatSelector::from_config(&config(PsatModel::Auto, rows)).is_err());
}
