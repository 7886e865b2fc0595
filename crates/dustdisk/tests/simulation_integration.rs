//! End-to-end runs of the integrator.

use approx::assert_relative_eq;
use units::Time;

use dustdisk::blowout::{BlowoutLayer, GateMode, TargetPhase};
use dustdisk::config::StepSize;
use dustdisk::particles::SupplyMode;
use dustdisk::physics::{ChiBlow, PsatModel, PsatModelKind, PsatRow};
use dustdisk::temperature::{Extrapolation, TemperatureDriverConfig, TemperatureRow};
use dustdisk::{
    ChannelSink, DiskGeometry, Integrator, Lifecycle, MemorySink, RunConfig, RunError, StepError,
    TemperatureError, TerminationReason,
};

/// Blow-out only, every bin unbound, t_blow = 1/Ω.
fn pure_blowout() -> RunConfig {
    let mut config = RunConfig::default();
    config.sublimation.enabled = false;
    config.collisions.enabled = false;
    config.shielding.enabled = false;
    config.phase.enabled = false;
    config.radiation.beta_override = Some(1.0);
    config.radiation.chi_blow = ChiBlow::Fixed(1.0);
    config.blowout.gate_mode = GateMode::None;
    config.blowout.target_phase = TargetPhase::Any;
    config.blowout.layer = BlowoutLayer::FullSurface;
    config.blowout.fast_blowout.threshold = 0.0;
    config.blowout.fast_blowout.strict_threshold = 0.0;
    config
}

fn omega(config: &RunConfig) -> f64 {
    DiskGeometry::new(config.geometry.radius(), config.geometry.width())
        .omega()
        .to_rad_per_sec()
}

fn busy_disk() -> RunConfig {
    let mut config = RunConfig::default();
    config.blowout.gate_mode = GateMode::CollisionCompetition;
    config.supply.mode = SupplyMode::Const { rate_kg_s: 1e6 };
    config.supply.jitter_sigma = 0.3;
    config.sinks.gas_drag.enabled = true;
    config.size_floor.surface_energy.enabled = true;
    config.numerics.t_end_years = Some(0.1);
    config
}

#[test]
fn blowout_only_run_decays_exponentially() {
    let mut config = pure_blowout();
    let omega = omega(&config);
    let period = std::f64::consts::TAU / omega;
    config.numerics.t_end_orbits = Some(2.0);
    config.numerics.dt = StepSize::Fixed {
        seconds: period / 37.0,
    };

    let mut integrator = Integrator::new(config, MemorySink::new()).unwrap();
    let m0 = integrator.state().total_mass().to_kg();
    let summary = integrator.run().unwrap();

    assert_eq!(summary.reason, TerminationReason::TimeHorizon);
    assert_relative_eq!(summary.final_time.to_seconds(), 2.0 * period, max_relative = 1e-12);

    let sink = integrator.into_sink();
    assert!(sink.is_finished());
    for record in sink.records() {
        let expected = m0 * (-record.time_s * omega).exp();
        assert_relative_eq!(record.disk.mass_kg, expected, max_relative = 1e-9);
        assert!(record.gate.correction_engaged);
        assert_eq!(record.gate.f_gate, 1.0);
    }
    assert_relative_eq!(
        summary.final_mass.to_kg(),
        m0 * (-4.0 * std::f64::consts::PI).exp(),
        max_relative = 1e-9
    );
    assert_relative_eq!(summary.ledger.totals().blowout, m0 - summary.final_mass.to_kg(), max_relative = 1e-9);
}

#[test]
fn multi_process_run_conserves_mass() {
    let mut integrator = Integrator::new(busy_disk(), MemorySink::new()).unwrap();
    let summary = integrator.run().unwrap();

    assert_eq!(summary.reason, TerminationReason::TimeHorizon);
    assert!(summary.max_error_percent <= 0.5);

    let totals = summary.ledger.totals();
    assert!(totals.supply > 0.0);
    assert!(totals.sublimation > 0.0);
    assert!(totals.gas_drag > 0.0);
    let m0 = summary.ledger.initial().to_kg();
    let closure = m0 + totals.sources() - totals.sinks() - summary.final_mass.to_kg();
    assert!(closure.abs() <= 1e-9 * m0, "closure {closure} kg");

    let records = integrator.sink().records();
    assert_eq!(records.len() as u64, summary.steps);
    assert!(records.windows(2).all(|w| w[1].step == w[0].step + 1));
    assert!(records.iter().all(|r| r.ledger_error_percent <= 0.5));
}

#[test]
fn identical_seed_reproduces_diagnostics_byte_for_byte() {
    let run = |seed: u64| {
        let mut config = busy_disk();
        config.seed.0 = seed;
        let mut integrator = Integrator::new(config, MemorySink::new()).unwrap();
        integrator.run().unwrap();
        serde_json::to_string(integrator.sink().records()).unwrap()
    };
    let first = run(12_345);
    assert_eq!(first, run(12_345));
    assert_ne!(first, run(54_321));
}

#[test]
fn step_budget_is_distinct_from_depletion() {
    let mut config = pure_blowout();
    config.numerics.t_end_years = Some(1.0);
    config.numerics.dt = StepSize::Fixed { seconds: 60.0 };
    config.numerics.max_steps = Some(3);
    let mut integrator = Integrator::new(config, MemorySink::new()).unwrap();
    let summary = integrator.run().unwrap();
    assert_eq!(summary.reason, TerminationReason::StepLimit);
    assert_eq!(summary.steps, 3);

    let mut config = pure_blowout();
    config.numerics.t_end_years = Some(1.0);
    config.numerics.mass_floor_fraction = 0.5;
    let mut integrator = Integrator::new(config, MemorySink::new()).unwrap();
    let summary = integrator.run().unwrap();
    assert_eq!(summary.reason, TerminationReason::MassDepleted);
    assert!(summary.final_mass.to_kg() < 0.5 * summary.ledger.initial().to_kg());
}

#[test]
fn manual_stepping_walks_the_lifecycle() {
    let mut config = pure_blowout();
    config.numerics.dt = StepSize::Fixed { seconds: 60.0 };
    config.numerics.max_steps = Some(2);
    let mut integrator = Integrator::new(config, MemorySink::new()).unwrap();
    assert_eq!(integrator.lifecycle(), Lifecycle::Initializing);
    assert!(integrator.plan().is_none());

    assert_eq!(integrator.step_once().unwrap(), Lifecycle::Stepping);
    assert!(integrator.plan().is_some());
    assert_eq!(
        integrator.step_once().unwrap(),
        Lifecycle::Terminating(TerminationReason::StepLimit)
    );
    // Further calls are idempotent
    assert_eq!(
        integrator.step_once().unwrap(),
        Lifecycle::Terminating(TerminationReason::StepLimit)
    );
    assert_eq!(integrator.sink().records().len(), 2);
}

#[test]
fn bad_config_fails_before_any_step() {
    let mut config = RunConfig::default();
    config.collisions.fragment_q = 4.5;
    let (sink, receiver) = ChannelSink::new();

    let err = Integrator::new(config, sink).err().unwrap();
    assert!(matches!(err, RunError::Config(_)));
    assert_eq!(err.step(), None);
    assert_eq!(receiver.iter().count(), 0);
}

#[test]
fn fixed_psat_model_outside_domain_stops_the_run() {
    let mut config = RunConfig::default();
    config.sublimation.psat_model = PsatModel::Tabulated;
    config.sublimation.psat_table = vec![
        PsatRow {
            temperature_k: 1000.0,
            log10_p_pa: -2.0,
        },
        PsatRow {
            temperature_k: 1200.0,
            log10_p_pa: 0.0,
        },
    ];
    let mut integrator = Integrator::new(config, MemorySink::new()).unwrap();

    match integrator.run() {
        Err(RunError::Step {
            step: 0,
            source:
                StepError::ModelDomainExhausted {
                    model: PsatModelKind::Tabulated,
                    ..
                },
        }) => {}
        other => panic!("expected domain exhaustion at step 0, got {other:?}"),
    }
    assert!(integrator.sink().is_finished());
    assert!(integrator.sink().records().is_empty());
    assert!(matches!(integrator.step_once(), Err(RunError::Halted { step: 0 })));
}

#[test]
fn temperature_table_error_keeps_last_committed_state() {
    let mut config = RunConfig::default();
    config.temperature.driver = TemperatureDriverConfig::Table {
        rows: vec![
            TemperatureRow {
                time_s: 0.0,
                temperature_k: 4000.0,
            },
            TemperatureRow {
                time_s: 1000.0,
                temperature_k: 3800.0,
            },
        ],
        extrapolation: Extrapolation::Error,
    };
    config.numerics.dt = StepSize::Fixed { seconds: 600.0 };
    let mut integrator = Integrator::new(config, MemorySink::new()).unwrap();

    let err = integrator.run().unwrap_err();
    assert_eq!(err.step(), Some(2));
    assert!(matches!(
        err,
        RunError::Step {
            source: StepError::Temperature(TemperatureError::OutOfRange { .. }),
            ..
        }
    ));
    assert_eq!(integrator.state().time, Time::from_seconds(1200.0));
    assert_eq!(integrator.sink().records().len(), 2);
    assert!(integrator.ledger().max_error_percent() <= 0.5);
}

fn first_record(config: RunConfig) -> dustdisk::StepDiagnostics {
    let mut integrator = Integrator::new(config, MemorySink::new()).unwrap();
    integrator.step_once().unwrap();
    integrator.into_sink().into_records().remove(0)
}

#[test]
fn thick_disk_loses_only_its_skin() {
    let mut full = pure_blowout();
    full.shielding.enabled = true;
    let mut skin = full.clone();
    skin.blowout.layer = BlowoutLayer::SurfaceTauLe1;
    let geometry = DiskGeometry::new(skin.geometry.radius(), skin.geometry.width());

    let full = first_record(full);
    let skin = first_record(skin);
    assert!(skin.disk.tau_los > 1.0);
    assert!(skin.disk.sigma_tau1_kg_m2 < skin.disk.sigma_active_kg_m2);
    assert_eq!(skin.disk.skin_flux_factor, 1.0);
    assert!(skin.timescales.t_blow.is_finite());

    // The whole skin is unbound, so it leaves at the exponential fraction
    let fraction = -(-skin.dt_s * geometry.omega().to_rad_per_sec()).exp_m1();
    let skin_mass = skin.disk.sigma_tau1_kg_m2 * geometry.area_m2();
    assert_relative_eq!(skin.removed.blowout, fraction * skin_mass, max_relative = 1e-9);
    assert_relative_eq!(
        skin.removed.blowout / full.removed.blowout,
        skin.disk.sigma_tau1_kg_m2 / skin.disk.sigma_active_kg_m2,
        max_relative = 1e-9
    );
}

#[test]
fn optical_depth_gate_suppresses_blowout() {
    let mut config = pure_blowout();
    config.radiation.tau_gate.enabled = true;
    config.radiation.tau_gate.tau_max = 1.0;
    let record = first_record(config);
    assert!(record.gate.tau_gated);
    assert_eq!(record.removed.blowout, 0.0);
}
