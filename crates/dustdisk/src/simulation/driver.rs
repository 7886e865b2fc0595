//! Time-step integrator.
//!
//! Each step runs the full pipeline once, in a fixed order:
//!
//! 1. Mars and grain temperatures from the driver
//! 2. Phase and vapor pressure model (using the committed τ_los)
//! 3. Sublimation rates, radiation β and collisional regime
//! 4. Size floor and active distribution
//! 5. Shielding of the radiation field
//! 6. Blow-out timescales, scope and gate
//! 7. Mass update: floor, supply, blow-out, sublimation, grinding, drag, escape
//! 8. Mass budget check
//! 9. Commit and diagnostics
//!
//! Evaluation never touches the committed state. The update works on copies
//! of the state and ledger and only replaces them when the whole step
//! succeeded, so a failed step leaves the last committed state intact.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};
use units::{Density, Length, Mass, Pressure, Temperature, Time};

use super::timestep::{StepPlan, next_dt, plan_steps};
use super::{DiagnosticsSink, DiskState, DiskSummary, MassBudgetLedger, MassFlows, StepDiagnostics};
use crate::blowout::{BlowoutGate, BlowoutScope, FastStepPolicy, aggregate_blowout_timescale};
use crate::config::{RunConfig, TauGateConfig};
use crate::error::{ConfigError, RunError, StepError, TemperatureError};
use crate::geometry::DiskGeometry;
use crate::particles::{ActiveSummary, SizeBins, SizeFloor, SizeFloorModel, SupplySource};
use crate::physics::{
    AuxiliarySinks, BinBlowout, CollisionModel, OpticalDepthRegime, PhaseEvaluator, PhaseState,
    PsatSelector, RadiationModel, ShieldingInputs, ShieldingOutcome, ShieldingStack,
    SublimationModel, SublimationRates,
};
use crate::temperature::{TemperatureDriver, grain_temperature};
use crate::timescale::{Timescale, TimescaleSet};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    TimeHorizon,
    StepLimit,
    MassDepleted,
}

/// Integrator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Step size not yet planned
    Initializing,
    Stepping,
    Terminating(TerminationReason),
    /// A step failed; no further steps run
    Failed { step: u64 },
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub reason: TerminationReason,
    pub steps: u64,
    pub final_time: Time,
    pub final_mass: Mass,
    pub ledger: MassBudgetLedger,
    pub max_error_percent: f64,
}

/// Models built once from the configuration.
#[derive(Debug)]
struct Models {
    geometry: DiskGeometry,
    driver: Box<dyn TemperatureDriver>,
    q_abs: f64,
    psat: PsatSelector,
    sublimation: SublimationModel,
    radiation: RadiationModel,
    collisions: CollisionModel,
    floor: SizeFloorModel,
    shielding: ShieldingStack,
    scope: BlowoutScope,
    gate: BlowoutGate,
    tau_gate: TauGateConfig,
    aux: AuxiliarySinks,
    supply: SupplySource,
}

/// Everything derived from the committed state before any mass moves.
#[derive(Debug, Clone)]
struct Evaluation {
    t_mars: Temperature,
    t_grain: Temperature,
    phase: PhaseState,
    sublimation: SublimationRates,
    betas: Vec<f64>,
    collision_regime: OpticalDepthRegime,
    floor: SizeFloor,
    active: ActiveSummary,
    sigma_active: f64,
    tau_vert: f64,
    shielding: ShieldingOutcome,
    t_blow_bins: Vec<Timescale>,
    eligible_mass: Vec<f64>,
    tau_gated: bool,
    timescales: TimescaleSet,
}

pub struct Integrator<S: DiagnosticsSink> {
    config: RunConfig,
    models: Models,
    state: DiskState,
    ledger: MassBudgetLedger,
    rng: ChaCha8Rng,
    sink: S,
    t_end: Time,
    plan: Option<StepPlan>,
    lifecycle: Lifecycle,
    steps: u64,
}

impl<S: DiagnosticsSink> Integrator<S> {
    /// Validates the configuration and builds the initial state.
    ///
    /// The sink is finished if the configuration is rejected.
    pub fn new(config: RunConfig, mut sink: S) -> Result<Self, RunError> {
        match Self::initialize(&config) {
            Ok((models, state, ledger, t_end)) => {
                let rng = ChaCha8Rng::seed_from_u64(config.seed.0);
                Ok(Self {
                    config,
                    models,
                    state,
                    ledger,
                    rng,
                    sink,
                    t_end,
                    plan: None,
                    lifecycle: Lifecycle::Initializing,
                    steps: 0,
                })
            }
            Err(err) => {
                if let Err(sink_err) = sink.finish() {
                    warn!(error = %sink_err, "failed to finish diagnostics sink");
                }
                Err(err.into())
            }
        }
    }

    fn initialize(config: &RunConfig) -> Result<(Models, DiskState, MassBudgetLedger, Time), ConfigError> {
        config.validate()?;

        let geometry = DiskGeometry::new(config.geometry.radius(), config.geometry.width());
        let t_end = config.numerics.horizon(geometry.omega())?;
        let rho = config.material.density_kg_m3;

        let driver = config.temperature.driver.build()?;
        let models = Models {
            geometry,
            driver,
            q_abs: config.temperature.q_abs_mean,
            psat: PsatSelector::from_config(&config.sublimation)?,
            sublimation: SublimationModel::new(&config.sublimation, rho),
            radiation: RadiationModel::new(&config.radiation, rho),
            collisions: CollisionModel::new(&config.collisions),
            floor: SizeFloorModel::new(
                Length::from_m(config.sizes.s_min_m),
                config.size_floor.surface_energy.clone(),
                rho,
                geometry.keplerian_velocity(),
            ),
            shielding: ShieldingStack::new(&config.shielding),
            scope: BlowoutScope::from_config(&config.blowout),
            gate: BlowoutGate::new(
                config.blowout.gate_mode,
                FastStepPolicy::from_config(&config.blowout.fast_blowout),
            ),
            tau_gate: config.radiation.tau_gate.clone(),
            aux: AuxiliarySinks::new(
                config.sinks.gas_drag.clone(),
                config.sinks.hydro_escape.clone(),
                rho,
            ),
            supply: SupplySource::new(
                config.supply.mode.clone(),
                config.supply.epsilon_mix,
                config.supply.jitter_sigma,
                config.supply.q_inj,
            ),
        };

        let initial_mass = Mass::from_mars_masses(config.initial.mass_total_mars_masses);
        let lower = Length::from_m(config.initial.s_min_m.unwrap_or(config.sizes.s_min_m));
        let bins = SizeBins::log_spaced(
            Length::from_m(config.sizes.s_min_m),
            Length::from_m(config.sizes.s_max_m),
            config.sizes.n_bins,
            Density::from_kg_per_m3(rho),
        )?
        .with_power_law(initial_mass, config.initial.q, lower)?;

        let ledger = MassBudgetLedger::new(bins.total_mass(), config.budget.tolerance_percent)?;

        let floor = models.floor.resolve(&bins);
        let active = bins.active_summary(floor.size.to_m());
        let sigma_active = active.mass_kg / geometry.area_m2();
        let tau_vert = active.kappa_m2_kg * sigma_active;
        let shielding = models.shielding.apply(&ShieldingInputs {
            tau_vert,
            kappa_m2_kg: active.kappa_m2_kg,
            sigma_kg_m2: sigma_active,
            vapor_fraction: 0.0,
        });
        let t0 = config.temperature.driver.initial_temperature_k().unwrap_or(0.0);
        let t_mars = Temperature::from_kelvin(t0);

        let state = DiskState {
            time: Time::zero(),
            bins,
            t_mars,
            t_grain: grain_temperature(t_mars, geometry.radius, models.q_abs),
            tau_vert,
            tau_los: shielding.tau_los,
            floor: floor.size,
            psat_model: None,
            phase: None,
            totals: MassFlows::default(),
        };
        Ok((models, state, ledger, t_end))
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn state(&self) -> &DiskState {
        &self.state
    }

    pub fn ledger(&self) -> &MassBudgetLedger {
        &self.ledger
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Planned step, `None` before the first step.
    pub fn plan(&self) -> Option<&StepPlan> {
        self.plan.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs one step and returns the lifecycle afterwards.
    ///
    /// Once terminated, further calls return the same termination. After a
    /// failure they return [`RunError::Halted`].
    pub fn step_once(&mut self) -> Result<Lifecycle, RunError> {
        match self.lifecycle {
            Lifecycle::Terminating(_) => return Ok(self.lifecycle),
            Lifecycle::Failed { step } => return Err(RunError::Halted { step }),
            Lifecycle::Initializing | Lifecycle::Stepping => {}
        }
        let step = self.steps;
        match self.try_step() {
            Ok(lifecycle) => {
                self.lifecycle = lifecycle;
                Ok(lifecycle)
            }
            Err(source) => {
                warn!(step, error = %source, "step failed");
                self.lifecycle = Lifecycle::Failed { step };
                if let Err(sink_err) = self.sink.finish() {
                    warn!(error = %sink_err, "failed to finish diagnostics sink");
                }
                Err(RunError::Step { step, source })
            }
        }
    }

    fn try_step(&mut self) -> Result<Lifecycle, StepError> {
        let evaluation = evaluate(&self.models, &self.config, &self.state)?;

        let plan = match self.plan {
            Some(plan) => plan,
            None => {
                let plan = plan_steps(&self.config.numerics, self.t_end, &evaluation.timescales);
                info!(
                    dt_s = plan.dt.to_seconds(),
                    t_end_s = plan.t_end.to_seconds(),
                    max_steps = plan.max_steps,
                    "planned time steps"
                );
                self.plan = Some(plan);
                plan
            }
        };
        let (dt, lands_on_horizon) = next_dt(&plan, self.state.time);

        let (state, ledger, record) = advance(
            &self.models,
            self.state.clone(),
            self.ledger.clone(),
            evaluation,
            self.steps,
            dt,
            lands_on_horizon.then_some(plan.t_end),
            &mut self.rng,
        )?;

        log_transitions(&self.state, &state);
        self.state = state;
        self.ledger = ledger;
        self.steps += 1;
        self.sink.emit(record)?;

        let mass = self.state.total_mass().to_kg();
        let reason = if mass < self.config.numerics.mass_floor_fraction * self.ledger.initial().to_kg() {
            Some(TerminationReason::MassDepleted)
        } else if lands_on_horizon || self.state.time.to_seconds() >= plan.t_end.to_seconds() {
            Some(TerminationReason::TimeHorizon)
        } else if self.steps >= plan.max_steps {
            Some(TerminationReason::StepLimit)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                self.ledger.check()?;
                self.sink.finish()?;
                info!(
                    reason = ?reason,
                    steps = self.steps,
                    time_years = self.state.time.to_years(),
                    mass_kg = mass,
                    max_error_percent = self.ledger.max_error_percent(),
                    "run terminated"
                );
                Ok(Lifecycle::Terminating(reason))
            }
            None => Ok(Lifecycle::Stepping),
        }
    }

    /// Steps until the run terminates.
    pub fn run(&mut self) -> Result<RunSummary, RunError> {
        let span = info_span!("run", seed = self.config.seed.0);
        let _guard = span.enter();
        info!(
            radius_m = self.models.geometry.radius.to_m(),
            initial_mass_kg = self.ledger.initial().to_kg(),
            bins = self.state.bins.len(),
            t_end_years = self.t_end.to_years(),
            "starting run"
        );
        if self.config.radiation.use_solar_rp {
            warn!("solar radiation pressure is not modelled; use_solar_rp ignored");
        }

        loop {
            if let Lifecycle::Terminating(reason) = self.step_once()? {
                return Ok(self.summary(reason));
            }
        }
    }

    fn summary(&self, reason: TerminationReason) -> RunSummary {
        RunSummary {
            reason,
            steps: self.steps,
            final_time: self.state.time,
            final_mass: self.state.total_mass(),
            ledger: self.ledger.clone(),
            max_error_percent: self.ledger.max_error_percent(),
        }
    }
}

fn log_transitions(previous: &DiskState, next: &DiskState) {
    if previous.psat_model != next.psat_model {
        if let Some(model) = next.psat_model {
            info!(
                model = %model,
                t_grain_k = next.t_grain.to_kelvin(),
                "vapor pressure model selected"
            );
        }
    }
    if previous.phase != next.phase {
        info!(
            phase = ?next.phase,
            t_grain_k = next.t_grain.to_kelvin(),
            time_years = next.time.to_years(),
            "phase changed"
        );
    }
}

/// Evaluates every model against the committed state.
fn evaluate(models: &Models, config: &RunConfig, state: &DiskState) -> Result<Evaluation, StepError> {
    let geometry = &models.geometry;
    let omega = geometry.omega();
    let bins = &state.bins;

    let t_mars = models.driver.temperature_at(state.time)?;
    if !(t_mars.is_finite() && t_mars.to_kelvin() > 0.0) {
        return Err(TemperatureError::NonFinite {
            time_s: state.time.to_seconds(),
        }
        .into());
    }
    let t_grain = grain_temperature(t_mars, geometry.radius, models.q_abs);

    let evaluator = PhaseEvaluator::new(
        &config.phase,
        &models.psat,
        Pressure::from_pa(config.sublimation.p_gas_pa),
    );
    let (phase, psat) = evaluator.evaluate(t_grain, models.driver.source(), state.tau_los)?;

    let sublimation = models.sublimation.evaluate(&psat, t_grain, state.floor);
    let betas = models.radiation.bin_betas(bins.centres(), t_mars);

    let committed = bins.active_summary(state.floor.to_m());
    let tau_committed = committed.kappa_m2_kg * committed.mass_kg / geometry.area_m2();
    let (collision_regime, t_coll) = models.collisions.evaluate(tau_committed, omega);

    let floor = models.floor.resolve(bins);
    let floor_m = floor.size.to_m();
    let active = bins.active_summary(floor_m);
    let sigma_active = active.mass_kg / geometry.area_m2();
    let tau_vert = active.kappa_m2_kg * sigma_active;

    let shielding = models.shielding.apply(&ShieldingInputs {
        tau_vert,
        kappa_m2_kg: active.kappa_m2_kg,
        sigma_kg_m2: sigma_active,
        vapor_fraction: phase.vapor_fraction,
    });

    let per_bin: Vec<BinBlowout> = models
        .radiation
        .bin_blowout(&betas, shielding.skin_flux_factor, omega);
    let tau_gated = models.tau_gate.enabled && shielding.tau_los > models.tau_gate.tau_max;
    let eligible_fraction = if tau_gated {
        0.0
    } else {
        models
            .scope
            .eligible_fraction(phase.tag, shielding.sigma_tau1, sigma_active)
    };
    let eligible_mass: Vec<f64> = (0..bins.len())
        .map(|bin| bins.masses()[bin] * bins.active_weight(bin, floor_m) * eligible_fraction)
        .collect();
    let t_blow_bins: Vec<Timescale> = per_bin.iter().map(|b| b.t_blow).collect();

    let timescales = TimescaleSet {
        t_blow: aggregate_blowout_timescale(&t_blow_bins, &eligible_mass),
        t_solid: sublimation.t_solid,
        t_coll,
        t_drag: models.aux.drag_at_floor(floor_m),
        t_escape: models.aux.escape(phase.tag, t_grain, phase.vapor_fraction),
    };
    debug!(
        t_grain_k = t_grain.to_kelvin(),
        tau_los = shielding.tau_los,
        flux_factor = shielding.flux_factor,
        sigma_tau1_kg_m2 = shielding.sigma_tau1,
        eligible_fraction,
        "evaluated step"
    );

    Ok(Evaluation {
        t_mars,
        t_grain,
        phase,
        sublimation,
        betas,
        collision_regime,
        floor,
        active,
        sigma_active,
        tau_vert,
        shielding,
        t_blow_bins,
        eligible_mass,
        tau_gated,
        timescales,
    })
}

/// Applies one evaluated step to owned copies of the state and ledger.
#[allow(clippy::too_many_arguments)]
fn advance(
    models: &Models,
    mut state: DiskState,
    mut ledger: MassBudgetLedger,
    evaluation: Evaluation,
    step: u64,
    dt: Time,
    horizon: Option<Time>,
    rng: &mut ChaCha8Rng,
) -> Result<(DiskState, MassBudgetLedger, StepDiagnostics), StepError> {
    let dt_s = dt.to_seconds();
    let floor_m = evaluation.floor.size.to_m();
    let plan = models.gate.plan(
        dt_s,
        &evaluation.t_blow_bins,
        &evaluation.eligible_mass,
        &evaluation.timescales,
        evaluation.tau_gated,
    );

    let bins = &mut state.bins;
    let mut flows = MassFlows {
        floor: bins.retire_below(floor_m),
        ..MassFlows::default()
    };

    let delivered = models.supply.sample_mass(state.time, dt, rng);
    flows.supply = models.supply.inject(bins, delivered, floor_m);

    flows.blowout = plan
        .removal
        .iter()
        .enumerate()
        .map(|(bin, &kg)| bins.remove_mass(bin, kg))
        .sum();
    flows.sublimation = models
        .sublimation
        .apply(bins, &evaluation.sublimation, dt, floor_m);
    flows.collisions = models
        .collisions
        .grind(bins, evaluation.timescales.t_coll, dt, floor_m)
        .lost;
    flows.gas_drag = models.aux.apply_drag(bins, dt, floor_m);
    flows.hydro_escape = models
        .aux
        .apply_escape(bins, evaluation.timescales.t_escape, dt, floor_m);

    ledger.record(&flows, state.bins.total_mass());
    let ledger_error_percent = ledger.check()?;

    state.time = horizon.unwrap_or(state.time + dt);
    state.t_mars = evaluation.t_mars;
    state.t_grain = evaluation.t_grain;
    state.tau_vert = evaluation.tau_vert;
    state.tau_los = evaluation.shielding.tau_los;
    state.floor = evaluation.floor.size;
    state.psat_model = Some(evaluation.phase.psat_model);
    state.phase = Some(evaluation.phase.tag);
    state.totals += flows;

    let mass_kg = state.total_mass().to_kg();
    let area = models.geometry.area_m2();
    let s_blow = models.radiation.blowout_size(evaluation.t_mars);
    let beta_at_floor = models.radiation.beta_at(evaluation.floor.size, evaluation.t_mars);

    let record = StepDiagnostics {
        step,
        time_s: state.time.to_seconds(),
        dt_s,
        phase: evaluation.phase,
        timescales: evaluation.timescales,
        collision_regime: evaluation.collision_regime,
        gate: plan.decision,
        ledger_error_percent,
        disk: DiskSummary {
            mass_kg,
            sigma_kg_m2: mass_kg / area,
            sigma_active_kg_m2: evaluation.sigma_active,
            tau_vert: state.tau_vert,
            tau_los: state.tau_los,
            flux_factor: evaluation.shielding.flux_factor,
            skin_flux_factor: evaluation.shielding.skin_flux_factor,
            sigma_tau1_kg_m2: evaluation.shielding.sigma_tau1,
            s_floor_m: floor_m,
            floor_source: evaluation.floor.source,
            s_blow_m: s_blow.to_m(),
            beta_at_floor,
            t_mars_k: evaluation.t_mars.to_kelvin(),
            t_grain_k: evaluation.t_grain.to_kelvin(),
        },
        removed: flows,
    };
    debug!(
        step,
        mass_kg,
        blowout_kg = flows.blowout,
        kappa_m2_kg = evaluation.active.kappa_m2_kg,
        max_beta = evaluation.betas.iter().copied().fold(0.0, f64::max),
        "committed step"
    );
    Ok((state, ledger, record))
}
