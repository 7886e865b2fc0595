//! Gate between blow-out and competing removal processes.

use serde::{Deserialize, Serialize};

use super::{FastStepPolicy, FastStepRegime};
use crate::timescale::{Timescale, TimescaleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    #[default]
    None,
    SublimationCompetition,
    CollisionCompetition,
}

/// Timescale competing with blow-out under `mode`.
pub fn competing_timescale(mode: GateMode, timescales: &TimescaleSet) -> Timescale {
    match mode {
        GateMode::None => Timescale::Infinite,
        GateMode::SublimationCompetition => timescales.t_solid,
        GateMode::CollisionCompetition => timescales.t_coll,
    }
}

/// f_gate = t_c / (t_c + t_blow), exactly 1 when either side is inactive.
pub fn gate_factor(t_blow: Timescale, t_competing: Timescale) -> f64 {
    match (t_blow, t_competing) {
        (Timescale::Finite(tb), Timescale::Finite(tc)) => (tc / (tc + tb)).clamp(0.0, 1.0),
        _ => 1.0,
    }
}

/// Eligible-mass-weighted harmonic mean of the finite per-bin timescales.
pub fn aggregate_blowout_timescale(per_bin: &[Timescale], eligible_mass: &[f64]) -> Timescale {
    let mut mass = 0.0;
    let mut rate = 0.0;
    for (t, &m) in per_bin.iter().zip(eligible_mass) {
        if let Timescale::Finite(s) = t {
            if m > 0.0 {
                mass += m;
                rate += m / s;
            }
        }
    }
    if mass > 0.0 {
        Timescale::from_seconds(mass / rate)
    } else {
        Timescale::Infinite
    }
}

/// Outcome of the gate for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateDecision {
    pub gate_mode: GateMode,
    pub f_gate: f64,
    /// Blow-out fraction from the aggregate t_blow before gating
    pub nominal_fraction: f64,
    /// f_gate × nominal fraction
    pub f_loss: f64,
    /// Regime of the aggregate ratio, `None` when nothing is unbound
    pub fast_step: Option<FastStepRegime>,
    /// Any bin used the exponential fraction
    pub correction_engaged: bool,
    /// Blow-out suppressed by the optical-depth gate
    pub tau_gated: bool,
}

/// Per-bin blow-out removal for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct BlowoutPlan {
    pub decision: GateDecision,
    /// Mass to remove from each bin (kg)
    pub removal: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlowoutGate {
    mode: GateMode,
    fast_step: FastStepPolicy,
}

impl BlowoutGate {
    pub fn new(mode: GateMode, fast_step: FastStepPolicy) -> Self {
        Self { mode, fast_step }
    }

    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// Combines the per-bin blow-out timescales with the competing
    /// processes.
    ///
    /// `eligible_mass` is the mass of each bin exposed to blow-out and
    /// `timescales.t_blow` must already hold the aggregate of the same bins.
    pub fn plan(
        &self,
        dt: f64,
        per_bin: &[Timescale],
        eligible_mass: &[f64],
        timescales: &TimescaleSet,
        tau_gated: bool,
    ) -> BlowoutPlan {
        let f_gate = gate_factor(timescales.t_blow, competing_timescale(self.mode, timescales));
        let aggregate = self.fast_step.regime(dt, timescales.t_blow);
        let nominal_fraction = aggregate.map_or(0.0, |r| r.fraction());

        let mut correction_engaged = false;
        let removal = per_bin
            .iter()
            .zip(eligible_mass)
            .map(|(&t_blow, &mass)| match self.fast_step.regime(dt, t_blow) {
                Some(regime) if mass > 0.0 => {
                    correction_engaged |= regime.is_engaged();
                    f_gate * regime.fraction() * mass
                }
                _ => 0.0,
            })
            .collect();

        BlowoutPlan {
            decision: GateDecision {
                gate_mode: self.mode,
                f_gate,
                nominal_fraction,
                f_loss: f_gate * nominal_fraction,
                fast_step: aggregate,
                correction_engaged,
                tau_gated,
            },
            removal,
        }
    }
}
