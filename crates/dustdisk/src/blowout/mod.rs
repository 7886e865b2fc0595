//! Radiation-pressure blow-out and its coupling to competing processes.
//!
//! Blow-out removes unbound grains on roughly an orbital timescale. Two
//! corrections shape how much of that loss is applied in a discrete step:
//!
//! - **Gate**: when sublimation or collisions act on a comparable timescale,
//!   only the share f_gate = t_c / (t_c + t_blow) is attributed to blow-out,
//!   so the same mass is not removed twice.
//! - **Fast step**: when Δt is no longer small against t_blow, the linear
//!   fraction Δt/t_blow overshoots. Above a threshold ratio the exact
//!   exponential fraction 1 - exp(-Δt/t_blow) is used instead.
//!
//! A [`BlowoutScope`] decides which mass is exposed at all, from the target
//! phase and the surface layer.

mod fast_step;
mod gate;
mod scope;

#[cfg(test)]
mod fast_step_test;

pub use fast_step::{
    FastStepPolicy, FastStepRegime, classify_fast_step, fast_blowout_correction_factor,
};
pub use gate::{
    BlowoutGate, BlowoutPlan, GateDecision, GateMode, aggregate_blowout_timescale,
    competing_timescale, gate_factor,
};
pub use scope::{BlowoutLayer, BlowoutScope, TargetPhase};
