//! Step size planning.
//!
//! Fixed steps come straight from the configuration. Automatic steps take a
//! safety fraction of the fastest process at t = 0, capped by the horizon:
//!
//! ```text
//! Δt = safety × min(t_blow, t_solid, t_coll, t_drag, t_escape, t_end)
//! ```
//!
//! Without a configured step budget the limit is derived from the horizon
//! with a small margin, so hitting it always means something went wrong
//! rather than the run being cut short by rounding.

use units::Time;

use crate::config::{NumericsConfig, StepSize};
use crate::constants::AUTO_MAX_MARGIN;
use crate::timescale::TimescaleSet;

/// Relative slack when deciding whether a step reaches the horizon.
const HORIZON_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub dt: Time,
    pub t_end: Time,
    pub max_steps: u64,
}

pub fn plan_steps(numerics: &NumericsConfig, t_end: Time, timescales: &TimescaleSet) -> StepPlan {
    let horizon = t_end.to_seconds();
    let dt = match numerics.dt {
        StepSize::Fixed { seconds } => seconds.min(horizon),
        StepSize::Auto => {
            let fastest = timescales.fastest().seconds().unwrap_or(f64::INFINITY);
            numerics.safety * fastest.min(horizon)
        }
    };
    let max_steps = numerics
        .max_steps
        .unwrap_or_else(|| ((horizon / dt) * (1.0 + AUTO_MAX_MARGIN)).ceil().max(1.0) as u64);
    StepPlan {
        dt: Time::from_seconds(dt),
        t_end,
        max_steps,
    }
}

/// Length of the step starting at `time`; the last one lands on the horizon.
pub fn next_dt(plan: &StepPlan, time: Time) -> (Time, bool) {
    let remaining = plan.t_end.to_seconds() - time.to_seconds();
    let dt = plan.dt.to_seconds();
    if remaining <= dt * (1.0 + HORIZON_EPSILON) {
        (Time::from_seconds(remaining.max(0.0)), true)
    } else {
        (plan.dt, false)
    }
}
