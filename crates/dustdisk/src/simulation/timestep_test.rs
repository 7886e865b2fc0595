use approx::assert_relative_eq;
use units::Time;

use crate::config::{NumericsConfig, StepSize};
use crate::simulation::{next_dt, plan_steps};
use crate::timescale::{Timescale, TimescaleSet};

#[test]
fn fixed_step_derives_budget_with_margin() {
    let numerics = NumericsConfig {
        dt: StepSize::Fixed { seconds: 100.0 },
        ..NumericsConfig::default()
    };
    let plan = plan_steps(&numerics, Time::from_seconds(1000.0), &TimescaleSet::inactive());
    assert_relative_eq!(plan.dt.to_seconds(), 100.0);
    assert_eq!(plan.max_steps, 11);
}

#[test]
fn configured_budget_wins() {
    let numerics = NumericsConfig {
        dt: StepSize::Fixed { seconds: 100.0 },
        max_steps: Some(3),
        ..NumericsConfig::default()
    };
    let plan = plan_steps(&numerics, Time::from_seconds(1000.0), &TimescaleSet::inactive());
    assert_eq!(plan.max_steps, 3);
}

#[test]
fn auto_step_follows_fastest_process() {
    let numerics = NumericsConfig {
        dt: StepSize::Auto,
        safety: 0.1,
        ..NumericsConfig::default()
    };
    let timescales = TimescaleSet {
        t_blow: Timescale::Finite(500.0),
        t_coll: Timescale::Finite(50.0),
        ..TimescaleSet::inactive()
    };
    let plan = plan_steps(&numerics, Time::from_seconds(1e4), &timescales);
    assert_relative_eq!(plan.dt.to_seconds(), 5.0);
    assert_eq!(plan.max_steps, 2100);

    let idle = plan_steps(&numerics, Time::from_seconds(1e4), &TimescaleSet::inactive());
    assert_relative_eq!(idle.dt.to_seconds(), 1e3);
}

#[test]
fn last_step_lands_on_horizon() {
    let numerics = NumericsConfig {
        dt: StepSize::Fixed { seconds: 300.0 },
        ..NumericsConfig::default()
    };
    let plan = plan_steps(&numerics, Time::from_seconds(1000.0), &TimescaleSet::inactive());

    let (dt, last) = next_dt(&plan, Time::from_seconds(600.0));
    assert!(!last);
    assert_relative_eq!(dt.to_seconds(), 300.0);

    let (dt, last) = next_dt(&plan, Time::from_seconds(900.0));
    assert!(last);
    assert_relative_eq!(dt.to_seconds(), 100.0);
}
