//! Property tests for the blow-out gate.

use proptest::prelude::*;

use dustdisk::blowout::{
    BlowoutGate, FastStepPolicy, GateMode, fast_blowout_correction_factor, gate_factor,
};
use dustdisk::{Timescale, TimescaleSet};

fn timescale() -> impl Strategy<Value = Timescale> {
    prop_oneof![
        3 => (1e-3f64..1e9).prop_map(Timescale::Finite),
        1 => Just(Timescale::Infinite),
    ]
}

proptest! {
    #[test]
    fn inactive_competitor_reduces_to_ungated(
        per_bin in prop::collection::vec(timescale(), 1..12),
        masses in prop::collection::vec(0.0f64..1e15, 12),
        dt in 1e-3f64..1e7,
        t_blow in 1e-3f64..1e9,
        threshold in 0.0f64..0.9,
    ) {
        let policy = FastStepPolicy::new(true, threshold);
        let masses = &masses[..per_bin.len()];
        let timescales = TimescaleSet {
            t_blow: Timescale::Finite(t_blow),
            ..TimescaleSet::inactive()
        };

        let ungated = BlowoutGate::new(GateMode::None, policy)
            .plan(dt, &per_bin, masses, &timescales, false);
        for mode in [GateMode::SublimationCompetition, GateMode::CollisionCompetition] {
            let gated = BlowoutGate::new(mode, policy).plan(dt, &per_bin, masses, &timescales, false);
            prop_assert_eq!(gated.decision.f_gate.to_bits(), 1.0f64.to_bits());
            prop_assert_eq!(gated.decision.f_loss.to_bits(), ungated.decision.f_loss.to_bits());
            prop_assert_eq!(&gated.removal, &ungated.removal);
        }
    }

    #[test]
    fn gate_factor_is_bounded_and_monotone(
        t_blow in 1e-6f64..1e12,
        t_c in 1e-6f64..1e12,
        scale in 1.0f64..1e3,
    ) {
        let f = gate_factor(Timescale::Finite(t_blow), Timescale::Finite(t_c));
        prop_assert!((0.0..=1.0).contains(&f));
        let slower = gate_factor(Timescale::Finite(t_blow), Timescale::Finite(t_c * scale));
        prop_assert!(slower >= f);
    }

    #[test]
    fn removal_never_exceeds_eligible_mass(
        per_bin in prop::collection::vec(timescale(), 1..12),
        masses in prop::collection::vec(0.0f64..1e15, 12),
        dt in 1e-3f64..1e9,
        t_c in 1e-3f64..1e9,
        enabled in any::<bool>(),
    ) {
        let masses = &masses[..per_bin.len()];
        let timescales = TimescaleSet {
            t_blow: Timescale::Finite(1.0),
            t_coll: Timescale::Finite(t_c),
            ..TimescaleSet::inactive()
        };
        let plan = BlowoutGate::new(GateMode::CollisionCompetition, FastStepPolicy::new(enabled, 0.1))
            .plan(dt, &per_bin, masses, &timescales, false);
        for (removed, mass) in plan.removal.iter().zip(masses) {
            prop_assert!(*removed >= 0.0 && *removed <= *mass);
        }
        prop_assert!(plan.decision.f_loss <= 1.0);
    }

    #[test]
    fn fast_fraction_below_one_for_finite_ratio(ratio in 1e-9f64..30.0) {
        prop_assert!(fast_blowout_correction_factor(ratio) < 1.0);
    }
}
