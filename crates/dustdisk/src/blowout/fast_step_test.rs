use approx::assert_relative_eq;
use proptest::prelude::*;

use crate::blowout::{
    FastStepPolicy, FastStepRegime, classify_fast_step, fast_blowout_correction_factor,
};
use crate::config::FastBlowoutConfig;
use crate::timescale::Timescale;

#[test]
fn small_ratios_stay_linear() {
    let regime = classify_fast_step(1e-4, 0.1);
    assert_eq!(
        regime,
        FastStepRegime::Linear {
            ratio: 1e-4,
            threshold: 0.1
        }
    );
    assert_eq!(regime.fraction(), 1e-4);
}

#[test]
fn threshold_ratio_is_linear() {
    assert!(!classify_fast_step(0.1, 0.1).is_engaged());
    assert!(classify_fast_step(0.100_001, 0.1).is_engaged());
}

#[test]
fn exponential_fraction_matches_expm1() {
    assert_relative_eq!(fast_blowout_correction_factor(1.0), 1.0 - (-1.0f64).exp(), epsilon = 1e-15);
    assert_relative_eq!(fast_blowout_correction_factor(1e-8), 1e-8, max_relative = 1e-7);
    assert_eq!(fast_blowout_correction_factor(0.0), 0.0);
}

#[test]
fn strict_mode_only_lowers_the_threshold() {
    let standard = FastStepPolicy::from_config(&FastBlowoutConfig::default());
    let strict = FastStepPolicy::from_config(&FastBlowoutConfig {
        strict: true,
        ..FastBlowoutConfig::default()
    });
    let t_blow = Timescale::Finite(100.0);

    let a = standard.regime(5.0, t_blow).unwrap();
    let b = strict.regime(5.0, t_blow).unwrap();
    assert!(!a.is_engaged());
    assert!(b.is_engaged());
    assert_relative_eq!(b.fraction(), fast_blowout_correction_factor(0.05));
    assert_eq!(strict.threshold(), 0.01);
}

#[test]
fn strict_threshold_above_standard_engages_later() {
    let config = FastBlowoutConfig {
        threshold: 3.0,
        strict_threshold: 10.0,
        ..FastBlowoutConfig::default()
    };
    let standard = FastStepPolicy::from_config(&config);
    let strict = FastStepPolicy::from_config(&FastBlowoutConfig {
        strict: true,
        ..config
    });
    let t_blow = Timescale::Finite(1.0);

    assert!(standard.regime(5.0, t_blow).unwrap().is_engaged());
    let late = strict.regime(5.0, t_blow).unwrap();
    assert!(!late.is_engaged());
    assert_eq!(late.fraction(), 1.0);
    assert!(strict.regime(12.0, t_blow).unwrap().is_engaged());
}

#[test]
fn disabled_correction_caps_linear_fraction() {
    let policy = FastStepPolicy::new(false, 0.1);
    let regime = policy.regime(500.0, Timescale::Finite(100.0)).unwrap();
    assert!(!regime.is_engaged());
    assert_eq!(regime.fraction(), 1.0);
}

#[test]
fn inactive_blowout_has_no_regime() {
    let policy = FastStepPolicy::new(true, 0.1);
    assert_eq!(policy.regime(10.0, Timescale::Infinite), None);
    assert_eq!(policy.fraction(10.0, Timescale::Infinite), 0.0);
}

proptest! {
    #[test]
    fn exponential_fraction_stays_below_one(ratio in 0.1f64..30.0) {
        let f = fast_blowout_correction_factor(ratio);
        prop_assert!(f < 1.0);
        prop_assert!(f > 0.0);
        prop_assert!(f <= ratio);
    }

    #[test]
    fn linear_limit_for_small_ratios(ratio in 1e-12f64..1e-4) {
        let exact = fast_blowout_correction_factor(ratio);
        prop_assert!((exact - ratio).abs() <= ratio * ratio);
    }
}
