use approx::assert_relative_eq;

use crate::config::ShieldingConfig;
use crate::physics::{
    LosGeometry, ShieldingInputs, ShieldingOrder, ShieldingStack, resolve_los_factor,
    self_shielding_phi,
};

fn inputs(tau_vert: f64) -> ShieldingInputs {
    ShieldingInputs {
        tau_vert,
        kappa_m2_kg: 2.0,
        sigma_kg_m2: tau_vert / 2.0,
        vapor_fraction: 0.5,
    }
}

#[test]
fn phi_limits() {
    assert_eq!(self_shielding_phi(0.0), 1.0);
    assert_relative_eq!(self_shielding_phi(1.0), 1.0 - (-1.0f64).exp(), epsilon = 1e-15);
    assert_relative_eq!(self_shielding_phi(1e-10), 1.0, epsilon = 1e-9);
    assert_relative_eq!(self_shielding_phi(100.0), 0.01, max_relative = 1e-12);
}

#[test]
fn los_factor_clamps_and_falls_back() {
    assert_eq!(resolve_los_factor(&LosGeometry::None), 1.0);
    let slant = LosGeometry::AspectRatio {
        h_over_r: 0.1,
        path_multiplier: 1.0,
    };
    assert_relative_eq!(resolve_los_factor(&slant), 10.0);
    let short = LosGeometry::AspectRatio {
        h_over_r: 0.1,
        path_multiplier: 0.05,
    };
    assert_eq!(resolve_los_factor(&short), 1.0);
    let invalid = LosGeometry::AspectRatio {
        h_over_r: 0.0,
        path_multiplier: 1.0,
    };
    assert_eq!(resolve_los_factor(&invalid), 1.0);
}

#[test]
fn disabled_stack_passes_full_flux() {
    let stack = ShieldingStack::new(&ShieldingConfig {
        enabled: false,
        ..ShieldingConfig::default()
    });
    let out = stack.apply(&inputs(3.0));
    assert_eq!(out.flux_factor, 1.0);
    assert_eq!(out.skin_flux_factor, 1.0);
    assert!(out.sigma_tau1.is_infinite());
    assert_eq!(out.tau_los, 3.0);
}

#[test]
fn dust_stage_sets_skin_density() {
    let stack = ShieldingStack::new(&ShieldingConfig::default());
    let out = stack.apply(&inputs(1.0));
    let phi = 1.0 - (-1.0f64).exp();
    assert_relative_eq!(out.flux_factor, phi, epsilon = 1e-15);
    assert_eq!(out.skin_flux_factor, 1.0);
    assert_relative_eq!(out.kappa_eff, 2.0);
    // At τ = 1 the skin is the whole column
    assert_relative_eq!(out.sigma_tau1, 0.5, epsilon = 1e-15);
}

#[test]
fn skin_thins_as_the_column_thickens() {
    let stack = ShieldingStack::new(&ShieldingConfig::default());
    for tau in [0.5, 2.0, 10.0, 1e3] {
        let input = inputs(tau);
        let out = stack.apply(&input);
        let share = (out.sigma_tau1 / input.sigma_kg_m2).min(1.0);
        assert_relative_eq!(share, (1.0 / tau).min(1.0), max_relative = 1e-12);
    }

    let slant = ShieldingStack::new(&ShieldingConfig {
        los: LosGeometry::AspectRatio {
            h_over_r: 0.1,
            path_multiplier: 1.0,
        },
        ..ShieldingConfig::default()
    });
    let out = slant.apply(&inputs(1.0));
    assert_relative_eq!(out.tau_los, 10.0);
    assert_relative_eq!(out.sigma_tau1, 0.05, epsilon = 1e-15);
}

#[test]
fn stage_order_changes_the_result() {
    let vapor_first = ShieldingStack::new(&ShieldingConfig {
        kappa_vapor_m2_kg: 4.0,
        order: ShieldingOrder::VaporFirst,
        ..ShieldingConfig::default()
    });
    let dust_first = ShieldingStack::new(&ShieldingConfig {
        kappa_vapor_m2_kg: 4.0,
        order: ShieldingOrder::DustFirst,
        ..ShieldingConfig::default()
    });
    let a = vapor_first.apply(&inputs(1.0));
    let b = dust_first.apply(&inputs(1.0));

    // τ_vap = 4 × 0.5 × 0.5 = 1
    assert_relative_eq!(a.tau_vapor, 1.0);
    assert_relative_eq!(b.tau_vapor, 1.0);
    assert_relative_eq!(a.flux_factor, (-1.0f64).exp() * self_shielding_phi(2.0), epsilon = 1e-15);
    assert_relative_eq!(b.flux_factor, self_shielding_phi(1.0) * (-1.0f64).exp(), epsilon = 1e-15);
    assert!(a.flux_factor < b.flux_factor);
    // Vapor in front of the dust dims the skin; behind it, it does not
    assert_relative_eq!(a.skin_flux_factor, (-1.0f64).exp(), epsilon = 1e-15);
    assert_eq!(b.skin_flux_factor, 1.0);
    assert_eq!(a.sigma_tau1, b.sigma_tau1);
}
