//! Self-shielding of the radiation field.
//!
//! Two attenuation stages act on the flux reaching the grains:
//!
//! - **Vapor**: silicate vapor with opacity κ_vap absorbs exp(-τ_vap) of the
//!   flux and adds τ_vap to the column seen by later stages.
//! - **Dust**: the dust column reduces the column-mean flux by
//!   Φ(τ) = (1 - e^{-τ}) / τ. Along the line of sight the dust has opacity
//!   κ_eff = f_los κ, so the τ ≤ 1 skin holds Σ_τ=1 = 1/κ_eff, which is
//!   below Σ exactly when τ_los > 1.
//!
//! The stages do not commute. The configured order decides which optical
//! depth the dust stage sees, and whether the vapor sits in front of the
//! skin. Grains in the skin see the flux left by the stages in front of the
//! dust, not the column mean.
//!
//! The line-of-sight factor converts the vertical optical depth into the
//! slant path through the disk, τ_los = f_los τ_vert.

use serde::{Deserialize, Serialize};

use crate::config::ShieldingConfig;

/// Order of the two attenuation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShieldingOrder {
    #[default]
    VaporFirst,
    DustFirst,
}

/// Disk geometry used for the line-of-sight factor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LosGeometry {
    /// Vertical path only
    #[default]
    None,
    /// Slant path through a disk of aspect ratio h/r
    AspectRatio { h_over_r: f64, path_multiplier: f64 },
}

/// f_los ≥ 1, falling back to 1 on invalid geometry.
pub fn resolve_los_factor(geometry: &LosGeometry) -> f64 {
    match *geometry {
        LosGeometry::None => 1.0,
        LosGeometry::AspectRatio {
            h_over_r,
            path_multiplier,
        } => {
            if !(h_over_r > 0.0 && h_over_r.is_finite() && path_multiplier > 0.0 && path_multiplier.is_finite()) {
                return 1.0;
            }
            (path_multiplier / h_over_r).max(1.0)
        }
    }
}

/// Mean flux fraction Φ(τ) = (1 - e^{-τ}) / τ through a slab.
pub fn self_shielding_phi(tau: f64) -> f64 {
    if !(tau > 0.0) {
        return 1.0;
    }
    if !tau.is_finite() {
        return 0.0;
    }
    (-(-tau).exp_m1() / tau).clamp(0.0, 1.0)
}

/// Inputs to the stack for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShieldingInputs {
    pub tau_vert: f64,
    pub kappa_m2_kg: f64,
    pub sigma_kg_m2: f64,
    pub vapor_fraction: f64,
}

/// Result of applying every stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldingOutcome {
    pub f_los: f64,
    pub tau_los: f64,
    pub tau_vapor: f64,
    /// Column-mean surviving flux fraction
    pub flux_factor: f64,
    /// Flux reaching the top of the dust skin; scales β
    pub skin_flux_factor: f64,
    /// Line-of-sight dust opacity per unit vertical Σ
    pub kappa_eff: f64,
    /// Σ of the τ ≤ 1 skin, infinite when unshielded
    pub sigma_tau1: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Vapor,
    Dust,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShieldingStack {
    stages: Vec<Stage>,
    kappa_vapor: f64,
    los: LosGeometry,
}

impl ShieldingStack {
    pub fn new(config: &ShieldingConfig) -> Self {
        let stages = match (config.enabled, config.order) {
            (false, _) => Vec::new(),
            (true, ShieldingOrder::VaporFirst) => vec![Stage::Vapor, Stage::Dust],
            (true, ShieldingOrder::DustFirst) => vec![Stage::Dust, Stage::Vapor],
        };
        Self {
            stages,
            kappa_vapor: config.kappa_vapor_m2_kg,
            los: config.los,
        }
    }

    pub fn apply(&self, inputs: &ShieldingInputs) -> ShieldingOutcome {
        let f_los = resolve_los_factor(&self.los);
        let tau_los = f_los * inputs.tau_vert;
        let mut outcome = ShieldingOutcome {
            f_los,
            tau_los,
            tau_vapor: 0.0,
            flux_factor: 1.0,
            skin_flux_factor: 1.0,
            kappa_eff: inputs.kappa_m2_kg,
            sigma_tau1: f64::INFINITY,
        };
        let mut tau_seen = tau_los;
        let mut dust_passed = false;

        for stage in &self.stages {
            match stage {
                Stage::Vapor => {
                    let tau_vap =
                        (self.kappa_vapor * inputs.vapor_fraction * inputs.sigma_kg_m2).max(0.0);
                    outcome.tau_vapor = tau_vap;
                    outcome.flux_factor *= (-tau_vap).exp();
                    if !dust_passed {
                        outcome.skin_flux_factor *= (-tau_vap).exp();
                    }
                    tau_seen += tau_vap;
                }
                Stage::Dust => {
                    outcome.flux_factor *= self_shielding_phi(tau_seen);
                    outcome.kappa_eff = f_los * inputs.kappa_m2_kg;
                    dust_passed = true;
                    outcome.sigma_tau1 = if outcome.kappa_eff > 0.0 {
                        1.0 / outcome.kappa_eff
                    } else {
                        f64::INFINITY
                    };
                }
            }
        }
        outcome
    }
}
