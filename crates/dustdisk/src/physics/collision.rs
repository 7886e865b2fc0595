//! Collisional cascade.
//!
//! # Physics
//!
//! In the optically thin skin (τ ≤ 1) a grain meets the disk twice per orbit
//! with probability τ, so t_coll = 1/(2Ωτ) (Wyatt 2008). In the thick regime
//! the collision rate saturates at t_coll = 1/(Ωτ). The switch is a hard
//! threshold on the vertical optical depth and τ = 1 belongs to the skin.
//!
//! Destroyed mass is redistributed over smaller sizes following a fragment
//! power law dn/ds ∝ s^(-q). The share of fragments below the size floor
//! leaves the resolved distribution.
//!
//! # References
//! - Wyatt (2008) - "Evolution of debris disks"
//! - Dohnanyi (1969) - "Collisional model of asteroids and their debris"

use serde::{Deserialize, Serialize};
use units::{AngularVelocity, SurfaceDensity, Time};

use crate::config::CollisionConfig;
use crate::constants::TAU_SKIN;
use crate::particles::{SizeBins, power_law_mass_integral};
use crate::timescale::Timescale;

/// Collisional regime from the vertical optical depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "regime", rename_all = "snake_case")]
pub enum OpticalDepthRegime {
    Thin { tau: f64 },
    Thick { tau: f64 },
}

impl OpticalDepthRegime {
    pub fn tau(&self) -> f64 {
        match self {
            Self::Thin { tau } | Self::Thick { tau } => *tau,
        }
    }
}

pub fn classify_optical_depth(tau: f64) -> OpticalDepthRegime {
    if tau <= TAU_SKIN {
        OpticalDepthRegime::Thin { tau }
    } else {
        OpticalDepthRegime::Thick { tau }
    }
}

/// τ_vert = κ Σ
pub fn vertical_optical_depth(kappa_m2_kg: f64, sigma: SurfaceDensity) -> f64 {
    (kappa_m2_kg * sigma.to_kg_per_m2()).max(0.0)
}

pub fn collision_timescale(regime: &OpticalDepthRegime, omega: AngularVelocity) -> Timescale {
    let omega = omega.to_rad_per_sec();
    match *regime {
        OpticalDepthRegime::Thin { tau } => Timescale::from_rate(2.0 * omega * tau),
        OpticalDepthRegime::Thick { tau } => Timescale::from_rate(omega * tau),
    }
}

/// Mass moved by one grinding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GrindOutcome {
    /// Mass taken out of parent bins (kg)
    pub destroyed: f64,
    /// Fragment mass that fell below the floor (kg)
    pub lost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollisionModel {
    enabled: bool,
    fragment_q: f64,
}

impl CollisionModel {
    pub fn new(config: &CollisionConfig) -> Self {
        Self {
            enabled: config.enabled,
            fragment_q: config.fragment_q,
        }
    }

    /// Regime and timescale for the current optical depth.
    pub fn evaluate(&self, tau_vert: f64, omega: AngularVelocity) -> (OpticalDepthRegime, Timescale) {
        let regime = classify_optical_depth(tau_vert);
        let t_coll = if self.enabled {
            collision_timescale(&regime, omega)
        } else {
            Timescale::Infinite
        };
        (regime, t_coll)
    }

    /// Grinds the active bins for `dt`.
    ///
    /// Parent masses are taken from the state at the start of the pass, so
    /// fragments created now are not ground again in the same step.
    pub fn grind(&self, bins: &mut SizeBins, t_coll: Timescale, dt: Time, floor: f64) -> GrindOutcome {
        let fraction = t_coll.decay_fraction(dt.to_seconds());
        if !self.enabled || fraction <= 0.0 {
            return GrindOutcome::default();
        }

        let n = bins.len();
        let edges = bins.edges().to_vec();
        let snapshot = bins.masses().to_vec();
        let mut delta = vec![0.0; n];
        let mut outcome = GrindOutcome::default();

        for parent in 0..n {
            let destroyed = snapshot[parent] * bins.active_weight(parent, floor) * fraction;
            if destroyed <= 0.0 {
                continue;
            }
            delta[parent] -= destroyed;
            outcome.destroyed += destroyed;

            let top = edges[parent];
            let total = power_law_mass_integral(0.0, top, self.fragment_q);
            let mut placed = 0.0;
            if total > 0.0 && total.is_finite() && top > floor {
                for child in 0..parent {
                    let share =
                        power_law_mass_integral(edges[child].max(floor), edges[child + 1], self.fragment_q)
                            / total;
                    if share > 0.0 {
                        delta[child] += destroyed * share;
                        placed += destroyed * share;
                    }
                }
            }
            outcome.lost += destroyed - placed;
        }

        for (bin, change) in delta.into_iter().enumerate() {
            if change > 0.0 {
                bins.add_mass(bin, change);
            } else if change < 0.0 {
                bins.remove_mass(bin, -change);
            }
        }
        outcome
    }
}
