//! Minimum resolvable grain size.
//!
//! Fragments smaller than the floor would need more surface energy to create
//! than the collision supplies. Bins below the floor leave the active
//! distribution and stop contributing to mass or optical-depth integrals.
//!
//! # Physics
//!
//! Krijt & Kama (2014) balance the kinetic energy of a collision against the
//! surface energy of the fragments. For a fragment slope 3 < α < 4:
//!
//! ```text
//! factor = 1/s0 + η ρ v² / (24 γ)
//! s_min  = [ (α-3)/(4-α) · factor · s_max^(4-α) ]^(1/(3-α))
//! ```
//!
//! capped at the largest fragment size s_max.
//!
//! # References
//! - Krijt & Kama (2014) - "A dearth of small particles in debris disks"

use serde::{Deserialize, Serialize};
use units::{Length, Velocity};

use super::SizeBins;

/// Surface-energy floor parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceEnergyConfig {
    pub enabled: bool,
    /// Surface energy γ (J/m²)
    pub gamma_j_m2: f64,
    /// Fraction of impact energy going into new surface
    pub eta: f64,
    /// Fragment size-distribution slope α
    pub alpha_frag: f64,
    /// Orbital eccentricity setting the impact speed
    pub eccentricity: f64,
    /// Mass fraction of the largest fragment
    pub largest_fragment_mass_fraction: f64,
    /// Target size; defaults to the upper edge of the size grid
    pub s0_m: Option<f64>,
}

impl Default for SurfaceEnergyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            gamma_j_m2: 1.0,
            eta: 0.1,
            alpha_frag: 3.5,
            eccentricity: 0.01,
            largest_fragment_mass_fraction: 0.5,
            s0_m: None,
        }
    }
}

/// Impact speed for orbits of eccentricity `e`.
pub fn relative_velocity(v_kepler: Velocity, eccentricity: f64) -> Velocity {
    v_kepler / (1.0 - eccentricity).sqrt()
}

/// Surface-energy-limited minimum size (m).
///
/// Returns zero when the inputs fall outside the model's domain.
pub fn surface_energy_floor(
    gamma_j_m2: f64,
    eta: f64,
    alpha: f64,
    rho: f64,
    v_rel: f64,
    s0: f64,
    s_max: f64,
) -> f64 {
    let inputs_valid = alpha > 3.0
        && alpha < 4.0
        && gamma_j_m2 > 0.0
        && eta > 0.0
        && rho > 0.0
        && v_rel > 0.0
        && s0 > 0.0
        && s_max > 0.0;
    if !inputs_valid {
        return 0.0;
    }
    let factor = 1.0 / s0 + eta * rho * v_rel * v_rel / (24.0 * gamma_j_m2);
    let rhs = (alpha - 3.0) / (4.0 - alpha) * factor * s_max.powf(4.0 - alpha);
    if !(rhs > 0.0 && rhs.is_finite()) {
        return 0.0;
    }
    let s_floor = rhs.powf(1.0 / (3.0 - alpha));
    if !s_floor.is_finite() {
        return 0.0;
    }
    s_floor.clamp(0.0, s_max)
}

/// Which constraint set the floor this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorSource {
    Configured,
    SurfaceEnergy,
}

/// The active lower size bound for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeFloor {
    pub size: Length,
    pub source: FloorSource,
    /// Surface-energy limit, zero when disabled or out of domain
    pub surface_energy_size: Length,
}

/// Resolves the size floor from the configured minimum and the
/// surface-energy balance.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeFloorModel {
    configured_min: Length,
    params: SurfaceEnergyConfig,
    material_density: f64,
    v_rel: f64,
}

impl SizeFloorModel {
    pub fn new(
        configured_min: Length,
        params: SurfaceEnergyConfig,
        material_density: f64,
        v_kepler: Velocity,
    ) -> Self {
        let v_rel = relative_velocity(v_kepler, params.eccentricity).to_m_per_sec();
        Self {
            configured_min,
            params,
            material_density,
            v_rel,
        }
    }

    pub fn resolve(&self, bins: &SizeBins) -> SizeFloor {
        let surface_energy = if self.params.enabled {
            let s0 = self.params.s0_m.unwrap_or_else(|| bins.max_size().to_m());
            let s_max = s0 * self.params.largest_fragment_mass_fraction.cbrt();
            surface_energy_floor(
                self.params.gamma_j_m2,
                self.params.eta,
                self.params.alpha_frag,
                self.material_density,
                self.v_rel,
                s0,
                s_max,
            )
        } else {
            0.0
        };

        let configured = self.configured_min.to_m();
        let (size, source) = if surface_energy > configured {
            (surface_energy, FloorSource::SurfaceEnergy)
        } else {
            (configured, FloorSource::Configured)
        };
        SizeFloor {
            size: Length::from_m(size),
            source,
            surface_energy_size: Length::from_m(surface_energy),
        }
    }
}
