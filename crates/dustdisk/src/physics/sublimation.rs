//! Sublimation of silicate grains.
//!
//! # Physics
//!
//! The Hertz-Knudsen-Langmuir mass flux from a grain surface is
//!
//! ```text
//! J = α · max(P_sat - P_gas, 0) · sqrt(μ / (2π R T))
//! ```
//!
//! and a grain of density ρ shrinks at ds/dt = -J/ρ. The sublimation
//! timescale compares that rate with the floor size: t_solid = s_floor / |ds/dt|.
//!
//! # References
//! - Hertz (1882), Knudsen (1909), Langmuir (1913)
//! - Markkanen & Agarwal (2020) - "Thermal model of water and CO ice mass loss from icy grains"

use serde::{Deserialize, Serialize};
use units::{Length, Pressure, Temperature, Time};

use super::PsatEvaluation;
use crate::config::SublimationConfig;
use crate::constants::{PI, R_GAS};
use crate::particles::SizeBins;
use crate::timescale::Timescale;

/// HKL mass flux in kg/(m²·s).
pub fn hkl_mass_flux(
    psat: Pressure,
    p_gas: Pressure,
    temperature: Temperature,
    alpha_evap: f64,
    molar_mass: f64,
) -> f64 {
    let excess = psat.to_pa() - p_gas.to_pa();
    let t = temperature.to_kelvin();
    if !(excess > 0.0 && t > 0.0) {
        return 0.0;
    }
    alpha_evap * excess * (molar_mass / (2.0 * PI * R_GAS * t)).sqrt()
}

/// Fraction of a grain's mass lost when its radius shrinks by `ds`.
pub fn shrink_loss_fraction(size: f64, ds: f64) -> f64 {
    if size <= 0.0 {
        return 1.0;
    }
    let remaining = (1.0 - ds / size).max(0.0);
    1.0 - remaining * remaining * remaining
}

/// Time for grains at the floor to sublimate away.
pub fn sublimation_timescale(floor: Length, shrink_rate: f64) -> Timescale {
    if shrink_rate > 0.0 {
        Timescale::from_seconds(floor.to_m() / shrink_rate)
    } else {
        Timescale::Infinite
    }
}

/// Sublimation rates for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SublimationRates {
    /// HKL flux (kg/(m²·s))
    pub mass_flux: f64,
    /// |ds/dt| (m/s)
    pub shrink_rate: f64,
    pub t_solid: Timescale,
}

impl SublimationRates {
    pub fn inactive() -> Self {
        Self {
            mass_flux: 0.0,
            shrink_rate: 0.0,
            t_solid: Timescale::Infinite,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SublimationModel {
    enabled: bool,
    alpha_evap: f64,
    molar_mass: f64,
    p_gas: Pressure,
    material_density: f64,
}

impl SublimationModel {
    pub fn new(config: &SublimationConfig, material_density: f64) -> Self {
        Self {
            enabled: config.enabled,
            alpha_evap: config.alpha_evap,
            molar_mass: config.mu_kg_mol,
            p_gas: Pressure::from_pa(config.p_gas_pa),
            material_density,
        }
    }

    pub fn evaluate(
        &self,
        psat: &PsatEvaluation,
        grain_temperature: Temperature,
        floor: Length,
    ) -> SublimationRates {
        if !self.enabled {
            return SublimationRates::inactive();
        }
        let mass_flux = hkl_mass_flux(
            psat.pressure,
            self.p_gas,
            grain_temperature,
            self.alpha_evap,
            self.molar_mass,
        );
        let shrink_rate = mass_flux / self.material_density;
        SublimationRates {
            mass_flux,
            shrink_rate,
            t_solid: sublimation_timescale(floor, shrink_rate),
        }
    }

    /// Shrinks the active grains over `dt` and returns the mass removed.
    pub fn apply(&self, bins: &mut SizeBins, rates: &SublimationRates, dt: Time, floor: f64) -> f64 {
        if rates.shrink_rate <= 0.0 {
            return 0.0;
        }
        let ds = rates.shrink_rate * dt.to_seconds();
        let mut removed = 0.0;
        for bin in 0..bins.len() {
            let weight = bins.active_weight(bin, floor);
            if weight == 0.0 {
                continue;
            }
            let fraction = shrink_loss_fraction(bins.centres()[bin], ds);
            let loss = bins.masses()[bin] * weight * fraction;
            removed += bins.remove_mass(bin, loss);
        }
        removed
    }
}
