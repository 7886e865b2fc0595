//! Auxiliary sinks: gas drag and hydrodynamic escape.
//!
//! # Physics
//!
//! In the Epstein regime a grain couples to gas of density ρ_g and sound
//! speed c_s on the stopping time t_s = ρ_p s / (ρ_g c_s). Grains coupled to
//! the gas are removed with it.
//!
//! Vapor heated above a reference temperature escapes hydrodynamically at a
//! rate strength · (T/T_ref)^p · max(f_vap, floor).

use serde::{Deserialize, Serialize};
use units::{Temperature, Time};

use super::PhaseTag;
use crate::particles::SizeBins;
use crate::timescale::Timescale;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasDragConfig {
    pub enabled: bool,
    pub rho_gas_kg_m3: f64,
    pub sound_speed_m_s: f64,
}

impl Default for GasDragConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rho_gas_kg_m3: 1e-6,
            sound_speed_m_s: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydroEscapeConfig {
    pub enabled: bool,
    /// Base escape rate (1/s)
    pub strength_per_s: f64,
    pub t_ref_k: f64,
    pub temp_power: f64,
    pub f_vap_floor: f64,
}

impl Default for HydroEscapeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            strength_per_s: 1e-7,
            t_ref_k: 2000.0,
            temp_power: 2.0,
            f_vap_floor: 1e-3,
        }
    }
}

/// Epstein stopping time of a grain.
pub fn gas_drag_timescale(size_m: f64, rho_p: f64, rho_gas: f64, sound_speed: f64) -> Timescale {
    Timescale::from_seconds(rho_p * size_m / (rho_gas * sound_speed))
}

pub fn hydro_escape_timescale(config: &HydroEscapeConfig, temperature: Temperature, f_vap: f64) -> Timescale {
    if !config.enabled {
        return Timescale::Infinite;
    }
    let strength = config.strength_per_s.max(0.0);
    if strength <= 0.0 || f_vap <= 0.0 {
        return Timescale::Infinite;
    }
    let t_ref = config.t_ref_k.max(1.0);
    let ratio = temperature.to_kelvin().max(1.0) / t_ref;
    let temp_factor = match ratio.powf(config.temp_power) {
        v if v.is_finite() => v,
        _ => 1.0,
    };
    Timescale::from_rate(strength * temp_factor * f_vap.max(config.f_vap_floor))
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuxiliarySinks {
    drag: GasDragConfig,
    escape: HydroEscapeConfig,
    material_density: f64,
}

impl AuxiliarySinks {
    pub fn new(drag: GasDragConfig, escape: HydroEscapeConfig, material_density: f64) -> Self {
        Self {
            drag,
            escape,
            material_density,
        }
    }

    fn drag_timescale(&self, size_m: f64) -> Timescale {
        if !self.drag.enabled {
            return Timescale::Infinite;
        }
        gas_drag_timescale(
            size_m,
            self.material_density,
            self.drag.rho_gas_kg_m3,
            self.drag.sound_speed_m_s,
        )
    }

    /// Drag timescale of the smallest active grains.
    pub fn drag_at_floor(&self, floor: f64) -> Timescale {
        self.drag_timescale(floor)
    }

    /// Escape timescale; only vapor-dominated disks escape.
    pub fn escape(&self, phase: PhaseTag, temperature: Temperature, f_vap: f64) -> Timescale {
        match phase {
            PhaseTag::Vapor => hydro_escape_timescale(&self.escape, temperature, f_vap),
            PhaseTag::Solid => Timescale::Infinite,
        }
    }

    pub fn apply_drag(&self, bins: &mut SizeBins, dt: Time, floor: f64) -> f64 {
        if !self.drag.enabled {
            return 0.0;
        }
        let mut removed = 0.0;
        for bin in 0..bins.len() {
            let weight = bins.active_weight(bin, floor);
            if weight == 0.0 {
                continue;
            }
            let fraction = self.drag_timescale(bins.centres()[bin]).decay_fraction(dt.to_seconds());
            let loss = bins.masses()[bin] * weight * fraction;
            removed += bins.remove_mass(bin, loss);
        }
        removed
    }

    pub fn apply_escape(&self, bins: &mut SizeBins, t_escape: Timescale, dt: Time, floor: f64) -> f64 {
        let fraction = t_escape.decay_fraction(dt.to_seconds());
        if fraction <= 0.0 {
            return 0.0;
        }
        let mut removed = 0.0;
        for bin in 0..bins.len() {
            let weight = bins.active_weight(bin, floor);
            if weight == 0.0 {
                continue;
            }
            let loss = bins.masses()[bin] * weight * fraction;
            removed += bins.remove_mass(bin, loss);
        }
        removed
    }
}
