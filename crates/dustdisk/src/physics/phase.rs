//! Solid/vapor phase classification.
//!
//! The phase evaluator resolves the vapor pressure model for the current
//! grain temperature and classifies the bulk state of the disk from a
//! threshold ramp between condensation and vaporisation temperatures.
//!
//! # Physics
//!
//! Between T_condense and T_vaporize the vapor fraction rises linearly and
//! is suppressed by ambient pressure and optical depth:
//!
//! ```text
//! f_vap = (T - T_c)/(T_v - T_c) / (1 + P/P_ref) / (1 + τ/τ_ref)
//! ```
//!
//! Below T_c the disk is fully solid and above T_v fully vapor. The disk is
//! tagged vapor once f_vap ≥ 0.5.

use serde::{Deserialize, Serialize};
use units::{Pressure, Temperature};

use super::{PsatEvaluation, PsatModelKind, PsatSelector};
use crate::config::PhaseConfig;
use crate::error::StepError;
use crate::temperature::TemperatureSource;

/// Vapor fraction at which the disk counts as vapor-dominated
pub const VAPOR_STATE_FRACTION: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTag {
    Solid,
    Vapor,
}

/// Regime of the disk for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseState {
    pub tag: PhaseTag,
    pub psat_model: PsatModelKind,
    pub vapor_fraction: f64,
    /// Where the temperature came from; recorded for diagnostics only
    pub temperature_source: TemperatureSource,
    pub grain_temperature: Temperature,
    pub psat: Pressure,
}

/// Threshold vapor fraction.
pub fn vapor_fraction(temperature_k: f64, pressure: Pressure, tau: f64, config: &PhaseConfig) -> f64 {
    let t_cond = config.t_condense_k;
    let t_vap = config.t_vaporize_k.max(t_cond + 1.0);
    let fraction = if temperature_k <= t_cond {
        0.0
    } else if temperature_k >= t_vap {
        1.0
    } else {
        let mut frac = (temperature_k - t_cond) / (t_vap - t_cond);
        let p_bar = pressure.to_bar();
        if p_bar.is_finite() && config.p_ref_bar > 0.0 {
            frac /= 1.0 + p_bar.max(0.0) / config.p_ref_bar;
        }
        if tau.is_finite() && config.tau_ref > 0.0 {
            frac /= 1.0 + tau.max(0.0) / config.tau_ref;
        }
        frac
    };
    fraction.clamp(0.0, 1.0)
}

pub struct PhaseEvaluator<'a> {
    config: &'a PhaseConfig,
    selector: &'a PsatSelector,
    ambient_pressure: Pressure,
}

impl<'a> PhaseEvaluator<'a> {
    pub fn new(config: &'a PhaseConfig, selector: &'a PsatSelector, ambient_pressure: Pressure) -> Self {
        Self {
            config,
            selector,
            ambient_pressure,
        }
    }

    /// Classifies the phase and resolves the vapor pressure model.
    ///
    /// `source` is carried into the state unchanged; classification depends
    /// only on the temperature, the ambient pressure and `tau`.
    pub fn evaluate(
        &self,
        grain_temperature: Temperature,
        source: TemperatureSource,
        tau: f64,
    ) -> Result<(PhaseState, PsatEvaluation), StepError> {
        let t = grain_temperature.to_kelvin();
        if !(t.is_finite() && t > 0.0) {
            return Err(StepError::PhaseUnresolvable {
                temperature_k: t,
                vapor_fraction: f64::NAN,
            });
        }

        let psat = self.selector.select(grain_temperature)?;

        let f_vap = if self.config.enabled {
            vapor_fraction(t, self.ambient_pressure, tau, self.config)
        } else {
            0.0
        };
        if !f_vap.is_finite() {
            return Err(StepError::PhaseUnresolvable {
                temperature_k: t,
                vapor_fraction: f_vap,
            });
        }
        let tag = if f_vap >= VAPOR_STATE_FRACTION {
            PhaseTag::Vapor
        } else {
            PhaseTag::Solid
        };

        let state = PhaseState {
            tag,
            psat_model: psat.model,
            vapor_fraction: f_vap,
            temperature_source: source,
            grain_temperature,
            psat: psat.pressure,
        };
        Ok((state, psat))
    }
}
