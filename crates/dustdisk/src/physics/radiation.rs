//! Radiation pressure from the hot Martian surface.
//!
//! # Physics
//!
//! The planet radiates L_M = 4π R_M² σ T_M⁴. For a grain of radius s and
//! density ρ the ratio of radiation force to Mars gravity is
//!
//! ```text
//! β = 3 L_M Q_pr / (16π c G M_M ρ s)
//! ```
//!
//! Grains with β above the threshold (0.5 for circular orbits) are unbound
//! and leave the annulus within roughly an orbit: t_blow = χ / Ω.
//!
//! A fixed χ saturates for very large β. The automatic efficiency scales χ
//! down as β grows and with the pressure efficiency, bounded to [0.5, 2].
//!
//! # References
//! - Burns, Lamy & Soter (1979) - "Radiation forces on small particles in the solar system"
//! - Hyodo et al. (2018) - "On the impact origin of Phobos and Deimos IV"

use serde::{Deserialize, Serialize};
use units::{AngularVelocity, Length, Temperature};

use crate::config::RadiationConfig;
use crate::constants::{BLOWOUT_BETA_THRESHOLD, C, G, M_MARS, PI, R_MARS, SIGMA_SB};
use crate::timescale::Timescale;

const CHI_MIN: f64 = 0.5;
const CHI_MAX: f64 = 2.0;

/// Blow-out efficiency χ in t_blow = χ/Ω.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChiBlow {
    Fixed(f64),
    Auto,
}

impl Default for ChiBlow {
    fn default() -> Self {
        Self::Fixed(1.0)
    }
}

/// Bolometric luminosity of the Mars surface (W).
pub fn mars_luminosity(t_mars: Temperature) -> f64 {
    4.0 * PI * R_MARS * R_MARS * SIGMA_SB * t_mars.powi(4)
}

/// Radiation-to-gravity force ratio for one grain size.
pub fn beta(size: Length, material_density: f64, t_mars: Temperature, qpr: f64) -> f64 {
    let s = size.to_m();
    if s <= 0.0 || material_density <= 0.0 {
        return 0.0;
    }
    3.0 * mars_luminosity(t_mars) * qpr / (16.0 * PI * C * G * M_MARS * material_density * s)
}

/// Grain size whose β equals `threshold`.
pub fn blowout_radius(material_density: f64, t_mars: Temperature, qpr: f64, threshold: f64) -> Length {
    if material_density <= 0.0 || threshold <= 0.0 {
        return Length::zero();
    }
    let s = 3.0 * mars_luminosity(t_mars) * qpr
        / (16.0 * PI * C * G * M_MARS * material_density * threshold);
    Length::from_m(s)
}

/// Bound/unbound classification of a grain.
///
/// β exactly at the threshold stays bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "regime", rename_all = "snake_case")]
pub enum BetaRegime {
    Bound { beta: f64, threshold: f64 },
    Unbound { beta: f64, threshold: f64 },
}

impl BetaRegime {
    pub fn beta(&self) -> f64 {
        match self {
            Self::Bound { beta, .. } | Self::Unbound { beta, .. } => *beta,
        }
    }

    pub fn is_unbound(&self) -> bool {
        matches!(self, Self::Unbound { .. })
    }
}

pub fn classify_beta(beta: f64, threshold: f64) -> BetaRegime {
    if beta > threshold {
        BetaRegime::Unbound { beta, threshold }
    } else {
        BetaRegime::Bound { beta, threshold }
    }
}

/// Blow-out efficiency derived from β and Q_pr.
pub fn auto_chi_blow(beta: f64, qpr: f64) -> f64 {
    let beta = if beta.is_finite() && beta > 0.0 {
        beta
    } else {
        BLOWOUT_BETA_THRESHOLD
    };
    let qpr = if qpr.is_finite() && qpr > 0.0 { qpr } else { 1.0 };
    let chi_beta = (1.0 / (1.0 + 0.5 * (beta / BLOWOUT_BETA_THRESHOLD - 1.0))).max(0.1);
    let chi_qpr = qpr.clamp(0.5, 1.5);
    (chi_beta * chi_qpr).clamp(CHI_MIN, CHI_MAX)
}

/// t_blow = χ/Ω for unbound grains, infinite otherwise.
pub fn blowout_timescale(regime: &BetaRegime, chi: ChiBlow, qpr: f64, omega: AngularVelocity) -> Timescale {
    match regime {
        BetaRegime::Bound { .. } => Timescale::Infinite,
        BetaRegime::Unbound { beta, .. } => {
            let chi = match chi {
                ChiBlow::Fixed(value) => value.clamp(CHI_MIN, CHI_MAX),
                ChiBlow::Auto => auto_chi_blow(*beta, qpr),
            };
            Timescale::from_seconds(chi / omega.to_rad_per_sec())
        }
    }
}

/// Per-bin blow-out state after shielding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinBlowout {
    pub regime: BetaRegime,
    pub t_blow: Timescale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadiationModel {
    use_mars_rp: bool,
    qpr: f64,
    threshold: f64,
    chi: ChiBlow,
    beta_override: Option<f64>,
    material_density: f64,
}

impl RadiationModel {
    pub fn new(config: &RadiationConfig, material_density: f64) -> Self {
        Self {
            use_mars_rp: config.use_mars_rp,
            qpr: config.qpr,
            threshold: config.beta_threshold,
            chi: config.chi_blow,
            beta_override: config.beta_override,
            material_density,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Unshielded β for a grain size.
    pub fn beta_at(&self, size: Length, t_mars: Temperature) -> f64 {
        if !self.use_mars_rp {
            return 0.0;
        }
        match self.beta_override {
            Some(fixed) => fixed,
            None => beta(size, self.material_density, t_mars, self.qpr),
        }
    }

    /// Unshielded β at every bin centre.
    pub fn bin_betas(&self, centres: &[f64], t_mars: Temperature) -> Vec<f64> {
        centres
            .iter()
            .map(|&s| self.beta_at(Length::from_m(s), t_mars))
            .collect()
    }

    /// Size at which β reaches the threshold, zero when radiation is off.
    pub fn blowout_size(&self, t_mars: Temperature) -> Length {
        if !self.use_mars_rp {
            return Length::zero();
        }
        blowout_radius(self.material_density, t_mars, self.qpr, self.threshold)
    }

    /// Classifies each bin with β scaled by the surviving flux fraction.
    pub fn bin_blowout(&self, betas: &[f64], flux_factor: f64, omega: AngularVelocity) -> Vec<BinBlowout> {
        betas
            .iter()
            .map(|&b| {
                let regime = classify_beta(b * flux_factor, self.threshold);
                BinBlowout {
                    regime,
                    t_blow: blowout_timescale(&regime, self.chi, self.qpr, omega),
                }
            })
            .collect()
    }
}
