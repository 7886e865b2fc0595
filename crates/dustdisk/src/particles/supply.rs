//! External mass supply into the disk.
//!
//! Material re-accreted from the impact debris or delivered from outside
//! the zone enters as a rate in kg/s, scaled by a mixing efficiency and
//! optionally perturbed by a seeded log-normal jitter.

use rand::Rng;
use serde::{Deserialize, Serialize};
use units::Time;

use super::SizeBins;
use crate::constants::PI;
use crate::error::ConfigError;

/// A constant-rate window of a piecewise supply history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplySegment {
    pub t_start_s: f64,
    pub t_end_s: f64,
    pub rate_kg_s: f64,
}

/// One sample of a tabulated supply rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplyRow {
    pub time_s: f64,
    pub rate_kg_s: f64,
}

/// Supply-rate history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SupplyMode {
    /// No external supply
    #[default]
    None,

    /// Constant rate
    Const { rate_kg_s: f64 },

    /// Ṁ = A (t - t0 + ε)^index, zero before the onset
    PowerLaw {
        amplitude_kg_s: f64,
        #[serde(default)]
        t0_s: f64,
        index: f64,
        #[serde(default = "default_powerlaw_epsilon")]
        epsilon_s: f64,
    },

    /// Constant rates over disjoint time windows
    Piecewise { segments: Vec<SupplySegment> },

    /// Linear interpolation between samples, held at the ends
    Table { rows: Vec<SupplyRow> },
}

fn default_powerlaw_epsilon() -> f64 {
    1.0
}

impl SupplyMode {
    /// Raw rate in kg/s at time `t`, before mixing efficiency.
    pub fn rate_at(&self, t: f64) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Const { rate_kg_s } => *rate_kg_s,
            Self::PowerLaw {
                amplitude_kg_s,
                t0_s,
                index,
                epsilon_s,
            } => {
                let base = t - t0_s + epsilon_s;
                if base > 0.0 {
                    amplitude_kg_s * base.powf(*index)
                } else {
                    0.0
                }
            }
            Self::Piecewise { segments } => segments
                .iter()
                .find(|seg| seg.t_start_s <= t && t < seg.t_end_s)
                .map_or(0.0, |seg| seg.rate_kg_s),
            Self::Table { rows } => interpolate_rows(rows, t),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::None => Ok(()),
            Self::Const { rate_kg_s } => non_negative("supply.rate_kg_s", *rate_kg_s),
            Self::PowerLaw {
                amplitude_kg_s,
                epsilon_s,
                ..
            } => {
                non_negative("supply.amplitude_kg_s", *amplitude_kg_s)?;
                if *epsilon_s <= 0.0 {
                    return Err(ConfigError::invalid("supply.epsilon_s", "must be positive"));
                }
                Ok(())
            }
            Self::Piecewise { segments } => {
                for seg in segments {
                    non_negative("supply.segments.rate_kg_s", seg.rate_kg_s)?;
                    if seg.t_end_s <= seg.t_start_s {
                        return Err(ConfigError::invalid(
                            "supply.segments",
                            "segment end must follow its start",
                        ));
                    }
                }
                Ok(())
            }
            Self::Table { rows } => {
                if rows.is_empty() {
                    return Err(ConfigError::invalid("supply.rows", "table has no rows"));
                }
                if rows.windows(2).any(|pair| pair[1].time_s <= pair[0].time_s) {
                    return Err(ConfigError::invalid(
                        "supply.rows",
                        "times must be strictly increasing",
                    ));
                }
                rows.iter()
                    .try_for_each(|row| non_negative("supply.rows.rate_kg_s", row.rate_kg_s))
            }
        }
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be finite and >= 0, got {value}")))
    }
}

fn interpolate_rows(rows: &[SupplyRow], t: f64) -> f64 {
    let idx = rows.partition_point(|row| row.time_s <= t);
    match idx {
        0 => rows.first().map_or(0.0, |row| row.rate_kg_s),
        i if i >= rows.len() => rows[rows.len() - 1].rate_kg_s,
        i => {
            let (a, b) = (rows[i - 1], rows[i]);
            a.rate_kg_s + (b.rate_kg_s - a.rate_kg_s) * (t - a.time_s) / (b.time_s - a.time_s)
        }
    }
}

/// Supply source resolved for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SupplySource {
    mode: SupplyMode,
    epsilon_mix: f64,
    jitter_sigma: f64,
    q_inj: f64,
}

impl SupplySource {
    pub fn new(mode: SupplyMode, epsilon_mix: f64, jitter_sigma: f64, q_inj: f64) -> Self {
        Self {
            mode,
            epsilon_mix,
            jitter_sigma,
            q_inj,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.mode, SupplyMode::None) && self.epsilon_mix > 0.0
    }

    /// Effective rate at `t` in kg/s.
    pub fn rate(&self, t: Time) -> f64 {
        self.epsilon_mix * self.mode.rate_at(t.to_seconds())
    }

    /// Mass delivered over a step starting at `t`.
    ///
    /// Draws from `rng` only when jitter is configured, so runs without
    /// jitter consume no random numbers.
    pub fn sample_mass<R: Rng + ?Sized>(&self, t: Time, dt: Time, rng: &mut R) -> f64 {
        if !self.is_active() {
            return 0.0;
        }
        let nominal = self.rate(t) * dt.to_seconds();
        if nominal <= 0.0 {
            return 0.0;
        }
        if self.jitter_sigma > 0.0 {
            nominal * self.lognormal_factor(rng)
        } else {
            nominal
        }
    }

    // Mean-one log-normal factor from a Box-Muller normal deviate.
    fn lognormal_factor<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u1: f64 = 1.0 - rng.random::<f64>();
        let u2: f64 = rng.random();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        let sigma = self.jitter_sigma;
        (sigma * z - 0.5 * sigma * sigma).exp()
    }

    /// Spreads `mass_kg` over the active bins with a power-law weighting.
    ///
    /// A bin straddling the floor only counts part of its mass as active, so
    /// supply goes to the bins wholly above the floor whenever there are
    /// any. Returns the mass actually injected, zero when no bin lies above
    /// the floor.
    pub fn inject(&self, bins: &mut SizeBins, mass_kg: f64, floor: f64) -> f64 {
        if mass_kg <= 0.0 {
            return 0.0;
        }
        let clipped = bins.power_law_weights(floor, self.q_inj);
        let whole: Vec<f64> = clipped
            .iter()
            .enumerate()
            .map(|(bin, &w)| if bins.active_weight(bin, floor) < 1.0 { 0.0 } else { w })
            .collect();
        let whole_sum: f64 = whole.iter().sum();
        let weights = if whole_sum > 0.0 {
            whole.into_iter().map(|w| w / whole_sum).collect()
        } else {
            clipped
        };
        if weights.iter().all(|&w| w == 0.0) {
            return 0.0;
        }
        let mut injected = 0.0;
        for (bin, w) in weights.into_iter().enumerate() {
            let share = mass_kg * w;
            bins.add_mass(bin, share);
            injected += share;
        }
        injected
    }
}
