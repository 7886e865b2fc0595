//! Saturation vapor pressure models and their fallback ladder.
//!
//! Three strategies are available, each with a validity predicate:
//!
//! 1. **Tabulated**: linear interpolation of log10 P over a measured table,
//!    valid only inside the table's temperature range.
//! 2. **Local fit**: least-squares Clausius fit `log10 P = A - B/T` to the
//!    table points nearest the query, valid within a window around the table.
//! 3. **Clausius-Clapeyron**: the baseline law with fixed coefficients and an
//!    optional liquid branch. Valid at every temperature.
//!
//! In `auto` mode the strategies are tried in that order and the first valid
//! one wins. The baseline law closes the ladder, so selection never fails.
//!
//! # References
//! - Visscher & Fegley (2013) - "Chemistry of impact-generated silicate melt-vapor debris disks"

use std::fmt;

use serde::{Deserialize, Serialize};
use units::{Pressure, Temperature};

use crate::config::SublimationConfig;
use crate::error::{ConfigError, StepError};

/// Vapor pressure model requested by the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PsatModel {
    Tabulated,
    LocalFit,
    ClausiusClapeyron,
    #[default]
    Auto,
}

/// Vapor pressure model actually used for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsatModelKind {
    Tabulated,
    LocalFit,
    ClausiusClapeyron,
}

impl fmt::Display for PsatModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tabulated => "tabulated",
            Self::LocalFit => "local-fit",
            Self::ClausiusClapeyron => "clausius-clapeyron",
        };
        f.write_str(name)
    }
}

/// One measured vapor pressure sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsatRow {
    pub temperature_k: f64,
    pub log10_p_pa: f64,
}

/// Clausius coefficients for `log10 P[Pa] = A - B/T`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClausiusCoefficients {
    pub a: f64,
    pub b: f64,
}

impl ClausiusCoefficients {
    pub fn log10_pressure(&self, t: f64) -> f64 {
        self.a - self.b / t
    }
}

/// Liquid-phase coefficients used above a switch temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidBranch {
    pub a: f64,
    pub b: f64,
    pub t_switch_k: f64,
}

impl Default for LiquidBranch {
    fn default() -> Self {
        Self {
            a: 13.203,
            b: 25_898.9,
            t_switch_k: 1900.0,
        }
    }
}

/// A candidate vapor pressure model.
pub trait PsatStrategy: fmt::Debug {
    fn kind(&self) -> PsatModelKind;

    fn is_valid(&self, temperature_k: f64) -> bool;

    fn log10_pressure(&self, temperature_k: f64) -> f64;
}

/// Baseline Clausius-Clapeyron law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClausiusClapeyron {
    pub solid: ClausiusCoefficients,
    pub liquid: Option<LiquidBranch>,
}

impl PsatStrategy for ClausiusClapeyron {
    fn kind(&self) -> PsatModelKind {
        PsatModelKind::ClausiusClapeyron
    }

    fn is_valid(&self, _temperature_k: f64) -> bool {
        true
    }

    fn log10_pressure(&self, temperature_k: f64) -> f64 {
        match self.liquid {
            Some(branch) if temperature_k >= branch.t_switch_k => {
                branch.a - branch.b / temperature_k
            }
            _ => self.solid.log10_pressure(temperature_k),
        }
    }
}

/// Interpolated measurement table.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedPsat {
    temperatures: Vec<f64>,
    log10_p: Vec<f64>,
}

impl TabulatedPsat {
    pub fn new(rows: &[PsatRow]) -> Result<Self, ConfigError> {
        check_rows(rows)?;
        Ok(Self {
            temperatures: rows.iter().map(|r| r.temperature_k).collect(),
            log10_p: rows.iter().map(|r| r.log10_p_pa).collect(),
        })
    }

    fn range(&self) -> (f64, f64) {
        (self.temperatures[0], self.temperatures[self.temperatures.len() - 1])
    }
}

impl PsatStrategy for TabulatedPsat {
    fn kind(&self) -> PsatModelKind {
        PsatModelKind::Tabulated
    }

    fn is_valid(&self, temperature_k: f64) -> bool {
        let (lo, hi) = self.range();
        temperature_k >= lo && temperature_k <= hi
    }

    fn log10_pressure(&self, temperature_k: f64) -> f64 {
        let n = self.temperatures.len();
        let idx = self.temperatures.partition_point(|&t| t <= temperature_k);
        if idx == 0 {
            return self.log10_p[0];
        }
        if idx >= n {
            return self.log10_p[n - 1];
        }
        let (t0, t1) = (self.temperatures[idx - 1], self.temperatures[idx]);
        let (y0, y1) = (self.log10_p[idx - 1], self.log10_p[idx]);
        y0 + (y1 - y0) * (temperature_k - t0) / (t1 - t0)
    }
}

/// Clausius fit to the table points near the query temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFitPsat {
    table: TabulatedPsat,
    window_k: f64,
    min_points: usize,
}

impl LocalFitPsat {
    pub fn new(rows: &[PsatRow], window_k: f64, min_points: usize) -> Result<Self, ConfigError> {
        if min_points < 2 {
            return Err(ConfigError::invalid(
                "sublimation.min_points_local_fit",
                "a fit needs at least two points",
            ));
        }
        if rows.len() < min_points {
            return Err(ConfigError::invalid(
                "sublimation.psat_table",
                format!("local fit needs {min_points} rows, table has {}", rows.len()),
            ));
        }
        if !(window_k >= 0.0 && window_k.is_finite()) {
            return Err(ConfigError::invalid(
                "sublimation.local_fit_window_k",
                "window must be finite and >= 0",
            ));
        }
        Ok(Self {
            table: TabulatedPsat::new(rows)?,
            window_k,
            min_points,
        })
    }

    /// Least-squares coefficients for the points around `temperature_k`.
    pub fn fit(&self, temperature_k: f64) -> ClausiusCoefficients {
        let temps = &self.table.temperatures;
        let (lo, hi) = self.table.range();
        let centre = temperature_k.clamp(lo, hi);

        let mut picked: Vec<usize> = (0..temps.len())
            .filter(|&i| (temps[i] - centre).abs() <= self.window_k)
            .collect();
        if picked.len() < self.min_points {
            let mut by_distance: Vec<usize> = (0..temps.len()).collect();
            by_distance.sort_by(|&a, &b| {
                (temps[a] - centre)
                    .abs()
                    .total_cmp(&(temps[b] - centre).abs())
                    .then(a.cmp(&b))
            });
            by_distance.truncate(self.min_points);
            picked = by_distance;
        }

        let n = picked.len() as f64;
        let x_mean = picked.iter().map(|&i| 1.0 / temps[i]).sum::<f64>() / n;
        let y_mean = picked.iter().map(|&i| self.table.log10_p[i]).sum::<f64>() / n;
        let (mut sxy, mut sxx) = (0.0, 0.0);
        for &i in &picked {
            let dx = 1.0 / temps[i] - x_mean;
            sxy += dx * (self.table.log10_p[i] - y_mean);
            sxx += dx * dx;
        }
        let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        ClausiusCoefficients {
            a: y_mean - slope * x_mean,
            b: -slope,
        }
    }
}

impl PsatStrategy for LocalFitPsat {
    fn kind(&self) -> PsatModelKind {
        PsatModelKind::LocalFit
    }

    fn is_valid(&self, temperature_k: f64) -> bool {
        let (lo, hi) = self.table.range();
        temperature_k >= lo - self.window_k && temperature_k <= hi + self.window_k
    }

    fn log10_pressure(&self, temperature_k: f64) -> f64 {
        self.fit(temperature_k).log10_pressure(temperature_k)
    }
}

fn check_rows(rows: &[PsatRow]) -> Result<(), ConfigError> {
    if rows.len() < 2 {
        return Err(ConfigError::invalid(
            "sublimation.psat_table",
            "table needs at least two rows",
        ));
    }
    if rows
        .iter()
        .any(|r| !(r.temperature_k > 0.0 && r.temperature_k.is_finite() && r.log10_p_pa.is_finite()))
    {
        return Err(ConfigError::invalid(
            "sublimation.psat_table",
            "temperatures must be positive and pressures finite",
        ));
    }
    if rows.windows(2).any(|p| p[1].temperature_k <= p[0].temperature_k) {
        return Err(ConfigError::invalid(
            "sublimation.psat_table",
            "temperatures must be strictly increasing",
        ));
    }
    Ok(())
}

/// Vapor pressure resolved for one temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsatEvaluation {
    pub model: PsatModelKind,
    pub log10_p_pa: f64,
    pub pressure: Pressure,
}

/// Chooses the vapor pressure model for each temperature.
#[derive(Debug)]
pub enum PsatSelector {
    /// A single model; temperatures outside its domain are fatal
    Fixed(Box<dyn PsatStrategy>),
    /// Ordered candidates closed by the always-valid baseline law
    Ladder {
        candidates: Vec<Box<dyn PsatStrategy>>,
        terminal: ClausiusClapeyron,
    },
}

impl PsatSelector {
    pub fn from_config(config: &SublimationConfig) -> Result<Self, ConfigError> {
        let baseline = ClausiusClapeyron {
            solid: config.clausius,
            liquid: config.liquid_branch,
        };
        let table = &config.psat_table;
        let selector = match config.psat_model {
            PsatModel::ClausiusClapeyron => Self::Fixed(Box::new(baseline)),
            PsatModel::Tabulated => {
                if table.is_empty() {
                    return Err(ConfigError::invalid(
                        "sublimation.psat_table",
                        "psat_model `tabulated` requires a table",
                    ));
                }
                Self::Fixed(Box::new(TabulatedPsat::new(table)?))
            }
            PsatModel::LocalFit => Self::Fixed(Box::new(LocalFitPsat::new(
                table,
                config.local_fit_window_k,
                config.min_points_local_fit,
            )?)),
            PsatModel::Auto => {
                let mut candidates: Vec<Box<dyn PsatStrategy>> = Vec::new();
                if !table.is_empty() {
                    candidates.push(Box::new(TabulatedPsat::new(table)?));
                    if table.len() >= config.min_points_local_fit {
                        candidates.push(Box::new(LocalFitPsat::new(
                            table,
                            config.local_fit_window_k,
                            config.min_points_local_fit,
                        )?));
                    }
                }
                Self::Ladder {
                    candidates,
                    terminal: baseline,
                }
            }
        };
        Ok(selector)
    }

    /// Resolves the model and pressure at `temperature`.
    pub fn select(&self, temperature: Temperature) -> Result<PsatEvaluation, StepError> {
        let t = temperature.to_kelvin();
        let strategy: &dyn PsatStrategy = match self {
            Self::Fixed(model) => {
                if !model.is_valid(t) {
                    return Err(StepError::ModelDomainExhausted {
                        model: model.kind(),
                        temperature_k: t,
                    });
                }
                model.as_ref()
            }
            Self::Ladder {
                candidates,
                terminal,
            } => candidates
                .iter()
                .map(|c| c.as_ref())
                .find(|c| c.is_valid(t))
                .unwrap_or(terminal as &dyn PsatStrategy),
        };
        let log10_p_pa = strategy.log10_pressure(t);
        Ok(PsatEvaluation {
            model: strategy.kind(),
            log10_p_pa,
            pressure: Pressure::from_pa(10f64.powf(log10_p_pa)),
        })
    }
}
