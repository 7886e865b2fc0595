//! Mars surface temperature drivers.
//!
//! The impact-heated Martian surface is the radiation source for the disk.
//! A driver maps simulated time to the surface temperature T_M and declares
//! whether the value came from a lookup table or an analytic cooling law.
//!
//! # Physics
//!
//! Grains at orbital radius r heated by the planet reach
//!
//! ```text
//! T_d = T_M · q_abs^{1/4} · sqrt(R_M / 2r)
//! ```
//!
//! which is the temperature used for phase and sublimation. Radiation
//! pressure uses T_M directly through the planet's luminosity.
//!
//! # References
//! - Hyodo et al. (2017) - "On the impact origin of Phobos and Deimos I"
//! - Hyodo et al. (2018) - "On the impact origin of Phobos and Deimos IV"

mod cooling;
mod table;


pub use cooling::{HyodoLinear, SlabCooling};
pub use table::TableTemperature;

use serde::{Deserialize, Serialize};
use units::{Length, Temperature, Time};

use crate::constants::R_MARS;
use crate::error::{ConfigError, TemperatureError};

/// Lowest initial surface temperature a run accepts (K)
pub const MIN_INITIAL_TEMPERATURE_K: f64 = 1000.0;

/// Highest initial surface temperature a run accepts (K)
pub const MAX_INITIAL_TEMPERATURE_K: f64 = 6500.0;

/// Where a temperature value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureSource {
    Table,
    Analytic,
}

/// Supplies the Mars surface temperature at a simulated time.
pub trait TemperatureDriver: std::fmt::Debug {
    fn temperature_at(&self, time: Time) -> Result<Temperature, TemperatureError>;

    fn source(&self) -> TemperatureSource;
}

/// Fixed surface temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantTemperature {
    pub temperature: Temperature,
}

impl TemperatureDriver for ConstantTemperature {
    fn temperature_at(&self, _time: Time) -> Result<Temperature, TemperatureError> {
        Ok(self.temperature)
    }

    fn source(&self) -> TemperatureSource {
        TemperatureSource::Analytic
    }
}

/// Behaviour of the table driver outside its sampled time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolation {
    /// Clamp to the nearest endpoint
    #[default]
    Hold,
    /// Fail the step
    Error,
}

/// One sample of a temperature table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRow {
    pub time_s: f64,
    pub temperature_k: f64,
}

/// Driver selection as it appears in the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TemperatureDriverConfig {
    Constant {
        temperature_k: f64,
    },
    Table {
        rows: Vec<TemperatureRow>,
        #[serde(default)]
        extrapolation: Extrapolation,
    },
    SlabCooling {
        t0_k: f64,
        #[serde(default = "default_layer_depth")]
        layer_depth_m: f64,
        #[serde(default = "default_layer_density")]
        density_kg_m3: f64,
        #[serde(default = "default_heat_capacity")]
        heat_capacity_j_kg_k: f64,
    },
    HyodoLinear {
        t0_k: f64,
        #[serde(default = "default_hyodo_floor")]
        floor_k: f64,
        #[serde(default = "default_layer_depth")]
        layer_depth_m: f64,
    },
}

fn default_layer_depth() -> f64 {
    1.0e5
}

fn default_hyodo_floor() -> f64 {
    200.0
}

fn default_layer_density() -> f64 {
    3000.0
}

fn default_heat_capacity() -> f64 {
    1000.0
}

impl Default for TemperatureDriverConfig {
    fn default() -> Self {
        Self::Constant {
            temperature_k: 4000.0,
        }
    }
}

impl TemperatureDriverConfig {
    /// Temperature at t = 0 as declared by the configuration.
    pub fn initial_temperature_k(&self) -> Option<f64> {
        match self {
            Self::Constant { temperature_k } => Some(*temperature_k),
            Self::Table { rows, .. } => rows.first().map(|row| row.temperature_k),
            Self::SlabCooling { t0_k, .. } | Self::HyodoLinear { t0_k, .. } => Some(*t0_k),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t0 = self.initial_temperature_k().ok_or_else(|| {
            ConfigError::invalid("temperature.driver.rows", "table has no rows")
        })?;
        if !(MIN_INITIAL_TEMPERATURE_K..=MAX_INITIAL_TEMPERATURE_K).contains(&t0) {
            return Err(ConfigError::invalid(
                "temperature.driver",
                format!(
                    "initial temperature {t0} K outside [{MIN_INITIAL_TEMPERATURE_K}, {MAX_INITIAL_TEMPERATURE_K}] K"
                ),
            ));
        }
        match self {
            Self::Table { rows, .. } => TableTemperature::check_rows(rows),
            Self::SlabCooling {
                layer_depth_m,
                density_kg_m3,
                heat_capacity_j_kg_k,
                ..
            } => {
                if *layer_depth_m <= 0.0 || *density_kg_m3 <= 0.0 || *heat_capacity_j_kg_k <= 0.0 {
                    return Err(ConfigError::invalid(
                        "temperature.driver",
                        "slab depth, density and heat capacity must be positive",
                    ));
                }
                Ok(())
            }
            Self::HyodoLinear {
                t0_k,
                floor_k,
                layer_depth_m,
            } => {
                if *floor_k < 0.0 || floor_k >= t0_k || *layer_depth_m <= 0.0 {
                    return Err(ConfigError::invalid(
                        "temperature.driver",
                        "hyodo cooling needs 0 <= floor_k < t0_k and a positive layer depth",
                    ));
                }
                Ok(())
            }
            Self::Constant { .. } => Ok(()),
        }
    }

    /// Builds the driver described by this configuration.
    pub fn build(&self) -> Result<Box<dyn TemperatureDriver>, ConfigError> {
        self.validate()?;
        let driver: Box<dyn TemperatureDriver> = match self {
            Self::Constant { temperature_k } => Box::new(ConstantTemperature {
                temperature: Temperature::from_kelvin(*temperature_k),
            }),
            Self::Table {
                rows,
                extrapolation,
            } => Box::new(TableTemperature::new(rows, *extrapolation)?),
            Self::SlabCooling {
                t0_k,
                layer_depth_m,
                density_kg_m3,
                heat_capacity_j_kg_k,
            } => Box::new(SlabCooling::new(
                Temperature::from_kelvin(*t0_k),
                Length::from_m(*layer_depth_m),
                *density_kg_m3,
                *heat_capacity_j_kg_k,
            )),
            Self::HyodoLinear {
                t0_k,
                floor_k,
                layer_depth_m,
            } => Box::new(HyodoLinear::new(
                Temperature::from_kelvin(*t0_k),
                Temperature::from_kelvin(*floor_k),
                Length::from_m(*layer_depth_m),
            )),
        };
        Ok(driver)
    }
}

/// Equilibrium temperature of grains heated by the Mars surface.
pub fn grain_temperature(t_mars: Temperature, radius: Length, q_abs: f64) -> Temperature {
    let dilution = (R_MARS / (2.0 * radius.to_m())).sqrt();
    t_mars * (q_abs.powf(0.25) * dilution)
}
