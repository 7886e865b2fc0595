use units::{Temperature, Time};

use super::{Extrapolation, TemperatureDriver, TemperatureRow, TemperatureSource};
use crate::error::{ConfigError, TemperatureError};

/// Piecewise-linear temperature history.
#[derive(Debug, Clone, PartialEq)]
pub struct TableTemperature {
    times: Vec<f64>,
    temperatures: Vec<f64>,
    extrapolation: Extrapolation,
}

impl TableTemperature {
    pub fn new(rows: &[TemperatureRow], extrapolation: Extrapolation) -> Result<Self, ConfigError> {
        Self::check_rows(rows)?;
        Ok(Self {
            times: rows.iter().map(|row| row.time_s).collect(),
            temperatures: rows.iter().map(|row| row.temperature_k).collect(),
            extrapolation,
        })
    }

    pub(crate) fn check_rows(rows: &[TemperatureRow]) -> Result<(), ConfigError> {
        if rows.is_empty() {
            return Err(ConfigError::invalid("temperature.driver.rows", "table has no rows"));
        }
        if rows
            .iter()
            .any(|row| !row.time_s.is_finite() || !row.temperature_k.is_finite() || row.temperature_k <= 0.0)
        {
            return Err(ConfigError::invalid(
                "temperature.driver.rows",
                "times must be finite and temperatures positive",
            ));
        }
        if rows.windows(2).any(|pair| pair[1].time_s <= pair[0].time_s) {
            return Err(ConfigError::invalid(
                "temperature.driver.rows",
                "times must be strictly increasing",
            ));
        }
        Ok(())
    }

    fn interpolate(&self, t: f64) -> f64 {
        let idx = self.times.partition_point(|&x| x <= t);
        if idx == 0 {
            return self.temperatures[0];
        }
        if idx >= self.times.len() {
            return self.temperatures[self.times.len() - 1];
        }
        let (t0, t1) = (self.times[idx - 1], self.times[idx]);
        let (y0, y1) = (self.temperatures[idx - 1], self.temperatures[idx]);
        y0 + (y1 - y0) * (t - t0) / (t1 - t0)
    }
}

impl TemperatureDriver for TableTemperature {
    fn temperature_at(&self, time: Time) -> Result<Temperature, TemperatureError> {
        let t = time.to_seconds();
        let t_min = self.times[0];
        let t_max = self.times[self.times.len() - 1];
        if self.extrapolation == Extrapolation::Error && (t < t_min || t > t_max) {
            return Err(TemperatureError::OutOfRange {
                time_s: t,
                t_min_s: t_min,
                t_max_s: t_max,
            });
        }
        let value = self.interpolate(t);
        if !value.is_finite() {
            return Err(TemperatureError::NonFinite { time_s: t });
        }
        Ok(Temperature::from_kelvin(value))
    }

    fn source(&self) -> TemperatureSource {
        TemperatureSource::Table
    }
}
