//! Analytic cooling laws for the impact-heated surface.

use units::{Length, SECONDS_PER_DAY, Temperature, Time};

use super::{TemperatureDriver, TemperatureSource};
use crate::constants::SIGMA_SB;
use crate::error::TemperatureError;

/// Radiative cooling of a uniform surface slab.
///
/// ```text
/// T(t) = (T0⁻³ + 3σt / (d ρ c_p))^(-1/3)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabCooling {
    t0: Temperature,
    coefficient: f64,
}

impl SlabCooling {
    pub fn new(t0: Temperature, depth: Length, density: f64, heat_capacity: f64) -> Self {
        Self {
            t0,
            coefficient: 3.0 * SIGMA_SB / (depth.to_m() * density * heat_capacity),
        }
    }

    /// Time to cool from T0 to `target`, zero if the target is not below T0.
    pub fn time_to_reach(&self, target: Temperature) -> Time {
        let delta = target.powi(-3) - self.t0.powi(-3);
        Time::from_seconds((delta / self.coefficient).max(0.0))
    }
}

impl TemperatureDriver for SlabCooling {
    fn temperature_at(&self, time: Time) -> Result<Temperature, TemperatureError> {
        let t = time.to_seconds().max(0.0);
        let base = self.t0.powi(-3) + self.coefficient * t;
        let value = base.powf(-1.0 / 3.0);
        if !value.is_finite() {
            return Err(TemperatureError::NonFinite {
                time_s: time.to_seconds(),
            });
        }
        Ok(Temperature::from_kelvin(value))
    }

    fn source(&self) -> TemperatureSource {
        TemperatureSource::Analytic
    }
}

/// Linear cooling at constant flux (Hyodo et al. 2018).
///
/// Cooling time scale:
/// τ ≈ 717 d × (D / 100 km) × (ΔT / 3000 K) × (T0 / 4000 K)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyodoLinear {
    t0: Temperature,
    floor: Temperature,
    slope_k_per_s: f64,
}

impl HyodoLinear {
    pub fn new(t0: Temperature, floor: Temperature, depth: Length) -> Self {
        let cooling_time = Self::cooling_time(t0, floor, depth).to_seconds();
        let slope_k_per_s = if cooling_time > 0.0 {
            (t0 - floor).to_kelvin() / cooling_time
        } else {
            0.0
        };
        Self {
            t0,
            floor,
            slope_k_per_s,
        }
    }

    pub fn cooling_time(t0: Temperature, floor: Temperature, depth: Length) -> Time {
        let delta_t = (t0 - floor).to_kelvin();
        if delta_t <= 0.0 {
            return Time::zero();
        }
        let days = 717.0 * (depth.to_km() / 100.0) * (delta_t / 3000.0) * (t0.to_kelvin() / 4000.0);
        Time::from_seconds(days * SECONDS_PER_DAY)
    }
}

impl TemperatureDriver for HyodoLinear {
    fn temperature_at(&self, time: Time) -> Result<Temperature, TemperatureError> {
        let value = self.t0.to_kelvin() - self.slope_k_per_s * time.to_seconds().max(0.0);
        Ok(Temperature::from_kelvin(value.max(self.floor.to_kelvin())))
    }

    fn source(&self) -> TemperatureSource {
        TemperatureSource::Analytic
    }
}
