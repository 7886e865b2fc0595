use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// A physical temperature quantity using f64 precision.
///
/// The `Temperature` struct represents temperature with Kelvin as the base unit.
/// Post-impact Mars surfaces cool from several thousand Kelvin, and silicate
/// vapor pressure laws are written in Kelvin, so no other scale is carried
/// beyond Celsius for reading lab tables.
///
/// # Examples
///
/// ```rust
/// use units::Temperature;
///
/// let surface = Temperature::from_kelvin(4000.0);
/// let lab = Temperature::from_celsius(1226.85);
///
/// let ratio = surface / lab;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Temperature(f64); // Base unit: Kelvin

impl Temperature {
    /// Creates a new `Temperature` from a value in Kelvin.
    pub fn from_kelvin(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Temperature` from a value in Celsius.
    ///
    /// Converts Celsius to Kelvin: K = °C + 273.15
    pub fn from_celsius(value: f64) -> Self {
        Self(value + 273.15)
    }

    pub fn to_kelvin(&self) -> f64 {
        self.0
    }

    pub fn to_celsius(&self) -> f64 {
        self.0 - 273.15
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    pub fn powi(&self, n: i32) -> f64 {
        self.0.powi(n)
    }

    pub fn powf(&self, n: f64) -> f64 {
        self.0.powf(n)
    }
}

impl Add for Temperature {
    type Output = Temperature;

    fn add(self, rhs: Temperature) -> Temperature {
        Temperature(self.0 + rhs.0)
    }
}

impl Sub for Temperature {
    type Output = Temperature;

    fn sub(self, rhs: Temperature) -> Temperature {
        Temperature(self.0 - rhs.0)
    }
}

impl Mul<f64> for Temperature {
    type Output = Temperature;

    fn mul(self, rhs: f64) -> Temperature {
        Temperature(self.0 * rhs)
    }
}

impl Div<f64> for Temperature {
    type Output = Temperature;

    fn div(self, rhs: f64) -> Temperature {
        Temperature(self.0 / rhs)
    }
}

/// Division of Temperature by Temperature returns a dimensionless ratio
impl Div for Temperature {
    type Output = f64;

    fn div(self, rhs: Temperature) -> f64 {
        self.0 / rhs.0
    }
}

impl Mul<Temperature> for f64 {
    type Output = Temperature;

    fn mul(self, rhs: Temperature) -> Temperature {
        rhs * self
    }
}
