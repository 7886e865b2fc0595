use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Mass of Mars in kilograms
pub const MARS_MASS_KG: f64 = 6.4171e23;

/// A physical mass quantity using f64 precision.
///
/// The `Mass` struct uses kilograms as the base unit. Debris disk masses are
/// often quoted as a fraction of the planet mass, hence `from_mars_masses`.
///
/// # Examples
///
/// ```rust
/// use units::Mass;
///
/// let disk = Mass::from_mars_masses(1e-5);
/// let kg = disk.to_kg();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Mass(f64); // Base unit: kg

impl Mass {
    /// Creates a zero mass value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Mass` from a value in kilograms.
    pub fn from_kg(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Mass` from a value in grams.
    pub fn from_grams(value: f64) -> Self {
        Self(value / 1e3)
    }

    /// Creates a new `Mass` from a value in Mars masses.
    pub fn from_mars_masses(value: f64) -> Self {
        Self(value * MARS_MASS_KG)
    }

    pub fn to_kg(&self) -> f64 {
        self.0
    }

    pub fn to_grams(&self) -> f64 {
        self.0 * 1e3
    }

    pub fn to_mars_masses(&self) -> f64 {
        self.0 / MARS_MASS_KG
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl Add for Mass {
    type Output = Mass;

    fn add(self, rhs: Mass) -> Mass {
        Mass(self.0 + rhs.0)
    }
}

impl Sub for Mass {
    type Output = Mass;

    fn sub(self, rhs: Mass) -> Mass {
        Mass(self.0 - rhs.0)
    }
}

impl Mul<f64> for Mass {
    type Output = Mass;

    fn mul(self, rhs: f64) -> Mass {
        Mass(self.0 * rhs)
    }
}

impl Div<f64> for Mass {
    type Output = Mass;

    fn div(self, rhs: f64) -> Mass {
        Mass(self.0 / rhs)
    }
}

/// Division of Mass by Mass returns a dimensionless ratio
impl Div for Mass {
    type Output = f64;

    fn div(self, rhs: Mass) -> f64 {
        self.0 / rhs.0
    }
}

impl Mul<Mass> for f64 {
    type Output = Mass;

    fn mul(self, rhs: Mass) -> Mass {
        rhs * self
    }
}

impl std::iter::Sum for Mass {
    fn sum<I: Iterator<Item = Mass>>(iter: I) -> Mass {
        iter.fold(Mass::zero(), |acc, m| acc + m)
    }
}
