use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

/// Velocity in m/s
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Velocity(f64);

impl Velocity {
    pub fn from_m_per_sec(value: f64) -> Self {
        Self(value)
    }

    pub fn from_km_per_sec(value: f64) -> Self {
        Self(value * 1e3)
    }

    pub fn to_m_per_sec(&self) -> f64 {
        self.0
    }

    pub fn to_km_per_sec(&self) -> f64 {
        self.0 / 1e3
    }
}

impl Mul<f64> for Velocity {
    type Output = Velocity;

    fn mul(self, rhs: f64) -> Velocity {
        Velocity(self.0 * rhs)
    }
}

impl Div<f64> for Velocity {
    type Output = Velocity;

    fn div(self, rhs: f64) -> Velocity {
        Velocity(self.0 / rhs)
    }
}
