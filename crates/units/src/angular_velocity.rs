use serde::{Deserialize, Serialize};

use crate::time::Time;

/// Angular velocity in rad/s
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AngularVelocity(f64);

impl AngularVelocity {
    pub fn from_rad_per_sec(value: f64) -> Self {
        Self(value)
    }

    pub fn to_rad_per_sec(&self) -> f64 {
        self.0
    }

    /// Orbital period 2π/Ω
    pub fn period(&self) -> Time {
        Time::from_seconds(std::f64::consts::TAU / self.0)
    }
}
