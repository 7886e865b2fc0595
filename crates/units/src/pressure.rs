use serde::{Deserialize, Serialize};

const PA_PER_BAR: f64 = 1e5;

/// Pressure in pascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pressure(f64);

impl Pressure {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_pa(value: f64) -> Self {
        Self(value)
    }

    pub fn from_bar(value: f64) -> Self {
        Self(value * PA_PER_BAR)
    }

    pub fn to_pa(&self) -> f64 {
        self.0
    }

    pub fn to_bar(&self) -> f64 {
        self.0 / PA_PER_BAR
    }
}
