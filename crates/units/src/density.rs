use serde::{Deserialize, Serialize};

/// Volume density in kg/m³
///
/// Used both for grain bulk density (~3000 kg/m³ for silicates) and for the
/// ambient gas density entering drag.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Density(f64);

impl Density {
    pub fn from_kg_per_m3(value: f64) -> Self {
        Self(value)
    }

    pub fn from_grams_per_cm3(value: f64) -> Self {
        Self(value * 1e3)
    }

    pub fn to_kg_per_m3(&self) -> f64 {
        self.0
    }

    pub fn to_grams_per_cm3(&self) -> f64 {
        self.0 / 1e3
    }
}
