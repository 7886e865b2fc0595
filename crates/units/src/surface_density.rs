use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

use crate::mass::Mass;

/// A physical surface density quantity using f64 precision.
///
/// Surface mass density with kg/m² as the base unit. In a single-zone disk it
/// is the total solid mass spread over the annulus area, Σ = M / A, and its
/// product with the mass opacity κ [m²/kg] is the vertical optical depth.
///
/// # Examples
///
/// ```rust
/// use units::{Mass, SurfaceDensity};
///
/// let sigma = SurfaceDensity::from_mass_over_area(Mass::from_kg(1e16), 1e13);
/// let tau = sigma.to_kg_per_m2() * 2.5e-4;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SurfaceDensity(f64); // Base unit: kg/m²

impl SurfaceDensity {
    /// Creates a zero surface density value
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_kg_per_m2(value: f64) -> Self {
        Self(value)
    }

    pub fn from_grams_per_cm2(value: f64) -> Self {
        Self(value * 10.0)
    }

    /// Spreads a mass evenly over an area given in m².
    pub fn from_mass_over_area(mass: Mass, area_m2: f64) -> Self {
        Self(mass.to_kg() / area_m2)
    }

    pub fn to_kg_per_m2(&self) -> f64 {
        self.0
    }

    pub fn to_grams_per_cm2(&self) -> f64 {
        self.0 / 10.0
    }

    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 { self } else { other }
    }
}

impl Add for SurfaceDensity {
    type Output = SurfaceDensity;

    fn add(self, rhs: SurfaceDensity) -> SurfaceDensity {
        SurfaceDensity(self.0 + rhs.0)
    }
}

impl Sub for SurfaceDensity {
    type Output = SurfaceDensity;

    fn sub(self, rhs: SurfaceDensity) -> SurfaceDensity {
        SurfaceDensity(self.0 - rhs.0)
    }
}

impl Mul<f64> for SurfaceDensity {
    type Output = SurfaceDensity;

    fn mul(self, rhs: f64) -> SurfaceDensity {
        SurfaceDensity(self.0 * rhs)
    }
}

impl Div<f64> for SurfaceDensity {
    type Output = SurfaceDensity;

    fn div(self, rhs: f64) -> SurfaceDensity {
        SurfaceDensity(self.0 / rhs)
    }
}

/// Division of SurfaceDensity by SurfaceDensity returns a dimensionless ratio
impl Div for SurfaceDensity {
    type Output = f64;

    fn div(self, rhs: SurfaceDensity) -> f64 {
        self.0 / rhs.0
    }
}
