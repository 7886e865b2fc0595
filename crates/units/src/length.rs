use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Mean volumetric radius of Mars in metres
pub const MARS_RADIUS_M: f64 = 3.3895e6;

const MICRON_TO_M: f64 = 1e-6;

/// A physical length quantity using f64 precision.
///
/// The `Length` struct represents lengths with metres as the base unit. Grain
/// sizes span microns to metres and orbital radii are a few Mars radii, so both
/// ends have dedicated constructors.
///
/// # Examples
///
/// ```rust
/// use units::Length;
///
/// let orbit = Length::from_mars_radii(2.5);
/// let grain = Length::from_microns(1.0);
///
/// let km = orbit.to_km();
/// let m = grain.to_m();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Length(f64); // Base unit: m

impl Length {
    /// Creates a zero length value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Length` from a value in metres.
    pub fn from_m(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Length` from a value in kilometres.
    pub fn from_km(value: f64) -> Self {
        Self(value * 1e3)
    }

    /// Creates a new `Length` from a value in microns.
    pub fn from_microns(value: f64) -> Self {
        Self(value * MICRON_TO_M)
    }

    /// Creates a new `Length` from a value in Mars radii.
    pub fn from_mars_radii(value: f64) -> Self {
        Self(value * MARS_RADIUS_M)
    }

    pub fn to_m(&self) -> f64 {
        self.0
    }

    pub fn to_km(&self) -> f64 {
        self.0 / 1e3
    }

    pub fn to_microns(&self) -> f64 {
        self.0 / MICRON_TO_M
    }

    pub fn to_mars_radii(&self) -> f64 {
        self.0 / MARS_RADIUS_M
    }

    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 { self } else { other }
    }

    pub fn max(self, other: Self) -> Self {
        if self.0 >= other.0 { self } else { other }
    }

    pub fn powi(&self, n: i32) -> f64 {
        self.0.powi(n)
    }

    pub fn powf(&self, n: f64) -> f64 {
        self.0.powf(n)
    }

    pub fn ln(&self) -> f64 {
        self.0.ln()
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl Mul<f64> for Length {
    type Output = Length;

    fn mul(self, rhs: f64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Div<f64> for Length {
    type Output = Length;

    fn div(self, rhs: f64) -> Length {
        Length(self.0 / rhs)
    }
}

/// Division of Length by Length returns a dimensionless ratio
impl Div for Length {
    type Output = f64;

    fn div(self, rhs: Length) -> f64 {
        self.0 / rhs.0
    }
}

impl Mul<Length> for f64 {
    type Output = Length;

    fn mul(self, rhs: Length) -> Length {
        rhs * self
    }
}
