use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Sub};

pub const SECONDS_PER_DAY: f64 = 86_400.0;
pub const SECONDS_PER_YEAR: f64 = 31_557_600.0; // 365.25 days per year

pub(crate) const SECONDS_PER_HOUR: f64 = 3_600.0;

/// A physical time quantity using f64 precision.
///
/// The `Time` struct represents time with seconds as the base unit. Orbital
/// periods close to Mars are a few hours, so the simulator steps in seconds and
/// reports horizons in days or years.
///
/// # Examples
///
/// ```rust
/// use units::Time;
///
/// let step = Time::from_seconds(60_000.0);
/// let horizon = Time::from_years(2.0);
///
/// let steps = horizon / step;
/// let days = step.to_days();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(f64); // Base unit: seconds

impl Time {
    /// Creates a zero time value
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Time` from a value in seconds.
    pub fn from_seconds(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Time` from a value in hours.
    pub fn from_hours(value: f64) -> Self {
        Self(value * SECONDS_PER_HOUR)
    }

    /// Creates a new `Time` from a value in days.
    pub fn from_days(value: f64) -> Self {
        Self(value * SECONDS_PER_DAY)
    }

    /// Creates a new `Time` from a value in Julian years.
    pub fn from_years(value: f64) -> Self {
        Self(value * SECONDS_PER_YEAR)
    }

    /// Returns the time in seconds.
    pub fn to_seconds(&self) -> f64 {
        self.0
    }

    /// Converts the time to hours.
    pub fn to_hours(&self) -> f64 {
        self.0 / SECONDS_PER_HOUR
    }

    /// Converts the time to days.
    pub fn to_days(&self) -> f64 {
        self.0 / SECONDS_PER_DAY
    }

    /// Converts the time to Julian years.
    pub fn to_years(&self) -> f64 {
        self.0 / SECONDS_PER_YEAR
    }

    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 { self } else { other }
    }

    pub fn max(self, other: Self) -> Self {
        if self.0 >= other.0 { self } else { other }
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl AddAssign for Time {
    fn add_assign(&mut self, rhs: Time) {
        self.0 += rhs.0;
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        Time(self.0 - rhs.0)
    }
}

impl Mul<f64> for Time {
    type Output = Time;

    fn mul(self, rhs: f64) -> Time {
        Time(self.0 * rhs)
    }
}

impl Div<f64> for Time {
    type Output = Time;

    fn div(self, rhs: f64) -> Time {
        Time(self.0 / rhs)
    }
}

/// Division of Time by Time returns a dimensionless ratio
impl Div for Time {
    type Output = f64;

    fn div(self, rhs: Time) -> f64 {
        self.0 / rhs.0
    }
}

/// Allow f64 * Time (commutative multiplication)
impl Mul<Time> for f64 {
    type Output = Time;

    fn mul(self, rhs: Time) -> Time {
        rhs * self
    }
}
