//! Process timescales.
//!
//! Every removal process reports either a positive finite duration or
//! `Infinite` when it is inactive. Keeping "inactive" as its own variant
//! lets the gate reduce exactly to the ungated blow-out fraction instead of
//! relying on large sentinel values.

use serde::{Deserialize, Serialize};
use units::Time;

/// A characteristic removal timescale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "seconds", rename_all = "snake_case")]
pub enum Timescale {
    /// Positive, finite duration in seconds
    Finite(f64),
    /// Process inactive
    Infinite,
}

impl Timescale {
    /// Builds a timescale from seconds.
    ///
    /// Non-finite and non-positive inputs mean the process is not acting.
    pub fn from_seconds(seconds: f64) -> Self {
        if seconds.is_finite() && seconds > 0.0 {
            Self::Finite(seconds)
        } else {
            Self::Infinite
        }
    }

    /// Builds a timescale from a rate in 1/s.
    pub fn from_rate(rate: f64) -> Self {
        if rate.is_finite() && rate > 0.0 {
            Self::from_seconds(1.0 / rate)
        } else {
            Self::Infinite
        }
    }

    pub fn seconds(&self) -> Option<f64> {
        match self {
            Self::Finite(s) => Some(*s),
            Self::Infinite => None,
        }
    }

    pub fn as_time(&self) -> Option<Time> {
        self.seconds().map(Time::from_seconds)
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Finite(_))
    }

    /// Removal rate 1/t, zero when inactive.
    pub fn rate(&self) -> f64 {
        match self {
            Self::Finite(s) => 1.0 / s,
            Self::Infinite => 0.0,
        }
    }

    /// Fraction of mass removed over `dt` by exponential decay.
    pub fn decay_fraction(&self, dt: f64) -> f64 {
        match self {
            Self::Finite(s) => (-(-dt / s).exp_m1()).clamp(0.0, 1.0),
            Self::Infinite => 0.0,
        }
    }

    /// The shorter of two timescales.
    pub fn min(self, other: Self) -> Self {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => Self::Finite(a.min(b)),
            (Self::Finite(a), Self::Infinite) | (Self::Infinite, Self::Finite(a)) => {
                Self::Finite(a)
            }
            (Self::Infinite, Self::Infinite) => Self::Infinite,
        }
    }
}

/// Competing timescales evaluated for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimescaleSet {
    /// Radiation-pressure blow-out (eligible-mass weighted)
    pub t_blow: Timescale,
    /// Sublimation of grains down to the size floor
    pub t_solid: Timescale,
    /// Collisional destruction
    pub t_coll: Timescale,
    /// Gas drag at the floor size
    pub t_drag: Timescale,
    /// Hydrodynamic escape of vapor
    pub t_escape: Timescale,
}

impl TimescaleSet {
    /// All processes inactive.
    pub fn inactive() -> Self {
        Self {
            t_blow: Timescale::Infinite,
            t_solid: Timescale::Infinite,
            t_coll: Timescale::Infinite,
            t_drag: Timescale::Infinite,
            t_escape: Timescale::Infinite,
        }
    }

    /// Shortest active timescale across all processes.
    pub fn fastest(&self) -> Timescale {
        self.t_blow
            .min(self.t_solid)
            .min(self.t_coll)
            .min(self.t_drag)
            .min(self.t_escape)
    }
}
