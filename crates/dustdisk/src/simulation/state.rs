//! Committed disk state between steps.

use serde::{Deserialize, Serialize};
use units::{Length, Mass, Temperature, Time};

use super::MassFlows;
use crate::particles::SizeBins;
use crate::physics::{PhaseTag, PsatModelKind};

/// State of the disk at a step boundary.
///
/// The solid mass is always the sum of the bins; there is no separate
/// total to drift out of sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskState {
    pub time: Time,
    pub bins: SizeBins,
    /// Mars surface temperature
    pub t_mars: Temperature,
    /// Grain equilibrium temperature
    pub t_grain: Temperature,
    /// Vertical optical depth of the active distribution
    pub tau_vert: f64,
    /// Line-of-sight optical depth
    pub tau_los: f64,
    /// Active lower size bound
    pub floor: Length,
    /// Model and phase of the last step, `None` before the first step
    pub psat_model: Option<PsatModelKind>,
    pub phase: Option<PhaseTag>,
    /// Cumulative mass moved by each mechanism
    pub totals: MassFlows,
}

impl DiskState {
    pub fn total_mass(&self) -> Mass {
        self.bins.total_mass()
    }
}
