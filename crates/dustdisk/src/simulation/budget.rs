//! Mass budget accounting.
//!
//! Every kilogram entering or leaving the bins is attributed to a mechanism.
//! After each update the ledger checks
//!
//! ```text
//! |M0 + sources - sinks - M| / M0 × 100 ≤ tolerance
//! ```
//!
//! and a violation is fatal for the run.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use units::Mass;

use crate::error::{ConfigError, StepError};

/// Mass moved by each mechanism (kg).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MassFlows {
    /// Source: external supply
    pub supply: f64,
    pub blowout: f64,
    pub sublimation: f64,
    /// Fragments ground below the floor
    pub collisions: f64,
    /// Bins overtaken by the size floor
    pub floor: f64,
    pub gas_drag: f64,
    pub hydro_escape: f64,
}

impl MassFlows {
    pub fn sources(&self) -> f64 {
        self.supply
    }

    pub fn sinks(&self) -> f64 {
        self.blowout
            + self.sublimation
            + self.collisions
            + self.floor
            + self.gas_drag
            + self.hydro_escape
    }
}

impl AddAssign for MassFlows {
    fn add_assign(&mut self, other: Self) {
        self.supply += other.supply;
        self.blowout += other.blowout;
        self.sublimation += other.sublimation;
        self.collisions += other.collisions;
        self.floor += other.floor;
        self.gas_drag += other.gas_drag;
        self.hydro_escape += other.hydro_escape;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassBudgetLedger {
    initial_kg: f64,
    totals: MassFlows,
    current_kg: f64,
    tolerance_percent: f64,
    max_error_percent: f64,
}

impl MassBudgetLedger {
    pub fn new(initial: Mass, tolerance_percent: f64) -> Result<Self, ConfigError> {
        let initial_kg = initial.to_kg();
        if !(initial_kg > 0.0 && initial_kg.is_finite()) {
            return Err(ConfigError::invalid(
                "initial.mass_total_mars_masses",
                format!("initial mass must be positive, got {initial_kg} kg"),
            ));
        }
        Ok(Self {
            initial_kg,
            totals: MassFlows::default(),
            current_kg: initial_kg,
            tolerance_percent,
            max_error_percent: 0.0,
        })
    }

    /// Adds one step's flows and the new bin total.
    pub fn record(&mut self, flows: &MassFlows, current: Mass) {
        self.totals += *flows;
        self.current_kg = current.to_kg();
    }

    pub fn initial(&self) -> Mass {
        Mass::from_kg(self.initial_kg)
    }

    pub fn current(&self) -> Mass {
        Mass::from_kg(self.current_kg)
    }

    pub fn totals(&self) -> &MassFlows {
        &self.totals
    }

    pub fn tolerance_percent(&self) -> f64 {
        self.tolerance_percent
    }

    /// Largest error seen by [`check`](Self::check).
    pub fn max_error_percent(&self) -> f64 {
        self.max_error_percent
    }

    /// M0 + sources - sinks - M (kg)
    pub fn discrepancy_kg(&self) -> f64 {
        self.initial_kg + self.totals.sources() - self.totals.sinks() - self.current_kg
    }

    pub fn error_percent(&self) -> f64 {
        self.discrepancy_kg().abs() / self.initial_kg * 100.0
    }

    /// Verifies the budget and returns the current error.
    pub fn check(&mut self) -> Result<f64, StepError> {
        let error_percent = self.error_percent();
        if !(error_percent <= self.tolerance_percent) {
            return Err(StepError::BudgetViolation {
                error_percent,
                tolerance_percent: self.tolerance_percent,
                discrepancy_kg: self.discrepancy_kg(),
            });
        }
        self.max_error_percent = self.max_error_percent.max(error_percent);
        Ok(error_percent)
    }
}
