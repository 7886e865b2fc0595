//! Time-stepping of the disk.
//!
//! The [`Integrator`] owns the committed [`DiskState`] and the
//! [`MassBudgetLedger`]. Each call to [`Integrator::step_once`] evaluates
//! every process against the committed state, applies the mass update to
//! copies, checks the budget and only then commits and emits a
//! [`StepDiagnostics`] record to the sink.
//!
//! # Termination
//!
//! A run ends at the time horizon, when the step budget is spent, when the
//! solid mass falls below a fraction of its initial value, or on the first
//! fatal step error. The sink is finished on every one of these paths.

mod budget;
mod diagnostics;
mod driver;
mod state;
mod timestep;

#[cfg(test)]
mod timestep_test;

pub use budget::{MassBudgetLedger, MassFlows};
pub use diagnostics::{ChannelSink, DiagnosticsSink, DiskSummary, MemorySink, StepDiagnostics};
pub use driver::{Integrator, Lifecycle, RunSummary, TerminationReason};
pub use state::DiskState;
pub use timestep::{StepPlan, next_dt, plan_steps};
