//! Per-step diagnostics and the sinks that receive them.

use std::sync::mpsc::{self, Receiver, Sender};

use serde::Serialize;

use super::MassFlows;
use crate::blowout::GateDecision;
use crate::error::SinkError;
use crate::particles::FloorSource;
use crate::physics::{OpticalDepthRegime, PhaseState};
use crate::timescale::TimescaleSet;

/// Disk quantities after a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskSummary {
    pub mass_kg: f64,
    pub sigma_kg_m2: f64,
    pub sigma_active_kg_m2: f64,
    pub tau_vert: f64,
    pub tau_los: f64,
    /// Column-mean flux fraction
    pub flux_factor: f64,
    /// Flux fraction reaching the skin
    pub skin_flux_factor: f64,
    /// Σ of the τ ≤ 1 skin, `null` in JSON when unshielded
    pub sigma_tau1_kg_m2: f64,
    pub s_floor_m: f64,
    pub floor_source: FloorSource,
    pub s_blow_m: f64,
    pub beta_at_floor: f64,
    pub t_mars_k: f64,
    pub t_grain_k: f64,
}

/// Snapshot of one committed step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepDiagnostics {
    pub step: u64,
    /// Time at the end of the step (s)
    pub time_s: f64,
    pub dt_s: f64,
    pub phase: PhaseState,
    pub timescales: TimescaleSet,
    pub collision_regime: OpticalDepthRegime,
    pub gate: GateDecision,
    pub ledger_error_percent: f64,
    pub disk: DiskSummary,
    /// Mass moved by each mechanism during this step
    pub removed: MassFlows,
}

/// Receives diagnostics in step order.
pub trait DiagnosticsSink {
    fn emit(&mut self, record: StepDiagnostics) -> Result<(), SinkError>;

    /// Called once when the run ends, on success and failure alike.
    fn finish(&mut self) -> Result<(), SinkError>;
}

/// Collects every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<StepDiagnostics>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[StepDiagnostics] {
        &self.records
    }

    pub fn into_records(self) -> Vec<StepDiagnostics> {
        self.records
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl DiagnosticsSink for MemorySink {
    fn emit(&mut self, record: StepDiagnostics) -> Result<(), SinkError> {
        if self.finished {
            return Err(SinkError::Finished);
        }
        self.records.push(record);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.finished = true;
        Ok(())
    }
}

/// Forwards records to another thread.
///
/// Sending never blocks; `finish` drops the sender so the receiver sees the
/// end of the stream.
#[derive(Debug)]
pub struct ChannelSink {
    sender: Option<Sender<StepDiagnostics>>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<StepDiagnostics>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }
}

impl DiagnosticsSink for ChannelSink {
    fn emit(&mut self, record: StepDiagnostics) -> Result<(), SinkError> {
        let sender = self.sender.as_ref().ok_or(SinkError::Finished)?;
        sender.send(record).map_err(|_| SinkError::Disconnected)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.sender.take();
        Ok(())
    }
}
