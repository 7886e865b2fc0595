//! Error taxonomy for configuration, per-step failures and whole runs.

use thiserror::Error;

use crate::physics::PsatModelKind;

/// Configuration rejected before any step runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure of a temperature driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemperatureError {
    #[error("time {time_s} s outside temperature table range [{t_min_s}, {t_max_s}] s")]
    OutOfRange {
        time_s: f64,
        t_min_s: f64,
        t_max_s: f64,
    },

    #[error("temperature driver produced non-finite value at t = {time_s} s")]
    NonFinite { time_s: f64 },
}

/// Failure of a diagnostics sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("diagnostics receiver disconnected")]
    Disconnected,

    #[error("diagnostics sink already finished")]
    Finished,
}

/// Fatal condition raised while evaluating or committing one step.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(
        "mass budget violated: error {error_percent:.6}% exceeds tolerance {tolerance_percent}% \
         (discrepancy {discrepancy_kg:.6e} kg)"
    )]
    BudgetViolation {
        error_percent: f64,
        tolerance_percent: f64,
        discrepancy_kg: f64,
    },

    #[error("phase unresolvable at T = {temperature_k} K (vapor fraction {vapor_fraction})")]
    PhaseUnresolvable {
        temperature_k: f64,
        vapor_fraction: f64,
    },

    #[error("{model} vapor pressure model has no valid domain at T = {temperature_k} K")]
    ModelDomainExhausted {
        model: PsatModelKind,
        temperature_k: f64,
    },

    #[error(transparent)]
    Temperature(#[from] TemperatureError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Error returned to the caller of a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("step {step} failed: {source}")]
    Step {
        step: u64,
        #[source]
        source: StepError,
    },

    #[error("integrator halted after step {step} failed")]
    Halted { step: u64 },
}

impl RunError {
    /// Index of the failing step, if the failure happened mid-run.
    pub fn step(&self) -> Option<u64> {
        match self {
            Self::Step { step, .. } | Self::Halted { step } => Some(*step),
            Self::Config(_) => None,
        }
    }
}
