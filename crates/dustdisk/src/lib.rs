//! Zero-dimensional circumplanetary dust disk around Mars.
//!
//! The crate integrates the binned size distribution of a single annulus of
//! impact debris while radiation-pressure blow-out, sublimation, collisional
//! grinding, gas drag and hydrodynamic escape compete to remove mass and an
//! optional supply adds it. Each step classifies the disk's regime, gates
//! blow-out against the competing processes and checks that the mass budget
//! closes.
//!
//! ```no_run
//! use dustdisk::{Integrator, MemorySink, RunConfig};
//!
//! let config = RunConfig::from_json_str(r#"{ "numerics": { "t_end_years": 0.5 } }"#)?;
//! let mut integrator = Integrator::new(config, MemorySink::new())?;
//! let summary = integrator.run()?;
//! println!("{:?} after {} steps", summary.reason, summary.steps);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod blowout;
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod particles;
pub mod physics;
pub mod simulation;
pub mod temperature;
pub mod timescale;

pub use config::RunConfig;
pub use error::{ConfigError, RunError, SinkError, StepError, TemperatureError};
pub use geometry::DiskGeometry;
pub use simulation::{
    ChannelSink, DiagnosticsSink, DiskState, Integrator, Lifecycle, MassBudgetLedger, MassFlows,
    MemorySink, RunSummary, StepDiagnostics, TerminationReason,
};
pub use timescale::{Timescale, TimescaleSet};
