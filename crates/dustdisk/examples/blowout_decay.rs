//! Runs a disk from an optional JSON configuration and streams a coarse
//! history of its mass to stdout.
//!
//! ```text
//! RUST_LOG=dustdisk=debug cargo run --example blowout_decay -- run.json
//! ```

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::thread;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dustdisk::{ChannelSink, Integrator, RunConfig};

const PRINT_EVERY: u64 = 100;

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().without_time())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::from_json_reader(BufReader::new(File::open(path)?))?,
        None => RunConfig::default(),
    };

    let (sink, records) = ChannelSink::new();
    let printer = thread::spawn(move || {
        println!("{:>8} {:>14} {:>14} {:>10} {:>8}", "step", "t [s]", "M [kg]", "tau_los", "f_gate");
        for record in records {
            if record.step % PRINT_EVERY == 0 {
                println!(
                    "{:>8} {:>14.6e} {:>14.6e} {:>10.3e} {:>8.4}",
                    record.step,
                    record.time_s,
                    record.disk.mass_kg,
                    record.disk.tau_los,
                    record.gate.f_gate
                );
            }
        }
    });

    let mut integrator = Integrator::new(config, sink)?;
    let outcome = integrator.run();
    // The sink is finished on every exit path, so the printer drains and stops
    drop(integrator);
    printer.join().map_err(|_| "printer thread panicked")?;

    let summary = outcome?;
    println!(
        "{:?} after {} steps: M = {:.6e} kg of {:.6e} kg, max ledger error {:.3e}%",
        summary.reason,
        summary.steps,
        summary.final_mass.to_kg(),
        summary.ledger.initial().to_kg(),
        summary.max_error_percent
    );
    Ok(())
}
