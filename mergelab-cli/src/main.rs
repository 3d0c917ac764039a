//! ## mergelab-cli
//! **Operational entrypoint for merge-tree write-path experiments**
//!
//! Runs scenario files (or ad-hoc workloads) through the deterministic
//! simulator and reports counters and the run's state hash.

use clap::Parser;
use mergelab_telemetry::logging::EventLogger;
use mergelab_telemetry::metrics::MetricsRecorder;

mod commands;

use commands::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    EventLogger::init();
    let metrics = MetricsRecorder::new();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => commands::run_simulate(args, &metrics),
        Commands::Sweep(args) => commands::run_sweep(args, &metrics),
    }
}
