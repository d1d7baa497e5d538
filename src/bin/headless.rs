//! Headless universe runner
//!
//! Runs console commands, then a fixed number of ticks, and prints a JSON
//! report. Useful for scripted runs and for checking saved universes.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dado_universe::core::config::{LoadMode, UniverseConfig};
use dado_universe::core::error::Result;
use dado_universe::pulse::PulseOutcome;
use dado_universe::runtime::Session;
use dado_universe::simulation::UniverseEvent;
use dado_universe::universe::UniverseStatus;

/// Headless Dado Universe - batch commands and ticks
#[derive(Parser, Debug)]
#[command(name = "headless")]
#[command(about = "Run console commands and ticks without a terminal, then print a JSON report")]
struct Args {
    /// Number of ticks to run after the commands
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Console command to run before ticking (repeatable, in order)
    #[arg(long = "command", short = 'c')]
    commands: Vec<String>,

    /// TOML configuration file (defaults are used when it does not exist)
    #[arg(long, default_value = "data/universe.toml")]
    config: PathBuf,

    /// Directory for the snapshot files, overriding the configured storage paths
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Neither read nor write snapshot files
    #[arg(long)]
    no_save: bool,

    /// Start empty instead of failing when a snapshot file is malformed
    #[arg(long)]
    lenient: bool,
}

#[derive(Serialize)]
struct CommandOutput {
    command: String,
    lines: Vec<String>,
}

/// JSON output structure
#[derive(Serialize, Default)]
struct RunTotals {
    pulses_spawned: usize,
    pulses_delivered: usize,
    pulses_lost: usize,
    units_retired: usize,
}

#[derive(Serialize)]
struct RunReport {
    seed: Option<u64>,
    ticks: u64,
    commands: Vec<CommandOutput>,
    totals: RunTotals,
    status: UniverseStatus,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dado_universe=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = UniverseConfig::load_if_exists(&args.config)?;
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }
    if args.seed.is_some() {
        config.runtime.seed = args.seed;
    }
    if args.lenient {
        config.storage.load_mode = LoadMode::Lenient;
    }
    let seed = config.runtime.seed;

    let mut session = if args.no_save {
        Session::in_memory(config)
    } else {
        Session::open(config)?
    };

    let commands = args
        .commands
        .iter()
        .map(|command| CommandOutput {
            command: command.clone(),
            lines: session.execute(command).lines().to_vec(),
        })
        .collect();

    let mut totals = RunTotals::default();
    for _ in 0..args.ticks {
        let report = session.step();
        for event in &report.events {
            match event {
                UniverseEvent::PulseSpawned { .. } => totals.pulses_spawned += 1,
                UniverseEvent::PulseArrived(PulseOutcome::Delivered { .. }) => totals.pulses_delivered += 1,
                UniverseEvent::PulseArrived(PulseOutcome::Lost { .. }) => totals.pulses_lost += 1,
                UniverseEvent::UnitRetired { .. } => totals.units_retired += 1,
            }
        }
    }
    session.flush()?;

    let report = RunReport {
        seed,
        ticks: args.ticks,
        commands,
        totals,
        status: session.universe().status(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
