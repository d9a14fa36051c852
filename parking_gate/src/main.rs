//! # Parking Gate
//!
//! Runs parking lot gates against simulated field I/O.
//!
//! - Default: run every drive-through scenario and report the results.
//! - `--scenario NAME` (repeatable): run only the named scenarios.
//! - `--serve`: run one entry and one exit scan loop on their own threads,
//!   sharing one lot, until Ctrl-C.
//!
//! ```bash
//! parking_gate --config lot.toml -v
//! parking_gate --scenario round-trip --scenario lot-full --realtime
//! parking_gate --serve --json
//! ```

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use clap::Parser;
use parking_common::config::{ConfigError, ConfigLoader, LogLevel, LotConfig};
use parking_common::consts::DEFAULT_CONFIG_PATH;
use parking_gate::cycle::CycleRunner;
use parking_gate::lot::ParkingLot;
use parking_gate::sim::SimulatedGate;
use parking_gate::sim::scenario::{self, Rig, Scenario};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Parking Gate: scan-cycle barrier control
#[derive(Parser, Debug)]
#[command(name = "parking_gate")]
#[command(version)]
#[command(about = "Scan-cycle parking gate controller with simulated field I/O")]
struct Args {
    /// Lot configuration TOML. Falls back to /etc/parking/lot.toml, then
    /// built-in defaults.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Scenario to run (repeatable). Runs all when omitted.
    #[arg(short, long = "scenario", value_name = "NAME")]
    scenarios: Vec<String>,

    /// List available scenarios and exit.
    #[arg(long)]
    list: bool,

    /// Pace every tick to the configured cycle time.
    #[arg(long)]
    realtime: bool,

    /// Run entry and exit scan loops until interrupted.
    #[arg(long, conflicts_with_all = ["scenarios", "list"])]
    serve: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let config = load_config(&args);
    let level = config
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, level);

    info!("Parking Gate v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = config
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, &config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args, config: &LotConfig) -> Result<(), Box<dyn std::error::Error>> {
    if args.list {
        for s in scenario::ALL {
            println!("{:<22} {}", s.name, s.description);
        }
        return Ok(());
    }

    let cycle_time = Duration::from_micros(config.cycle.cycle_time_us as u64);
    info!(
        "Config OK: service={}, capacity={}, cycle_time={}µs",
        config.shared.service_name, config.lot.max_capacity, config.cycle.cycle_time_us,
    );

    if args.serve {
        return serve(config, cycle_time);
    }

    let selected = select_scenarios(&args.scenarios)?;
    let mut failed = 0usize;
    for s in &selected {
        let mut rig = Rig::new(ParkingLot::from_config(config), cycle_time, args.realtime);
        match s.run(&mut rig) {
            Ok(report) => info!(
                scenario = report.name,
                entry_cycles = report.entry_cycles,
                exit_cycles = report.exit_cycles,
                parked = report.parked,
                "PASS"
            ),
            Err(e) => {
                failed += 1;
                error!(scenario = s.name, "FAIL: {e}");
            }
        }
    }

    info!("{} of {} scenarios passed", selected.len() - failed, selected.len());
    if failed > 0 {
        return Err(format!("{failed} scenario(s) failed").into());
    }
    Ok(())
}

fn select_scenarios(names: &[String]) -> Result<Vec<Scenario>, Box<dyn std::error::Error>> {
    if names.is_empty() {
        return Ok(scenario::ALL.to_vec());
    }
    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        match scenario::find(name) {
            Some(s) => selected.push(*s),
            None => return Err(format!("unknown scenario '{name}' (see --list)").into()),
        }
    }
    Ok(selected)
}

/// Entry and exit gates of one lot, each on its own scan thread.
fn serve(config: &LotConfig, cycle_time: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let lot = ParkingLot::from_config(config);
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut entry = CycleRunner::new(lot.init_entry_gate(), SimulatedGate::new(), cycle_time);
    let mut exit = CycleRunner::new(lot.init_exit_gate(), SimulatedGate::new(), cycle_time);

    // A failed loop stops the other one too.
    let scan = |name: &str, runner: &mut CycleRunner<SimulatedGate>| {
        if let Err(e) = runner.run(&running) {
            error!("{name} scan loop failed: {e}");
            running.store(false, Ordering::SeqCst);
            return Err(e);
        }
        Ok(())
    };

    let results = thread::scope(|s| {
        let entry_loop = s.spawn(|| scan("entry", &mut entry));
        let exit_loop = s.spawn(|| scan("exit", &mut exit));
        [entry_loop.join(), exit_loop.join()]
    });

    let parked = lot.registry().parked_plates();
    info!(parked = parked.len(), plates = ?parked, "Parking Gate shutdown complete");
    for result in results {
        match result {
            Ok(r) => r?,
            Err(_) => return Err("scan thread panicked".into()),
        }
    }
    Ok(())
}

/// Load the lot config: explicit path, then the system path, then defaults.
fn load_config(args: &Args) -> Result<LotConfig, ConfigError> {
    let system = Path::new(DEFAULT_CONFIG_PATH);
    let config = match &args.config {
        Some(path) => LotConfig::load(path)?,
        None if system.exists() => LotConfig::load(system)?,
        None => LotConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Setup tracing subscriber based on CLI arguments and configured level.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from(configured)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
