//! Plans deliveries from Elizabeth Quay to ten Perth suburbs.
//!
//! Usage: `perth-demo [--config config.json] [--log-file output/vrs.log]`.
//! The JSON report goes to stdout, logs go to stderr and the log file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use delivery_routing::distance::DegreeApproximation;
use delivery_routing::logging::init_logging;
use delivery_routing::models::{Customer, Location, TimeWindow, Vehicle};
use delivery_routing::report::{JsonReportSink, LogReportSink, ReportSink, RunReport};
use delivery_routing::{Result, RoutingConfig, RoutingError, RoutingSystem};
use tracing::{error, info};

const DEPOT: Location = Location {
    lat: -31.9523,
    lon: 115.8613,
};
const NUM_VEHICLES: u32 = 3;

const SUBURBS: [(&str, f64, f64); 10] = [
    ("Fremantle", -32.0569, 115.7439),
    ("Scarborough", -31.8943, 115.7505),
    ("Midland", -31.8915, 116.0010),
    ("Armadale", -32.1506, 116.0137),
    ("Joondalup", -31.7430, 115.7629),
    ("Victoria Park", -31.9714, 115.8971),
    ("Cottesloe", -31.9927, 115.7547),
    ("Belmont", -31.9433, 115.9169),
    ("Canning Vale", -32.0547, 115.9075),
    ("Morley", -31.8865, 115.9006),
];

/// Window presets in hours from the start: early, mid, late, flexible.
const WINDOW_PRESETS: [(f64, f64); 4] = [(0.0, 2.0), (1.0, 3.0), (2.0, 5.0), (0.0, 4.0)];

/// Plans deliveries from Elizabeth Quay to ten Perth suburbs.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON routing configuration; defaults are used when omitted.
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// File receiving JSON log lines.
    #[arg(long, default_value = "output/vrs.log")]
    log_file: PathBuf,
}

fn load_config(path: Option<&Path>) -> Result<RoutingConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| {
                RoutingError::InvalidConfig(format!("{}: {e}", path.display()))
            })?;
            RoutingConfig::from_json(&json)
        }
        None => Ok(RoutingConfig::default()),
    }
}

fn perth_customers() -> Result<Vec<Customer>> {
    SUBURBS
        .iter()
        .enumerate()
        .map(|(k, &(name, lat, lon))| {
            let i = k as u32 + 1;
            let (start, end) = WINDOW_PRESETS[i as usize % WINDOW_PRESETS.len()];
            let window = TimeWindow::from_hours(start, end)
                .ok_or_else(|| RoutingError::InvalidConfig(format!("bad window for {name}")))?;
            Ok(Customer::new(i, Location::new(lat, lon), 150.0 + f64::from((i * 50) % 200))
                .with_time_window(window)
                .with_priority(if i % 3 == 0 { 2 } else { 1 }))
        })
        .collect()
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut system = RoutingSystem::new(DEPOT, config.clone(), DegreeApproximation)?;

    for id in 0..NUM_VEHICLES {
        system.add_vehicle(Vehicle::new(id, config.vehicle_capacity, DEPOT))?;
    }
    for customer in perth_customers()? {
        system.add_customer(customer)?;
    }

    let plan = system.optimize()?;
    let report = RunReport::from_plan(&plan)?;

    LogReportSink.publish(&report)?;
    JsonReportSink::new(std::io::stdout().lock()).publish(&report)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Some(dir) = args.log_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("cannot create {}: {e}", dir.display());
            return ExitCode::FAILURE;
        }
    }
    let _guard = match init_logging(Some(args.log_file.as_path())) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("cannot initialise logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("planning Perth deliveries");
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}
