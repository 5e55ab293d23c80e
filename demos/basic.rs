//! Basic example of using the delivery routing library.
//!
//! Reads a JSON request (depot, raw address list, travel matrix over the
//! unique addresses, route settings and fleet size), routes it and prints
//! the report.
//!
//! ```text
//! RUST_LOG=info cargo run --example basic -- demos/sample_request.json
//! ```

use clap::Parser;
use delivery_routing::config::{Config, RouteSettings};
use delivery_routing::problem::TravelMatrix;
use delivery_routing::utils::{format_duration, format_miles};
use delivery_routing::{OptimizationRequest, RoutingEngine};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "basic", about = "Route a delivery request file")]
struct Args {
    /// Request file in JSON
    #[arg(default_value = "demos/sample_request.json")]
    request: PathBuf,

    /// Optimizer budget per vehicle count, in seconds
    #[arg(long, default_value_t = 30)]
    time_limit: u64,

    /// Evaluate vehicle counts one after another
    #[arg(long)]
    sequential: bool,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Deserialize)]
struct RequestFile {
    depot: String,
    addresses: Vec<String>,
    /// Indexed as `[depot] + unique addresses` in first-seen order
    matrix: TravelMatrix,
    #[serde(default)]
    settings: RouteSettings,
    vehicles: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    println!("Loading request from: {}", args.request.display());
    let file: RequestFile = serde_json::from_str(&fs::read_to_string(&args.request)?)?;

    let request = OptimizationRequest::from_addresses(
        file.depot,
        &file.addresses,
        file.matrix,
        file.settings.to_constraints()?,
        file.vehicles,
    );
    println!(
        "Loaded {} deliveries to {} unique addresses, {} vehicles available",
        file.addresses.len(),
        request.stops.len(),
        request.available_vehicles
    );

    let config = Config::new()
        .with_time_limit(Duration::from_secs(args.time_limit))
        .with_parallel(!args.sequential);
    let mut engine = RoutingEngine::new(config);
    let report = engine.optimize(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Search completed in {:.2?}", engine.run_time);
    println!("Vehicles used: {}", report.num_vehicles_used);
    println!(
        "Total: {}, {}",
        format_duration(report.total_time_seconds),
        format_miles(report.total_distance_meters)
    );
    println!(
        "Deliveries: {}/{}",
        report.delivery_counts.total_served, report.delivery_counts.total_required
    );

    for (i, route) in report.routes.iter().enumerate() {
        println!(
            "Route {}: {} ({}, {})",
            i + 1,
            route.addresses.join(" -> "),
            route.formatted_time(),
            route.formatted_distance()
        );
    }

    for missed in &report.missed {
        println!("Missed {}: {}", missed.address, missed.reason);
    }

    Ok(())
}
