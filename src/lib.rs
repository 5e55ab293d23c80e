//! # Delivery Routing
//!
//! Assigns delivery stops to a fleet of identical vehicles leaving from and
//! returning to one depot, under per-vehicle limits on distance, travel time
//! and stop count.
//!
//! The engine maximizes the number of stops served and, among equally good
//! plans, minimizes total travel time. Each vehicle count from one up to the
//! available fleet is tried: a greedy builder produces a feasible seed, a
//! guided local search refines it within a wall-clock budget, and the best
//! candidate wins.

pub mod config;
pub mod dedup;
pub mod error;
pub mod feasibility;
pub mod fleet;
pub mod greedy;
pub mod local_search;
pub mod metrics;
pub mod problem;
pub mod solution;
pub mod utils;

use crate::config::Config;
use crate::error::EngineError;
use crate::feasibility::filter_stops;
use crate::fleet::FleetSearch;
use crate::metrics::{build_report, OptimizationReport};
use crate::problem::{Constraints, Problem, Stop, TravelMatrix};
use crate::utils::seconds_to_minutes;

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Inputs for one optimization call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub depot: String,
    /// Unique stops; `matrix_index` refers into `matrix`
    pub stops: Vec<Stop>,
    /// Indexed as `[depot] + stops`
    pub matrix: TravelMatrix,
    pub constraints: Constraints,
    pub available_vehicles: usize,
}

impl OptimizationRequest {
    /// Build a request from a raw address list, deduplicating it first.
    pub fn from_addresses<S: AsRef<str>>(
        depot: impl Into<String>,
        raw_addresses: &[S],
        matrix: TravelMatrix,
        constraints: Constraints,
        available_vehicles: usize,
    ) -> Self {
        OptimizationRequest {
            depot: depot.into(),
            stops: dedup::deduplicate(raw_addresses),
            matrix,
            constraints,
            available_vehicles,
        }
    }

    /// Reject requests the engine cannot even start on.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.stops.is_empty() {
            return Err(EngineError::EmptyStopList);
        }

        let expected = self.stops.len() + 1;
        let out_of_range = self
            .stops
            .iter()
            .any(|stop| stop.matrix_index == 0 || stop.matrix_index >= self.matrix.size());
        if self.matrix.size() != expected || out_of_range {
            return Err(EngineError::MatrixDimension {
                expected,
                actual: self.matrix.size(),
            });
        }

        let mut seen = HashSet::with_capacity(self.stops.len());
        if let Some(stop) = self.stops.iter().find(|stop| !seen.insert(stop.matrix_index)) {
            return Err(EngineError::DuplicateMatrixIndex {
                index: stop.matrix_index,
            });
        }

        // Struct literals skip the checks in `Constraints::new`.
        Constraints::new(
            self.constraints.max_distance_meters,
            self.constraints.max_duration_seconds,
            self.constraints.max_stops_per_vehicle,
        )?;

        if self.available_vehicles == 0 {
            return Err(EngineError::NoVehicles);
        }

        Ok(())
    }
}

/// The main structure that runs filter, fleet search and reporting.
pub struct RoutingEngine {
    pub config: Config,
    pub run_time: Duration,
}

impl RoutingEngine {
    /// Create a new engine with the given configuration.
    pub fn new(config: Config) -> Self {
        RoutingEngine {
            config,
            run_time: Duration::from_secs(0),
        }
    }

    /// Route the request and report the best plan found.
    pub fn optimize(
        &mut self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationReport, EngineError> {
        let start_time = Instant::now();
        request.validate()?;

        info!(
            "Optimizing {} stops from {} with up to {} vehicles",
            request.stops.len(),
            request.depot,
            request.available_vehicles
        );

        let filtered = filter_stops(&request.stops, &request.matrix, &request.constraints);
        if filtered.valid.is_empty() {
            return Err(EngineError::NoValidStops {
                excluded: filtered.excluded,
            });
        }

        let problem = Problem::new(
            &request.matrix,
            request.constraints,
            filtered.candidate_indices(),
        );
        let best = FleetSearch::new(&problem, &self.config).run(request.available_vehicles)?;

        info!(
            "Selected {} vehicle(s): {}/{} stops served, {:.1} min total",
            best.num_vehicles,
            best.solution.served_count,
            problem.candidate_count(),
            seconds_to_minutes(best.solution.total_time)
        );

        let report = build_report(
            &best.solution,
            best.num_vehicles,
            &request.matrix,
            &request.depot,
            &request.stops,
            &filtered.excluded,
        );

        self.run_time = start_time.elapsed();
        Ok(report)
    }
}
