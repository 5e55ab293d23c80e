//! Search over fleet sizes for the best vehicle count.

use crate::config::Config;
use crate::error::EngineError;
use crate::greedy::GreedyBuilder;
use crate::local_search::LocalSearch;
use crate::problem::Problem;
use crate::solution::Solution;
use crate::utils::{meters_to_miles, percent_saved, seconds_to_minutes};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Which stage produced a candidate's routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionSource {
    Optimized,
    Greedy,
}

/// The outcome of routing with one fixed vehicle count.
#[derive(Debug, Clone)]
pub struct FleetCandidate {
    pub num_vehicles: usize,
    pub solution: Solution,
    pub source: SolutionSource,
    /// The greedy seed the optimizer started from
    pub greedy: Solution,
}

impl FleetCandidate {
    /// Strict lexicographic order: more stops served, then less total time.
    pub fn is_better_than(&self, other: &FleetCandidate) -> bool {
        self.solution.served_count > other.solution.served_count
            || (self.solution.served_count == other.solution.served_count
                && self.solution.total_time < other.solution.total_time)
    }
}

/// Runs greedy construction and optimization for every vehicle count.
pub struct FleetSearch<'a> {
    problem: &'a Problem<'a>,
    config: &'a Config,
}

impl<'a> FleetSearch<'a> {
    pub fn new(problem: &'a Problem<'a>, config: &'a Config) -> Self {
        FleetSearch { problem, config }
    }

    /// Route with exactly `num_vehicles` vehicles, falling back to the greedy seed.
    pub fn evaluate(&self, num_vehicles: usize) -> FleetCandidate {
        let greedy = GreedyBuilder::build(self.problem, num_vehicles);
        let seed = self.config.seed.wrapping_add(num_vehicles as u64);
        let mut local_search = LocalSearch::new(self.config, seed);

        let (solution, source) = match local_search.optimize(&greedy, self.problem, num_vehicles) {
            Some(optimized) => (optimized, SolutionSource::Optimized),
            None => {
                debug!(
                    "{} vehicle(s): no improvement found, keeping greedy solution",
                    num_vehicles
                );
                (greedy.clone(), SolutionSource::Greedy)
            }
        };

        let candidate = FleetCandidate {
            num_vehicles,
            solution,
            source,
            greedy,
        };
        log_comparison(&candidate, self.problem.candidate_count());
        candidate
    }

    /// Evaluate vehicle counts `1..=min(available, stops)` and keep the best.
    ///
    /// Candidates may run in parallel; selection walks them in vehicle-count
    /// order afterwards, so the winner does not depend on completion order.
    pub fn run(&self, available_vehicles: usize) -> Result<FleetCandidate, EngineError> {
        let max_vehicles = available_vehicles.min(self.problem.candidate_count());
        if max_vehicles == 0 {
            return Err(EngineError::NoVehicles);
        }

        info!(
            "Testing fleet sizes 1..={} for {} stops",
            max_vehicles,
            self.problem.candidate_count()
        );

        let candidates: Vec<FleetCandidate> = if self.config.parallel {
            (1..=max_vehicles)
                .into_par_iter()
                .map(|n| self.evaluate(n))
                .collect()
        } else {
            (1..=max_vehicles).map(|n| self.evaluate(n)).collect()
        };

        select_best(candidates).ok_or(EngineError::NoFeasibleSolution)
    }
}

/// Pick the best candidate in the given order; later candidates only win when
/// strictly better. Candidates without a non-empty route are ignored.
pub fn select_best<I>(candidates: I) -> Option<FleetCandidate>
where
    I: IntoIterator<Item = FleetCandidate>,
{
    let mut best: Option<FleetCandidate> = None;

    for candidate in candidates {
        if !candidate.solution.has_routes() {
            info!(
                "{} vehicle(s): no valid solution found",
                candidate.num_vehicles
            );
            continue;
        }

        let replace = best
            .as_ref()
            .map_or(true, |current| candidate.is_better_than(current));
        if replace {
            info!(
                "{} vehicle(s): new best ({} served, {:.1} min)",
                candidate.num_vehicles,
                candidate.solution.served_count,
                seconds_to_minutes(candidate.solution.total_time)
            );
            best = Some(candidate);
        }
    }

    best
}

fn log_comparison(candidate: &FleetCandidate, stop_count: usize) {
    let greedy = &candidate.greedy;
    let solution = &candidate.solution;

    info!(
        "{} vehicle(s): served {}/{}, {:.1} min, {:.1} mi, {} routes, {} dropped ({:?})",
        candidate.num_vehicles,
        solution.served_count,
        stop_count,
        seconds_to_minutes(solution.total_time),
        meters_to_miles(solution.total_distance),
        solution.get_route_count(),
        solution.dropped.len(),
        candidate.source
    );

    if candidate.source == SolutionSource::Optimized {
        debug!(
            "{} vehicle(s) vs greedy: time saved {:+.1}%, distance saved {:+.1}%, {:+} stops served",
            candidate.num_vehicles,
            percent_saved(greedy.total_time, solution.total_time),
            percent_saved(greedy.total_distance, solution.total_distance),
            solution.served_count as i64 - greedy.served_count as i64
        );
    }
}
