//! Greedy route construction used to seed the optimizer.

use crate::problem::{Problem, DEPOT};
use crate::solution::{Route, Solution};
use log::debug;

/// Builds a feasible starting solution for a fixed vehicle count.
pub struct GreedyBuilder;

impl GreedyBuilder {
    /// Grow up to `vehicle_count` routes one after another.
    ///
    /// Each step appends the unassigned stop with the smallest
    /// `time(last -> stop) + time(stop -> depot)` among those that keep the
    /// route's distance and time (return leg included) within limits. Ties go
    /// to the stop seen first in the candidate order. Routes that never get a
    /// stop are discarded; whatever is left over is dropped.
    pub fn build(problem: &Problem, vehicle_count: usize) -> Solution {
        let constraints = &problem.constraints;
        let mut unassigned: Vec<usize> = problem.candidates.clone();
        let mut routes = Vec::new();

        for vehicle in 0..vehicle_count {
            if unassigned.is_empty() {
                break;
            }

            let mut customers = Vec::new();
            let mut last = DEPOT;
            let mut distance: u64 = 0;
            let mut duration: u64 = 0;

            while !unassigned.is_empty() && customers.len() < constraints.max_stops_per_vehicle {
                let mut best: Option<(usize, u64)> = None;

                for (pos, &stop) in unassigned.iter().enumerate() {
                    let added_time = problem
                        .duration(last, stop)
                        .saturating_add(problem.duration(stop, DEPOT));
                    let added_distance = problem
                        .distance(last, stop)
                        .saturating_add(problem.distance(stop, DEPOT));

                    if duration.saturating_add(added_time) > constraints.max_duration_seconds
                        || distance.saturating_add(added_distance) > constraints.max_distance_meters
                    {
                        continue;
                    }

                    if best.map_or(true, |(_, best_time)| added_time < best_time) {
                        best = Some((pos, added_time));
                    }
                }

                let Some((pos, _)) = best else {
                    debug!("Vehicle {}: no more stops fit the limits", vehicle + 1);
                    break;
                };

                let stop = unassigned.remove(pos);
                duration += problem.duration(last, stop);
                distance += problem.distance(last, stop);
                customers.push(stop);
                last = stop;
            }

            if customers.is_empty() {
                debug!("Vehicle {}: no valid route", vehicle + 1);
                continue;
            }

            let route = Route::from_customers(customers, problem.matrix);
            debug!(
                "Vehicle {}: {} stops, {}s, {}m",
                vehicle + 1,
                route.stop_count(),
                route.duration,
                route.distance
            );
            routes.push(route);
        }

        Solution::new(routes, unassigned, problem.matrix)
    }
}
