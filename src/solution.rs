//! Solution representation for the delivery routing engine.

use crate::problem::{Constraints, Problem, TravelMatrix, DEPOT};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::iter;

/// Sum (distance, duration) over the depot-bounded walk through `customers`.
pub fn measure(customers: &[usize], matrix: &TravelMatrix) -> (u64, u64) {
    if customers.is_empty() {
        return (0, 0);
    }

    iter::once(DEPOT)
        .chain(customers.iter().copied())
        .chain(iter::once(DEPOT))
        .tuple_windows()
        .fold((0u64, 0u64), |(distance, duration), (from, to)| {
            let leg = matrix.get(from, to);
            (
                distance.saturating_add(leg.distance_meters),
                duration.saturating_add(leg.duration_seconds),
            )
        })
}

/// One vehicle's visiting sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// The sequence of stop indices (excluding the depot at both ends)
    pub customers: Vec<usize>,
    /// Total distance in meters, depot legs included
    pub distance: u64,
    /// Total travel time in seconds, depot legs included
    pub duration: u64,
}

impl Route {
    /// Create a new, empty route.
    pub fn new() -> Self {
        Route::default()
    }

    /// Create a route visiting `customers` in order, with exact metrics.
    pub fn from_customers(customers: Vec<usize>, matrix: &TravelMatrix) -> Self {
        let mut route = Route {
            customers,
            distance: 0,
            duration: 0,
        };
        route.evaluate(matrix);
        route
    }

    /// Recompute distance and duration from the matrix.
    pub fn evaluate(&mut self, matrix: &TravelMatrix) {
        let (distance, duration) = measure(&self.customers, matrix);
        self.distance = distance;
        self.duration = duration;
    }

    /// Check if the route is empty.
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn stop_count(&self) -> usize {
        self.customers.len()
    }

    /// The full node sequence, starting and ending at the depot.
    pub fn nodes(&self) -> Vec<usize> {
        iter::once(DEPOT)
            .chain(self.customers.iter().copied())
            .chain(iter::once(DEPOT))
            .collect()
    }

    /// Whether the route respects every per-vehicle limit.
    pub fn is_feasible(&self, constraints: &Constraints) -> bool {
        constraints.admits(self.distance, self.duration, self.stop_count())
    }
}

/// A set of routes for one vehicle count plus the stops left unserved.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// The list of routes, one per vehicle (empty routes allowed during search)
    pub routes: Vec<Route>,
    /// Candidate stops not placed in any route
    pub dropped: Vec<usize>,
    /// Sum of route distances in meters
    pub total_distance: u64,
    /// Sum of route durations in seconds
    pub total_time: u64,
    /// Number of stops placed in a route
    pub served_count: usize,
}

impl Solution {
    /// Build a solution and compute its totals.
    pub fn new(routes: Vec<Route>, dropped: Vec<usize>, matrix: &TravelMatrix) -> Self {
        let mut solution = Solution {
            routes,
            dropped,
            ..Solution::default()
        };
        solution.evaluate(matrix);
        solution
    }

    /// Recompute every route's metrics and the solution totals.
    pub fn evaluate(&mut self, matrix: &TravelMatrix) {
        for route in &mut self.routes {
            route.evaluate(matrix);
        }
        self.update_totals();
    }

    /// Recompute totals from the routes' current metrics.
    pub fn update_totals(&mut self) {
        self.total_distance = self.routes.iter().map(|r| r.distance).sum();
        self.total_time = self.routes.iter().map(|r| r.duration).sum();
        self.served_count = self.routes.iter().map(Route::stop_count).sum();
    }

    /// Drop routes without any stop.
    pub fn remove_empty_routes(&mut self) {
        self.routes.retain(|route| !route.is_empty());
    }

    /// Whether at least one route visits a stop.
    pub fn has_routes(&self) -> bool {
        self.routes.iter().any(|route| !route.is_empty())
    }

    /// Get the number of non-empty routes.
    pub fn get_route_count(&self) -> usize {
        self.routes.iter().filter(|route| !route.is_empty()).count()
    }

    /// Certify the solution against the problem.
    ///
    /// Holds when routes fit the limits and the fleet, their metrics match the
    /// matrix exactly, and served plus dropped stops form a disjoint cover of
    /// the candidates.
    pub fn check_feasibility(&self, problem: &Problem, vehicle_count: usize) -> bool {
        if self.get_route_count() > vehicle_count {
            return false;
        }

        let candidates: HashSet<usize> = problem.candidates.iter().copied().collect();
        let mut seen = HashSet::with_capacity(candidates.len());

        for route in &self.routes {
            if (route.distance, route.duration) != measure(&route.customers, problem.matrix) {
                return false;
            }
            if !route.is_feasible(&problem.constraints) {
                return false;
            }
            if !route.customers.iter().all(|&c| seen.insert(c)) {
                return false;
            }
        }

        if !self.dropped.iter().all(|&c| seen.insert(c)) {
            return false;
        }
        if !seen.iter().all(|c| candidates.contains(c)) {
            return false;
        }

        seen.len() == candidates.len()
            && self.served_count + self.dropped.len() == candidates.len()
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Distance: {}", self.total_distance)?;
        writeln!(f, "  Time: {}", self.total_time)?;
        writeln!(f, "  Served: {}", self.served_count)?;
        writeln!(f, "  Dropped: {:?}", self.dropped)?;
        writeln!(f, "  Routes: {}", self.get_route_count())?;

        for (i, route) in self.routes.iter().enumerate() {
            writeln!(
                f,
                "  Route {}: {:?} (Distance: {}, Time: {})",
                i,
                route.nodes(),
                route.distance,
                route.duration
            )?;
        }

        Ok(())
    }
}
