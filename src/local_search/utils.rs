//! Utility functions for local search operations.

use crate::config::Config;
use crate::problem::{Constraints, Problem, TravelMatrix};
use crate::solution::{measure, Route, Solution};
use std::cmp::Ordering;

/// Cumulative value of the three dimensions at the end of a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteLoad {
    pub distance: u64,
    pub duration: u64,
    pub stops: usize,
}

impl RouteLoad {
    /// Measure a customer sequence against the matrix.
    pub fn of(customers: &[usize], matrix: &TravelMatrix) -> Self {
        let (distance, duration) = measure(customers, matrix);
        RouteLoad {
            distance,
            duration,
            stops: customers.len(),
        }
    }

    /// Read the cached metrics of an evaluated route.
    pub fn of_route(route: &Route) -> Self {
        RouteLoad {
            distance: route.distance,
            duration: route.duration,
            stops: route.stop_count(),
        }
    }

    pub fn is_feasible(&self, constraints: &Constraints) -> bool {
        constraints.admits(self.distance, self.duration, self.stops)
    }
}

/// Transit cost plus weighted spans of the distance, time and stop dimensions.
#[derive(Debug, Clone, Copy)]
pub struct Objective {
    pub distance_span_coefficient: u64,
    pub time_span_coefficient: u64,
    pub stops_span_coefficient: u64,
}

impl Objective {
    pub fn from_config(config: &Config) -> Self {
        Objective {
            distance_span_coefficient: config.distance_span_coefficient,
            time_span_coefficient: config.time_span_coefficient,
            stops_span_coefficient: config.stops_span_coefficient,
        }
    }

    /// Evaluate the objective over every vehicle's load, empty vehicles included.
    pub fn evaluate<I>(&self, loads: I) -> u64
    where
        I: IntoIterator<Item = RouteLoad>,
    {
        let mut transit: u64 = 0;
        let mut distance = Span::default();
        let mut duration = Span::default();
        let mut stops = Span::default();

        for load in loads {
            transit = transit.saturating_add(load.distance);
            distance.add(load.distance);
            duration.add(load.duration);
            stops.add(load.stops as u64);
        }

        transit
            .saturating_add(self.distance_span_coefficient.saturating_mul(distance.width()))
            .saturating_add(self.time_span_coefficient.saturating_mul(duration.width()))
            .saturating_add(self.stops_span_coefficient.saturating_mul(stops.width()))
    }

    /// Objective value of a solution as it stands.
    pub fn cost(&self, solution: &Solution) -> u64 {
        self.evaluate(solution.routes.iter().map(RouteLoad::of_route))
    }
}

#[derive(Debug, Default)]
struct Span {
    bounds: Option<(u64, u64)>,
}

impl Span {
    fn add(&mut self, value: u64) {
        self.bounds = Some(match self.bounds {
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
            None => (value, value),
        });
    }

    fn width(&self) -> u64 {
        self.bounds.map_or(0, |(lo, hi)| hi - lo)
    }
}

/// Search quality: more served stops first, then lower objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality {
    pub served: usize,
    pub cost: u64,
}

impl Quality {
    pub fn of(solution: &Solution, objective: &Objective) -> Self {
        Quality {
            served: solution.served_count,
            cost: objective.cost(solution),
        }
    }

    /// Strictly better than `other`.
    pub fn beats(&self, other: &Quality) -> bool {
        match self.served.cmp(&other.served) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.cost < other.cost,
        }
    }
}

/// The `granularity` candidates closest to `customer` by travel time, either direction.
pub fn get_neighbors(customer: usize, problem: &Problem, granularity: usize) -> Vec<usize> {
    let mut times: Vec<(usize, u64)> = problem
        .candidates
        .iter()
        .filter(|&&other| other != customer)
        .map(|&other| {
            let time = problem
                .duration(customer, other)
                .min(problem.duration(other, customer));
            (other, time)
        })
        .collect();

    times.sort_by_key(|&(_, time)| time);
    times.truncate(granularity);

    times.into_iter().map(|(idx, _)| idx).collect()
}

/// Find which route contains a specific customer.
pub fn find_route_for_customer(solution: &Solution, customer: usize) -> Option<usize> {
    solution
        .routes
        .iter()
        .position(|route| route.customers.contains(&customer))
}

/// Index of the first route without stops, if any.
pub fn first_empty_route(solution: &Solution) -> Option<usize> {
    solution.routes.iter().position(Route::is_empty)
}

/// A copy of `customers` with `customer` inserted at `pos`.
pub fn with_inserted(customers: &[usize], pos: usize, customer: usize) -> Vec<usize> {
    let mut result = Vec::with_capacity(customers.len() + 1);
    result.extend_from_slice(&customers[..pos]);
    result.push(customer);
    result.extend_from_slice(&customers[pos..]);
    result
}

/// A copy of `customers` without the entry at `pos`.
pub fn with_removed(customers: &[usize], pos: usize) -> Vec<usize> {
    let mut result = customers.to_vec();
    result.remove(pos);
    result
}
