//! Guided local search penalties on arcs.

use crate::problem::{Problem, DEPOT};
use crate::solution::Solution;
use itertools::Itertools;
use std::collections::HashMap;
use std::iter;

/// Penalty counters for arcs `u -> v` seen at local optima.
#[derive(Debug, Default, Clone)]
pub struct ArcPenalties {
    penalties: HashMap<(usize, usize), u32>,
}

impl ArcPenalties {
    pub fn new() -> Self {
        ArcPenalties::default()
    }

    /// Read current penalty p(u,v).
    pub fn get(&self, from: usize, to: usize) -> u32 {
        self.penalties.get(&(from, to)).copied().unwrap_or(0)
    }

    /// Sum of penalties along the depot-bounded walk through `customers`.
    pub fn route_penalty(&self, customers: &[usize]) -> u64 {
        if customers.is_empty() || self.penalties.is_empty() {
            return 0;
        }

        arcs(customers)
            .map(|(from, to)| u64::from(self.get(from, to)))
            .sum()
    }

    /// Number of arcs used by the solution.
    pub fn arc_count(solution: &Solution) -> usize {
        solution
            .routes
            .iter()
            .filter(|route| !route.is_empty())
            .map(|route| route.stop_count() + 1)
            .sum()
    }

    /// Penalize the used arcs of maximum utility `distance / (1 + p)`.
    ///
    /// Returns `false` when the solution has no arcs to penalize.
    pub fn penalize(&mut self, solution: &Solution, problem: &Problem) -> bool {
        let used: Vec<(usize, usize)> = solution
            .routes
            .iter()
            .filter(|route| !route.is_empty())
            .flat_map(|route| arcs(&route.customers).collect::<Vec<_>>())
            .collect();

        let utility = |&(from, to): &(usize, usize)| {
            problem.distance(from, to) as f64 / (1.0 + f64::from(self.get(from, to)))
        };

        let Some(max_utility) = used.iter().map(utility).reduce(f64::max) else {
            return false;
        };

        let selected: Vec<(usize, usize)> = used
            .iter()
            .filter(|arc| (utility(arc) - max_utility).abs() < 1e-9)
            .copied()
            .collect();

        for arc in selected {
            *self.penalties.entry(arc).or_insert(0) += 1;
        }

        true
    }

    /// Clear all penalties.
    pub fn clear(&mut self) {
        self.penalties.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.penalties.is_empty()
    }
}

fn arcs(customers: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    iter::once(DEPOT)
        .chain(customers.iter().copied())
        .chain(iter::once(DEPOT))
        .tuple_windows()
}
