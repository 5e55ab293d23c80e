//! Relocate neighborhood for local search.

use crate::problem::Problem;
use crate::solution::Solution;
use rand::seq::SliceRandom;

use super::utils::{find_route_for_customer, first_empty_route, with_inserted, with_removed};
use super::{LocalSearch, RouteChanges, IMPROVEMENT_EPSILON};

impl LocalSearch {
    /// Implement the Relocate neighborhood.
    ///
    /// Moves one stop to another position of its own route or into a route
    /// holding one of its nearest neighbours (or an unused vehicle).
    pub fn relocate_neighborhood(&mut self, solution: &mut Solution, problem: &Problem) -> bool {
        let mut route_indices: Vec<usize> = (0..solution.routes.len()).collect();
        route_indices.shuffle(&mut self.rng);

        for r1_idx in route_indices {
            if self.out_of_time() {
                return false;
            }

            let r1 = solution.routes[r1_idx].clone();
            if r1.is_empty() {
                continue;
            }

            let mut customer_indices: Vec<usize> = (0..r1.customers.len()).collect();
            customer_indices.shuffle(&mut self.rng);

            for c_pos in customer_indices {
                let customer = r1.customers[c_pos];

                let mut targets = vec![r1_idx];
                for neighbor in self.neighbors_of(customer) {
                    if let Some(r2_idx) = find_route_for_customer(solution, neighbor) {
                        if !targets.contains(&r2_idx) {
                            targets.push(r2_idx);
                        }
                    }
                }
                if r1.customers.len() > 1 {
                    if let Some(empty) = first_empty_route(solution) {
                        targets.push(empty);
                    }
                }

                for r2_idx in targets {
                    if let Some((delta, changes)) =
                        self.evaluate_relocate(solution, problem, r1_idx, r2_idx, c_pos)
                    {
                        if delta < -IMPROVEMENT_EPSILON {
                            Self::apply_change(solution, problem, changes);
                            return true;
                        }
                    }
                }
            }
        }

        false
    }

    /// Best way to move the stop at `c_pos` of `r1` into `r2`.
    fn evaluate_relocate(
        &self,
        solution: &Solution,
        problem: &Problem,
        r1_idx: usize,
        r2_idx: usize,
        c_pos: usize,
    ) -> Option<(f64, RouteChanges)> {
        let r1 = &solution.routes[r1_idx];
        let customer = r1.customers[c_pos];
        let remaining = with_removed(&r1.customers, c_pos);
        let mut best: Option<(f64, RouteChanges)> = None;

        if r1_idx == r2_idx {
            for pos in 0..=remaining.len() {
                if pos == c_pos {
                    continue;
                }
                let changes = vec![(r1_idx, with_inserted(&remaining, pos, customer))];
                if let Some(delta) = self.evaluate_change(solution, problem, &changes) {
                    if best.as_ref().map_or(true, |(d, _)| delta < *d) {
                        best = Some((delta, changes));
                    }
                }
            }
            return best;
        }

        let r2 = &solution.routes[r2_idx];
        if r2.stop_count() >= problem.constraints.max_stops_per_vehicle {
            return None;
        }

        for pos in 0..=r2.customers.len() {
            let changes = vec![
                (r1_idx, remaining.clone()),
                (r2_idx, with_inserted(&r2.customers, pos, customer)),
            ];
            if let Some(delta) = self.evaluate_change(solution, problem, &changes) {
                if best.as_ref().map_or(true, |(d, _)| delta < *d) {
                    best = Some((delta, changes));
                }
            }
        }

        best
    }
}
