//! Insertion of dropped stops back into routes.

use crate::problem::Problem;
use crate::solution::Solution;
use rand::seq::SliceRandom;

use super::utils::{first_empty_route, with_inserted};
use super::{LocalSearch, RouteChanges};

impl LocalSearch {
    /// Try to place every dropped stop at its cheapest feasible position.
    ///
    /// Serving one more stop always beats any cost change, so the best feasible
    /// insertion is applied regardless of its delta.
    pub fn insert_neighborhood(&mut self, solution: &mut Solution, problem: &Problem) -> bool {
        if solution.dropped.is_empty() {
            return false;
        }

        let mut improvement = false;
        let mut dropped = solution.dropped.clone();
        dropped.shuffle(&mut self.rng);

        for customer in dropped {
            if self.out_of_time() {
                break;
            }

            let empty_route = first_empty_route(solution);
            let mut best: Option<(f64, RouteChanges)> = None;

            for (r_idx, route) in solution.routes.iter().enumerate() {
                // Vehicles are identical; one empty route stands for all of them.
                if route.is_empty() && Some(r_idx) != empty_route {
                    continue;
                }
                if route.stop_count() >= problem.constraints.max_stops_per_vehicle {
                    continue;
                }

                for pos in 0..=route.customers.len() {
                    let changes = vec![(r_idx, with_inserted(&route.customers, pos, customer))];

                    if let Some(delta) = self.evaluate_change(solution, problem, &changes) {
                        if best.as_ref().map_or(true, |(best_delta, _)| delta < *best_delta) {
                            best = Some((delta, changes));
                        }
                    }
                }
            }

            if let Some((_, changes)) = best {
                solution.dropped.retain(|&c| c != customer);
                Self::apply_change(solution, problem, changes);
                improvement = true;
            }
        }

        improvement
    }
}
