//! 2-Opt neighborhood for local search (intra-route).

use crate::problem::Problem;
use crate::solution::Solution;
use rand::seq::SliceRandom;

use super::{LocalSearch, IMPROVEMENT_EPSILON};

impl LocalSearch {
    /// Implement the 2-Opt neighborhood for intra-route improvements.
    ///
    /// Travel estimates are directional, so each reversal is re-measured in
    /// full rather than through the usual four-edge delta.
    pub fn two_opt_neighborhood(&mut self, solution: &mut Solution, problem: &Problem) -> bool {
        let mut route_indices: Vec<usize> = (0..solution.routes.len()).collect();
        route_indices.shuffle(&mut self.rng);

        for r_idx in route_indices {
            if self.out_of_time() {
                return false;
            }

            let customers = solution.routes[r_idx].customers.clone();
            let n = customers.len();
            if n < 2 {
                continue;
            }

            let mut positions: Vec<usize> = (0..n - 1).collect();
            positions.shuffle(&mut self.rng);

            for i in positions {
                for j in i + 1..n {
                    let mut reversed = customers.clone();
                    reversed[i..=j].reverse();
                    let changes = vec![(r_idx, reversed)];

                    if let Some(delta) = self.evaluate_change(solution, problem, &changes) {
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
}
