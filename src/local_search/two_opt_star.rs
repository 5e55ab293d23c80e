//! 2-Opt* neighborhood for local search (inter-route tail exchange).

use crate::problem::Problem;
use crate::solution::Solution;
use rand::seq::SliceRandom;

use super::utils::first_empty_route;
use super::{LocalSearch, IMPROVEMENT_EPSILON};

impl LocalSearch {
    /// Implement the 2-Opt* neighborhood.
    ///
    /// Cuts two routes and reconnects the head of each with the tail of the
    /// other. Pairing a route with an unused vehicle splits it in two.
    pub fn two_opt_star_neighborhood(
        &mut self,
        solution: &mut Solution,
        problem: &Problem,
    ) -> bool {
        let empty_route = first_empty_route(solution);
        let mut route_indices: Vec<usize> = (0..solution.routes.len())
            .filter(|&r| !solution.routes[r].is_empty() || Some(r) == empty_route)
            .collect();
        route_indices.shuffle(&mut self.rng);

        for (k, &r1_idx) in route_indices.iter().enumerate() {
            if self.out_of_time() {
                return false;
            }

            for &r2_idx in &route_indices[k + 1..] {
                let r1 = &solution.routes[r1_idx].customers;
                let r2 = &solution.routes[r2_idx].customers;
                if r1.is_empty() && r2.is_empty() {
                    continue;
                }

                for i in 0..=r1.len() {
                    for j in 0..=r2.len() {
                        // Both cuts at an end just relabels the routes.
                        if (i == 0 && j == 0) || (i == r1.len() && j == r2.len()) {
                            continue;
                        }

                        let new_r1: Vec<usize> = r1[..i].iter().chain(&r2[j..]).copied().collect();
                        let new_r2: Vec<usize> = r2[..j].iter().chain(&r1[i..]).copied().collect();
                        let changes = vec![(r1_idx, new_r1), (r2_idx, new_r2)];

                        if let Some(delta) = self.evaluate_change(solution, problem, &changes) {
                            if delta < -IMPROVEMENT_EPSILON {
                                Self::apply_change(solution, problem, changes);
                                return true;
                            }
                        }
                    }
                }
            }
        }

        false
    }
}
