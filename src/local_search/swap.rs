//! Swap neighborhood for local search.

use crate::problem::Problem;
use crate::solution::Solution;
use rand::seq::SliceRandom;

use super::utils::find_route_for_customer;
use super::{LocalSearch, IMPROVEMENT_EPSILON};

impl LocalSearch {
    /// Implement the Swap neighborhood: exchange two stops of different routes.
    pub fn swap_neighborhood(&mut self, solution: &mut Solution, problem: &Problem) -> bool {
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

            for c1_pos in customer_indices {
                let customer1 = r1.customers[c1_pos];

                for neighbor in self.neighbors_of(customer1) {
                    let Some(r2_idx) = find_route_for_customer(solution, neighbor) else {
                        continue;
                    };
                    if r2_idx == r1_idx {
                        continue;
                    }

                    let r2 = &solution.routes[r2_idx];
                    let Some(c2_pos) = r2.customers.iter().position(|&c| c == neighbor) else {
                        continue;
                    };

                    let mut r1_customers = r1.customers.clone();
                    let mut r2_customers = r2.customers.clone();
                    r1_customers[c1_pos] = neighbor;
                    r2_customers[c2_pos] = customer1;
                    let changes = vec![(r1_idx, r1_customers), (r2_idx, r2_customers)];

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
