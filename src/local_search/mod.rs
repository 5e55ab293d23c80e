//! Constrained local search refining a greedy seed.
//!
//! Guided local search over three dimensions (distance, time and stop count),
//! each capped per vehicle. Every neighbourhood evaluates moves exactly against
//! the matrix and rejects anything that breaks a cap, so the search never
//! leaves the feasible region.

pub mod gls;
pub mod insert;
pub mod relocate;
pub mod swap;
pub mod two_opt;
pub mod two_opt_star;
pub mod utils;

use crate::config::Config;
use crate::problem::Problem;
use crate::solution::{Route, Solution};
use log::{debug, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use self::gls::ArcPenalties;
use self::utils::{Objective, Quality, RouteLoad};

/// Smallest augmented-cost decrease accepted as an improvement.
pub(crate) const IMPROVEMENT_EPSILON: f64 = 1e-6;

/// New stop sequences for a set of routes, keyed by route index.
pub(crate) type RouteChanges = Vec<(usize, Vec<usize>)>;

/// Manages the optimization phase for one vehicle count.
pub struct LocalSearch {
    pub granularity: usize,
    time_limit: Duration,
    max_iterations_without_improvement: u32,
    lambda_coefficient: f64,
    objective: Objective,
    /// Guided local search penalty weight, fixed at the first local optimum
    lambda: f64,
    penalties: ArcPenalties,
    rng: ChaCha8Rng,
    deadline: Option<Instant>,
    /// Preprocessed neighbors for each customer
    customer_neighbors: HashMap<usize, Vec<usize>>,
}

impl LocalSearch {
    /// Create a local search seeded for reproducible neighbourhood order.
    pub fn new(config: &Config, seed: u64) -> Self {
        LocalSearch {
            granularity: config.granularity,
            time_limit: config.time_limit,
            max_iterations_without_improvement: config.max_iterations_without_improvement,
            lambda_coefficient: config.gls_lambda_coefficient,
            objective: Objective::from_config(config),
            lambda: 0.0,
            penalties: ArcPenalties::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            deadline: None,
            customer_neighbors: HashMap::new(),
        }
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Improve `seed` for `vehicle_count` vehicles.
    ///
    /// Returns `None` when the seed cannot be certified, when nothing better
    /// than the seed was found, or when the result fails certification. The
    /// caller then keeps the seed.
    pub fn optimize(
        &mut self,
        seed: &Solution,
        problem: &Problem,
        vehicle_count: usize,
    ) -> Option<Solution> {
        if vehicle_count == 0 || !seed.check_feasibility(problem, vehicle_count) {
            warn!("Optimizer rejected an uncertified seed");
            return None;
        }

        // An unrepresentable deadline means no time limit.
        self.deadline = Instant::now().checked_add(self.time_limit);
        self.penalties.clear();
        self.lambda = 0.0;
        self.preprocess_neighbors(problem);

        let mut current = seed.clone();
        current.remove_empty_routes();
        current
            .routes
            .resize_with(vehicle_count, Route::new);
        current.update_totals();

        let seed_quality = Quality::of(&current, &self.objective);
        let mut best = current.clone();
        let mut best_quality = seed_quality;
        let mut rounds_without_improvement = 0;
        let mut rounds = 0;

        loop {
            self.descend(&mut current, problem);
            rounds += 1;

            let quality = Quality::of(&current, &self.objective);
            if quality.beats(&best_quality) {
                best = current.clone();
                best_quality = quality;
                rounds_without_improvement = 0;
            } else {
                rounds_without_improvement += 1;
            }

            if self.out_of_time()
                || rounds_without_improvement >= self.max_iterations_without_improvement
            {
                break;
            }

            if self.lambda == 0.0 {
                let arcs = ArcPenalties::arc_count(&current);
                if arcs == 0 {
                    break;
                }
                self.lambda =
                    self.lambda_coefficient * current.total_distance as f64 / arcs as f64;
                if self.lambda <= 0.0 {
                    break;
                }
            }

            if !self.penalties.penalize(&current, problem) {
                break;
            }
        }

        debug!(
            "Optimizer ({} vehicles): {} rounds, served {} -> {}, cost {} -> {}",
            vehicle_count,
            rounds,
            seed_quality.served,
            best_quality.served,
            seed_quality.cost,
            best_quality.cost
        );

        if !best_quality.beats(&seed_quality) {
            return None;
        }

        best.remove_empty_routes();
        best.evaluate(problem.matrix);

        if best.check_feasibility(problem, vehicle_count) {
            Some(best)
        } else {
            warn!("Optimizer result failed certification, discarding it");
            None
        }
    }

    /// Apply neighbourhoods until none improves the augmented cost.
    pub fn descend(&mut self, solution: &mut Solution, problem: &Problem) {
        if self.customer_neighbors.is_empty() {
            self.preprocess_neighbors(problem);
        }

        let mut improvement = true;
        while improvement && !self.out_of_time() {
            improvement = false;

            improvement |= self.insert_neighborhood(solution, problem);
            improvement |= self.relocate_neighborhood(solution, problem);
            improvement |= self.swap_neighborhood(solution, problem);
            improvement |= self.two_opt_neighborhood(solution, problem);
            improvement |= self.two_opt_star_neighborhood(solution, problem);
        }
    }

    /// Preprocess neighbors for all candidates based on granularity.
    fn preprocess_neighbors(&mut self, problem: &Problem) {
        self.customer_neighbors = problem
            .candidates
            .iter()
            .map(|&c| (c, utils::get_neighbors(c, problem, self.granularity)))
            .collect();
    }

    pub(crate) fn neighbors_of(&self, customer: usize) -> Vec<usize> {
        self.customer_neighbors
            .get(&customer)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn out_of_time(&self) -> bool {
        self.deadline
            .map_or(false, |deadline| Instant::now() >= deadline)
    }

    /// Augmented cost change of replacing the given routes' stops.
    ///
    /// `None` if any changed route would break a cap.
    pub(crate) fn evaluate_change(
        &self,
        solution: &Solution,
        problem: &Problem,
        changes: &[(usize, Vec<usize>)],
    ) -> Option<f64> {
        let mut loads: Vec<RouteLoad> = solution.routes.iter().map(RouteLoad::of_route).collect();
        let mut penalty_delta: i64 = 0;

        for (route_idx, customers) in changes {
            let load = RouteLoad::of(customers, problem.matrix);
            if !load.is_feasible(&problem.constraints) {
                return None;
            }
            loads[*route_idx] = load;
            penalty_delta += self.penalties.route_penalty(customers) as i64
                - self
                    .penalties
                    .route_penalty(&solution.routes[*route_idx].customers) as i64;
        }

        let old_cost = self.objective.cost(solution) as i64;
        let new_cost = self.objective.evaluate(loads) as i64;

        Some((new_cost - old_cost) as f64 + self.lambda * penalty_delta as f64)
    }

    /// Replace the given routes' stops and refresh metrics.
    pub(crate) fn apply_change(solution: &mut Solution, problem: &Problem, changes: RouteChanges) {
        for (route_idx, customers) in changes {
            solution.routes[route_idx] = Route::from_customers(customers, problem.matrix);
        }
        solution.update_totals();
    }
}
