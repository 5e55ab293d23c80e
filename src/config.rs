//! Configuration parameters for the routing engine.

use crate::error::EngineError;
use crate::problem::Constraints;
use crate::utils::{HOURS_TO_SECONDS, MILES_TO_METERS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Search settings for the optimizer and the fleet-size search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Wall-clock budget for one optimizer run
    pub time_limit: Duration,
    /// Guided local search rounds allowed without a new best solution
    pub max_iterations_without_improvement: u32,
    /// Number of nearest stops considered when relocating or swapping
    pub granularity: usize,
    /// Scales the guided local search penalty weight (λ)
    pub gls_lambda_coefficient: f64,
    /// Objective weight on the spread of route distances
    pub distance_span_coefficient: u64,
    /// Objective weight on the spread of route durations
    pub time_span_coefficient: u64,
    /// Objective weight on the spread of route stop counts
    pub stops_span_coefficient: u64,
    /// Base seed for neighbourhood ordering
    pub seed: u64,
    /// Evaluate vehicle counts on the rayon pool
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            time_limit: Duration::from_secs(30),
            max_iterations_without_improvement: 200,
            granularity: 20,
            gls_lambda_coefficient: 0.1,
            distance_span_coefficient: 100,
            time_span_coefficient: 100,
            stops_span_coefficient: 100,
            seed: 0,
            parallel: true,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the optimizer time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = duration;
        self
    }

    /// Set the maximum iterations without improvement.
    pub fn with_max_iterations_without_improvement(mut self, iterations: u32) -> Self {
        self.max_iterations_without_improvement = iterations;
        self
    }

    /// Set the granularity parameter.
    pub fn with_granularity(mut self, g: usize) -> Self {
        self.granularity = g;
        self
    }

    pub fn with_gls_lambda_coefficient(mut self, coefficient: f64) -> Self {
        self.gls_lambda_coefficient = coefficient;
        self
    }

    /// Set the span coefficients for distance, time and stop count.
    pub fn with_span_coefficients(mut self, distance: u64, time: u64, stops: u64) -> Self {
        self.distance_span_coefficient = distance;
        self.time_span_coefficient = time;
        self.stops_span_coefficient = stops;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Toggle parallel evaluation of vehicle counts.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Route limits as the surrounding application stores them (miles, hours).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    pub max_miles: f64,
    /// Hours
    pub max_time: f64,
    pub max_stops: usize,
    /// Kept for the settings round-trip; the objective does not use it.
    pub drop_penalty: u64,
}

impl Default for RouteSettings {
    fn default() -> Self {
        RouteSettings {
            max_miles: 100.0,
            max_time: 8.0,
            max_stops: 20,
            drop_penalty: 1000,
        }
    }
}

impl RouteSettings {
    /// Convert to engine units, truncating to whole meters and seconds.
    pub fn to_constraints(&self) -> Result<Constraints, EngineError> {
        if !(self.max_miles.is_finite() && self.max_miles > 0.0) {
            return Err(EngineError::InvalidConstraint { name: "max_miles" });
        }
        if !(self.max_time.is_finite() && self.max_time > 0.0) {
            return Err(EngineError::InvalidConstraint { name: "max_time" });
        }

        Constraints::new(
            (self.max_miles * MILES_TO_METERS) as u64,
            (self.max_time * HOURS_TO_SECONDS) as u64,
            self.max_stops,
        )
    }
}
