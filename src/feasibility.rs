//! Screen out stops that no vehicle could ever reach within its limits.

use crate::problem::{Constraints, Stop, TravelMatrix, DEPOT};
use crate::utils::{meters_to_miles, seconds_to_hours};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a stop was excluded before routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionReason {
    ExceedsDistance { distance_meters: u64 },
    ExceedsTime { duration_seconds: u64 },
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::ExceedsDistance { distance_meters } => write!(
                f,
                "Exceeds max distance (Distance: {:.2} miles)",
                meters_to_miles(*distance_meters)
            ),
            ExclusionReason::ExceedsTime { duration_seconds } => write!(
                f,
                "Exceeds max time (Time: {:.2} hours)",
                seconds_to_hours(*duration_seconds)
            ),
        }
    }
}

/// A stop removed from routing together with its reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedStop {
    pub stop: Stop,
    pub reason: ExclusionReason,
}

/// Result of the feasibility pass.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Routable stops, ascending by depot travel time (stable on ties).
    pub valid: Vec<Stop>,
    /// Stops excluded from routing, in input order.
    pub excluded: Vec<ExcludedStop>,
}

impl FilterOutcome {
    /// Matrix indices of the valid stops in their sorted order.
    pub fn candidate_indices(&self) -> Vec<usize> {
        self.valid.iter().map(|stop| stop.matrix_index).collect()
    }
}

/// Check a single stop against the limits.
///
/// The one-way depot leg is checked first, then the depot round trip. Distance
/// wins over time when both are exceeded.
pub fn check_stop(
    stop: &Stop,
    matrix: &TravelMatrix,
    constraints: &Constraints,
) -> Option<ExclusionReason> {
    let outbound = matrix.get(DEPOT, stop.matrix_index);
    let inbound = matrix.get(stop.matrix_index, DEPOT);

    let legs = [
        (outbound.distance_meters, outbound.duration_seconds),
        (
            outbound
                .distance_meters
                .saturating_add(inbound.distance_meters),
            outbound
                .duration_seconds
                .saturating_add(inbound.duration_seconds),
        ),
    ];

    for (distance_meters, duration_seconds) in legs {
        if distance_meters > constraints.max_distance_meters {
            return Some(ExclusionReason::ExceedsDistance { distance_meters });
        }
        if duration_seconds > constraints.max_duration_seconds {
            return Some(ExclusionReason::ExceedsTime { duration_seconds });
        }
    }

    None
}

/// Split `stops` into routable and excluded sets.
pub fn filter_stops(
    stops: &[Stop],
    matrix: &TravelMatrix,
    constraints: &Constraints,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for stop in stops {
        match check_stop(stop, matrix, constraints) {
            Some(reason) => {
                debug!("Excluding {}: {}", stop.address, reason);
                outcome.excluded.push(ExcludedStop {
                    stop: stop.clone(),
                    reason,
                });
            }
            None => outcome.valid.push(stop.clone()),
        }
    }

    // Stable sort keeps first-seen order among equally distant stops.
    outcome
        .valid
        .sort_by_key(|stop| matrix.duration(DEPOT, stop.matrix_index));

    info!(
        "Feasibility filter: {} valid, {} excluded",
        outcome.valid.len(),
        outcome.excluded.len()
    );

    outcome
}
