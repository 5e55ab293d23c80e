//! Route metrics and served-versus-required reconciliation for a winning solution.

use crate::feasibility::{ExcludedStop, ExclusionReason};
use crate::problem::{Stop, TravelMatrix};
use crate::solution::{measure, Solution};
use crate::utils::{format_duration, format_miles};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Totals for a single route, recomputed from the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMetrics {
    /// Node sequence, depot at both ends
    pub nodes: Vec<usize>,
    /// Addresses in visiting order, depot at both ends
    pub addresses: Vec<String>,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub stop_count: usize,
}

impl RouteMetrics {
    /// Human-readable duration, e.g. "1 hours, 5 minutes, 0 seconds".
    pub fn formatted_time(&self) -> String {
        format_duration(self.duration_seconds)
    }

    /// Distance in miles, e.g. "12.40 miles".
    pub fn formatted_distance(&self) -> String {
        format_miles(self.distance_meters)
    }
}

/// Why a requested delivery did not make it into the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissReason {
    /// Rejected before routing.
    Excluded { cause: ExclusionReason },
    /// Routable, but no route had room for it.
    NotRouted,
    /// Served fewer times than requested.
    PartiallyServed { served: usize, required: usize },
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissReason::Excluded { cause } => write!(f, "{}", cause),
            MissReason::NotRouted => {
                write!(f, "Could not be included in any route due to constraints")
            }
            MissReason::PartiallyServed { served, required } => write!(
                f,
                "Only {}/{} deliveries possible due to route constraints",
                served, required
            ),
        }
    }
}

/// A stop with at least one missed delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedStop {
    pub address: String,
    pub reason: MissReason,
}

/// Required and served delivery counts for one address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryCount {
    pub required: usize,
    pub served: usize,
}

/// Delivery totals across the whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryCounts {
    pub total_required: usize,
    pub total_served: usize,
    pub addresses: BTreeMap<String, DeliveryCount>,
}

/// Everything the caller needs from a finished optimization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub routes: Vec<RouteMetrics>,
    pub num_vehicles_used: usize,
    pub total_distance_meters: u64,
    pub total_time_seconds: u64,
    pub served_count: usize,
    /// Routable stops left out of every route (matrix indices)
    pub dropped_nodes: Vec<usize>,
    /// Filter exclusions first, then reconciliation misses in stop order
    pub missed: Vec<MissedStop>,
    pub delivery_counts: DeliveryCounts,
}

/// Aggregate per-route metrics for a solution.
pub fn route_metrics(
    solution: &Solution,
    matrix: &TravelMatrix,
    depot: &str,
    stops: &[Stop],
) -> Vec<RouteMetrics> {
    let addresses: HashMap<usize, &str> = stops
        .iter()
        .map(|stop| (stop.matrix_index, stop.address.as_str()))
        .collect();

    solution
        .routes
        .iter()
        .filter(|route| !route.is_empty())
        .map(|route| {
            let (distance_meters, duration_seconds) = measure(&route.customers, matrix);
            let nodes = route.nodes();
            let addresses = nodes
                .iter()
                .map(|node| addresses.get(node).copied().unwrap_or(depot).to_string())
                .collect();

            RouteMetrics {
                nodes,
                addresses,
                distance_meters,
                duration_seconds,
                stop_count: route.stop_count(),
            }
        })
        .collect()
}

/// Count, for each stop, the routes that visit it.
pub fn served_counts(solution: &Solution, stops: &[Stop]) -> Vec<usize> {
    stops
        .iter()
        .map(|stop| {
            solution
                .routes
                .iter()
                .filter(|route| route.customers.contains(&stop.matrix_index))
                .count()
        })
        .collect()
}

/// Reconcile required and served deliveries.
///
/// Excluded stops are listed first with their filter reason; every other stop
/// served fewer times than required follows in input order.
pub fn reconcile(
    solution: &Solution,
    stops: &[Stop],
    excluded: &[ExcludedStop],
) -> (Vec<MissedStop>, DeliveryCounts) {
    let mut missed: Vec<MissedStop> = excluded
        .iter()
        .map(|excluded| MissedStop {
            address: excluded.stop.address.clone(),
            reason: MissReason::Excluded {
                cause: excluded.reason,
            },
        })
        .collect();

    let mut counts = DeliveryCounts::default();

    for (stop, served) in stops.iter().zip(served_counts(solution, stops)) {
        counts.total_required += stop.required_count;
        counts.total_served += served;
        counts.addresses.insert(
            stop.address.clone(),
            DeliveryCount {
                required: stop.required_count,
                served,
            },
        );

        let was_excluded = excluded
            .iter()
            .any(|e| e.stop.matrix_index == stop.matrix_index);
        if was_excluded || served >= stop.required_count {
            continue;
        }

        let reason = if served == 0 {
            MissReason::NotRouted
        } else {
            MissReason::PartiallyServed {
                served,
                required: stop.required_count,
            }
        };
        missed.push(MissedStop {
            address: stop.address.clone(),
            reason,
        });
    }

    (missed, counts)
}

/// Build the final report for a winning solution.
pub fn build_report(
    solution: &Solution,
    num_vehicles: usize,
    matrix: &TravelMatrix,
    depot: &str,
    stops: &[Stop],
    excluded: &[ExcludedStop],
) -> OptimizationReport {
    let routes = route_metrics(solution, matrix, depot, stops);
    let (missed, delivery_counts) = reconcile(solution, stops, excluded);

    OptimizationReport {
        total_distance_meters: routes.iter().map(|r| r.distance_meters).sum(),
        total_time_seconds: routes.iter().map(|r| r.duration_seconds).sum(),
        served_count: routes.iter().map(|r| r.stop_count).sum(),
        routes,
        num_vehicles_used: num_vehicles,
        dropped_nodes: solution.dropped.clone(),
        missed,
        delivery_counts,
    }
}
