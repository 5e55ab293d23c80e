//! Error type shared by every stage of the routing engine.

use crate::feasibility::ExcludedStop;
use thiserror::Error;

/// Request-level failures.
///
/// Per-stop and per-candidate problems never surface here: unreachable stops are
/// reported as [`ExcludedStop`]s and optimizer misses fall back to the greedy
/// seed. Only the total inability to route anything propagates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The request contained no stops.
    #[error("no stops to route")]
    EmptyStopList,
    /// Zero vehicles were offered.
    #[error("no vehicles available")]
    NoVehicles,
    /// Every stop was rejected by the feasibility filter.
    #[error("no valid stops to route after filtering ({} excluded)", excluded.len())]
    NoValidStops { excluded: Vec<ExcludedStop> },
    /// The matrix does not cover the depot plus every stop.
    #[error("travel matrix has {actual} rows, expected {expected}")]
    MatrixDimension { expected: usize, actual: usize },
    /// Two stops point at the same matrix row.
    #[error("matrix index {index} is used by more than one stop")]
    DuplicateMatrixIndex { index: usize },
    /// A matrix row has the wrong number of entries.
    #[error("travel matrix row {row} has {len} entries, expected {expected}")]
    RaggedMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },
    /// A constraint limit was zero or not a finite positive number.
    #[error("constraint `{name}` must be greater than zero")]
    InvalidConstraint { name: &'static str },
    /// No vehicle count produced a single non-empty route.
    #[error("no valid solution found for any vehicle count")]
    NoFeasibleSolution,
}

impl EngineError {
    /// Whether this error stems from unusable input rather than from the search.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, EngineError::NoFeasibleSolution)
    }
}
