//! Problem definition and data structures for the delivery routing engine.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Matrix index reserved for the depot.
pub const DEPOT: usize = 0;

/// A deduplicated delivery location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    pub address: String,
    /// How many times the address appeared in the raw input.
    pub required_count: usize,
    /// Row/column of this stop in the travel matrix.
    pub matrix_index: usize,
}

impl Stop {
    /// Create a new stop.
    pub fn new(address: impl Into<String>, required_count: usize, matrix_index: usize) -> Self {
        Stop {
            address: address.into(),
            required_count,
            matrix_index,
        }
    }
}

/// Directional travel estimate between two locations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Travel {
    pub duration_seconds: u64,
    pub distance_meters: u64,
}

impl Travel {
    pub fn new(duration_seconds: u64, distance_meters: u64) -> Self {
        Travel {
            duration_seconds,
            distance_meters,
        }
    }
}

impl From<(u64, u64)> for Travel {
    fn from((duration_seconds, distance_meters): (u64, u64)) -> Self {
        Travel::new(duration_seconds, distance_meters)
    }
}

/// Pairwise (duration, distance) estimates for the depot and every unique stop.
///
/// Stored flat in row-major order. Entries are directional, so
/// `get(a, b)` and `get(b, a)` may differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Travel>>", into = "Vec<Vec<Travel>>")]
pub struct TravelMatrix {
    size: usize,
    entries: Vec<Travel>,
}

impl TravelMatrix {
    /// Build a matrix from nested rows, rejecting non-square input.
    pub fn new<T: Into<Travel>>(rows: Vec<Vec<T>>) -> Result<Self, EngineError> {
        let size = rows.len();
        let mut entries = Vec::with_capacity(size * size);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(EngineError::RaggedMatrix {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
            entries.extend(values.into_iter().map(Into::into));
        }

        Ok(TravelMatrix { size, entries })
    }

    /// Number of locations (depot included).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, from: usize, to: usize) -> Travel {
        self.entries[from * self.size + to]
    }

    pub fn duration(&self, from: usize, to: usize) -> u64 {
        self.get(from, to).duration_seconds
    }

    pub fn distance(&self, from: usize, to: usize) -> u64 {
        self.get(from, to).distance_meters
    }
}

impl TryFrom<Vec<Vec<Travel>>> for TravelMatrix {
    type Error = EngineError;

    fn try_from(rows: Vec<Vec<Travel>>) -> Result<Self, Self::Error> {
        TravelMatrix::new(rows)
    }
}

impl From<TravelMatrix> for Vec<Vec<Travel>> {
    fn from(matrix: TravelMatrix) -> Self {
        if matrix.size == 0 {
            return Vec::new();
        }
        matrix
            .entries
            .chunks(matrix.size)
            .map(<[Travel]>::to_vec)
            .collect()
    }
}

/// Per-vehicle limits, in engine units (meters, seconds, stops).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConstraintLimits")]
pub struct Constraints {
    pub max_distance_meters: u64,
    pub max_duration_seconds: u64,
    pub max_stops_per_vehicle: usize,
}

impl Constraints {
    /// Create a constraint set; every limit must be positive.
    pub fn new(
        max_distance_meters: u64,
        max_duration_seconds: u64,
        max_stops_per_vehicle: usize,
    ) -> Result<Self, EngineError> {
        if max_distance_meters == 0 {
            return Err(EngineError::InvalidConstraint {
                name: "max_distance_meters",
            });
        }
        if max_duration_seconds == 0 {
            return Err(EngineError::InvalidConstraint {
                name: "max_duration_seconds",
            });
        }
        if max_stops_per_vehicle == 0 {
            return Err(EngineError::InvalidConstraint {
                name: "max_stops_per_vehicle",
            });
        }

        Ok(Constraints {
            max_distance_meters,
            max_duration_seconds,
            max_stops_per_vehicle,
        })
    }

    /// Whether a route with these totals fits inside every limit.
    pub fn admits(&self, distance: u64, duration: u64, stops: usize) -> bool {
        distance <= self.max_distance_meters
            && duration <= self.max_duration_seconds
            && stops <= self.max_stops_per_vehicle
    }
}

/// Unchecked wire form of [`Constraints`].
#[derive(Deserialize)]
struct ConstraintLimits {
    max_distance_meters: u64,
    max_duration_seconds: u64,
    max_stops_per_vehicle: usize,
}

impl TryFrom<ConstraintLimits> for Constraints {
    type Error = EngineError;

    fn try_from(limits: ConstraintLimits) -> Result<Self, Self::Error> {
        Constraints::new(
            limits.max_distance_meters,
            limits.max_duration_seconds,
            limits.max_stops_per_vehicle,
        )
    }
}

/// Read-only view of one optimization run: matrix, limits and the stops
/// that survived the feasibility filter.
#[derive(Debug, Clone)]
pub struct Problem<'a> {
    pub matrix: &'a TravelMatrix,
    pub constraints: Constraints,
    /// Matrix indices of routable stops, sorted by depot travel time.
    pub candidates: Vec<usize>,
}

impl<'a> Problem<'a> {
    /// Create a new routing problem.
    pub fn new(matrix: &'a TravelMatrix, constraints: Constraints, candidates: Vec<usize>) -> Self {
        Problem {
            matrix,
            constraints,
            candidates,
        }
    }

    /// Get the number of routable stops.
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn duration(&self, from: usize, to: usize) -> u64 {
        self.matrix.duration(from, to)
    }

    pub fn distance(&self, from: usize, to: usize) -> u64 {
        self.matrix.distance(from, to)
    }
}
