//! Error types for solver construction.

use std::error::Error;
use std::fmt;

/// Errors raised while validating a problem or configuration.
///
/// All variants are fatal and surface before any generation runs; the search
/// itself never returns an error (a poor tour is still a valid result).
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The travel-time matrix has no rows.
    EmptyMatrix,
    /// A row of the travel-time matrix has the wrong length.
    NonSquareMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The start node index does not address a matrix row.
    StartIndexOutOfRange {
        start_index: usize,
        node_count: usize,
    },
    /// A probability-like parameter lies outside [0, 1].
    RateOutOfRange { name: &'static str, value: f64 },
    /// The population cannot sustain reproduction.
    PopulationTooSmall { size: usize },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::EmptyMatrix => write!(f, "travel-time matrix is empty"),
            SolverError::NonSquareMatrix {
                row,
                expected,
                found,
            } => write!(
                f,
                "travel-time matrix is not square: row {} has {} entries, expected {}",
                row, found, expected
            ),
            SolverError::StartIndexOutOfRange {
                start_index,
                node_count,
            } => write!(
                f,
                "start index {} is out of range for {} nodes",
                start_index, node_count
            ),
            SolverError::RateOutOfRange { name, value } => {
                write!(f, "{} must lie in [0, 1], got {}", name, value)
            }
            SolverError::PopulationTooSmall { size } => {
                write!(f, "population size must be at least 2, got {}", size)
            }
        }
    }
}

impl Error for SolverError {}
