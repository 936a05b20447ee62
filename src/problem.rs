//! Problem definition: travel-time matrix and node registry.

use serde::{Deserialize, Serialize};

use crate::error::SolverError;

/// A geographic node referenced by the solver.
///
/// The core only ever addresses nodes by index; the static payload exists so
/// that callers can label tours without a side table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: usize,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    /// Create a new node.
    pub fn new(id: usize, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Node {
            id,
            name: name.into(),
            lat,
            lon,
        }
    }
}

/// A TSP-TW problem instance.
///
/// Owns the precomputed N x N travel-time matrix (hours) and the index of the
/// fixed start node. How the matrix was produced (geodesic distances, road
/// times, ...) is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub name: String,
    pub time_matrix: Vec<Vec<f64>>,
    pub start_index: usize,
    pub nodes: Vec<Node>,
}

impl Problem {
    /// Create a problem from a travel-time matrix.
    ///
    /// Fails if the matrix is empty or non-square, or if `start_index` does
    /// not address a row.
    pub fn new(
        name: impl Into<String>,
        time_matrix: Vec<Vec<f64>>,
        start_index: usize,
    ) -> Result<Self, SolverError> {
        let n = time_matrix.len();
        if n == 0 {
            return Err(SolverError::EmptyMatrix);
        }

        for (row, entries) in time_matrix.iter().enumerate() {
            if entries.len() != n {
                return Err(SolverError::NonSquareMatrix {
                    row,
                    expected: n,
                    found: entries.len(),
                });
            }
        }

        if start_index >= n {
            return Err(SolverError::StartIndexOutOfRange {
                start_index,
                node_count: n,
            });
        }

        Ok(Problem {
            name: name.into(),
            time_matrix,
            start_index,
            nodes: Vec::new(),
        })
    }

    /// Attach a node registry. The registry must describe every matrix row.
    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Result<Self, SolverError> {
        if nodes.len() != self.num_nodes() {
            return Err(SolverError::NonSquareMatrix {
                row: 0,
                expected: self.num_nodes(),
                found: nodes.len(),
            });
        }
        self.nodes = nodes;
        Ok(self)
    }

    /// Travel time between two node indices, in hours.
    pub fn travel_time(&self, from: usize, to: usize) -> f64 {
        self.time_matrix[from][to]
    }

    /// Number of nodes in the instance.
    pub fn num_nodes(&self) -> usize {
        self.time_matrix.len()
    }

    /// Label for a node index, falling back to the index itself when no
    /// registry was attached.
    pub fn node_label(&self, index: usize) -> String {
        self.nodes
            .get(index)
            .map(|node| node.name.clone())
            .unwrap_or_else(|| index.to_string())
    }
}
