//! Tour and individual representation for the genetic algorithm.

use std::cmp::Ordering;

use crate::time_windows::{FitnessResult, RouteEvaluator};

/// A candidate visiting order: a permutation of `[0, N)` whose first element
/// is the fixed start node. This is the single route representation used
/// throughout the crate.
pub type Tour = Vec<usize>;

/// Rewrite a tour so that the start node occupies position 0, preserving the
/// relative order of all other nodes. Tours already in canonical form are
/// returned unchanged.
pub fn canonicalize_start(tour: &[usize], start_index: usize) -> Tour {
    if tour.first() == Some(&start_index) {
        return tour.to_vec();
    }

    let mut canonical = Vec::with_capacity(tour.len());
    canonical.push(start_index);
    canonical.extend(tour.iter().copied().filter(|&node| node != start_index));
    canonical
}

/// True iff the tour visits every node in `[0, n)` exactly once.
pub fn is_valid_tour(tour: &[usize], n: usize) -> bool {
    if tour.len() != n {
        return false;
    }

    let mut seen = vec![false; n];
    for &node in tour {
        if node >= n || seen[node] {
            return false;
        }
        seen[node] = true;
    }

    true
}

/// An individual in the population: a tour plus a lazily computed fitness
/// decomposition. The cache is dropped whenever the tour is replaced.
#[derive(Debug, Clone)]
pub struct Individual {
    pub tour: Tour,
    fitness: Option<FitnessResult>,
}

impl Individual {
    /// Create an unevaluated individual from a tour.
    pub fn new(tour: Tour) -> Self {
        Individual {
            tour,
            fitness: None,
        }
    }

    /// Create an individual with a precomputed fitness, as family selection
    /// in the hybrid loop produces.
    pub fn with_fitness(tour: Tour, fitness: FitnessResult) -> Self {
        Individual {
            tour,
            fitness: Some(fitness),
        }
    }

    /// Evaluate the tour if no cached decomposition exists.
    pub fn evaluate(&mut self, evaluator: &RouteEvaluator, matrix: &[Vec<f64>]) -> &FitnessResult {
        if self.fitness.is_none() {
            self.fitness = Some(evaluator.evaluate(&self.tour, matrix));
        }
        self.fitness.as_ref().expect("fitness was just computed")
    }

    /// The cached fitness decomposition, if any.
    pub fn fitness(&self) -> Option<&FitnessResult> {
        self.fitness.as_ref()
    }

    /// Scalar fitness (lower is better). Unevaluated individuals compare as
    /// worst-possible so they are never selected by mistake.
    pub fn total_time(&self) -> f64 {
        self.fitness
            .as_ref()
            .map_or(f64::INFINITY, |fitness| fitness.total_time)
    }

    /// Replace the tour, invalidating the cached fitness.
    pub fn replace_tour(&mut self, tour: Tour) {
        self.tour = tour;
        self.fitness = None;
    }
}

impl PartialEq for Individual {
    fn eq(&self, other: &Self) -> bool {
        self.total_time() == other.total_time()
    }
}

impl Eq for Individual {}

impl PartialOrd for Individual {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Individual {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_time()
            .partial_cmp(&other.total_time())
            .unwrap_or(Ordering::Equal)
    }
}
