//! Local improvement heuristics: 2-opt and abrupt-removal reinsertion.

use itertools::Itertools;

use crate::individual::Tour;
use crate::time_windows::{FitnessResult, RouteEvaluator};

/// Acceptance policy for 2-opt sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptanceStrategy {
    /// Accept the first improving reversal and restart the scan.
    FirstImprovement,
    /// Scan the whole sweep, then apply the single best improving reversal.
    BestImprovement,
}

/// 2-opt refinement of a tour against a cost matrix.
///
/// The policy is matrix-agnostic: the matrix may carry distances or travel
/// times. Cost is the cyclic tour cost including the closing edge. Position
/// 0 is never an endpoint of a reversal, so the start node stays in place.
#[derive(Debug, Clone)]
pub struct LocalSearch {
    pub strategy: AcceptanceStrategy,
}

impl Default for LocalSearch {
    fn default() -> Self {
        LocalSearch {
            strategy: AcceptanceStrategy::FirstImprovement,
        }
    }
}

impl LocalSearch {
    /// Create a local search with the given acceptance policy.
    pub fn new(strategy: AcceptanceStrategy) -> Self {
        LocalSearch { strategy }
    }

    /// Cyclic cost of a tour, wrapping from the last node back to the first.
    pub fn route_cost(tour: &[usize], matrix: &[Vec<f64>]) -> f64 {
        let mut total = 0.0;
        for i in 0..tour.len() {
            let from = tour[i];
            let to = tour[(i + 1) % tour.len()];
            total += matrix[from][to];
        }
        total
    }

    /// Reverse the sub-tour `[i, j]` on a copy.
    pub fn two_opt_swap(tour: &[usize], i: usize, j: usize) -> Tour {
        let mut swapped = tour.to_vec();
        swapped[i..=j].reverse();
        swapped
    }

    /// Refine a tour until a full sweep yields no improvement or
    /// `max_iterations` sweeps are exhausted. The returned cost is never
    /// worse than the input cost.
    pub fn optimize(
        &self,
        tour: &[usize],
        matrix: &[Vec<f64>],
        max_iterations: usize,
    ) -> (Tour, f64) {
        let mut best_tour = tour.to_vec();
        let mut best_cost = Self::route_cost(&best_tour, matrix);

        if tour.len() < 4 {
            return (best_tour, best_cost);
        }

        let mut improved = true;
        let mut iteration = 0;

        while improved && iteration < max_iterations {
            improved = false;
            iteration += 1;

            match self.strategy {
                AcceptanceStrategy::FirstImprovement => {
                    'scan: for i in 1..best_tour.len() - 1 {
                        for j in i + 1..best_tour.len() {
                            let candidate = Self::two_opt_swap(&best_tour, i, j);
                            let cost = Self::route_cost(&candidate, matrix);

                            if cost < best_cost {
                                best_tour = candidate;
                                best_cost = cost;
                                improved = true;
                                break 'scan;
                            }
                        }
                    }
                }
                AcceptanceStrategy::BestImprovement => {
                    let mut best_move: Option<(usize, usize, f64)> = None;

                    for i in 1..best_tour.len() - 1 {
                        for j in i + 1..best_tour.len() {
                            let candidate = Self::two_opt_swap(&best_tour, i, j);
                            let cost = Self::route_cost(&candidate, matrix);

                            if cost < best_cost
                                && best_move.map_or(true, |(_, _, found)| cost < found)
                            {
                                best_move = Some((i, j, cost));
                            }
                        }
                    }

                    if let Some((i, j, cost)) = best_move {
                        best_tour = Self::two_opt_swap(&best_tour, i, j);
                        best_cost = cost;
                        improved = true;
                    }
                }
            }
        }

        (best_tour, best_cost)
    }
}

/// Abrupt-removal reinsertion heuristic.
///
/// Each city is extracted from the tour and test-reinserted immediately
/// before and after each of its `nearest_count` nearest neighbors by travel
/// time; the best improving insertion is kept and the pass restarts. Fitness
/// is the full time-window evaluation, so the heuristic sees waiting and
/// penalty hours, not just travel.
#[derive(Debug, Clone)]
pub struct AbruptRemoval {
    pub nearest_count: usize,
    pub max_passes: usize,
}

impl AbruptRemoval {
    /// Create a heuristic with near-list size `m` and a pass cap.
    pub fn new(nearest_count: usize, max_passes: usize) -> Self {
        AbruptRemoval {
            nearest_count,
            max_passes,
        }
    }

    /// Refine a canonical tour. The start node is never relocated.
    pub fn refine(
        &self,
        tour: &[usize],
        evaluator: &RouteEvaluator,
        matrix: &[Vec<f64>],
    ) -> (Tour, FitnessResult) {
        let mut best_tour = tour.to_vec();
        let mut best_fitness = evaluator.evaluate(&best_tour, matrix);

        if best_tour.len() < 3 {
            return (best_tour, best_fitness);
        }

        let mut improved = true;
        let mut pass = 0;

        while improved && pass < self.max_passes {
            improved = false;
            pass += 1;

            let current = best_tour.clone();

            for position in 1..current.len() {
                let city = current[position];
                let near_list = self.near_list(&current, position, evaluator.start_index, matrix);

                let mut removed = current.clone();
                removed.remove(position);

                for &neighbor in &near_list {
                    let anchor = match removed.iter().position(|&node| node == neighbor) {
                        Some(index) => index,
                        None => continue,
                    };

                    for insert_at in [anchor, anchor + 1] {
                        let mut candidate = removed.clone();
                        candidate.insert(insert_at, city);

                        let fitness = evaluator.evaluate(&candidate, matrix);
                        if fitness.total_time < best_fitness.total_time {
                            best_tour = candidate;
                            best_fitness = fitness;
                            improved = true;
                        }
                    }
                }

                // Restart the pass from the updated tour.
                if improved {
                    break;
                }
            }
        }

        (best_tour, best_fitness)
    }

    /// The `nearest_count` cities of the tour closest to the city at
    /// `position`, by travel time, excluding the start node.
    fn near_list(
        &self,
        tour: &[usize],
        position: usize,
        start_index: usize,
        matrix: &[Vec<f64>],
    ) -> Vec<usize> {
        let city = tour[position];

        tour.iter()
            .enumerate()
            .filter(|&(index, &node)| index != position && node != start_index)
            .map(|(_, &node)| (matrix[city][node], node))
            .sorted_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .take(self.nearest_count)
            .map(|(_, node)| node)
            .collect()
    }
}
