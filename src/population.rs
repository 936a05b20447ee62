//! Population management: initialization, selection, and elitism.

use itertools::Itertools;
use rand::seq::index::sample;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::individual::{Individual, Tour};
use crate::problem::Problem;
use crate::time_windows::RouteEvaluator;

/// A fixed-size ordered collection of individuals.
#[derive(Debug, Clone, Default)]
pub struct Population {
    pub individuals: Vec<Individual>,
}

impl Population {
    /// Generate `size` random tours, each a shuffled permutation of the
    /// non-start nodes with the start node prepended.
    pub fn initialize<R: Rng>(problem: &Problem, size: usize, rng: &mut R) -> Self {
        let individuals = (0..size)
            .map(|_| Individual::new(random_tour(problem, rng)))
            .collect();

        Population { individuals }
    }

    /// Evaluate every individual, reusing cached fitness where present.
    pub fn evaluate_all(&mut self, evaluator: &RouteEvaluator, matrix: &[Vec<f64>]) {
        for individual in &mut self.individuals {
            individual.evaluate(evaluator, matrix);
        }
    }

    /// Tournament selection: draw `tournament_size` distinct indices and
    /// return the drawn individual with the lowest fitness.
    pub fn tournament_select<R: Rng>(&self, rng: &mut R, tournament_size: usize) -> &Individual {
        let k = tournament_size.max(1).min(self.individuals.len());

        sample(rng, self.individuals.len(), k)
            .iter()
            .map(|index| &self.individuals[index])
            .min()
            .expect("tournament draws at least one individual")
    }

    /// Two independent tournament draws. The parents may coincide.
    pub fn select_parents<R: Rng>(
        &self,
        rng: &mut R,
        tournament_size: usize,
    ) -> (&Individual, &Individual) {
        let parent1 = self.tournament_select(rng, tournament_size);
        let parent2 = self.tournament_select(rng, tournament_size);
        (parent1, parent2)
    }

    /// The `n_elite` best individuals, cloned verbatim with their cached
    /// fitness, in ascending fitness order.
    pub fn elites(&self, n_elite: usize) -> Vec<Individual> {
        self.individuals
            .iter()
            .sorted_by(|a, b| a.cmp(b))
            .take(n_elite)
            .cloned()
            .collect()
    }

    /// The best individual of the current generation, if any.
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.iter().min()
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// True when the population holds no individuals.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }
}

/// Produce a random canonical tour for the problem.
pub fn random_tour<R: Rng>(problem: &Problem, rng: &mut R) -> Tour {
    let mut others: Vec<usize> = (0..problem.num_nodes())
        .filter(|&node| node != problem.start_index)
        .collect();
    others.shuffle(rng);

    let mut tour = Vec::with_capacity(problem.num_nodes());
    tour.push(problem.start_index);
    tour.extend(others);
    tour
}
