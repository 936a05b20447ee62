//! # TSP-TW GA
//!
//! A genetic algorithm solver for the Traveling Salesperson Problem with
//! Time Windows: find a low-cost cyclic tour over a fixed set of nodes,
//! starting and ending at a designated node, where arriving at a node before
//! its opening hour incurs waiting and arriving after closing incurs a cost
//! penalty.
//!
//! The solver consumes a precomputed travel-time matrix and a configuration
//! and produces a best tour, its fitness decomposition, and a convergence
//! history. A hybrid variant ([`hybrid::HybridAlgorithm`]) combines cycle
//! crossover with abrupt-removal reinsertion; [`local_search::LocalSearch`]
//! offers standalone 2-opt refinement. Runs are deterministic for a fixed
//! seed.

pub mod config;
pub mod error;
pub mod genetic;
pub mod hybrid;
pub mod individual;
pub mod local_search;
pub mod population;
pub mod problem;
pub mod time_windows;
pub mod utils;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::SolverError;
use crate::genetic::GeneticOperators;
use crate::individual::{Individual, Tour};
use crate::population::{random_tour, Population};
use crate::problem::Problem;
use crate::time_windows::{FitnessResult, RouteEvaluator, TimeWindow};

/// Outcome of an evolutionary run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Best tour ever observed, in canonical form.
    pub best_tour: Tour,
    /// Fitness decomposition of the best tour.
    pub best_fitness: FitnessResult,
    /// Best-ever fitness after each generation; non-increasing.
    pub history: Vec<f64>,
}

/// The generational evolutionary loop: evaluate, elitism-copy,
/// reproduce-to-fill, optional random reset, record best-ever.
pub struct GeneticAlgorithm {
    pub problem: Problem,
    pub config: Config,
    pub population: Population,
    pub history: Vec<f64>,
    pub generation: usize,
    evaluator: RouteEvaluator,
    operators: GeneticOperators,
    best_tour: Option<Tour>,
    best_fitness: Option<FitnessResult>,
    rng: ChaCha8Rng,
}

impl GeneticAlgorithm {
    /// Construct a run for the given problem and configuration.
    ///
    /// Configuration preconditions are checked here, before any generation
    /// runs; the problem was already validated at its own construction.
    pub fn new(problem: Problem, config: Config) -> Result<Self, SolverError> {
        config.validate()?;

        let evaluator = RouteEvaluator::new(
            TimeWindow::new(config.opening_hour, config.closing_hour),
            problem.start_index,
            config.start_time,
            config.penalty_weight,
        )
        .with_flags(config.include_waiting, config.include_penalties);

        let operators = GeneticOperators::from_config(&config, problem.start_index);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(GeneticAlgorithm {
            problem,
            config,
            population: Population::default(),
            history: Vec::new(),
            generation: 0,
            evaluator,
            operators,
            best_tour: None,
            best_fitness: None,
            rng,
        })
    }

    /// Run the evolutionary loop to completion.
    ///
    /// Deterministic given identical problem, configuration, and seed.
    pub fn evolve(&mut self) -> RunResult {
        let n = self.problem.num_nodes();

        // Only the start node exists: nothing to search.
        if n == 1 {
            return RunResult {
                best_tour: vec![self.problem.start_index],
                best_fitness: FitnessResult::zero(),
                history: Vec::new(),
            };
        }

        info!(
            "starting GA run: {} nodes, population {}, {} generations, seed {}",
            n, self.config.population_size, self.config.generations, self.config.seed
        );

        self.population =
            Population::initialize(&self.problem, self.config.population_size, &mut self.rng);

        if self.config.generations == 0 {
            self.evaluate_and_track_best();
        }

        for generation in 0..self.config.generations {
            self.generation = generation;

            self.evaluate_and_track_best();
            self.history.push(self.best_total());

            self.build_next_generation();
            self.maybe_random_reset();

            if (generation + 1) % 50 == 0 {
                info!(
                    "generation {}/{}: best total {:.2} h",
                    generation + 1,
                    self.config.generations,
                    self.best_total()
                );
            }
        }

        let best_fitness = self.best_fitness.unwrap_or_else(FitnessResult::zero);
        let best_tour = self.best_tour.clone().unwrap_or_default();

        info!(
            "GA run complete: best total {:.2} h (travel {:.2}, waiting {:.2}, penalty {:.2})",
            best_fitness.total_time,
            best_fitness.travel_time,
            best_fitness.waiting_time,
            best_fitness.penalty
        );

        RunResult {
            best_tour,
            best_fitness,
            history: self.history.clone(),
        }
    }

    /// Evaluate the population and fold its best into the best-ever record.
    ///
    /// Best-ever tracking is independent of elitism, so a zero elitism rate
    /// cannot lose the best observed tour.
    fn evaluate_and_track_best(&mut self) {
        self.population
            .evaluate_all(&self.evaluator, &self.problem.time_matrix);

        if let Some(best) = self.population.best() {
            if self
                .best_fitness
                .map_or(true, |current| best.total_time() < current.total_time)
            {
                // Unprotected scramble may displace the start gene; the
                // recorded best is always canonical.
                self.best_tour = Some(self.evaluator.canonicalize(&best.tour));
                self.best_fitness = best.fitness().copied();
                debug!(
                    "generation {}: new best total {:.4} h",
                    self.generation,
                    best.total_time()
                );
            }
        }
    }

    /// Elitism-copy, then reproduce until the population is full.
    fn build_next_generation(&mut self) {
        let pop_size = self.config.population_size;
        let n_elite = (self.config.elitism_rate * pop_size as f64).floor() as usize;

        let mut next = self.population.elites(n_elite);

        while next.len() < pop_size {
            let (parent1, parent2) = self
                .population
                .select_parents(&mut self.rng, self.config.tournament_size);

            let offspring = if self.rng.gen::<f64>() < self.config.crossover_rate {
                self.operators
                    .crossover(&mut self.rng, &parent1.tour, &parent2.tour)
            } else {
                parent1.tour.clone()
            };

            let offspring = self.operators.mutate(&mut self.rng, &offspring);
            next.push(Individual::new(offspring));
        }

        self.population.individuals = next;
    }

    /// With small probability, replace one random individual with a fresh
    /// random permutation.
    fn maybe_random_reset(&mut self) {
        if self.config.random_reset_rate <= 0.0 {
            return;
        }

        if self.rng.gen::<f64>() < self.config.random_reset_rate {
            let index = self.rng.gen_range(0..self.population.len());
            let tour = random_tour(&self.problem, &mut self.rng);
            self.population.individuals[index] = Individual::new(tour);
            debug!("generation {}: random reset at slot {}", self.generation, index);
        }
    }

    fn best_total(&self) -> f64 {
        self.best_fitness
            .map_or(f64::INFINITY, |fitness| fitness.total_time)
    }
}
