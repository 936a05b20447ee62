//! Configuration parameters for the TSP-TW genetic algorithm.

use serde::{Deserialize, Serialize};

use crate::error::SolverError;

/// Crossover strategy applied during reproduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossoverMethod {
    /// Order crossover (OX): copy a segment from parent 1, fill the rest in
    /// parent 2's cyclic order.
    Order,
    /// Partially-mapped crossover (PMX): segment swap with mapping resolution.
    PartiallyMapped,
    /// Cycle crossover (CX): value-cycles from parent 1, remainder from parent 2.
    Cycle,
}

/// Mutation strategy applied to offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationMethod {
    /// Exchange two random positions.
    Swap,
    /// Reverse a random sub-range.
    Inversion,
    /// Shuffle a random sub-range.
    Scramble,
}

/// Configuration settings for the TSP-TW solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of individuals kept across generations (P)
    pub population_size: usize,
    /// Number of generations to run
    pub generations: usize,
    /// Probability of mutating each offspring
    pub mutation_rate: f64,
    /// Probability of applying crossover instead of cloning parent 1
    pub crossover_rate: f64,
    /// Fraction of the population carried over unchanged each generation
    pub elitism_rate: f64,
    /// Number of candidates drawn per tournament
    pub tournament_size: usize,
    /// Crossover strategy for the generational loop
    pub crossover_method: CrossoverMethod,
    /// Mutation strategy for the generational loop
    pub mutation_method: MutationMethod,
    /// Whether scramble mutation leaves the start gene untouched
    pub scramble_protects_start: bool,
    /// Business-hour opening (hour of day)
    pub opening_hour: f64,
    /// Business-hour closing (hour of day)
    pub closing_hour: f64,
    /// Departure clock value at the start node (hour of day)
    pub start_time: f64,
    /// Multiplier converting window violations into hours-equivalent cost
    pub penalty_weight: f64,
    /// Whether arrivals before opening accrue waiting time
    pub include_waiting: bool,
    /// Whether window violations accrue penalties
    pub include_penalties: bool,
    /// Probability per generation of replacing one random individual with a
    /// fresh permutation (0 disables the reset)
    pub random_reset_rate: f64,
    /// Number of nearest cities considered by abrupt removal (m)
    pub nearest_count: usize,
    /// Maximum abrupt-removal passes per refinement
    pub max_passes: usize,
    /// Master seed for the run's random stream
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            population_size: 100,
            generations: 500,
            mutation_rate: 0.01,
            crossover_rate: 0.8,
            elitism_rate: 0.1,
            tournament_size: 5,
            crossover_method: CrossoverMethod::Order,
            mutation_method: MutationMethod::Swap,
            scramble_protects_start: false,
            opening_hour: 9.0,
            closing_hour: 21.0,
            start_time: 9.0,
            penalty_weight: 100.0,
            include_waiting: true,
            include_penalties: true,
            random_reset_rate: 0.0,
            nearest_count: 5,
            max_passes: 10,
            seed: 42,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Set the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Set the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Set the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Set the elitism rate.
    pub fn with_elitism_rate(mut self, rate: f64) -> Self {
        self.elitism_rate = rate;
        self
    }

    /// Set the tournament size.
    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    /// Set the crossover strategy.
    pub fn with_crossover_method(mut self, method: CrossoverMethod) -> Self {
        self.crossover_method = method;
        self
    }

    /// Set the mutation strategy.
    pub fn with_mutation_method(mut self, method: MutationMethod) -> Self {
        self.mutation_method = method;
        self
    }

    /// Protect the start gene during scramble mutation.
    pub fn with_scramble_protects_start(mut self, protect: bool) -> Self {
        self.scramble_protects_start = protect;
        self
    }

    /// Set the business-hour window.
    pub fn with_window(mut self, opening_hour: f64, closing_hour: f64) -> Self {
        self.opening_hour = opening_hour;
        self.closing_hour = closing_hour;
        self
    }

    /// Set the departure clock value.
    pub fn with_start_time(mut self, start_time: f64) -> Self {
        self.start_time = start_time;
        self
    }

    /// Set the penalty weight.
    pub fn with_penalty_weight(mut self, weight: f64) -> Self {
        self.penalty_weight = weight;
        self
    }

    /// Enable or disable waiting-time accrual.
    pub fn with_include_waiting(mut self, include: bool) -> Self {
        self.include_waiting = include;
        self
    }

    /// Enable or disable window-violation penalties.
    pub fn with_include_penalties(mut self, include: bool) -> Self {
        self.include_penalties = include;
        self
    }

    /// Set the random-reset probability.
    pub fn with_random_reset_rate(mut self, rate: f64) -> Self {
        self.random_reset_rate = rate;
        self
    }

    /// Set the abrupt-removal near-list size.
    pub fn with_nearest_count(mut self, m: usize) -> Self {
        self.nearest_count = m;
        self
    }

    /// Set the maximum abrupt-removal passes.
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes;
        self
    }

    /// Set the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the configuration before a run is constructed.
    pub fn validate(&self) -> Result<(), SolverError> {
        if self.population_size < 2 {
            return Err(SolverError::PopulationTooSmall {
                size: self.population_size,
            });
        }

        for (name, value) in [
            ("mutation_rate", self.mutation_rate),
            ("crossover_rate", self.crossover_rate),
            ("elitism_rate", self.elitism_rate),
            ("random_reset_rate", self.random_reset_rate),
        ] {
            if !(0.0..=1.0).contains(&value) || value.is_nan() {
                return Err(SolverError::RateOutOfRange { name, value });
            }
        }

        Ok(())
    }
}
