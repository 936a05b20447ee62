//! Hybrid evolutionary loop: cycle crossover with abrupt-removal refinement
//! and family selection.

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::Config;
use crate::error::SolverError;
use crate::genetic::GeneticOperators;
use crate::individual::{Individual, Tour};
use crate::local_search::AbruptRemoval;
use crate::population::{random_tour, Population};
use crate::problem::Problem;
use crate::time_windows::{FitnessResult, RouteEvaluator, TimeWindow};
use crate::RunResult;

/// Alternate evolutionary variant.
///
/// Every offspring of a cycle crossover is refined by abrupt removal, and
/// family selection keeps the two best of {parent 1, parent 2, child} in the
/// parents' slots. A whole-population random-reset mutation fires with
/// probability `mutation_rate` per generation.
pub struct HybridAlgorithm {
    pub problem: Problem,
    pub config: Config,
    pub population: Population,
    pub history: Vec<f64>,
    evaluator: RouteEvaluator,
    operators: GeneticOperators,
    refiner: AbruptRemoval,
    best_tour: Option<Tour>,
    best_fitness: Option<FitnessResult>,
    rng: ChaCha8Rng,
}

impl HybridAlgorithm {
    /// Construct a hybrid run for the given problem and configuration.
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
        let refiner = AbruptRemoval::new(config.nearest_count, config.max_passes);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(HybridAlgorithm {
            problem,
            config,
            population: Population::default(),
            history: Vec::new(),
            evaluator,
            operators,
            refiner,
            best_tour: None,
            best_fitness: None,
            rng,
        })
    }

    /// Run the hybrid loop to completion.
    pub fn run(&mut self) -> RunResult {
        let n = self.problem.num_nodes();

        if n == 1 {
            return RunResult {
                best_tour: vec![self.problem.start_index],
                best_fitness: FitnessResult::zero(),
                history: Vec::new(),
            };
        }

        info!(
            "starting hybrid run: {} nodes, population {}, {} generations, m = {}",
            n, self.config.population_size, self.config.generations, self.config.nearest_count
        );

        self.population =
            Population::initialize(&self.problem, self.config.population_size, &mut self.rng);

        // Refine the whole initial population before the loop starts.
        for individual in &mut self.population.individuals {
            let (tour, fitness) =
                self.refiner
                    .refine(&individual.tour, &self.evaluator, &self.problem.time_matrix);
            *individual = Individual::with_fitness(tour, fitness);
        }
        self.track_best();

        for generation in 0..self.config.generations {
            for _ in 0..self.config.population_size / 2 {
                self.family_step();
            }

            self.maybe_random_reset();
            self.track_best();
            self.history.push(self.best_total());

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
            "hybrid run complete: best total {:.2} h (travel {:.2}, waiting {:.2}, penalty {:.2})",
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

    /// One reproduction step: two uniformly drawn distinct parents, a cycle
    /// crossover child refined by abrupt removal, and the two best of the
    /// family taking the parents' slots.
    fn family_step(&mut self) {
        let pop_size = self.population.len();

        let slot1 = self.rng.gen_range(0..pop_size);
        let mut slot2 = self.rng.gen_range(0..pop_size);
        while slot2 == slot1 {
            slot2 = self.rng.gen_range(0..pop_size);
        }

        let parent1 = self.population.individuals[slot1].clone();
        let parent2 = self.population.individuals[slot2].clone();

        let child_tour = self.operators.cycle_crossover(&parent1.tour, &parent2.tour);
        let (child_tour, child_fitness) =
            self.refiner
                .refine(&child_tour, &self.evaluator, &self.problem.time_matrix);
        let child = Individual::with_fitness(child_tour, child_fitness);

        let mut family = [parent1, parent2, child];
        family.sort();

        let [first, second, _] = family;
        self.population.individuals[slot1] = first;
        self.population.individuals[slot2] = second;
    }

    /// With probability `mutation_rate`, replace one random individual with
    /// a fresh random permutation.
    fn maybe_random_reset(&mut self) {
        if self.rng.gen::<f64>() < self.config.mutation_rate {
            let index = self.rng.gen_range(0..self.population.len());
            let tour = random_tour(&self.problem, &mut self.rng);
            let mut fresh = Individual::new(tour);
            fresh.evaluate(&self.evaluator, &self.problem.time_matrix);
            self.population.individuals[index] = fresh;
            debug!("random reset at slot {}", index);
        }
    }

    fn track_best(&mut self) {
        if let Some(best) = self.population.best() {
            if self
                .best_fitness
                .map_or(true, |current| best.total_time() < current.total_time)
            {
                self.best_tour = Some(best.tour.clone());
                self.best_fitness = best.fitness().copied();
            }
        }
    }

    fn best_total(&self) -> f64 {
        self.best_fitness
            .map_or(f64::INFINITY, |fitness| fitness.total_time)
    }
}
