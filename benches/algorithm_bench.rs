//! Benchmarks for the TSP-TW genetic algorithm.

#[cfg(feature = "bench")]
extern crate criterion;

#[cfg(feature = "bench")]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
#[cfg(feature = "bench")]
use tsptw_ga::config::Config;
#[cfg(feature = "bench")]
use tsptw_ga::local_search::{AcceptanceStrategy, LocalSearch};
#[cfg(feature = "bench")]
use tsptw_ga::problem::Problem;
#[cfg(feature = "bench")]
use tsptw_ga::GeneticAlgorithm;

/// Build a symmetric travel-time matrix from points on a grid.
#[cfg(feature = "bench")]
fn create_benchmark_problem(size: usize) -> Problem {
    let grid_size = (size as f64).sqrt().ceil() as usize;
    let points: Vec<(f64, f64)> = (0..size)
        .map(|i| {
            let row = i / grid_size;
            let col = i % grid_size;
            (col as f64 * 10.0, row as f64 * 10.0)
        })
        .collect();

    let mut matrix = vec![vec![0.0; size]; size];
    for i in 0..size {
        for j in 0..size {
            if i != j {
                let dx = points[i].0 - points[j].0;
                let dy = points[i].1 - points[j].1;
                matrix[i][j] = (dx * dx + dy * dy).sqrt() / 60.0;
            }
        }
    }

    Problem::new(format!("BenchProblem_{}", size), matrix, 0).expect("valid benchmark matrix")
}

#[cfg(feature = "bench")]
fn benchmark_evolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolution");

    for size in [16, 32, 64].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let problem = create_benchmark_problem(size);
            let config = Config::new()
                .with_population_size(50)
                .with_generations(20)
                .with_seed(7);

            b.iter(|| {
                let mut algorithm = GeneticAlgorithm::new(problem.clone(), config.clone())
                    .expect("valid benchmark config");
                algorithm.evolve()
            });
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_initialization(c: &mut Criterion) {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tsptw_ga::population::Population;

    let mut group = c.benchmark_group("initialization");

    for size in [16, 32, 64].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let problem = create_benchmark_problem(size);
            let mut rng = ChaCha8Rng::seed_from_u64(7);

            b.iter(|| Population::initialize(&problem, 100, &mut rng));
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_two_opt(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_opt");

    for size in [16, 32, 64].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let problem = create_benchmark_problem(size);
            let tour: Vec<usize> = (0..size).collect();
            let search = LocalSearch::new(AcceptanceStrategy::FirstImprovement);

            b.iter(|| search.optimize(&tour, &problem.time_matrix, 100));
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
criterion_group!(
    benches,
    benchmark_initialization,
    benchmark_evolution,
    benchmark_two_opt
);
#[cfg(feature = "bench")]
criterion_main!(benches);

#[cfg(not(feature = "bench"))]
fn main() {}
