//! Genetic operators: crossover and mutation.
//!
//! Every operator treats its input tours as read-only and returns a freshly
//! allocated tour, so sibling individuals can never share backing storage.
//! The start gene at position 0 is preserved by all crossover variants and
//! by swap/inversion mutation; scramble mutation protects it only when
//! configured to. Because an unprotected scramble can displace the start
//! gene, every crossover canonicalizes its parents before stripping
//! position 0.

use rand::seq::index::sample;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{Config, CrossoverMethod, MutationMethod};
use crate::individual::{canonicalize_start, Tour};

/// Implements the crossover and mutation strategies for the TSP-TW solver.
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub start_index: usize,
    pub crossover_method: CrossoverMethod,
    pub mutation_method: MutationMethod,
    pub scramble_protects_start: bool,
}

impl GeneticOperators {
    /// Build the operators from a validated configuration.
    pub fn from_config(config: &Config, start_index: usize) -> Self {
        GeneticOperators {
            mutation_rate: config.mutation_rate,
            crossover_rate: config.crossover_rate,
            start_index,
            crossover_method: config.crossover_method,
            mutation_method: config.mutation_method,
            scramble_protects_start: config.scramble_protects_start,
        }
    }

    /// Recombine two parent tours with the configured strategy.
    pub fn crossover<R: Rng>(&self, rng: &mut R, parent1: &[usize], parent2: &[usize]) -> Tour {
        match self.crossover_method {
            CrossoverMethod::Order => self.order_crossover(rng, parent1, parent2),
            CrossoverMethod::PartiallyMapped => self.pmx_crossover(rng, parent1, parent2),
            CrossoverMethod::Cycle => self.cycle_crossover(parent1, parent2),
        }
    }

    /// Order crossover (OX).
    ///
    /// A random segment of parent 1 is copied into the offspring; remaining
    /// positions are filled in cyclic order starting just after the segment,
    /// with parent 2's genes read in its own cyclic order from the segment
    /// end, skipping genes already placed.
    pub fn order_crossover<R: Rng>(
        &self,
        rng: &mut R,
        parent1: &[usize],
        parent2: &[usize],
    ) -> Tour {
        let parent1 = canonicalize_start(parent1, self.start_index);
        let parent2 = canonicalize_start(parent2, self.start_index);
        let body1 = &parent1[1..];
        let body2 = &parent2[1..];
        let n = body1.len();

        if n <= 1 {
            return parent1;
        }

        let (cut_start, cut_end) = random_cut_points(rng, n);

        let node_count = parent1.len();
        let mut placed = vec![false; node_count];
        let mut body = vec![usize::MAX; n];

        for i in cut_start..cut_end {
            body[i] = body1[i];
            placed[body1[i]] = true;
        }

        let mut position = cut_end % n;
        for offset in 0..n {
            let gene = body2[(cut_end + offset) % n];
            if !placed[gene] {
                body[position] = gene;
                placed[gene] = true;
                position = (position + 1) % n;
            }
        }

        rebuild_with_start(self.start_index, body)
    }

    /// Partially-mapped crossover (PMX).
    ///
    /// Parent 1's segment is kept in place; parent 2's segment genes that
    /// would be lost are relocated by chasing the position mapping between
    /// the two parents until a slot outside the segment is found.
    pub fn pmx_crossover<R: Rng>(&self, rng: &mut R, parent1: &[usize], parent2: &[usize]) -> Tour {
        let parent1 = canonicalize_start(parent1, self.start_index);
        let parent2 = canonicalize_start(parent2, self.start_index);
        let body1 = &parent1[1..];
        let body2 = &parent2[1..];
        let n = body1.len();

        if n <= 1 {
            return parent1;
        }

        let (cut_start, cut_end) = random_cut_points(rng, n);

        let node_count = parent1.len();
        let mut position_in_body2 = vec![usize::MAX; node_count];
        for (i, &gene) in body2.iter().enumerate() {
            position_in_body2[gene] = i;
        }

        let mut body = vec![usize::MAX; n];
        let mut in_segment = vec![false; node_count];
        for i in cut_start..cut_end {
            body[i] = body1[i];
            in_segment[body1[i]] = true;
        }

        for i in cut_start..cut_end {
            let gene = body2[i];
            if in_segment[gene] {
                continue;
            }

            // Chase the mapping until the displaced gene lands outside the
            // copied segment.
            let mut slot = i;
            while slot >= cut_start && slot < cut_end {
                slot = position_in_body2[body1[slot]];
            }
            body[slot] = gene;
        }

        for i in 0..n {
            if body[i] == usize::MAX {
                body[i] = body2[i];
            }
        }

        rebuild_with_start(self.start_index, body)
    }

    /// Cycle crossover (CX).
    ///
    /// Follows the value-cycle between the parents starting at index 0,
    /// copying cycle members from parent 1 and filling every other position
    /// from parent 2.
    pub fn cycle_crossover(&self, parent1: &[usize], parent2: &[usize]) -> Tour {
        let parent1 = canonicalize_start(parent1, self.start_index);
        let parent2 = canonicalize_start(parent2, self.start_index);
        let body1 = &parent1[1..];
        let body2 = &parent2[1..];
        let n = body1.len();

        if n <= 1 {
            return parent1;
        }

        let node_count = parent1.len();
        let mut position_in_body1 = vec![usize::MAX; node_count];
        for (i, &gene) in body1.iter().enumerate() {
            position_in_body1[gene] = i;
        }

        let mut body = vec![usize::MAX; n];
        let mut visited = vec![false; n];

        let mut index = 0;
        while !visited[index] {
            body[index] = body1[index];
            visited[index] = true;
            index = position_in_body1[body2[index]];
        }

        for i in 0..n {
            if body[i] == usize::MAX {
                body[i] = body2[i];
            }
        }

        rebuild_with_start(self.start_index, body)
    }

    /// Apply the configured mutation with probability `mutation_rate`.
    pub fn mutate<R: Rng>(&self, rng: &mut R, tour: &[usize]) -> Tour {
        if rng.gen::<f64>() > self.mutation_rate {
            return tour.to_vec();
        }

        match self.mutation_method {
            MutationMethod::Swap => self.swap_mutation(rng, tour),
            MutationMethod::Inversion => self.inversion_mutation(rng, tour),
            MutationMethod::Scramble => self.scramble_mutation(rng, tour),
        }
    }

    /// Exchange two random non-start positions.
    pub fn swap_mutation<R: Rng>(&self, rng: &mut R, tour: &[usize]) -> Tour {
        let mut mutated = tour.to_vec();

        if tour.len() < 3 {
            return mutated;
        }

        let picks = sample(rng, tour.len() - 1, 2);
        mutated.swap(picks.index(0) + 1, picks.index(1) + 1);
        mutated
    }

    /// Reverse a random sub-range that excludes the start position.
    pub fn inversion_mutation<R: Rng>(&self, rng: &mut R, tour: &[usize]) -> Tour {
        let mut mutated = tour.to_vec();

        if tour.len() < 4 {
            return mutated;
        }

        let picks = sample(rng, tour.len() - 1, 2);
        let (mut a, mut b) = (picks.index(0) + 1, picks.index(1) + 1);
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }

        mutated[a..b].reverse();
        mutated
    }

    /// Shuffle a random sub-range. Unless `scramble_protects_start` is set,
    /// the range may include position 0 and relocate the start gene.
    pub fn scramble_mutation<R: Rng>(&self, rng: &mut R, tour: &[usize]) -> Tour {
        let mut mutated = tour.to_vec();

        let lower = if self.scramble_protects_start { 1 } else { 0 };
        if tour.len() < lower + 2 {
            return mutated;
        }

        let picks = sample(rng, tour.len() - lower, 2);
        let (mut a, mut b) = (picks.index(0) + lower, picks.index(1) + lower);
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }

        mutated[a..b].shuffle(rng);
        mutated
    }
}

/// Draw two distinct cut points over a body of length `n`, returned as a
/// half-open `[start, end)` range.
fn random_cut_points<R: Rng>(rng: &mut R, n: usize) -> (usize, usize) {
    let picks = sample(rng, n, 2);
    let (a, b) = (picks.index(0), picks.index(1));
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn rebuild_with_start(start_index: usize, body: Vec<usize>) -> Tour {
    let mut tour = Vec::with_capacity(body.len() + 1);
    tour.push(start_index);
    tour.extend(body);
    tour
}
