//! The trial engine: one independent SA or (1+1)-ES run.
//!
//! A trial owns a fixed-size population of organisms, the annealing
//! temperature (SA only), and its own random stream. It has no terminal
//! state: the driver advances it one generation at a time for as long as it
//! likes, and reads aggregate queries between steps.

use crate::ConfigError;
use crate::fitness::Fitness;
use crate::organism::Organism;
use rand::prelude::*;
use rand::rngs::SmallRng;
use std::sync::Arc;

/// One independent single-organism search run.
///
/// The population is created once and never resized. Randomness comes from a
/// per-trial `SmallRng` so concurrently advanced trials never share or
/// observe each other's draws.
pub struct Trial<F> {
    population: Vec<Organism<F>>,
    len: usize,
    temp: f64,
    t_adjust: f64,
    rng: SmallRng,
}

impl<F: Fitness> Trial<F> {
    /// Creates a trial with `population_size` uniformly random organisms of
    /// `len` bits each.
    ///
    /// # Errors
    /// Fails fast on a non-positive population or genome length, a mutation
    /// probability outside `[0, 1]`, a non-positive initial temperature, or a
    /// cooling rate outside `(0, 1)`. Nothing is retried: a malformed
    /// configuration is rejected here, never discovered mid-run.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        population_size: usize,
        len: usize,
        fitness: Arc<F>,
        p_m: f64,
        temp: f64,
        t_adjust: f64,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if len == 0 {
            return Err(ConfigError::EmptyGenome);
        }
        if len > 64 {
            return Err(ConfigError::GenomeTooLong { len });
        }
        if !(0.0..=1.0).contains(&p_m) || !p_m.is_finite() {
            return Err(ConfigError::InvalidMutationProbability { p: p_m });
        }
        if !(temp > 0.0 && temp.is_finite()) {
            return Err(ConfigError::InvalidTemperature { temp });
        }
        if !(t_adjust > 0.0 && t_adjust < 1.0) {
            return Err(ConfigError::InvalidCoolingRate { rate: t_adjust });
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        let population = (0..population_size)
            .map(|_| Organism::random(len, Arc::clone(&fitness), p_m, &mut rng))
            .collect();

        Ok(Self {
            population,
            len,
            temp,
            t_adjust,
            rng,
        })
    }

    /// Advances one simulated-annealing generation.
    ///
    /// Picks one organism and one bit uniformly at random, builds a bit-flip
    /// copy, and installs it under the Boltzmann criterion: accept on strict
    /// improvement, or with probability `exp((f1 - f0) / T)` otherwise. The
    /// temperature then decays by the cooling rate regardless of the
    /// acceptance outcome.
    pub fn sa_generation(&mut self) {
        let org = self.rng.random_range(0..self.population.len());
        let bit = self.rng.random_range(0..self.len);

        let mut candidate = self.population[org].clone();
        let f0 = candidate.fitness();
        candidate.flip(bit);
        let f1 = candidate.fitness();

        if boltzmann_accept(f0, f1, self.temp, &mut self.rng) {
            self.population[org] = candidate;
        }

        self.temp *= self.t_adjust;
    }

    /// Advances one (1+1)-ES generation.
    ///
    /// Picks one organism uniformly at random, mutates every bit of a copy
    /// independently with the organism's mutation probability, and installs
    /// the copy only on strict fitness improvement. No Boltzmann term, no
    /// temperature involvement.
    pub fn es_generation(&mut self) {
        let org = self.rng.random_range(0..self.population.len());

        let mut candidate = self.population[org].clone();
        let f0 = candidate.fitness();
        candidate.mutate_all(&mut self.rng);
        let f1 = candidate.fitness();

        if f1 > f0 {
            self.population[org] = candidate;
        }
    }

    /// Number of organisms whose current fitness equals `optimum` exactly.
    ///
    /// Exact equality is sound for the integral one-max fitness; fitness
    /// functions producing non-integral values would make this fragile.
    pub fn count_at_optimum(&self, optimum: f64) -> usize {
        self.population
            .iter()
            .filter(|o| o.fitness() == optimum)
            .count()
    }

    /// Sum of all organisms' current fitness.
    pub fn total_fitness(&self) -> f64 {
        self.population.iter().map(Organism::fitness).sum()
    }

    /// The current annealing temperature.
    pub fn temperature(&self) -> f64 {
        self.temp
    }

    /// The organisms, in creation order.
    pub fn population(&self) -> &[Organism<F>] {
        &self.population
    }
}

/// The SA acceptance rule.
///
/// The random draw is consumed only when the strict-improvement test fails
/// (short-circuit `||`), so improving moves never advance the random stream.
#[inline]
fn boltzmann_accept<R: Rng>(f0: f64, f1: f64, temp: f64, rng: &mut R) -> bool {
    f1 > f0 || rng.random::<f64>() < ((f1 - f0) / temp).exp()
}

// ============================================================================
// Tests
// ============================================================================
