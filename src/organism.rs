//! A candidate solution: one genotype plus its scoring and mutation behavior.

use crate::fitness::Fitness;
use crate::genotype::Genotype;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// A single organism: a genotype, a shared fitness strategy, and a per-bit
/// mutation probability.
///
/// Candidate moves never mutate an organism in place: the trial engine clones
/// the incumbent, mutates the clone, and only installs it on acceptance.
pub struct Organism<F> {
    bits: Genotype,
    fitness: Arc<F>,
    p_m: f64,
}

impl<F> Clone for Organism<F> {
    fn clone(&self) -> Self {
        Self {
            bits: self.bits.clone(),
            fitness: Arc::clone(&self.fitness),
            p_m: self.p_m,
        }
    }
}

impl<F: Fitness> Organism<F> {
    /// Creates an organism with `len` uniformly random bits (each bit
    /// independently 50/50).
    ///
    /// `p_m` must be in `[0, 1]`; trial construction validates it.
    pub fn random<R: Rng>(len: usize, fitness: Arc<F>, p_m: f64, rng: &mut R) -> Self {
        Self {
            bits: Genotype::random(len, rng),
            fitness,
            p_m,
        }
    }

    /// Evaluates the fitness strategy on the current bits.
    ///
    /// Recomputed on every call; nothing is cached.
    pub fn fitness(&self) -> f64 {
        self.fitness.eval(&self.bits)
    }

    /// Toggles exactly one bit. O(1).
    pub fn flip(&mut self, idx: usize) {
        self.bits.flip(idx);
    }

    /// Independently flips each bit with probability `p_m` using fresh
    /// random draws. Used by the ES generation step.
    pub fn mutate_all<R: Rng>(&mut self, rng: &mut R) {
        for i in 0..self.bits.len() {
            if rng.random_bool(self.p_m) {
                self.bits.flip(i);
            }
        }
    }

    /// The current genotype.
    pub fn bits(&self) -> &Genotype {
        &self.bits
    }
}

impl<F> fmt::Display for Organism<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.bits.fmt(f)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::CountOnes;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn organism(len: usize, p_m: f64, seed: u64) -> (Organism<CountOnes>, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let org = Organism::random(len, Arc::new(CountOnes), p_m, &mut rng);
        (org, rng)
    }

    #[test]
    fn fitness_tracks_the_current_bits() {
        let (mut org, _) = organism(8, 0.5, 1);
        let before = org.fitness();
        let idx = 3;
        let was_set = org.bits().get(idx);
        org.flip(idx);
        let delta = if was_set { -1.0 } else { 1.0 };
        assert_eq!(org.fitness(), before + delta);
    }

    #[test]
    fn mutate_all_with_probability_one_flips_every_bit() {
        let (mut org, mut rng) = organism(16, 1.0, 2);
        let before = org.bits().clone();
        org.mutate_all(&mut rng);
        for i in 0..16 {
            assert_ne!(org.bits().get(i), before.get(i), "bit {i}");
        }
    }

    #[test]
    fn mutate_all_with_probability_zero_is_a_no_op() {
        let (mut org, mut rng) = organism(16, 0.0, 3);
        let before = org.bits().clone();
        org.mutate_all(&mut rng);
        assert_eq!(org.bits(), &before);
    }

    #[test]
    fn clone_then_flip_leaves_the_incumbent_untouched() {
        let (org, _) = organism(8, 0.5, 4);
        let mut candidate = org.clone();
        candidate.flip(0);
        assert_ne!(org.bits(), candidate.bits());
        assert_eq!(org.bits().len(), candidate.bits().len());
    }

    #[test]
    fn mutate_all_flip_rate_is_near_p_m() {
        let (mut org, mut rng) = organism(64, 0.25, 5);
        let mut flips = 0u32;
        let rounds = 500;
        for _ in 0..rounds {
            let before = org.bits().clone();
            org.mutate_all(&mut rng);
            for i in 0..64 {
                if org.bits().get(i) != before.get(i) {
                    flips += 1;
                }
            }
        }
        let rate = f64::from(flips) / f64::from(rounds * 64);
        assert!((rate - 0.25).abs() < 0.02, "observed flip rate {rate}");
    }

    #[test]
    fn display_renders_the_genotype() {
        let (org, _) = organism(6, 0.5, 6);
        assert_eq!(org.to_string(), org.bits().to_string());
    }
}
