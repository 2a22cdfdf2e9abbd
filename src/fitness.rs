//! Fitness strategies for the one-max problem family.
//!
//! A fitness strategy is injected at trial construction, with the
//! representation and target baked in, so the trial engine itself stays
//! agnostic of how genotypes are scored.

use crate::ConfigError;
use crate::genotype::Genotype;
use crate::representation::{Representation, max_phenotype};

/// A scalar scoring strategy over genotypes. Higher is better.
///
/// Implementations must be pure: two calls on the same genotype return the
/// same value, and evaluation never mutates shared state. `Send + Sync` lets
/// trials share one strategy across rayon workers.
pub trait Fitness: Send + Sync {
    /// Computes the fitness of a genotype.
    fn eval(&self, bits: &Genotype) -> f64;

    /// The largest value `eval` can return for `len`-bit genotypes.
    fn max_fitness(&self, len: usize) -> f64;

    /// Validates the strategy against the genome length a search will run
    /// at. The experiment driver calls this before building any trial, so a
    /// strategy constructed for a different length is rejected up front
    /// rather than discovered mid-run.
    ///
    /// # Errors
    /// The default implementation accepts every length.
    fn check_genome_len(&self, len: usize) -> Result<(), ConfigError> {
        let _ = len;
        Ok(())
    }
}

// ============================================================================
// OneMax
// ============================================================================

/// Linear one-max fitness: `(2^L - 1) - |phenotype - target|`.
///
/// Maximal exactly when the phenotype equals the target, where it reaches
/// `2^L - 1`.
#[derive(Clone, Debug)]
pub struct OneMax {
    representation: Representation,
    target: u64,
}

impl OneMax {
    /// Creates a one-max fitness for `len`-bit genotypes.
    ///
    /// # Errors
    /// Fails fast, before any search runs, if `len` is not in `1..=64`, if
    /// `target` exceeds the largest representable phenotype, or if a
    /// table-backed representation does not cover `len` bits.
    pub fn new(
        representation: Representation,
        target: u64,
        len: usize,
    ) -> Result<Self, ConfigError> {
        let fitness = Self {
            representation,
            target,
        };
        fitness.check_genome_len(len)?;
        Ok(fitness)
    }

    /// The target phenotype.
    pub fn target(&self) -> u64 {
        self.target
    }

    /// The representation this fitness decodes genotypes with.
    pub fn representation(&self) -> &Representation {
        &self.representation
    }
}

impl Fitness for OneMax {
    fn eval(&self, bits: &Genotype) -> f64 {
        let phenotype = self.representation.encode(bits);
        let maxfit = max_phenotype(bits.len()) as f64;
        maxfit - (phenotype as f64 - self.target as f64).abs()
    }

    fn max_fitness(&self, len: usize) -> f64 {
        max_phenotype(len) as f64
    }

    fn check_genome_len(&self, len: usize) -> Result<(), ConfigError> {
        if len == 0 {
            return Err(ConfigError::EmptyGenome);
        }
        if len > 64 {
            return Err(ConfigError::GenomeTooLong { len });
        }
        let max = max_phenotype(len);
        if self.target > max {
            return Err(ConfigError::TargetOutOfRange {
                target: self.target,
                max,
            });
        }
        if let Some(fixed) = self.representation.fixed_len()
            && fixed != len
        {
            return Err(ConfigError::TableLengthMismatch {
                expected: 1 << len,
                got: 1 << fixed,
            });
        }
        Ok(())
    }
}

// ============================================================================
// CountOnes
// ============================================================================

/// Representation-free fitness: the number of set bits.
///
/// Plain one-max without any phenotype mapping.
#[derive(Clone, Copy, Debug, Default)]
pub struct CountOnes;

impl Fitness for CountOnes {
    fn eval(&self, bits: &Genotype) -> f64 {
        f64::from(bits.count_ones())
    }

    fn max_fitness(&self, len: usize) -> f64 {
        len as f64
    }
}

// ============================================================================
// Tests
// ============================================================================
