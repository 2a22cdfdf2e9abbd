//! # One-Max Representation Engine
//!
//! A simulation engine for studying how the choice of *representation* (the
//! mapping from fixed-length bit strings to integer phenotypes) affects
//! single-organism stochastic search on the integer one-max problem.
//!
//! This crate provides:
//! - Pluggable genotype-to-phenotype encodings: standard binary,
//!   binary-reflected Gray, and explicit lookup tables (validated to be
//!   permutations of the representable range).
//! - Single-organism Simulated Annealing (Boltzmann acceptance, geometric
//!   cooling) and (1+1)-Evolution-Strategy (strict hill climbing) trial
//!   engines.
//! - A parallel experiment driver that advances many independent trials in
//!   lockstep and aggregates per-generation convergence statistics.
//!
//! ## Quick Start
//!
//! ```
//! use onemax::prelude::*;
//!
//! let cfg = ExperimentConfig {
//!     genome_len: 3,
//!     generations: 50,
//!     experiments: 8,
//!     seed: Some(12345),
//!     ..Default::default()
//! };
//! let fitness = OneMax::new(Representation::Gray, 7, cfg.genome_len)?;
//! let report = run_experiment(&cfg, fitness)?;
//!
//! assert_eq!(report.generations.len(), 50);
//! for stats in &report.generations {
//!     assert!((0.0..=1.0).contains(&stats.fraction_at_optimum));
//! }
//! # Ok::<(), onemax::ConfigError>(())
//! ```
//!
//! ## Modules
//!
//! - [`genotype`]: Fixed-length bit vectors.
//! - [`representation`]: Encodings and permutation validation.
//! - [`fitness`]: Fitness strategies (one-max, count-ones).
//! - [`organism`]: A genotype paired with its mutation behavior.
//! - [`trial`]: The SA / (1+1)-ES trial engine.
//! - [`experiment`]: The parallel experiment driver.
//!
//! ## Performance Notes
//!
//! - Phenotypes are `u64`, limiting genomes to 64 bits.
//! - Trials are embarrassingly parallel; the per-generation aggregation is a
//!   rayon map-reduce with no cross-trial shared mutable state.
//! - For maximum performance, compile with:
//!   `RUSTFLAGS="-C target-cpu=native" cargo build --release`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)] // One-max fitness is integral by construction

use std::fmt;

pub mod experiment;
pub mod fitness;
pub mod genotype;
pub mod organism;
pub mod representation;
pub mod trial;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::ConfigError;
    pub use crate::experiment::{
        Algorithm, ExperimentConfig, ExperimentReport, GenerationStats, run_experiment,
    };
    pub use crate::fitness::{CountOnes, Fitness, OneMax};
    pub use crate::genotype::Genotype;
    pub use crate::organism::Organism;
    pub use crate::representation::{Representation, RepresentationError};
    pub use crate::trial::Trial;
}

/// Errors detected while configuring a trial or experiment.
///
/// Every variant is fatal before the first generation runs; no configuration
/// problem is recovered mid-run and no partial results are produced.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Population size was zero.
    EmptyPopulation,
    /// Genome length was zero.
    EmptyGenome,
    /// Genome length exceeds the 64 bits a `u64` phenotype can hold.
    GenomeTooLong {
        /// The requested genome length.
        len: usize,
    },
    /// The fitness target exceeds the largest representable phenotype.
    TargetOutOfRange {
        /// The requested target value.
        target: u64,
        /// The largest representable phenotype for the genome length.
        max: u64,
    },
    /// A lookup-table representation does not cover the genome length.
    TableLengthMismatch {
        /// Required table length (`2^len`).
        expected: usize,
        /// Actual table length.
        got: usize,
    },
    /// Per-bit mutation probability outside `[0, 1]`.
    InvalidMutationProbability {
        /// The offending probability.
        p: f64,
    },
    /// Initial temperature was not positive and finite.
    InvalidTemperature {
        /// The offending temperature.
        temp: f64,
    },
    /// Cooling rate outside `(0, 1)`.
    InvalidCoolingRate {
        /// The offending rate.
        rate: f64,
    },
    /// The experiment was configured with zero trials.
    NoTrials,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPopulation => write!(f, "population size must be at least 1"),
            ConfigError::EmptyGenome => write!(f, "genome length must be at least 1"),
            ConfigError::GenomeTooLong { len } => {
                write!(f, "genome length {len} exceeds the 64-bit phenotype limit")
            }
            ConfigError::TargetOutOfRange { target, max } => {
                write!(
                    f,
                    "target {target} exceeds the largest representable phenotype {max}"
                )
            }
            ConfigError::TableLengthMismatch { expected, got } => {
                write!(
                    f,
                    "lookup table has {got} entries, genome length requires {expected}"
                )
            }
            ConfigError::InvalidMutationProbability { p } => {
                write!(f, "mutation probability {p} is outside [0, 1]")
            }
            ConfigError::InvalidTemperature { temp } => {
                write!(f, "initial temperature {temp} must be positive and finite")
            }
            ConfigError::InvalidCoolingRate { rate } => {
                write!(f, "cooling rate {rate} is outside (0, 1)")
            }
            ConfigError::NoTrials => write!(f, "experiment must run at least 1 trial"),
        }
    }
}

impl std::error::Error for ConfigError {}
