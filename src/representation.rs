//! Genotype-to-phenotype encodings.
//!
//! A representation is a total mapping from the `2^L` genotypes of length `L`
//! onto the integer range `[0, 2^L)`. Every representation must be a
//! bijection: realized as a lookup table it is a permutation of
//! `{0, .., 2^L - 1}`, and table-backed representations are validated before
//! they can be used in a search.

use crate::genotype::Genotype;
use std::fmt;

/// Largest phenotype representable with `len` bits.
///
/// `len` must be in `1..=64`; callers validate genome lengths before use.
pub fn max_phenotype(len: usize) -> u64 {
    debug_assert!((1..=64).contains(&len), "genome length out of range");
    u64::MAX >> (64 - len)
}

// ============================================================================
// Representation
// ============================================================================

/// A genotype-to-phenotype mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Representation {
    /// Standard binary: the genotype read as a big-endian binary number.
    Binary,
    /// Binary-reflected Gray code.
    Gray,
    /// Explicit mapping, indexed by the genotype's standard-binary value.
    ///
    /// Construct through [`Representation::from_table`] so the permutation
    /// invariant is checked before the table reaches a search.
    Table(Vec<u64>),
}

impl Representation {
    /// Creates a lookup-table representation, validating that `table` is a
    /// permutation of `[0, table.len())` with a power-of-two length.
    ///
    /// # Errors
    /// Returns a [`RepresentationError`] describing the first violation found.
    pub fn from_table(table: Vec<u64>) -> Result<Self, RepresentationError> {
        validate_permutation(&table)?;
        Ok(Self::Table(table))
    }

    /// Maps a genotype to its phenotype. Pure, deterministic, and total over
    /// all `2^L` genotypes of the representation's length.
    pub fn encode(&self, bits: &Genotype) -> u64 {
        match self {
            Self::Binary => bits.binary_value(),
            Self::Gray => gray_value(bits),
            Self::Table(table) => {
                debug_assert_eq!(
                    table.len(),
                    1 << bits.len(),
                    "table length does not cover the genome length"
                );
                table[bits.binary_value() as usize]
            }
        }
    }

    /// The inverse mapping: the unique `len`-bit genotype encoding to
    /// `phenotype`, or `None` if `phenotype` is not representable.
    pub fn decode(&self, phenotype: u64, len: usize) -> Option<Genotype> {
        if len == 0 || len > 64 || phenotype > max_phenotype(len) {
            return None;
        }
        match self {
            Self::Binary => Some(Genotype::from_value(phenotype, len)),
            // The Gray codeword for value p is p ^ (p >> 1).
            Self::Gray => Some(Genotype::from_value(phenotype ^ (phenotype >> 1), len)),
            Self::Table(table) => {
                if table.len() != 1usize << len {
                    return None;
                }
                table
                    .iter()
                    .position(|&v| v == phenotype)
                    .map(|i| Genotype::from_value(i as u64, len))
            }
        }
    }

    /// Enumerates the full mapping as a lookup table: entry `i` is the
    /// phenotype of the genotype with standard-binary value `i`.
    ///
    /// This is the exchange format consumed by external representation
    /// analysis (e.g. locality scoring).
    pub fn table(&self, len: usize) -> Vec<u64> {
        (0..=max_phenotype(len))
            .map(|i| self.encode(&Genotype::from_value(i, len)))
            .collect()
    }

    /// The genome length a table-backed representation is fixed to, or
    /// `None` for the arithmetic encodings (which work at any length).
    pub fn fixed_len(&self) -> Option<usize> {
        match self {
            Self::Binary | Self::Gray => None,
            Self::Table(table) => Some(table.len().trailing_zeros() as usize),
        }
    }
}

/// Decodes a bit string read as a binary-reflected Gray codeword.
///
/// The first output bit equals the first input bit; each subsequent output
/// bit is the XOR of the running value's last bit with the next input bit.
fn gray_value(bits: &Genotype) -> u64 {
    let mut iter = bits.iter();
    let Some(first) = iter.next() else {
        return 0;
    };
    let mut value = u64::from(first);
    for bit in iter {
        let prev = value & 1;
        value = (value << 1) | if bit { prev ^ 1 } else { prev };
    }
    value
}

// ============================================================================
// Validation
// ============================================================================

/// Errors detected while validating a lookup table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RepresentationError {
    /// Table length is zero or not a power of two, so it cannot enumerate
    /// all genotypes of any length.
    NotPowerOfTwoLength {
        /// The offending table length.
        len: usize,
    },
    /// An entry falls outside `[0, len)`.
    OutOfRange {
        /// Index of the offending entry.
        index: usize,
        /// The offending value.
        value: u64,
    },
    /// A phenotype appears more than once, so the mapping is not a bijection.
    Duplicate {
        /// Index of the second occurrence.
        index: usize,
        /// The duplicated value.
        value: u64,
    },
}

impl fmt::Display for RepresentationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepresentationError::NotPowerOfTwoLength { len } => {
                write!(f, "table length {len} is not a positive power of two")
            }
            RepresentationError::OutOfRange { index, value } => {
                write!(f, "entry {value} at index {index} is outside the representable range")
            }
            RepresentationError::Duplicate { index, value } => {
                write!(f, "entry {value} at index {index} duplicates an earlier entry")
            }
        }
    }
}

impl std::error::Error for RepresentationError {}

/// Checks that `table` is a permutation of `[0, table.len())` and that its
/// length is a power of two.
///
/// # Errors
/// Returns the first violation found, scanning left to right.
pub fn validate_permutation(table: &[u64]) -> Result<(), RepresentationError> {
    let n = table.len();
    if n == 0 || !n.is_power_of_two() {
        return Err(RepresentationError::NotPowerOfTwoLength { len: n });
    }
    let mut seen = vec![false; n];
    for (index, &value) in table.iter().enumerate() {
        if value >= n as u64 {
            return Err(RepresentationError::OutOfRange { index, value });
        }
        if seen[value as usize] {
            return Err(RepresentationError::Duplicate { index, value });
        }
        seen[value as usize] = true;
    }
    Ok(())
}

// ============================================================================
// Bundled example tables
// ============================================================================

/// 3-bit mapping whose induced landscape has one maximum (target 4).
pub const ONE_MAXIMA: [u64; 8] = [5, 4, 1, 6, 7, 3, 0, 2];
/// 3-bit mapping with two local maxima (target 4).
pub const TWO_MAXIMA: [u64; 8] = [7, 2, 0, 5, 1, 6, 4, 3];
/// 3-bit mapping with three local maxima (target 4).
pub const THREE_MAXIMA: [u64; 8] = [0, 5, 4, 7, 1, 3, 6, 2];
/// 3-bit mapping with four local maxima (target 4).
pub const FOUR_MAXIMA: [u64; 8] = [5, 7, 6, 4, 1, 3, 2, 0];
/// A second 3-bit mapping with four local maxima (target 4).
pub const DIFFERENT_FOUR_MAXIMA: [u64; 8] = [3, 7, 0, 2, 1, 4, 5, 6];

/// "Worst" 5-bit mapping for target 15.
pub const FIVE_WORST: [u64; 32] = [
    4, 30, 29, 13, 24, 8, 2, 18, 21, 15, 10, 25, 14, 31, 17, 1, //
    28, 9, 3, 27, 7, 20, 16, 5, 0, 23, 26, 6, 19, 12, 11, 22,
];

/// Another low-locality 5-bit mapping for target 15.
pub const FIVE_UBL: [u64; 32] = [
    24, 1, 4, 19, 15, 16, 21, 13, 9, 26, 18, 0, 23, 12, 6, 22, //
    3, 28, 20, 14, 30, 7, 5, 27, 29, 10, 8, 31, 2, 17, 25, 11,
];

/// Non-greedy Gray encoding for 5-bit genomes.
pub const FIVE_NGG: [u64; 32] = [
    0, 1, 19, 2, 31, 28, 20, 3, 23, 26, 24, 25, 22, 27, 21, 4, //
    13, 14, 18, 15, 30, 29, 17, 16, 12, 9, 11, 10, 7, 8, 6, 5,
];

// ============================================================================
// Tests
// ============================================================================
