//! Fixed-length bit vectors (genotypes).
//!
//! Bit 0 is the most significant position under the standard binary
//! encoding, matching the big-endian reading used throughout the crate.

use rand::Rng;
use std::fmt;

/// An ordered, fixed-length sequence of bits, mutable in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Genotype {
    bits: Vec<bool>,
}

impl Genotype {
    /// Creates an all-zero genotype of `len` bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    /// Creates a genotype with each bit set independently with probability 0.5.
    pub fn random<R: Rng>(len: usize, rng: &mut R) -> Self {
        Self {
            bits: (0..len).map(|_| rng.random_bool(0.5)).collect(),
        }
    }

    /// Builds the `len`-bit genotype whose standard-binary value is `value`.
    ///
    /// Bits above position `len` are discarded.
    pub fn from_value(value: u64, len: usize) -> Self {
        debug_assert!(len <= 64, "genomes are limited to 64 bits");
        let bits = (0..len)
            .map(|i| (value >> (len - 1 - i)) & 1 == 1)
            .collect();
        Self { bits }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` for the zero-length genotype.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns bit `idx`.
    ///
    /// # Panics
    /// Panics if `idx` is out of bounds.
    pub fn get(&self, idx: usize) -> bool {
        self.bits[idx]
    }

    /// Toggles exactly one bit. O(1).
    ///
    /// # Panics
    /// Panics if `idx` is out of bounds.
    pub fn flip(&mut self, idx: usize) {
        self.bits[idx] = !self.bits[idx];
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.bits.iter().map(|&b| u32::from(b)).sum()
    }

    /// The genotype read as a big-endian binary number.
    pub fn binary_value(&self) -> u64 {
        self.bits
            .iter()
            .fold(0u64, |acc, &b| (acc << 1) | u64::from(b))
    }

    /// Iterates over the bits, most significant first.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            write!(f, "{}", u8::from(b))?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn zeros_has_requested_length_and_value_zero() {
        let g = Genotype::zeros(7);
        assert_eq!(g.len(), 7);
        assert_eq!(g.binary_value(), 0);
        assert_eq!(g.count_ones(), 0);
    }

    #[test]
    fn from_value_round_trips_through_binary_value() {
        for len in [3usize, 5, 8] {
            for v in 0..(1u64 << len) {
                let g = Genotype::from_value(v, len);
                assert_eq!(g.len(), len);
                assert_eq!(g.binary_value(), v);
            }
        }
    }

    #[test]
    fn bit_zero_is_most_significant() {
        let g = Genotype::from_value(0b100, 3);
        assert!(g.get(0));
        assert!(!g.get(1));
        assert!(!g.get(2));
    }

    #[test]
    fn flip_toggles_exactly_one_bit() {
        let mut g = Genotype::zeros(4);
        g.flip(1);
        assert_eq!(g.binary_value(), 0b0100);
        g.flip(1);
        assert_eq!(g.binary_value(), 0);
    }

    #[test]
    fn display_renders_bits_in_order() {
        let g = Genotype::from_value(0b1011, 4);
        assert_eq!(g.to_string(), "1011");
    }

    #[test]
    fn random_is_deterministic_for_a_fixed_seed() {
        let mut rng1 = SmallRng::seed_from_u64(99);
        let mut rng2 = SmallRng::seed_from_u64(99);
        assert_eq!(Genotype::random(32, &mut rng1), Genotype::random(32, &mut rng2));
    }

    #[test]
    fn random_bits_are_roughly_balanced() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut ones = 0u32;
        let samples = 200;
        let len = 64;
        for _ in 0..samples {
            ones += Genotype::random(len, &mut rng).count_ones();
        }
        let total = samples * len as u32;
        // 50/50 per bit; allow a wide statistical margin.
        assert!(ones > total / 3, "too few ones: {ones}/{total}");
        assert!(ones < total * 2 / 3, "too many ones: {ones}/{total}");
    }

    #[test]
    fn works_with_any_rng_implementation() {
        use rand_xorshift::XorShiftRng;

        let mut rng = XorShiftRng::seed_from_u64(42);
        let g = Genotype::random(16, &mut rng);
        assert_eq!(g.len(), 16);
    }
}
