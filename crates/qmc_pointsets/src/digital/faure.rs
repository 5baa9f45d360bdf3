//! Faure sequences in a prime base.
//!
//! `C_j[l][c] = binom(c, l) j^(c - l) mod b` for `l <= c`, zero below the
//! diagonal's complement. `C_0` is the identity and `C_1` the Pascal
//! matrix; dimensions are limited to `b`.

use qmc_core::error::ConfigError;
use qmc_core::math::{is_prime, next_prime};

use super::net::NetShape;
use super::sequence::{ColumnGenerator, DigitalSequence};

/// Column generator for Faure sequences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaureGenerator {
    base: u32,
}

impl FaureGenerator {
    /// Generator in the prime `base`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBase` if `base` is not prime.
    pub fn new(base: u32) -> Result<Self, ConfigError> {
        if !is_prime(u64::from(base)) {
            return Err(ConfigError::InvalidBase(base));
        }
        Ok(Self { base })
    }

    /// Generator in the smallest prime base `>= dim` (at least 2).
    pub fn for_dimension(dim: usize) -> Self {
        let base = if dim <= 2 {
            2
        } else if is_prime(dim as u64) {
            dim as u32
        } else {
            next_prime(dim as u64) as u32
        };
        Self { base }
    }
}

impl ColumnGenerator for FaureGenerator {
    fn base(&self) -> u32 {
        self.base
    }

    fn max_dimension(&self) -> usize {
        self.base as usize
    }

    fn fill_matrix(&self, j: usize, num_cols: usize, num_rows: usize, out: &mut [u32]) {
        let b = u64::from(self.base);
        let x = j as u64 % b;
        let mut powers = vec![1u64; num_cols.max(1)];
        for t in 1..powers.len() {
            powers[t] = powers[t - 1] * x % b;
        }
        // Pascal row c, mod b
        let mut binom = vec![0u64; num_cols.max(1)];
        for c in 0..num_cols {
            for l in (1..=c).rev() {
                binom[l] = (binom[l] + binom[l - 1]) % b;
            }
            binom[0] = 1;
            let column = &mut out[c * num_rows..(c + 1) * num_rows];
            for (l, digit) in column.iter_mut().enumerate().take(c + 1) {
                *digit = (binom[l] * powers[c - l] % b) as u32;
            }
        }
    }
}

/// Faure sequence truncated to `b^k` points.
pub type FaureSequence = DigitalSequence<FaureGenerator>;

impl DigitalSequence<FaureGenerator> {
    /// First `b^num_cols` points of the Faure sequence in `dim` dimensions,
    /// base the smallest prime `>= dim`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the shape is invalid.
    pub fn faure(num_cols: usize, dim: usize) -> Result<Self, ConfigError> {
        Self::faure_with(FaureGenerator::for_dimension(dim), num_cols, dim)
    }

    /// Faure sequence with an explicit generator.
    pub fn faure_with(
        generator: FaureGenerator,
        num_cols: usize,
        dim: usize,
    ) -> Result<Self, ConfigError> {
        let w = NetShape::max_out_digits(generator.base());
        Self::with_generator(generator, num_cols, num_cols, w, dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointset::PointSet;

    #[test]
    fn test_base_selection() {
        assert_eq!(FaureGenerator::for_dimension(1).base(), 2);
        assert_eq!(FaureGenerator::for_dimension(3).base(), 3);
        assert_eq!(FaureGenerator::for_dimension(4).base(), 5);
        assert_eq!(FaureGenerator::for_dimension(8).base(), 11);
        assert!(FaureGenerator::new(9).is_err());
    }

    #[test]
    fn test_pascal_matrix() {
        let g = FaureGenerator::new(5).unwrap();
        let mut out = vec![0u32; 16];
        g.fill_matrix(1, 4, 4, &mut out);
        // columns of binom(c, l) mod 5
        assert_eq!(out, vec![1, 0, 0, 0, 1, 1, 0, 0, 1, 2, 1, 0, 1, 3, 3, 1]);
    }

    #[test]
    fn test_power_scaling() {
        let g = FaureGenerator::new(5).unwrap();
        let mut out = vec![0u32; 9];
        g.fill_matrix(2, 3, 3, &mut out);
        // column 2: binom(2,l) 2^(2-l) = 4, 4, 1
        assert_eq!(&out[6..9], &[4, 4, 1]);
    }

    #[test]
    fn test_dimension_bounded_by_base() {
        assert!(FaureSequence::faure_with(FaureGenerator::new(3).unwrap(), 2, 3).is_ok());
        assert!(FaureSequence::faure_with(FaureGenerator::new(3).unwrap(), 2, 4).is_err());
    }

    #[test]
    fn test_values_in_unit_interval() {
        let seq = FaureSequence::faure(3, 5).unwrap();
        assert_eq!(seq.num_points(), 125);
        for i in 0..125 {
            for j in 0..5 {
                let x = seq.coordinate(i, j);
                assert!(x > 0.0 && x < 1.0);
            }
        }
    }
}
