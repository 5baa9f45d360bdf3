//! Sobol' sequences in base 2.
//!
//! Dimension 0 is the van der Corput sequence (identity matrix). Dimension
//! `j >= 1` uses a primitive polynomial of degree `s` with inner
//! coefficients `a` and initial direction numbers `m_1..m_s` (odd,
//! `m_i < 2^i`). Direction numbers beyond `s` follow
//!
//! `V_i = V_{i-s} ^ (V_{i-s} >> s) ^ XOR_{t=1}^{s-1} a_t V_{i-t}`
//!
//! where `a_t` is bit `s - 1 - t` of `a`. Column `c` of the generator matrix
//! holds the bits of `V_{c+1}`, most significant first.

use std::sync::Arc;

use qmc_core::error::ConfigError;

use super::net::NetShape;
use super::sequence::{ColumnGenerator, DigitalSequence};

/// Primitive polynomial and initial direction numbers of one dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SobolDirection {
    degree: u32,
    poly: u32,
    initial: Vec<u32>,
}

impl SobolDirection {
    /// Validates and creates a direction entry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` unless `initial` has `degree` entries, each
    /// `m_i` is odd and below `2^i`, and `poly < 2^(degree - 1)`.
    pub fn new(degree: u32, poly: u32, initial: Vec<u32>) -> Result<Self, ConfigError> {
        if degree == 0 || degree > 31 || initial.len() != degree as usize {
            return Err(ConfigError::InvalidParameter {
                name: "degree",
                value: format!("{} with {} initial numbers", degree, initial.len()),
            });
        }
        if u64::from(poly) >= 1u64 << (degree - 1) {
            return Err(ConfigError::InvalidParameter {
                name: "poly",
                value: format!("{} has more than {} inner coefficients", poly, degree - 1),
            });
        }
        for (i, &m) in initial.iter().enumerate() {
            if m % 2 == 0 || u64::from(m) >= 1u64 << (i + 1) {
                return Err(ConfigError::InvalidParameter {
                    name: "initial",
                    value: format!("m_{} = {} must be odd and below 2^{}", i + 1, m, i + 1),
                });
            }
        }
        Ok(Self {
            degree,
            poly,
            initial,
        })
    }

    /// Degree `s` of the primitive polynomial.
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Inner coefficients `a` of the polynomial.
    pub fn poly(&self) -> u32 {
        self.poly
    }

    /// Initial direction numbers `m_1..m_s`.
    pub fn initial(&self) -> &[u32] {
        &self.initial
    }
}

/// Joe and Kuo direction numbers for dimensions 2 to 21 (1-based), as
/// `(s, a, m_1..m_s)`.
const JOE_KUO: [(u32, u32, &[u32]); 20] = [
    (1, 0, &[1]),
    (2, 1, &[1, 3]),
    (3, 1, &[1, 3, 1]),
    (3, 2, &[1, 1, 1]),
    (4, 1, &[1, 1, 3, 3]),
    (4, 4, &[1, 3, 5, 13]),
    (5, 2, &[1, 1, 5, 5, 17]),
    (5, 4, &[1, 1, 5, 5, 5]),
    (5, 7, &[1, 1, 7, 11, 19]),
    (5, 11, &[1, 1, 5, 1, 1]),
    (5, 13, &[1, 1, 1, 3, 11]),
    (5, 14, &[1, 3, 5, 5, 31]),
    (6, 1, &[1, 3, 3, 9, 7, 49]),
    (6, 13, &[1, 1, 1, 15, 21, 21]),
    (6, 16, &[1, 3, 1, 13, 27, 49]),
    (6, 19, &[1, 1, 1, 15, 7, 5]),
    (6, 22, &[1, 3, 1, 15, 13, 25]),
    (6, 25, &[1, 1, 5, 5, 19, 61]),
    (7, 1, &[1, 3, 7, 11, 23, 15, 103]),
    (7, 4, &[1, 3, 7, 13, 13, 15, 69]),
];

/// Column generator for Sobol' sequences.
#[derive(Clone, Debug)]
pub struct SobolGenerator {
    directions: Arc<[SobolDirection]>,
}

impl SobolGenerator {
    /// Generator with the built-in direction numbers (21 dimensions).
    pub fn joe_kuo() -> Self {
        let directions: Vec<SobolDirection> = JOE_KUO
            .iter()
            .map(|&(degree, poly, m)| SobolDirection {
                degree,
                poly,
                initial: m.to_vec(),
            })
            .collect();
        Self::from_directions(directions)
    }

    /// Generator for dimensions `1..=directions.len()`; dimension 0 is the
    /// van der Corput sequence.
    pub fn from_directions(directions: Vec<SobolDirection>) -> Self {
        Self {
            directions: directions.into(),
        }
    }

    /// Direction numbers `V_1..V_count` of dimension `j` as `width`-bit words.
    pub fn direction_numbers(&self, j: usize, count: usize, width: usize) -> Vec<u64> {
        let mut v = Vec::with_capacity(count);
        if j == 0 {
            v.extend((1..=count).map(|i| 1u64 << (width - i)));
            return v;
        }
        let dir = &self.directions[j - 1];
        let s = dir.degree as usize;
        for i in 1..=count {
            let value = if i <= s {
                u64::from(dir.initial[i - 1]) << (width - i)
            } else {
                let base = v[i - s - 1];
                let mut value = base ^ (base >> s);
                for t in 1..s {
                    if (dir.poly >> (s - 1 - t)) & 1 == 1 {
                        value ^= v[i - t - 1];
                    }
                }
                value
            };
            v.push(value);
        }
        v
    }
}

impl Default for SobolGenerator {
    fn default() -> Self {
        Self::joe_kuo()
    }
}

impl ColumnGenerator for SobolGenerator {
    fn base(&self) -> u32 {
        2
    }

    fn max_dimension(&self) -> usize {
        self.directions.len() + 1
    }

    fn fill_matrix(&self, j: usize, num_cols: usize, num_rows: usize, out: &mut [u32]) {
        let v = self.direction_numbers(j, num_cols, num_rows);
        for (c, &word) in v.iter().enumerate() {
            let column = &mut out[c * num_rows..(c + 1) * num_rows];
            for (l, digit) in column.iter_mut().enumerate() {
                *digit = ((word >> (num_rows - 1 - l)) & 1) as u32;
            }
        }
    }
}

/// Sobol' sequence truncated to `2^k` points.
pub type SobolSequence = DigitalSequence<SobolGenerator>;

impl DigitalSequence<SobolGenerator> {
    /// First `2^num_cols` points of the Sobol' sequence in `dim` dimensions,
    /// with the built-in direction numbers and 31 output bits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `num_cols > 31` or `dim` exceeds 21.
    pub fn sobol(num_cols: usize, dim: usize) -> Result<Self, ConfigError> {
        Self::sobol_with(SobolGenerator::joe_kuo(), num_cols, dim)
    }

    /// Sobol' sequence with a custom generator.
    pub fn sobol_with(
        generator: SobolGenerator,
        num_cols: usize,
        dim: usize,
    ) -> Result<Self, ConfigError> {
        let w = NetShape::max_out_digits(2);
        Self::with_generator(generator, num_cols, w, w, dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointset::PointSet;
    use qmc_core::math::IndexOrder;

    #[test]
    fn test_builtin_table_is_valid() {
        for &(degree, poly, m) in JOE_KUO.iter() {
            assert!(SobolDirection::new(degree, poly, m.to_vec()).is_ok());
        }
    }

    #[test]
    fn test_direction_validation() {
        assert!(SobolDirection::new(2, 1, vec![1, 2]).is_err());
        assert!(SobolDirection::new(2, 1, vec![1, 5]).is_err());
        assert!(SobolDirection::new(2, 2, vec![1, 3]).is_err());
        assert!(SobolDirection::new(2, 1, vec![1]).is_err());
    }

    #[test]
    fn test_second_dimension_natural_order() {
        let seq = SobolSequence::sobol(3, 2).unwrap();
        let net = seq.net();
        let expected = [0.5, 0.75, 0.25, 0.625, 0.125, 0.375, 0.875];
        for (i, &e) in expected.iter().enumerate() {
            assert_eq!(net.coordinate_in(i + 1, 1, IndexOrder::Natural), e);
        }
    }

    #[test]
    fn test_first_dimension_is_van_der_corput() {
        let seq = SobolSequence::sobol(4, 1).unwrap();
        for i in 1..16usize {
            let expected = qmc_core::math::radical_inverse(2, i as u64);
            assert_eq!(seq.net().coordinate_in(i, 0, IndexOrder::Natural), expected);
        }
    }

    #[test]
    fn test_dimension_limit() {
        assert!(SobolSequence::sobol(4, 21).is_ok());
        assert!(SobolSequence::sobol(4, 22).is_err());
        assert!(SobolSequence::sobol(32, 1).is_err());
    }

    #[test]
    fn test_every_dimension_is_a_01_net_projection() {
        // each one-dimensional projection of 2^k points hits every
        // interval [i/2^k, (i+1)/2^k) once
        let seq = SobolSequence::sobol(6, 21).unwrap();
        let n = seq.num_points();
        for j in 0..21 {
            let mut seen = vec![false; n];
            for i in 0..n {
                let cell = (seq.coordinate(i, j) * n as f64) as usize;
                assert!(!seen[cell], "dimension {} cell {}", j, cell);
                seen[cell] = true;
            }
        }
    }
}
