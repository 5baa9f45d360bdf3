//! Halton sequences and Hammersley point sets.
//!
//! Coordinate `j` of a Halton point is the radical inverse of `i` in the
//! `j`-th prime. A Hammersley point set of `n` points uses `i / n` as its
//! first coordinate and the Halton coordinates after it.
//!
//! Digits may be permuted before mirroring ([`DigitPermutation`]). Plain
//! radical inverses return exactly 0 for `i = 0`; only a random shift
//! replaces a zero by [`EPSILON_HALF`](crate::pointset::EPSILON_HALF).

use qmc_core::error::ConfigError;
use qmc_core::math::{
    faure_factors, faure_permutation, first_primes, linear_permutation, radical_inverse,
    radical_inverse_permuted,
};
use qmc_core::stream::RandomStream;
use tracing::debug;

use crate::digital::MAX_POINTS;
use crate::pointset::{CoordinateIterator, ModuloShift, PointSet, ShiftablePointSet};

/// Digit permutation applied to each base before mirroring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DigitPermutation {
    /// Plain radical inverse.
    #[default]
    Identity,
    /// Faure's recursive permutation.
    Faure,
    /// Linear permutation `d -> f d mod b` with the best-ranked Faure
    /// factor `f` of the base.
    FaureLemieux,
}

impl DigitPermutation {
    fn table(self, base: u32) -> Result<Option<Vec<u32>>, ConfigError> {
        match self {
            Self::Identity => Ok(None),
            Self::Faure => Ok(Some(faure_permutation(base))),
            Self::FaureLemieux => {
                let best = faure_factors(base)?.first().copied().unwrap_or(1);
                Ok(Some(linear_permutation(base, best)))
            }
        }
    }
}

/// Radical-inverse coordinates in the first `dim` primes.
#[derive(Clone, Debug)]
struct RadicalCoordinates {
    bases: Vec<u32>,
    perms: Vec<Option<Vec<u32>>>,
    permutation: DigitPermutation,
}

impl RadicalCoordinates {
    fn new(dim: usize, permutation: DigitPermutation) -> Result<Self, ConfigError> {
        let bases = first_primes(dim)?.to_vec();
        let perms = bases
            .iter()
            .map(|&b| permutation.table(b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            bases,
            perms,
            permutation,
        })
    }

    #[inline]
    fn value(&self, i: usize, j: usize) -> f64 {
        match &self.perms[j] {
            Some(perm) => radical_inverse_permuted(self.bases[j], i as u64, perm),
            None => radical_inverse(self.bases[j], i as u64),
        }
    }
}

/// Halton sequence in the first `dim` prime bases.
///
/// The sequence is unbounded; [`num_points`](PointSet::num_points) reports
/// the truncation set with [`with_num_points`](Self::with_num_points)
/// (2^31 by default).
#[derive(Clone, Debug)]
pub struct HaltonSequence {
    coords: RadicalCoordinates,
    num_points: usize,
    shift: ModuloShift,
}

impl HaltonSequence {
    /// Plain Halton sequence in `dim` dimensions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `dim == 0` or more primes are needed than
    /// are tabulated.
    pub fn new(dim: usize) -> Result<Self, ConfigError> {
        Self::with_permutation(dim, DigitPermutation::Identity)
    }

    /// Halton sequence with digit-permuted radical inverses.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new); `FaureLemieux` also needs every base below
    /// the Faure-factor table bound.
    pub fn with_permutation(
        dim: usize,
        permutation: DigitPermutation,
    ) -> Result<Self, ConfigError> {
        if dim == 0 {
            return Err(ConfigError::InvalidDimension(dim));
        }
        debug!(dim, ?permutation, "created Halton sequence");
        Ok(Self {
            coords: RadicalCoordinates::new(dim, permutation)?,
            num_points: MAX_POINTS as usize,
            shift: ModuloShift::new(),
        })
    }

    /// Truncates the sequence to its first `n` points.
    pub fn with_num_points(mut self, n: usize) -> Self {
        self.num_points = n;
        self
    }

    /// Prime base of each coordinate.
    pub fn bases(&self) -> &[u32] {
        &self.coords.bases
    }

    /// Digit permutation in use.
    pub fn permutation(&self) -> DigitPermutation {
        self.coords.permutation
    }
}

impl PointSet for HaltonSequence {
    type Iter<'a> = CoordinateIterator<'a, Self>;

    fn dimension(&self) -> usize {
        self.coords.bases.len()
    }

    fn num_points(&self) -> usize {
        self.num_points
    }

    fn coordinate(&self, i: usize, j: usize) -> f64 {
        self.shift.apply(j, self.coords.value(i, j))
    }

    fn iter(&self) -> Self::Iter<'_> {
        CoordinateIterator::new(self)
    }
}

impl ShiftablePointSet for HaltonSequence {
    fn add_random_shift(
        &mut self,
        d1: usize,
        d2: usize,
        stream: &mut dyn RandomStream,
    ) -> Result<(), ConfigError> {
        self.shift.add(d1, d2, stream)
    }

    fn clear_random_shift(&mut self) {
        self.shift.clear();
    }
}

/// Hammersley point set: `(i / n, Halton_0(i), ..., Halton_{s-2}(i))`.
#[derive(Clone, Debug)]
pub struct HammersleyPointSet {
    n: usize,
    coords: RadicalCoordinates,
    shift: ModuloShift,
}

impl HammersleyPointSet {
    /// Hammersley set of `n` points in `dim` dimensions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n == 0` or `dim == 0`.
    pub fn new(n: usize, dim: usize) -> Result<Self, ConfigError> {
        Self::with_permutation(n, dim, DigitPermutation::Identity)
    }

    /// Hammersley set with digit-permuted radical inverses.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn with_permutation(
        n: usize,
        dim: usize,
        permutation: DigitPermutation,
    ) -> Result<Self, ConfigError> {
        if dim == 0 {
            return Err(ConfigError::InvalidDimension(dim));
        }
        if n == 0 || n as u64 > MAX_POINTS {
            return Err(ConfigError::InvalidParameter {
                name: "n",
                value: format!("{} not in [1, {}]", n, MAX_POINTS),
            });
        }
        Ok(Self {
            n,
            coords: RadicalCoordinates::new(dim - 1, permutation)?,
            shift: ModuloShift::new(),
        })
    }
}

impl PointSet for HammersleyPointSet {
    type Iter<'a> = CoordinateIterator<'a, Self>;

    fn dimension(&self) -> usize {
        self.coords.bases.len() + 1
    }

    fn num_points(&self) -> usize {
        self.n
    }

    fn coordinate(&self, i: usize, j: usize) -> f64 {
        let u = if j == 0 {
            i as f64 / self.n as f64
        } else {
            self.coords.value(i, j - 1)
        };
        self.shift.apply(j, u)
    }

    fn iter(&self) -> Self::Iter<'_> {
        CoordinateIterator::new(self)
    }
}

impl ShiftablePointSet for HammersleyPointSet {
    fn add_random_shift(
        &mut self,
        d1: usize,
        d2: usize,
        stream: &mut dyn RandomStream,
    ) -> Result<(), ConfigError> {
        self.shift.add(d1, d2, stream)
    }

    fn clear_random_shift(&mut self) {
        self.shift.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::pointset::PointSetIterator;
    use qmc_core::stream::SeededStream;

    #[test]
    fn test_halton_first_points() {
        let halton = HaltonSequence::new(3).unwrap();
        assert_eq!(halton.bases(), &[2, 3, 5]);
        assert_eq!(halton.coordinate(0, 0), 0.0);
        assert_relative_eq!(halton.coordinate(1, 1), 1.0 / 3.0);
        assert_relative_eq!(halton.coordinate(7, 2), 0.44); // 12_5 -> 0.21_5
    }

    #[test]
    fn test_faure_permuted_digits() {
        let halton = HaltonSequence::with_permutation(3, DigitPermutation::Faure).unwrap();
        // Faure permutation in base 5 is (0, 3, 2, 1, 4)
        assert_relative_eq!(halton.coordinate(1, 2), 0.6);
        assert_relative_eq!(halton.coordinate(3, 2), 0.2);
    }

    #[test]
    fn test_hammersley_first_coordinate() {
        let set = HammersleyPointSet::new(8, 2).unwrap();
        let points: Vec<Vec<f64>> = set.iter().points().collect();
        assert_eq!(points.len(), 8);
        for (i, p) in points.iter().enumerate() {
            assert_relative_eq!(p[0], i as f64 / 8.0);
            assert_eq!(p[1], radical_inverse(2, i as u64));
        }
    }

    #[test]
    fn test_truncated_halton_iterator_stops() {
        let halton = HaltonSequence::new(2).unwrap().with_num_points(4);
        assert_eq!(halton.iter().points().count(), 4);
    }

    #[test]
    fn test_shift_removes_zero() {
        let mut set = HammersleyPointSet::with_permutation(16, 4, DigitPermutation::FaureLemieux)
            .unwrap();
        let mut stream = SeededStream::from_seed(3);
        set.add_random_shift_all(&mut stream).unwrap();
        for i in 0..16 {
            for j in 0..4 {
                let x = set.coordinate(i, j);
                assert!(x > 0.0 && x < 1.0);
            }
        }
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(HaltonSequence::new(0).is_err());
        assert!(HammersleyPointSet::new(0, 2).is_err());
        assert!(HammersleyPointSet::new(4, 0).is_err());
    }
}
