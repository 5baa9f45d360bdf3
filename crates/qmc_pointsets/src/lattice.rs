//! Rank-1 lattice rules.
//!
//! Point `i` of a rank-1 lattice with `n` points and generating vector `a`
//! is `((i a_0 mod n) / n, ..., (i a_{s-1} mod n) / n)`. A Korobov lattice
//! uses `a_j = a^j mod n`.
//!
//! Unshifted points keep exact zeros (point 0 is the origin). With a random
//! shift, values are taken modulo 1 and an exact 0 becomes
//! [`EPSILON_HALF`](crate::pointset::EPSILON_HALF).

use qmc_core::error::ConfigError;
use qmc_core::stream::RandomStream;
use tracing::debug;

use crate::pointset::{CoordinateIterator, ModuloShift, PointSet, ShiftablePointSet};

/// Rank-1 lattice point set.
#[derive(Clone, Debug)]
pub struct Rank1Lattice {
    n: u64,
    generator: Vec<u64>,
    shift: ModuloShift,
}

impl Rank1Lattice {
    /// Lattice with `n` points and generating vector `a` (one entry per
    /// dimension). Entries are reduced modulo `n`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n == 0` or `a` is empty.
    pub fn new(n: usize, a: &[u64]) -> Result<Self, ConfigError> {
        if n == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "n",
                value: "lattice must have at least one point".to_string(),
            });
        }
        if a.is_empty() {
            return Err(ConfigError::InvalidDimension(0));
        }
        let n = n as u64;
        Ok(Self {
            n,
            generator: a.iter().map(|&x| x % n).collect(),
            shift: ModuloShift::new(),
        })
    }

    /// Korobov lattice: `a_j = a^j mod n` for `j = 0..dim`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `n == 0` or `dim == 0`.
    pub fn korobov(n: usize, a: u64, dim: usize) -> Result<Self, ConfigError> {
        if dim == 0 {
            return Err(ConfigError::InvalidDimension(dim));
        }
        let m = n.max(1) as u64;
        let mut generator = Vec::with_capacity(dim);
        let mut power = 1 % m;
        for _ in 0..dim {
            generator.push(power);
            power = ((u128::from(power) * u128::from(a)) % u128::from(m)) as u64;
        }
        debug!(n, a, dim, "created Korobov lattice");
        Self::new(n, &generator)
    }

    /// Generating vector.
    pub fn generator(&self) -> &[u64] {
        &self.generator
    }

    /// The modulo-1 random shift.
    pub fn random_shift(&self) -> &ModuloShift {
        &self.shift
    }
}

impl PointSet for Rank1Lattice {
    type Iter<'a> = CoordinateIterator<'a, Self>;

    fn dimension(&self) -> usize {
        self.generator.len()
    }

    fn num_points(&self) -> usize {
        self.n as usize
    }

    fn coordinate(&self, i: usize, j: usize) -> f64 {
        let k = (u128::from(i as u64) * u128::from(self.generator[j])) % u128::from(self.n);
        self.shift.apply(j, k as f64 / self.n as f64)
    }

    fn iter(&self) -> Self::Iter<'_> {
        CoordinateIterator::new(self)
    }
}

impl ShiftablePointSet for Rank1Lattice {
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
