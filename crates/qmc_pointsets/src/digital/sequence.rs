//! Digital sequences: digital nets that can grow.
//!
//! A sequence owns a [`ColumnGenerator`] that produces the generator
//! matrices column by column from an algebraic recurrence. Regenerating for
//! more columns leaves the leading columns unchanged, so the first `b^k`
//! points are the same before and after [`DigitalSequence::extend_sequence`].

use std::fmt;

use qmc_core::error::ConfigError;
use qmc_core::math::IndexOrder;
use qmc_core::stream::RandomStream;
use tracing::{debug, info};

use super::iterator::{DigitalNetIterator, ShiftCjIterator};
use super::matrices::GeneratorMatrices;
use super::net::{DigitalNet, NetShape};
use crate::pointset::{PointSet, ScramblablePointSet, ShiftablePointSet};

/// Source of generator matrix columns for a digital sequence.
pub trait ColumnGenerator: Clone + fmt::Debug + Send + Sync {
    /// Base of the sequence.
    fn base(&self) -> u32;

    /// Largest supported dimension.
    fn max_dimension(&self) -> usize;

    /// Fills the `num_rows x num_cols` matrix of dimension `j`, column-major.
    ///
    /// Entry `(l, c)` must not depend on `num_cols` or `num_rows`.
    fn fill_matrix(&self, j: usize, num_cols: usize, num_rows: usize, out: &mut [u32]);
}

/// A digital sequence truncated to `b^k` points.
#[derive(Clone, Debug)]
pub struct DigitalSequence<G> {
    generator: G,
    net: DigitalNet,
}

impl<G: ColumnGenerator> DigitalSequence<G> {
    /// Builds the first `b^num_cols` points of the sequence in `dim`
    /// dimensions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the shape is invalid or `dim` exceeds the
    /// generator's maximum dimension.
    pub fn with_generator(
        generator: G,
        num_cols: usize,
        num_rows: usize,
        out_digits: usize,
        dim: usize,
    ) -> Result<Self, ConfigError> {
        if dim > generator.max_dimension() {
            return Err(ConfigError::InvalidParameter {
                name: "dim",
                value: format!(
                    "{} exceeds the maximum dimension {}",
                    dim,
                    generator.max_dimension()
                ),
            });
        }
        NetShape::new(generator.base(), num_cols, num_rows, out_digits, dim)?;
        let matrices = build_matrices(&generator, dim, num_cols, num_rows);
        let net = DigitalNet::new(matrices, out_digits)?;
        Ok(Self { generator, net })
    }

    /// The column generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// The current net.
    pub fn net(&self) -> &DigitalNet {
        &self.net
    }

    /// Mutable access to the current net, for scrambles.
    pub fn net_mut(&mut self) -> &mut DigitalNet {
        &mut self.net
    }

    /// Regenerates the matrices for `num_cols` columns (`b^num_cols` points).
    ///
    /// Rows grow with the columns when needed. Matrix scrambles are
    /// discarded; the digital shift is kept.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the new shape is invalid.
    pub fn extend_sequence(&mut self, num_cols: usize) -> Result<(), ConfigError> {
        let num_rows = self.net.num_rows().max(num_cols);
        let dim = self.net.dimension();
        NetShape::new(
            self.generator.base(),
            num_cols,
            num_rows,
            self.net.out_digits(),
            dim,
        )?;
        if self.net.original_generator_matrices().is_some() {
            info!("sequence extension discards the matrix scramble");
        }
        let matrices = build_matrices(&self.generator, dim, num_cols, num_rows);
        self.net.replace_matrices(matrices)?;
        debug!(num_cols, num_rows, points = self.net.num_points(), "extended sequence");
        Ok(())
    }

    /// Snapshot of the current net (matrices, shift and dimension).
    pub fn to_net(&self) -> DigitalNet {
        self.net.clone()
    }

    /// Net with an extra leading dimension whose coordinate is `i / b^k`
    /// in natural order.
    ///
    /// The leading generator matrix is the reflected identity,
    /// `C_0[l][c] = 1` iff `l + c = k - 1`.
    pub fn to_net_shift_cj(&self) -> Result<DigitalNet, ConfigError> {
        let (k, r) = (self.net.num_cols(), self.net.num_rows());
        let mut leading = vec![0u32; k * r];
        for c in 0..k {
            leading[c * r + (k - 1 - c)] = 1;
        }
        self.net.with_leading_dimension(&leading)
    }

    /// Gray-order iterator with the point index prepended as coordinate 0.
    pub fn iterator_shift(&self) -> ShiftCjIterator<'_> {
        ShiftCjIterator::new(self.net.iter_in(IndexOrder::Gray))
    }

    /// Natural-order iterator with `i / b^k` prepended as coordinate 0.
    pub fn iterator_shift_natural(&self) -> ShiftCjIterator<'_> {
        ShiftCjIterator::new(self.net.iter_in(IndexOrder::Natural))
    }
}

fn build_matrices<G: ColumnGenerator>(
    generator: &G,
    dim: usize,
    num_cols: usize,
    num_rows: usize,
) -> GeneratorMatrices {
    let mut matrices = GeneratorMatrices::zeros(generator.base(), dim, num_cols, num_rows);
    for j in 0..dim {
        generator.fill_matrix(j, num_cols, num_rows, matrices.matrix_mut(j));
    }
    matrices
}

impl<G: ColumnGenerator> PointSet for DigitalSequence<G> {
    type Iter<'a>
        = DigitalNetIterator<'a>
    where
        Self: 'a;

    fn dimension(&self) -> usize {
        self.net.dimension()
    }

    fn num_points(&self) -> usize {
        self.net.num_points()
    }

    fn coordinate(&self, i: usize, j: usize) -> f64 {
        self.net.coordinate(i, j)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.net.iter()
    }
}

impl<G: ColumnGenerator> ShiftablePointSet for DigitalSequence<G> {
    fn add_random_shift(
        &mut self,
        d1: usize,
        d2: usize,
        stream: &mut dyn RandomStream,
    ) -> Result<(), ConfigError> {
        self.net.add_random_shift(d1, d2, stream)
    }

    fn clear_random_shift(&mut self) {
        self.net.clear_random_shift();
    }
}

impl<G: ColumnGenerator> ScramblablePointSet for DigitalSequence<G> {
    fn digital_net(&self) -> &DigitalNet {
        &self.net
    }

    fn digital_net_mut(&mut self) -> &mut DigitalNet {
        &mut self.net
    }
}
