//! Digital nets in base `b`.
//!
//! Point `i` of a digital net is obtained by multiplying the generator
//! matrix `C_j` with the base-`b` digit vector of `i` (Gray or natural
//! order), adding the digital shift digit-wise modulo `b`, and reading the
//! result as a fraction with `out_digits` digits.
//!
//! # Zero avoidance
//!
//! With a digital shift every coordinate is offset by `½ b^-w`, which keeps
//! all values strictly inside (0, 1). Without a shift, a coordinate that
//! would be exactly 0 is replaced by `½ b^-w`.

use qmc_core::error::ConfigError;
use qmc_core::math::{checked_pow_within, DigitCounter, IndexOrder};
use qmc_core::stream::RandomStream;
use tracing::debug;

use super::iterator::{DigitalNetIterator, NetCursor};
use super::matrices::{GeneratorMatrices, ScrambleMatrix};
use super::shift::DigitalShift;
use crate::pointset::{PointSet, ScramblablePointSet, ShiftablePointSet};

/// Upper bound on `b^num_cols` and `b^out_digits`.
pub const MAX_POINTS: u64 = 1 << 31;

/// Shape parameters of a digital net.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NetShape {
    /// Base `b`
    pub base: u32,
    /// Columns `k`; the net has `b^k` points
    pub num_cols: usize,
    /// Stored rows `r`
    pub num_rows: usize,
    /// Output digits `w`
    pub out_digits: usize,
    /// Dimension `s`
    pub dim: usize,
}

impl NetShape {
    /// Validates the shape.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` unless `dim >= 1`, `base >= 2`,
    /// `num_cols <= num_rows <= out_digits`, `out_digits >= 1` and both
    /// `b^num_cols` and `b^out_digits` are at most 2^31.
    pub fn new(
        base: u32,
        num_cols: usize,
        num_rows: usize,
        out_digits: usize,
        dim: usize,
    ) -> Result<Self, ConfigError> {
        if dim == 0 {
            return Err(ConfigError::InvalidDimension(dim));
        }
        if base < 2 {
            return Err(ConfigError::InvalidBase(base));
        }
        if checked_pow_within(base, num_cols, MAX_POINTS).is_none() {
            return Err(ConfigError::TooManyPoints { base, num_cols });
        }
        if num_rows < num_cols {
            return Err(ConfigError::RowsBelowColumns { num_rows, num_cols });
        }
        if out_digits < num_rows || out_digits == 0 {
            return Err(ConfigError::DigitsBelowRows {
                out_digits,
                num_rows,
            });
        }
        if checked_pow_within(base, out_digits, MAX_POINTS).is_none() {
            return Err(ConfigError::DigitsExceedPrecision { base, out_digits });
        }
        Ok(Self {
            base,
            num_cols,
            num_rows,
            out_digits,
            dim,
        })
    }

    /// Largest `w` with `b^w <= 2^31`.
    pub fn max_out_digits(base: u32) -> usize {
        let mut w = 0;
        while checked_pow_within(base, w + 1, MAX_POINTS).is_some() {
            w += 1;
        }
        w
    }

    /// Number of points `b^num_cols`.
    pub fn num_points(&self) -> usize {
        u64::from(self.base).pow(self.num_cols as u32) as usize
    }
}

/// Base-2 fast path: columns and shifts packed into 32-bit words.
#[derive(Clone, Debug)]
pub(crate) struct PackedColumns {
    pub(crate) columns: Vec<u32>,
    pub(crate) shift: Vec<u32>,
}

/// A digital net in base `b`.
///
/// Every mutation (scramble, shift, reset) increments
/// [`generation`](Self::generation). Iterators borrow the net, so they never
/// observe a mutation; a [`NetCursor`] detached from an iterator is
/// refreshed on [`resume`](Self::resume) when the generation has moved on.
#[derive(Clone, Debug)]
pub struct DigitalNet {
    shape: NetShape,
    num_points: usize,
    matrices: GeneratorMatrices,
    original: Option<GeneratorMatrices>,
    shift: Option<DigitalShift>,
    weights: Vec<u64>,
    norm: f64,
    epsilon_half: f64,
    packed: Option<PackedColumns>,
    generation: u64,
}

impl DigitalNet {
    /// Creates a net from generator matrices.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the resulting shape is invalid.
    pub fn new(matrices: GeneratorMatrices, out_digits: usize) -> Result<Self, ConfigError> {
        let shape = NetShape::new(
            matrices.base(),
            matrices.num_cols(),
            matrices.num_rows(),
            out_digits,
            matrices.dimension(),
        )?;
        let b = u64::from(shape.base);
        let w = shape.out_digits;
        let weights: Vec<u64> = (0..w).map(|l| b.pow((w - 1 - l) as u32)).collect();
        let scale = b.pow(w as u32) as f64;
        let mut net = Self {
            shape,
            num_points: shape.num_points(),
            matrices,
            original: None,
            shift: None,
            weights,
            norm: 1.0 / scale,
            epsilon_half: 0.5 / scale,
            packed: None,
            generation: 0,
        };
        net.rebuild_packed();
        debug!(
            base = shape.base,
            num_cols = shape.num_cols,
            num_rows = shape.num_rows,
            out_digits = shape.out_digits,
            dim = shape.dim,
            "created digital net"
        );
        Ok(net)
    }

    /// Net whose generator matrices are all the `k x k` identity.
    ///
    /// In natural order every coordinate is the van der Corput sequence in
    /// base `b`.
    pub fn identity(base: u32, num_cols: usize, dim: usize) -> Result<Self, ConfigError> {
        let out_digits = NetShape::max_out_digits(base).max(num_cols);
        NetShape::new(base, num_cols, num_cols, out_digits, dim)?;
        let mut matrices = GeneratorMatrices::zeros(base, dim, num_cols, num_cols);
        for j in 0..dim {
            for c in 0..num_cols {
                matrices.set(j, c, c, 1);
            }
        }
        Self::new(matrices, out_digits)
    }

    /// Shape parameters.
    #[inline]
    pub fn shape(&self) -> NetShape {
        self.shape
    }

    /// Base `b`.
    #[inline]
    pub fn base(&self) -> u32 {
        self.shape.base
    }

    /// Columns `k`.
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.shape.num_cols
    }

    /// Stored rows `r`.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.shape.num_rows
    }

    /// Output digits `w`.
    #[inline]
    pub fn out_digits(&self) -> usize {
        self.shape.out_digits
    }

    /// Mutation counter.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Half the output resolution, `½ b^-w`.
    #[inline]
    pub fn epsilon_half(&self) -> f64 {
        self.epsilon_half
    }

    /// Current (possibly scrambled) generator matrices.
    pub fn generator_matrices(&self) -> &GeneratorMatrices {
        &self.matrices
    }

    /// Snapshot taken before the first scramble, if still kept.
    pub fn original_generator_matrices(&self) -> Option<&GeneratorMatrices> {
        self.original.as_ref()
    }

    /// True if a digital shift is applied.
    #[inline]
    pub fn has_digital_shift(&self) -> bool {
        self.shift.is_some()
    }

    /// Number of dimensions covered by the digital shift.
    pub fn shift_dimension(&self) -> usize {
        self.shift.as_ref().map_or(0, DigitalShift::dimension)
    }

    /// Shift digits of dimension `j`, most significant first.
    pub fn digital_shift(&self, j: usize) -> Option<&[u32]> {
        self.shift.as_ref().and_then(|s| s.digits(j))
    }

    /// Coordinate `j` of point `i` under the given enumeration order.
    pub fn coordinate_in(&self, i: usize, j: usize, order: IndexOrder) -> f64 {
        let k = self.shape.num_cols;
        let mut counter = DigitCounter::new(self.shape.base, k);
        counter.set(i as u64);

        if let Some(packed) = &self.packed {
            let mut word = packed.shift[j];
            for c in 0..k {
                if counter.digit_in(order, c) != 0 {
                    word ^= packed.columns[j * k + c];
                }
            }
            return self.finish(f64::from(word) * self.norm);
        }

        let b = u64::from(self.shape.base);
        let mut total = 0u64;
        for l in 0..self.shape.out_digits {
            let mut digit = u64::from(self.shift_digit(j, l));
            if l < self.shape.num_rows {
                for c in 0..k {
                    let d = counter.digit_in(order, c);
                    if d != 0 {
                        digit = (digit + u64::from(self.matrices.get(j, l, c)) * u64::from(d)) % b;
                    }
                }
            }
            total += digit * self.weights[l];
        }
        self.finish(total as f64 * self.norm)
    }

    /// Iterator in the given order, positioned on point 0.
    pub fn iter_in(&self, order: IndexOrder) -> DigitalNetIterator<'_> {
        DigitalNetIterator::new(self, NetCursor::new(self, order))
    }

    /// Iterator enumerating points in natural order.
    pub fn iter_natural(&self) -> DigitalNetIterator<'_> {
        self.iter_in(IndexOrder::Natural)
    }

    /// Re-attaches a detached cursor, refreshing it if the net changed.
    pub fn resume(&self, mut cursor: NetCursor) -> DigitalNetIterator<'_> {
        cursor.sync(self);
        DigitalNetIterator::new(self, cursor)
    }

    /// Adds a random digital shift to dimensions `[d1, d2)`.
    ///
    /// Digits are uniform in `[0, b)`. Earlier shift digits below `d1` are
    /// preserved; a clone of `stream` is kept for
    /// [`extend_random_shift`](Self::extend_random_shift).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDimensionRange` if `d1 >= d2`.
    pub fn add_random_shift(
        &mut self,
        d1: usize,
        d2: usize,
        stream: &mut dyn RandomStream,
    ) -> Result<(), ConfigError> {
        if d1 >= d2 {
            return Err(ConfigError::InvalidDimensionRange { d1, d2 });
        }
        let (base, w) = (self.shape.base, self.shape.out_digits);
        self.shift
            .get_or_insert_with(|| DigitalShift::new(base, w))
            .add(d1, d2, stream)?;
        debug!(d1, d2, "added digital shift");
        self.touch();
        Ok(())
    }

    /// Extends the digital shift to `d2` dimensions with the retained stream.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingShiftStream` if no shift was added.
    pub fn extend_random_shift(&mut self, d2: usize) -> Result<(), ConfigError> {
        let shift = self.shift.as_mut().ok_or(ConfigError::MissingShiftStream)?;
        if d2 <= shift.dimension() {
            return Ok(());
        }
        shift.extend(d2)?;
        self.touch();
        Ok(())
    }

    /// Removes the digital shift.
    pub fn clear_random_shift(&mut self) {
        if self.shift.take().is_some() {
            self.touch();
        }
    }

    /// Replaces `C_j` by `M * C_j^orig`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `j` is out of range or `m` is not an
    /// `r x r` matrix in the net's base.
    pub fn left_multiply(&mut self, j: usize, m: &ScrambleMatrix) -> Result<(), ConfigError> {
        self.check_dimension(j)?;
        self.check_matrix(m, self.shape.num_rows)?;
        self.snapshot_original();
        if let Some(original) = &self.original {
            original.left_multiply_into(j, m, &mut self.matrices);
        }
        self.touch();
        Ok(())
    }

    /// Replaces `C_j` by `C_j^orig * M`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `j` is out of range or `m` is not a
    /// `k x k` matrix in the net's base.
    pub fn right_multiply(&mut self, j: usize, m: &ScrambleMatrix) -> Result<(), ConfigError> {
        self.check_dimension(j)?;
        self.check_matrix(m, self.shape.num_cols)?;
        self.snapshot_original();
        if let Some(original) = &self.original {
            original.right_multiply_into(j, m, &mut self.matrices);
        }
        self.touch();
        Ok(())
    }

    /// Restores the unscrambled generator matrices, if a snapshot exists.
    pub fn reset_generator_matrices(&mut self) {
        if let Some(original) = self.original.take() {
            self.matrices = original;
            debug!("restored original generator matrices");
            self.touch();
        }
    }

    /// Forgets the unscrambled snapshot; the current matrices become the
    /// new reference for later scrambles.
    pub fn erase_original_generator_matrices(&mut self) {
        self.original = None;
    }

    /// Left-multiplies every dimension, drawing one matrix per dimension in
    /// increasing `j`.
    pub(crate) fn scramble_left_with(&mut self, mut make: impl FnMut() -> ScrambleMatrix) {
        self.snapshot_original();
        if let Some(original) = &self.original {
            for j in 0..self.shape.dim {
                let m = make();
                original.left_multiply_into(j, &m, &mut self.matrices);
            }
        }
        self.touch();
    }

    /// Right-multiplies every dimension by the same matrix.
    pub(crate) fn scramble_right_with(&mut self, m: &ScrambleMatrix) {
        self.snapshot_original();
        if let Some(original) = &self.original {
            for j in 0..self.shape.dim {
                original.right_multiply_into(j, m, &mut self.matrices);
            }
        }
        self.touch();
    }

    /// Swaps in new generator matrices of the same base and output digits.
    ///
    /// Drops any scramble snapshot and keeps the digital shift.
    pub(crate) fn replace_matrices(&mut self, matrices: GeneratorMatrices) -> Result<(), ConfigError> {
        let shape = NetShape::new(
            matrices.base(),
            matrices.num_cols(),
            matrices.num_rows(),
            self.shape.out_digits,
            matrices.dimension(),
        )?;
        self.shape = shape;
        self.num_points = shape.num_points();
        self.matrices = matrices;
        self.original = None;
        self.touch();
        Ok(())
    }

    /// Copy of the net with one extra leading dimension whose generator
    /// matrix is `leading` (column-major, `r x k`).
    ///
    /// Existing dimensions move one position to the right, together with
    /// their shift digits; the new dimension is unshifted.
    pub(crate) fn with_leading_dimension(&self, leading: &[u32]) -> Result<Self, ConfigError> {
        let shape = self.shape;
        let mut matrices =
            GeneratorMatrices::zeros(shape.base, shape.dim + 1, shape.num_cols, shape.num_rows);
        matrices.matrix_mut(0).copy_from_slice(leading);
        for j in 0..shape.dim {
            matrices
                .matrix_mut(j + 1)
                .copy_from_slice(self.matrices.matrix(j));
        }
        let mut net = Self::new(matrices, shape.out_digits)?;
        net.shift = self.shift.as_ref().map(DigitalShift::with_leading_zero_dimension);
        net.touch();
        Ok(net)
    }

    /// Applies the shift epsilon or the zero replacement.
    #[inline]
    pub(crate) fn finish(&self, value: f64) -> f64 {
        if self.shift.is_some() {
            value + self.epsilon_half
        } else if value == 0.0 {
            self.epsilon_half
        } else {
            value
        }
    }

    #[inline]
    pub(crate) fn shift_digit(&self, j: usize, l: usize) -> u32 {
        self.shift.as_ref().map_or(0, |s| s.digit(j, l))
    }

    #[inline]
    pub(crate) fn weights(&self) -> &[u64] {
        &self.weights
    }

    #[inline]
    pub(crate) fn norm(&self) -> f64 {
        self.norm
    }

    #[inline]
    pub(crate) fn packed(&self) -> Option<&PackedColumns> {
        self.packed.as_ref()
    }

    fn snapshot_original(&mut self) {
        if self.original.is_none() {
            self.original = Some(self.matrices.clone());
        }
    }

    fn touch(&mut self) {
        self.generation += 1;
        self.rebuild_packed();
    }

    fn rebuild_packed(&mut self) {
        if self.shape.base != 2 {
            self.packed = None;
            return;
        }
        let shift = (0..self.shape.dim)
            .map(|j| self.shift.as_ref().map_or(0, |s| s.packed_word(j)))
            .collect();
        self.packed = Some(PackedColumns {
            columns: self.matrices.packed_columns(self.shape.out_digits),
            shift,
        });
    }

    fn check_dimension(&self, j: usize) -> Result<(), ConfigError> {
        if j >= self.shape.dim {
            return Err(ConfigError::InvalidParameter {
                name: "dimension",
                value: format!("{} is not below {}", j, self.shape.dim),
            });
        }
        Ok(())
    }

    fn check_matrix(&self, m: &ScrambleMatrix, size: usize) -> Result<(), ConfigError> {
        if m.base() != self.shape.base || m.size() != size {
            return Err(ConfigError::InvalidParameter {
                name: "matrix",
                value: format!(
                    "expected {}x{} in base {}, got {}x{} in base {}",
                    size,
                    size,
                    self.shape.base,
                    m.size(),
                    m.size(),
                    m.base()
                ),
            });
        }
        Ok(())
    }
}

impl PointSet for DigitalNet {
    type Iter<'a> = DigitalNetIterator<'a>;

    fn dimension(&self) -> usize {
        self.shape.dim
    }

    fn num_points(&self) -> usize {
        self.num_points
    }

    /// Coordinate `j` of point `i`, in Gray-code order.
    fn coordinate(&self, i: usize, j: usize) -> f64 {
        self.coordinate_in(i, j, IndexOrder::Gray)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.iter_in(IndexOrder::Gray)
    }
}

impl ShiftablePointSet for DigitalNet {
    fn add_random_shift(
        &mut self,
        d1: usize,
        d2: usize,
        stream: &mut dyn RandomStream,
    ) -> Result<(), ConfigError> {
        DigitalNet::add_random_shift(self, d1, d2, stream)
    }

    fn clear_random_shift(&mut self) {
        DigitalNet::clear_random_shift(self);
    }
}

impl ScramblablePointSet for DigitalNet {
    fn digital_net(&self) -> &DigitalNet {
        self
    }

    fn digital_net_mut(&mut self) -> &mut DigitalNet {
        self
    }
}
