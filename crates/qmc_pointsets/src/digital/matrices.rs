//! Generator matrices and square scrambling matrices over `Z_b`.
//!
//! Generator matrices are stored column-major per dimension: column `c` of
//! dimension `j` is the contiguous slice of `num_rows` digits, row 0 being
//! the most significant output digit.

use qmc_core::error::ConfigError;
use qmc_core::stream::RandomStream;

/// Per-dimension `num_rows x num_cols` digit matrices in base `b`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorMatrices {
    base: u32,
    dim: usize,
    num_cols: usize,
    num_rows: usize,
    digits: Vec<u32>,
}

impl GeneratorMatrices {
    /// All-zero matrices.
    pub fn zeros(base: u32, dim: usize, num_cols: usize, num_rows: usize) -> Self {
        Self {
            base,
            dim,
            num_cols,
            num_rows,
            digits: vec![0; dim * num_cols * num_rows],
        }
    }

    /// Builds matrices from column-major digits, dimension after dimension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the digit count does not match the shape or
    /// a digit lies outside `[0, base)`.
    pub fn from_digits(
        base: u32,
        dim: usize,
        num_cols: usize,
        num_rows: usize,
        digits: Vec<u32>,
    ) -> Result<Self, ConfigError> {
        let expected = dim * num_cols * num_rows;
        if digits.len() != expected {
            return Err(ConfigError::InvalidParameter {
                name: "digits",
                value: format!("expected {} digits, got {}", expected, digits.len()),
            });
        }
        if let Some(&digit) = digits.iter().find(|&&d| d >= base) {
            return Err(ConfigError::DigitOutOfRange { digit, base });
        }
        Ok(Self {
            base,
            dim,
            num_cols,
            num_rows,
            digits,
        })
    }

    /// Base of the digits.
    #[inline]
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Number of dimensions.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Columns per matrix.
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// Rows per matrix.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    fn offset(&self, j: usize, c: usize) -> usize {
        (j * self.num_cols + c) * self.num_rows
    }

    /// Column `c` of the matrix of dimension `j`.
    #[inline]
    pub fn column(&self, j: usize, c: usize) -> &[u32] {
        let start = self.offset(j, c);
        &self.digits[start..start + self.num_rows]
    }

    /// Mutable column `c` of the matrix of dimension `j`.
    #[inline]
    pub fn column_mut(&mut self, j: usize, c: usize) -> &mut [u32] {
        let start = self.offset(j, c);
        let rows = self.num_rows;
        &mut self.digits[start..start + rows]
    }

    /// All columns of dimension `j`, column-major.
    pub fn matrix(&self, j: usize) -> &[u32] {
        let start = self.offset(j, 0);
        &self.digits[start..start + self.num_cols * self.num_rows]
    }

    /// Mutable columns of dimension `j`, column-major.
    pub fn matrix_mut(&mut self, j: usize) -> &mut [u32] {
        let start = self.offset(j, 0);
        let len = self.num_cols * self.num_rows;
        &mut self.digits[start..start + len]
    }

    /// Entry `(row, col)` of dimension `j`.
    #[inline]
    pub fn get(&self, j: usize, row: usize, col: usize) -> u32 {
        self.digits[self.offset(j, col) + row]
    }

    /// Sets entry `(row, col)` of dimension `j`.
    #[inline]
    pub fn set(&mut self, j: usize, row: usize, col: usize, digit: u32) {
        let at = self.offset(j, col) + row;
        self.digits[at] = digit;
    }

    /// Writes `M * C_j` (this matrix of dimension `j`) into `out`.
    ///
    /// `m` must be `num_rows x num_rows`.
    pub fn left_multiply_into(&self, j: usize, m: &ScrambleMatrix, out: &mut Self) {
        let b = u64::from(self.base);
        for c in 0..self.num_cols {
            let src = self.column(j, c);
            let dst = out.column_mut(j, c);
            for (l, d) in dst.iter_mut().enumerate() {
                let mut sum = 0u64;
                for (t, &x) in src.iter().enumerate() {
                    let a = m.get(l, t);
                    if a != 0 && x != 0 {
                        sum = (sum + u64::from(a) * u64::from(x)) % b;
                    }
                }
                *d = sum as u32;
            }
        }
    }

    /// Writes `C_j * M` (this matrix of dimension `j`) into `out`.
    ///
    /// `m` must be `num_cols x num_cols`.
    pub fn right_multiply_into(&self, j: usize, m: &ScrambleMatrix, out: &mut Self) {
        let b = u64::from(self.base);
        for c in 0..self.num_cols {
            for l in 0..self.num_rows {
                let mut sum = 0u64;
                for t in 0..self.num_cols {
                    let a = m.get(t, c);
                    let x = self.get(j, l, t);
                    if a != 0 && x != 0 {
                        sum = (sum + u64::from(a) * u64::from(x)) % b;
                    }
                }
                out.set(j, l, c, sum as u32);
            }
        }
    }

    /// Packs each column of a base-2 matrix into a word.
    ///
    /// Row `l` lands at bit `out_digits - 1 - l`, so the word read as an
    /// integer times `2^-out_digits` is the column's contribution.
    pub(crate) fn packed_columns(&self, out_digits: usize) -> Vec<u32> {
        let mut words = Vec::with_capacity(self.dim * self.num_cols);
        for j in 0..self.dim {
            for c in 0..self.num_cols {
                let word = self
                    .column(j, c)
                    .iter()
                    .enumerate()
                    .fold(0u32, |acc, (l, &d)| acc | (d << (out_digits - 1 - l)));
                words.push(word);
            }
        }
        words
    }
}

/// How the strictly lower triangle of a restricted scramble is filled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LowerFill {
    /// Zeros below the diagonal.
    Zero,
    /// Entries drawn from the first `sb` Faure factors.
    Faure,
    /// Uniform entries in `[0, b)`.
    Uniform,
}

impl LowerFill {
    /// Decodes the integer selector: 0 zero, 1 Faure factors, 2 uniform.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLowerFlag` for any other value.
    pub fn from_flag(flag: u32) -> Result<Self, ConfigError> {
        match flag {
            0 => Ok(LowerFill::Zero),
            1 => Ok(LowerFill::Faure),
            2 => Ok(LowerFill::Uniform),
            other => Err(ConfigError::InvalidLowerFlag(other)),
        }
    }
}

/// Square matrix over `Z_b`, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrambleMatrix {
    base: u32,
    size: usize,
    entries: Vec<u32>,
}

impl ScrambleMatrix {
    /// Identity matrix.
    pub fn identity(base: u32, size: usize) -> Self {
        let mut m = Self::zeros(base, size);
        for l in 0..size {
            m.entries[l * size + l] = 1;
        }
        m
    }

    fn zeros(base: u32, size: usize) -> Self {
        Self {
            base,
            size,
            entries: vec![0; size * size],
        }
    }

    /// Builds a matrix from row-major entries.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the entry count is not `size^2` or an entry
    /// lies outside `[0, base)`.
    pub fn from_rows(base: u32, size: usize, entries: Vec<u32>) -> Result<Self, ConfigError> {
        if entries.len() != size * size {
            return Err(ConfigError::InvalidParameter {
                name: "entries",
                value: format!("expected {} entries, got {}", size * size, entries.len()),
            });
        }
        if let Some(&digit) = entries.iter().find(|&&d| d >= base) {
            return Err(ConfigError::DigitOutOfRange { digit, base });
        }
        Ok(Self {
            base,
            size,
            entries,
        })
    }

    /// Random lower-triangular matrix: diagonal in `[1, b)`, below in `[0, b)`.
    pub fn random_lower_triangular(base: u32, size: usize, stream: &mut dyn RandomStream) -> Self {
        let mut m = Self::zeros(base, size);
        for l in 0..size {
            for c in 0..l {
                m.entries[l * size + c] = stream.next_int(0, base - 1);
            }
            m.entries[l * size + l] = stream.next_int(1, base - 1);
        }
        m
    }

    /// Random diagonal matrix with entries in `[1, b)`.
    pub fn random_diagonal(base: u32, size: usize, stream: &mut dyn RandomStream) -> Self {
        let mut m = Self::zeros(base, size);
        for l in 0..size {
            m.entries[l * size + l] = stream.next_int(1, base - 1);
        }
        m
    }

    /// Lower-triangular matrix whose diagonal is drawn from the first `sb`
    /// Faure `factors`; the strictly lower part follows `lower`.
    pub fn random_faure_lower(
        base: u32,
        size: usize,
        stream: &mut dyn RandomStream,
        factors: &[u32],
        sb: u32,
        lower: LowerFill,
    ) -> Self {
        let mut m = Self::zeros(base, size);
        for l in 0..size {
            for c in 0..l {
                m.entries[l * size + c] = lower_entry(base, stream, factors, sb, lower);
            }
            m.entries[l * size + l] = faure_draw(stream, factors, sb);
        }
        m
    }

    /// Random lower-triangular Toeplitz matrix: `M[l][c] = h[l - c]`, with
    /// `h[0]` in `[1, b)` and `h[t]` in `[0, b)` for `t > 0`.
    pub fn random_i_binomial(base: u32, size: usize, stream: &mut dyn RandomStream) -> Self {
        let mut h = Vec::with_capacity(size);
        if size > 0 {
            h.push(stream.next_int(1, base - 1));
        }
        for _ in 1..size {
            h.push(stream.next_int(0, base - 1));
        }
        Self::toeplitz_lower(base, &h)
    }

    /// Toeplitz variant whose diagonal comes from the first `sb` Faure
    /// factors; the sub-diagonals follow `lower`.
    pub fn random_i_binomial_faure(
        base: u32,
        size: usize,
        stream: &mut dyn RandomStream,
        factors: &[u32],
        sb: u32,
        lower: LowerFill,
    ) -> Self {
        let mut h = Vec::with_capacity(size);
        if size > 0 {
            h.push(faure_draw(stream, factors, sb));
        }
        for _ in 1..size {
            h.push(lower_entry(base, stream, factors, sb, lower));
        }
        Self::toeplitz_lower(base, &h)
    }

    fn toeplitz_lower(base: u32, h: &[u32]) -> Self {
        let size = h.len();
        let mut m = Self::zeros(base, size);
        for l in 0..size {
            for c in 0..=l {
                m.entries[l * size + c] = h[l - c];
            }
        }
        m
    }

    /// Random striped matrix: `M[l][c] = v[c]` for `l >= c`, `v` in `[1, b)`.
    pub fn random_striped(base: u32, size: usize, stream: &mut dyn RandomStream) -> Self {
        let v: Vec<u32> = (0..size).map(|_| stream.next_int(1, base - 1)).collect();
        Self::striped(base, &v)
    }

    /// Striped matrix with stripe values drawn from the first `sb` Faure
    /// factors.
    pub fn random_striped_faure(
        base: u32,
        size: usize,
        stream: &mut dyn RandomStream,
        factors: &[u32],
        sb: u32,
    ) -> Self {
        let v: Vec<u32> = (0..size).map(|_| faure_draw(stream, factors, sb)).collect();
        Self::striped(base, &v)
    }

    fn striped(base: u32, v: &[u32]) -> Self {
        let size = v.len();
        let mut m = Self::zeros(base, size);
        for c in 0..size {
            for l in c..size {
                m.entries[l * size + c] = v[c];
            }
        }
        m
    }

    /// Random upper-triangular matrix: diagonal in `[1, b)`, above in `[0, b)`.
    pub fn random_upper_triangular(base: u32, size: usize, stream: &mut dyn RandomStream) -> Self {
        let mut m = Self::zeros(base, size);
        for l in 0..size {
            m.entries[l * size + l] = stream.next_int(1, base - 1);
            for c in l + 1..size {
                m.entries[l * size + c] = stream.next_int(0, base - 1);
            }
        }
        m
    }

    /// Base of the entries.
    #[inline]
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entry `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.entries[row * self.size + col]
    }

    /// True if every entry above the diagonal is zero.
    pub fn is_lower_triangular(&self) -> bool {
        (0..self.size).all(|l| (l + 1..self.size).all(|c| self.get(l, c) == 0))
    }

    /// True if every entry below the diagonal is zero.
    pub fn is_upper_triangular(&self) -> bool {
        (0..self.size).all(|l| (0..l).all(|c| self.get(l, c) == 0))
    }

    /// True if the matrix is triangular with a non-zero diagonal, hence
    /// invertible over a prime field.
    pub fn is_triangular_nonsingular(&self) -> bool {
        (self.is_lower_triangular() || self.is_upper_triangular())
            && (0..self.size).all(|l| self.get(l, l) != 0)
    }
}

#[inline]
fn faure_draw(stream: &mut dyn RandomStream, factors: &[u32], sb: u32) -> u32 {
    factors[stream.next_int(0, sb - 1) as usize]
}

#[inline]
fn lower_entry(
    base: u32,
    stream: &mut dyn RandomStream,
    factors: &[u32],
    sb: u32,
    lower: LowerFill,
) -> u32 {
    match lower {
        LowerFill::Zero => 0,
        LowerFill::Faure => faure_draw(stream, factors, sb),
        LowerFill::Uniform => stream.next_int(0, base - 1),
    }
}
