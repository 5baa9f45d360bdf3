//! Linear matrix scrambles of digital nets.
//!
//! Every scramble multiplies the original (unscrambled) generator matrices,
//! so scrambling twice does not compose. The first scramble takes a
//! snapshot; [`DigitalNet::reset_generator_matrices`] restores it.
//!
//! Left scrambles draw one `r x r` matrix per dimension, in increasing
//! dimension order. The right scramble draws a single `k x k` matrix
//! shared by all dimensions.

use qmc_core::error::ConfigError;
use qmc_core::math::{faure_factors, prime_index};
use qmc_core::stream::RandomStream;
use tracing::debug;

use super::matrices::{LowerFill, ScrambleMatrix};
use super::net::DigitalNet;

impl DigitalNet {
    /// Left matrix scramble (LMS): random lower-triangular `M_j` with
    /// diagonal in `[1, b)` and lower entries in `[0, b)`.
    pub fn left_matrix_scramble(&mut self, stream: &mut dyn RandomStream) {
        let (b, r) = (self.base(), self.num_rows());
        debug!(base = b, rows = r, "left matrix scramble");
        self.scramble_left_with(|| ScrambleMatrix::random_lower_triangular(b, r, &mut *stream));
    }

    /// Left scramble with a random diagonal `M_j`.
    pub fn left_matrix_scramble_diag(&mut self, stream: &mut dyn RandomStream) {
        let (b, r) = (self.base(), self.num_rows());
        debug!(base = b, rows = r, "diagonal left matrix scramble");
        self.scramble_left_with(|| ScrambleMatrix::random_diagonal(b, r, &mut *stream));
    }

    /// LMS whose diagonal is drawn from the `sb` best Faure factors; the
    /// lower triangle stays uniform.
    pub fn left_matrix_scramble_faure_permut(
        &mut self,
        stream: &mut dyn RandomStream,
        sb: u32,
    ) -> Result<(), ConfigError> {
        self.faure_left_scramble(stream, sb, LowerFill::Uniform)
    }

    /// Diagonal-only scramble with entries from the `sb` best Faure factors.
    pub fn left_matrix_scramble_faure_permut_diag(
        &mut self,
        stream: &mut dyn RandomStream,
        sb: u32,
    ) -> Result<(), ConfigError> {
        self.faure_left_scramble(stream, sb, LowerFill::Zero)
    }

    /// Lower-triangular scramble with every non-zero entry drawn from the
    /// `sb` best Faure factors.
    pub fn left_matrix_scramble_faure_permut_all(
        &mut self,
        stream: &mut dyn RandomStream,
        sb: u32,
    ) -> Result<(), ConfigError> {
        self.faure_left_scramble(stream, sb, LowerFill::Faure)
    }

    fn faure_left_scramble(
        &mut self,
        stream: &mut dyn RandomStream,
        sb: u32,
        lower: LowerFill,
    ) -> Result<(), ConfigError> {
        let factors = self.checked_faure_factors(sb)?;
        let (b, r) = (self.base(), self.num_rows());
        debug!(base = b, rows = r, sb, ?lower, "Faure-permutation left matrix scramble");
        self.scramble_left_with(|| {
            ScrambleMatrix::random_faure_lower(b, r, &mut *stream, factors, sb, lower)
        });
        Ok(())
    }

    /// I-binomial scramble: random lower-triangular Toeplitz `M_j`.
    pub fn i_binomial_matrix_scramble(&mut self, stream: &mut dyn RandomStream) {
        let (b, r) = (self.base(), self.num_rows());
        debug!(base = b, rows = r, "i-binomial matrix scramble");
        self.scramble_left_with(|| ScrambleMatrix::random_i_binomial(b, r, &mut *stream));
    }

    /// I-binomial scramble with Faure factors on the diagonal; `lower_flag`
    /// selects the sub-diagonals (0 zero, 1 Faure factors, 2 uniform).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `sb` is outside `[1, b)`, the base has no
    /// Faure table, or `lower_flag` is not 0, 1 or 2.
    pub fn i_binomial_matrix_scramble_faure_permut(
        &mut self,
        stream: &mut dyn RandomStream,
        sb: u32,
        lower_flag: u32,
    ) -> Result<(), ConfigError> {
        let lower = LowerFill::from_flag(lower_flag)?;
        let factors = self.checked_faure_factors(sb)?;
        let (b, r) = (self.base(), self.num_rows());
        debug!(base = b, rows = r, sb, ?lower, "Faure-permutation i-binomial scramble");
        self.scramble_left_with(|| {
            ScrambleMatrix::random_i_binomial_faure(b, r, &mut *stream, factors, sb, lower)
        });
        Ok(())
    }

    /// Striped scramble: `M_j[l][c] = v_c` for `l >= c`, `v_c` in `[1, b)`.
    pub fn striped_matrix_scramble(&mut self, stream: &mut dyn RandomStream) {
        let (b, r) = (self.base(), self.num_rows());
        debug!(base = b, rows = r, "striped matrix scramble");
        self.scramble_left_with(|| ScrambleMatrix::random_striped(b, r, &mut *stream));
    }

    /// Striped scramble with stripe values from the `sb` best Faure factors.
    pub fn striped_matrix_scramble_faure_permut_all(
        &mut self,
        stream: &mut dyn RandomStream,
        sb: u32,
    ) -> Result<(), ConfigError> {
        let factors = self.checked_faure_factors(sb)?;
        let (b, r) = (self.base(), self.num_rows());
        debug!(base = b, rows = r, sb, "Faure-permutation striped scramble");
        self.scramble_left_with(|| {
            ScrambleMatrix::random_striped_faure(b, r, &mut *stream, factors, sb)
        });
        Ok(())
    }

    /// Right (Faure-Tezuka) scramble: one random upper-triangular `k x k`
    /// matrix multiplies every `C_j` on the right.
    pub fn right_matrix_scramble(&mut self, stream: &mut dyn RandomStream) {
        let (b, k) = (self.base(), self.num_cols());
        debug!(base = b, cols = k, "right matrix scramble");
        let m = ScrambleMatrix::random_upper_triangular(b, k, stream);
        self.scramble_right_with(&m);
    }

    /// Index of the net's base in the prime table, after validating a
    /// Faure-permutation request.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidScrambleRange` if `sb` is outside
    /// `[1, b)`, `ConfigError::NoFaureTable` if the base has no table, and
    /// `ConfigError::InvalidLowerFlag` if `lower_flag` is not 0, 1 or 2.
    pub fn faure_index(&self, sb: u32, lower_flag: u32) -> Result<usize, ConfigError> {
        LowerFill::from_flag(lower_flag)?;
        self.checked_faure_factors(sb)?;
        prime_index(self.base()).ok_or(ConfigError::NoFaureTable(self.base()))
    }

    fn checked_faure_factors(&self, sb: u32) -> Result<&'static [u32], ConfigError> {
        let base = self.base();
        if sb < 1 || sb >= base {
            return Err(ConfigError::InvalidScrambleRange { sb, base });
        }
        faure_factors(base)
    }
}
