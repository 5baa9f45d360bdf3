//! Error types for structured error handling.
//!
//! This module provides:
//! - `ConfigError`: Illegal construction or randomisation arguments
//! - `PointSetError`: Iterator reads past the last point or coordinate
//! - `FormatError`: Malformed parameter files (carries the file name)
//! - `QmcError`: Umbrella error for operations that can fail in several ways
//!
//! None of these are retried internally; all are surfaced to the caller.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
///
/// Raised at call time when a constructor or randomisation receives an
/// argument outside its legal range. Values are never silently clamped.
///
/// # Examples
/// ```
/// use qmc_core::ConfigError;
///
/// let err = ConfigError::InvalidScrambleRange { sb: 0, base: 5 };
/// assert!(format!("{}", err).contains("sb = 0"));
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Dimension must be at least one.
    #[error("Invalid dimension {0}: must be positive")]
    InvalidDimension(usize),

    /// Base must be at least two.
    #[error("Invalid base {0}: must be at least 2")]
    InvalidBase(u32),

    /// `base^num_cols` points would not be representable.
    #[error("Too many points: {base}^{num_cols} exceeds 2^31")]
    TooManyPoints {
        /// Base of the digit expansion
        base: u32,
        /// Requested number of columns
        num_cols: usize,
    },

    /// Fewer stored rows than columns.
    #[error("Invalid row count: num_rows = {num_rows} < num_cols = {num_cols}")]
    RowsBelowColumns {
        /// Stored rows
        num_rows: usize,
        /// Columns (log_b of the number of points)
        num_cols: usize,
    },

    /// Fewer output digits than stored rows.
    #[error("Invalid output digits: out_digits = {out_digits} < num_rows = {num_rows}")]
    DigitsBelowRows {
        /// Output digits
        out_digits: usize,
        /// Stored rows
        num_rows: usize,
    },

    /// Output digits beyond the 31-bit precision budget.
    #[error("Output digits {out_digits} too large for base {base}: base^out_digits exceeds 2^31")]
    DigitsExceedPrecision {
        /// Base of the digit expansion
        base: u32,
        /// Requested output digits
        out_digits: usize,
    },

    /// A digit or matrix entry outside `[0, base)`.
    #[error("Digit {digit} out of range for base {base}")]
    DigitOutOfRange {
        /// Offending digit
        digit: u32,
        /// Base of the digit expansion
        base: u32,
    },

    /// Faure-permutation scramble range outside `[1, base)`.
    #[error("Invalid scramble range sb = {sb}: must lie in [1, {base})")]
    InvalidScrambleRange {
        /// Requested range
        sb: u32,
        /// Base of the net
        base: u32,
    },

    /// No precomputed Faure-factor table exists for this base.
    #[error("Faure factors are not available for base {0}")]
    NoFaureTable(u32),

    /// Lower-triangle selector outside `{0, 1, 2}`.
    #[error("Invalid lower flag {0}: must be 0, 1 or 2")]
    InvalidLowerFlag(u32),

    /// A shift extension was requested but no stream was ever supplied.
    #[error("Random shift extension requested without a shift stream")]
    MissingShiftStream,

    /// Dimension range `[d1, d2)` is empty or reversed.
    #[error("Invalid dimension range [{d1}, {d2})")]
    InvalidDimensionRange {
        /// Start of the range
        d1: usize,
        /// End of the range (exclusive)
        d2: usize,
    },

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the invalid value
        value: String,
    },
}

/// Iterator range errors.
///
/// Reported when a caller reads a coordinate or point past the end of a
/// point set. These are programming errors rather than operational
/// conditions, and are kept distinct from [`ConfigError`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PointSetError {
    /// The current point index is beyond the number of points.
    #[error("No such element: point {point} (num_points = {num_points})")]
    NoSuchPoint {
        /// Requested point index
        point: usize,
        /// Number of points in the set
        num_points: usize,
    },

    /// The current coordinate index is beyond the dimension.
    #[error("No such element: coordinate {coordinate} (dimension = {dimension})")]
    NoSuchCoordinate {
        /// Requested coordinate index
        coordinate: usize,
        /// Dimension of the point set
        dimension: usize,
    },
}

/// Kind of failure encountered while reading a parameter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// The file could not be read.
    Io(String),
    /// The header line is missing fields or inconsistent.
    MalformedHeader(String),
    /// The file ended before all expected values were read.
    PrematureEof {
        /// Description of what was expected
        expected: String,
    },
    /// A token could not be parsed as an integer.
    NonNumeric(String),
    /// A value parsed but lies outside its legal range.
    OutOfRange(String),
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatErrorKind::Io(msg) => write!(f, "I/O error: {}", msg),
            FormatErrorKind::MalformedHeader(msg) => write!(f, "malformed header: {}", msg),
            FormatErrorKind::PrematureEof { expected } => {
                write!(f, "premature end of file, expected {}", expected)
            }
            FormatErrorKind::NonNumeric(token) => write!(f, "non-numeric token '{}'", token),
            FormatErrorKind::OutOfRange(msg) => write!(f, "value out of range: {}", msg),
        }
    }
}

/// Parameter-file error.
///
/// Always carries the file name and the 1-based line number where the
/// problem was detected (0 when it concerns the file as a whole).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}:{line}: {kind}", .path.display())]
pub struct FormatError {
    /// File being read
    pub path: PathBuf,
    /// 1-based line number, 0 if not line-specific
    pub line: usize,
    /// What went wrong
    pub kind: FormatErrorKind,
}

impl FormatError {
    /// Creates a new format error.
    pub fn new(path: impl Into<PathBuf>, line: usize, kind: FormatErrorKind) -> Self {
        Self {
            path: path.into(),
            line,
            kind,
        }
    }
}

/// Umbrella error for operations spanning several failure classes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QmcError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Iterator range error
    #[error(transparent)]
    PointSet(#[from] PointSetError),

    /// Parameter-file error
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::TooManyPoints {
            base: 3,
            num_cols: 40,
        };
        assert!(err.to_string().contains("3^40"));

        let err = ConfigError::InvalidLowerFlag(3);
        assert!(err.to_string().contains("lower flag 3"));

        let err = ConfigError::InvalidParameter {
            name: "multiplier",
            value: "must be coprime to the modulus".to_string(),
        };
        assert!(err.to_string().contains("multiplier"));
    }

    #[test]
    fn test_point_set_error_display() {
        let err = PointSetError::NoSuchPoint {
            point: 8,
            num_points: 8,
        };
        assert_eq!(err.to_string(), "No such element: point 8 (num_points = 8)");
    }

    #[test]
    fn test_format_error_includes_file_name() {
        let err = FormatError::new(
            "sobol.dat",
            3,
            FormatErrorKind::NonNumeric("x1".to_string()),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("sobol.dat:3:"));
        assert!(msg.contains("x1"));
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: QmcError = ConfigError::MissingShiftStream.into();
        assert!(matches!(err, QmcError::Config(_)));
        assert_eq!(err.to_string(), ConfigError::MissingShiftStream.to_string());
    }
}
