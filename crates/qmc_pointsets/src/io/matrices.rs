//! Generator-matrix files.
//!
//! ```text
//! // base numCols numRows numPoints dim
//! 2 3 3 8 2
//! 1 0 0  0 1 0  0 0 1     // dimension 0, column by column
//! 1 0 0  1 1 0  1 0 1     // dimension 1
//! ```
//!
//! The header is followed by `dim` matrices, each written column-major:
//! `numCols` columns of `numRows` digits in `[0, base)`. `numPoints` must
//! equal `base^numCols`.

use std::io::Write;
use std::path::Path;

use qmc_core::error::{FormatError, FormatErrorKind, QmcError};
use qmc_core::math::checked_pow_within;
use tracing::debug;

use super::tokens::{read_file, Tokens};
use crate::digital::{DigitalNet, GeneratorMatrices, NetShape, MAX_POINTS};

/// Upper bound on `dim * numCols * numRows` accepted from a file header.
pub const MAX_MATRIX_DIGITS: u64 = 1 << 28;

/// Header line of a generator-matrix file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatrixHeader {
    /// Base `b`
    pub base: u32,
    /// Columns `k`
    pub num_cols: usize,
    /// Rows `r`
    pub num_rows: usize,
    /// Number of points `b^k`
    pub num_points: u64,
    /// Dimension `s`
    pub dim: usize,
}

impl MatrixHeader {
    fn read(tokens: &mut Tokens<'_>) -> Result<Self, FormatError> {
        let mut field = |name: &'static str| tokens.next_u64(|| format!("header field {}", name));
        let base = field("base")?;
        let num_cols = field("numCols")?;
        let num_rows = field("numRows")?;
        let num_points = field("numPoints")?;
        let dim = field("dim")?;
        let line = tokens.line();
        let malformed = |msg: String| tokens.error(line, FormatErrorKind::MalformedHeader(msg));

        if !(2..=u64::from(u32::MAX)).contains(&base) {
            return Err(malformed(format!("base {} must be at least 2", base)));
        }
        if dim == 0 {
            return Err(malformed("dim must be positive".to_string()));
        }
        if num_rows < num_cols {
            return Err(malformed(format!(
                "numRows {} is below numCols {}",
                num_rows, num_cols
            )));
        }
        let base = base as u32;
        let expected = checked_pow_within(base, num_cols as usize, MAX_POINTS);
        if expected != Some(num_points) {
            return Err(malformed(format!(
                "numPoints {} is not {}^{}",
                num_points, base, num_cols
            )));
        }
        let max_rows = NetShape::max_out_digits(base) as u64;
        if num_rows > max_rows {
            return Err(malformed(format!(
                "numRows {} exceeds {} digits in base {}",
                num_rows, max_rows, base
            )));
        }
        let total = dim
            .checked_mul(num_cols)
            .and_then(|n| n.checked_mul(num_rows))
            .filter(|&n| n <= MAX_MATRIX_DIGITS);
        if total.is_none() {
            return Err(malformed(format!(
                "dim {} x numCols {} x numRows {} exceeds {} digits",
                dim, num_cols, num_rows, MAX_MATRIX_DIGITS
            )));
        }
        Ok(Self {
            base,
            num_cols: num_cols as usize,
            num_rows: num_rows as usize,
            num_points,
            dim: dim as usize,
        })
    }
}

/// Parses generator matrices from `text`; `path` only labels errors.
///
/// # Errors
///
/// Returns `FormatError` for a malformed header, a missing or non-numeric
/// token, a digit outside `[0, base)` or trailing data.
pub fn parse_generator_matrices(
    path: &Path,
    text: &str,
) -> Result<GeneratorMatrices, FormatError> {
    let mut tokens = Tokens::new(path, text);
    let header = MatrixHeader::read(&mut tokens)?;
    let MatrixHeader {
        base,
        num_cols,
        num_rows,
        dim,
        ..
    } = header;

    let mut matrices = GeneratorMatrices::zeros(base, dim, num_cols, num_rows);
    for j in 0..dim {
        for c in 0..num_cols {
            for l in 0..num_rows {
                let digit = tokens.next_u64(|| {
                    format!("row {} of column {} in dimension {}", l, c, j)
                })?;
                if digit >= u64::from(base) {
                    return Err(tokens.error(
                        tokens.line(),
                        FormatErrorKind::OutOfRange(format!(
                            "digit {} is not below base {}",
                            digit, base
                        )),
                    ));
                }
                matrices.set(j, l, c, digit as u32);
            }
        }
    }
    tokens.finish()?;
    Ok(matrices)
}

/// Reads a generator-matrix file.
///
/// # Errors
///
/// Returns `FormatError` if the file cannot be read or parsed.
pub fn load_generator_matrices(path: impl AsRef<Path>) -> Result<GeneratorMatrices, FormatError> {
    let path = path.as_ref();
    let text = read_file(path)?;
    let matrices = parse_generator_matrices(path, &text)?;
    debug!(
        path = %path.display(),
        base = matrices.base(),
        dim = matrices.dimension(),
        "loaded generator matrices"
    );
    Ok(matrices)
}

/// Reads a generator-matrix file into a digital net with the maximal
/// number of output digits for its base.
///
/// # Errors
///
/// Returns `QmcError::Format` for file errors and `QmcError::Config` if the
/// matrices do not form a valid net.
pub fn load_digital_net(path: impl AsRef<Path>) -> Result<DigitalNet, QmcError> {
    let matrices = load_generator_matrices(path)?;
    let out_digits = NetShape::max_out_digits(matrices.base()).max(matrices.num_rows());
    Ok(DigitalNet::new(matrices, out_digits)?)
}

/// Writes generator matrices in the file format read by
/// [`parse_generator_matrices`], one column per line.
pub fn write_generator_matrices<W: Write>(
    out: &mut W,
    matrices: &GeneratorMatrices,
) -> std::io::Result<()> {
    let (base, k, r, dim) = (
        matrices.base(),
        matrices.num_cols(),
        matrices.num_rows(),
        matrices.dimension(),
    );
    let num_points = u64::from(base).pow(k as u32);
    writeln!(out, "// base numCols numRows numPoints dim")?;
    writeln!(out, "{} {} {} {} {}", base, k, r, num_points, dim)?;
    for j in 0..dim {
        writeln!(out, "// dimension {}", j)?;
        for c in 0..k {
            let column: Vec<String> = matrices
                .column(j, c)
                .iter()
                .map(u32::to_string)
                .collect();
            writeln!(out, "{}", column.join(" "))?;
        }
    }
    Ok(())
}

/// Writes generator matrices to a file.
///
/// # Errors
///
/// Returns `FormatError` with the file name if writing fails.
pub fn save_generator_matrices(
    path: impl AsRef<Path>,
    matrices: &GeneratorMatrices,
) -> Result<(), FormatError> {
    let path = path.as_ref();
    let io_error = |e: std::io::Error| FormatError::new(path, 0, FormatErrorKind::Io(e.to_string()));
    let mut file = std::io::BufWriter::new(std::fs::File::create(path).map_err(io_error)?);
    write_generator_matrices(&mut file, matrices).map_err(io_error)?;
    file.flush().map_err(io_error)?;
    debug!(path = %path.display(), "saved generator matrices");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointset::PointSet;
    use qmc_core::math::IndexOrder;

    const SMALL: &str = "\
// two-dimensional net in base 2
2 3 3 8 2
1 0 0  0 1 0  0 0 1   // identity
1 0 0  1 1 0  1 0 1   // Pascal
";

    fn parse(text: &str) -> Result<GeneratorMatrices, FormatError> {
        parse_generator_matrices(Path::new("test.dat"), text)
    }

    #[test]
    fn test_parse_small_file() {
        let m = parse(SMALL).unwrap();
        assert_eq!((m.base(), m.num_cols(), m.num_rows(), m.dimension()), (2, 3, 3, 2));
        assert_eq!(m.column(1, 1), &[1, 1, 0]);
        assert_eq!(m.get(1, 0, 2), 1);
        assert_eq!(m.get(1, 1, 2), 0);

        let net = DigitalNet::new(m, 31).unwrap();
        assert_eq!(net.num_points(), 8);
        assert_eq!(net.coordinate_in(5, 0, IndexOrder::Natural), 0.625);
    }

    #[test]
    fn test_header_errors() {
        let err = parse("2 3 3 9 2\n").unwrap_err();
        assert!(matches!(err.kind, FormatErrorKind::MalformedHeader(_)));
        assert_eq!(err.line, 1);

        let err = parse("2 3 2 8 2\n").unwrap_err();
        assert!(matches!(err.kind, FormatErrorKind::MalformedHeader(_)));

        let err = parse("2 1 100000000000 2 100000000000\n").unwrap_err();
        assert!(matches!(err.kind, FormatErrorKind::MalformedHeader(_)));

        let err = parse("2 1 4000000000 2 4000000000\n").unwrap_err();
        assert!(matches!(err.kind, FormatErrorKind::MalformedHeader(_)));

        // rows within the digit budget, but too many matrices
        let err = parse("2 31 31 2147483648 4000000000\n").unwrap_err();
        assert!(matches!(err.kind, FormatErrorKind::MalformedHeader(_)));

        let err = parse("// nothing\n").unwrap_err();
        assert!(matches!(err.kind, FormatErrorKind::PrematureEof { .. }));
    }

    #[test]
    fn test_payload_errors() {
        let err = parse("2 1 1 2 2\n1\n").unwrap_err();
        assert!(matches!(err.kind, FormatErrorKind::PrematureEof { .. }));

        let err = parse("2 1 1 2 1\nx\n").unwrap_err();
        assert_eq!(err.kind, FormatErrorKind::NonNumeric("x".to_string()));
        assert_eq!(err.line, 2);

        let err = parse("2 1 1 2 1\n2\n").unwrap_err();
        assert!(matches!(err.kind, FormatErrorKind::OutOfRange(_)));

        let err = parse("2 1 1 2 1\n1 1\n").unwrap_err();
        assert!(matches!(err.kind, FormatErrorKind::OutOfRange(_)));
    }

    #[test]
    fn test_written_file_parses_back() {
        let m = parse(SMALL).unwrap();
        let mut buffer = Vec::new();
        write_generator_matrices(&mut buffer, &m).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(parse(&text).unwrap(), m);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_generator_matrices("/nonexistent/matrices.dat").unwrap_err();
        assert!(err.to_string().contains("matrices.dat"));
    }
}
