//! Sobol' direction-number files.
//!
//! One line per dimension, `d s a m_1 ... m_s`, where `d` is the 1-based
//! dimension (starting at 2; dimension 1 is implicit), `s` the degree of
//! the primitive polynomial, `a` its inner coefficients as a bit mask and
//! `m_i` the initial direction numbers. A leading column-title line, as
//! found in the published tables, is skipped.

use std::path::Path;

use qmc_core::error::{FormatError, FormatErrorKind};
use tracing::debug;

use super::tokens::{read_file, strip_comment};
use crate::digital::SobolDirection;

/// Parses direction numbers from `text`; `path` only labels errors.
///
/// # Errors
///
/// Returns `FormatError` if a line is short, holds a non-numeric token,
/// skips a dimension, or describes invalid direction numbers.
pub fn parse_sobol_directions(path: &Path, text: &str) -> Result<Vec<SobolDirection>, FormatError> {
    let mut directions = Vec::new();
    for (n, raw) in text.lines().enumerate() {
        let line = n + 1;
        let fields: Vec<&str> = strip_comment(raw).split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if directions.is_empty() && fields[0] == "d" {
            continue;
        }
        let error = |kind| FormatError::new(path, line, kind);
        let numbers = fields
            .iter()
            .map(|t| {
                t.parse::<u32>()
                    .map_err(|_| error(FormatErrorKind::NonNumeric((*t).to_string())))
            })
            .collect::<Result<Vec<u32>, _>>()?;
        if numbers.len() < 3 {
            return Err(error(FormatErrorKind::PrematureEof {
                expected: "d s a m_1..m_s".to_string(),
            }));
        }
        let (d, s, a) = (numbers[0], numbers[1], numbers[2]);
        let expected_d = directions.len() + 2;
        if d as usize != expected_d {
            return Err(error(FormatErrorKind::OutOfRange(format!(
                "dimension {} where {} was expected",
                d, expected_d
            ))));
        }
        let initial = &numbers[3..];
        if initial.len() != s as usize {
            return Err(error(FormatErrorKind::PrematureEof {
                expected: format!("{} initial direction numbers, found {}", s, initial.len()),
            }));
        }
        let direction = SobolDirection::new(s, a, initial.to_vec())
            .map_err(|e| error(FormatErrorKind::OutOfRange(e.to_string())))?;
        directions.push(direction);
    }
    Ok(directions)
}

/// Reads a direction-number file.
///
/// # Errors
///
/// Returns `FormatError` if the file cannot be read or parsed.
pub fn load_sobol_directions(path: impl AsRef<Path>) -> Result<Vec<SobolDirection>, FormatError> {
    let path = path.as_ref();
    let text = read_file(path)?;
    let directions = parse_sobol_directions(path, &text)?;
    debug!(
        path = %path.display(),
        dimensions = directions.len() + 1,
        "loaded Sobol' direction numbers"
    );
    Ok(directions)
}
