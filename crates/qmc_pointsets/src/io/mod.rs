//! Parameter files: generator matrices and Sobol' direction numbers.
//!
//! Both formats are plain text made of whitespace-separated integers.
//! Everything after `//` on a line is a comment. Errors carry the file
//! name and line number, and a failed load never yields a partial net.

mod matrices;
mod sobol;
mod tokens;

pub use matrices::{
    load_digital_net, load_generator_matrices, parse_generator_matrices, save_generator_matrices,
    write_generator_matrices, MatrixHeader, MAX_MATRIX_DIGITS,
};
pub use sobol::{load_sobol_directions, parse_sobol_directions};
