//! Digital nets and sequences.
//!
//! This module provides:
//! - [`GeneratorMatrices`] and [`ScrambleMatrix`]: digit matrices over `Z_b`
//! - [`DigitalNet`]: coordinates, digital shift, matrix scrambles
//! - [`DigitalNetIterator`]: Gray-code (or natural-order) incremental enumeration
//! - [`DigitalSequence`]: prefix-consistent extension, with the
//!   [`SobolSequence`] and [`FaureSequence`] instances

mod faure;
mod iterator;
mod matrices;
mod net;
mod scramble;
mod sequence;
mod shift;
mod sobol;

pub use faure::{FaureGenerator, FaureSequence};
pub use iterator::{DigitalNetIterator, NetCursor, ShiftCjIterator};
pub use matrices::{GeneratorMatrices, LowerFill, ScrambleMatrix};
pub use net::{DigitalNet, NetShape, MAX_POINTS};
pub use sequence::{ColumnGenerator, DigitalSequence};
pub use sobol::{SobolDirection, SobolGenerator, SobolSequence};
