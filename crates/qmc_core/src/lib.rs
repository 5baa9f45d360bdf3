//! # qmc_core: Foundation for Quasi-Monte Carlo Point Sets
//!
//! ## Layer 1 (Foundation) Role
//!
//! qmc_core is the bottom layer of the workspace, providing:
//! - Error types: `ConfigError`, `PointSetError`, `FormatError`, `QmcError` (`error`)
//! - Finite-field arithmetic over `GF(2^w)` and its recurrences (`field`)
//! - Uniform-variate streams with substreams (`stream`)
//! - Digits, Gray codes, primes, radical inverses, Faure factors (`math`)
//!
//! ## Minimal Dependency Principle
//!
//! Layer 1 has no dependencies on other workspace crates:
//! - thiserror: Error derivation
//! - rand: `StdRng` behind `SeededStream`
//!
//! ## Usage Examples
//!
//! ```rust
//! use qmc_core::field::Gf2w;
//! use qmc_core::math::{radical_inverse, DigitCounter, IndexOrder};
//! use qmc_core::stream::{RandomStream, SeededStream};
//!
//! // GF(16) with Q(z) = z^4 + z + 1
//! let field = Gf2w::new(4, 0b0011).unwrap();
//! assert_eq!(field.multiply(0b1000, 0b0010), 0b0011);
//!
//! // Van der Corput point
//! assert_eq!(radical_inverse(2, 3), 0.75);
//!
//! // Gray-code counter: the changed digit position drives incremental updates
//! let mut counter = DigitCounter::new(2, 4);
//! assert_eq!(counter.increment(), 0);
//! assert_eq!(counter.increment(), 1);
//! assert_eq!(counter.value_in(IndexOrder::Gray), 3);
//!
//! // Seeded uniform stream
//! let mut stream = SeededStream::from_seed(7);
//! let u = stream.next_double();
//! assert!(u > 0.0 && u < 1.0);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod field;
pub mod math;
pub mod stream;

pub use error::{ConfigError, FormatError, FormatErrorKind, PointSetError, QmcError};
