//! # qmc_pointsets: Quasi-Monte Carlo Point Sets
//!
//! ## Layer 2 Role
//!
//! qmc_pointsets builds the point sets and their randomisations on top of
//! `qmc_core`:
//! - Capability traits and the iterator protocol (`pointset`)
//! - Digital nets and sequences with Gray-code enumeration, digital
//!   shifts and matrix scrambles; Sobol' and Faure sequences (`digital`)
//! - Rank-1 lattices (`lattice`), cycle-based point sets (`cycle`),
//!   Halton and Hammersley sets (`radical`)
//! - Antithetic, baker, shifted and cached containers (`transform`)
//! - Randomisation strategies (`randomisation`) and RQMC replication (`rqmc`)
//! - Generator-matrix and direction-number files (`io`)
//!
//! ## Usage Examples
//!
//! ```rust
//! use qmc_pointsets::digital::SobolSequence;
//! use qmc_pointsets::pointset::{PointSet, PointSetIterator};
//! use qmc_pointsets::randomisation::LmScrambleShift;
//! use qmc_pointsets::rqmc;
//!
//! // First 2^10 Sobol' points in 5 dimensions, enumerated in Gray-code order
//! let sobol = SobolSequence::sobol(10, 5).unwrap();
//! let mut it = sobol.iter();
//! let mut point = [0.0; 5];
//! it.next_point(&mut point).unwrap();
//! assert!(point.iter().all(|&u| u > 0.0 && u < 1.0));
//!
//! // RQMC estimate of the integral of a product function (exact value 1)
//! let strategy = LmScrambleShift::from_seed(42);
//! let estimate = rqmc::replicate(&sobol, &strategy, 8, |x| {
//!     x.iter().map(|&u| 2.0 * u).product()
//! })
//! .unwrap();
//! assert!((estimate.mean - 1.0).abs() < 0.05);
//! ```

#![warn(missing_docs)]

pub mod cycle;
pub mod digital;
pub mod io;
pub mod lattice;
pub mod pointset;
pub mod radical;
pub mod randomisation;
pub mod rqmc;
pub mod transform;

pub use cycle::CycleBasedPointSet;
pub use digital::{DigitalNet, DigitalSequence, FaureSequence, SobolSequence};
pub use lattice::Rank1Lattice;
pub use pointset::{PointSet, PointSetIterator, ScramblablePointSet, ShiftablePointSet};
pub use radical::{DigitPermutation, HaltonSequence, HammersleyPointSet};
pub use randomisation::PointSetRandomisation;
pub use rqmc::{replicate, replicate_par, RqmcConfig, RqmcEstimate};
