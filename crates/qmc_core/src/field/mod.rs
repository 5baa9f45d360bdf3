//! Finite-field arithmetic over `GF(2^w)`.
//!
//! - [`Gf2w`]: field elements as `w`-bit words, polynomial-basis reduction
//! - [`Gf2wLfsr`]: linear feedback shift register over `GF(2^w)`
//! - [`Gf2wPolyLcg`]: polynomial LCG over `GF(2^w)`
//!
//! The recurrences feed the cycle-based point sets in `qmc_pointsets`.

mod gf2w;
mod recurrence;

pub use gf2w::{Gf2w, MAX_FIELD_BITS};
pub use recurrence::{Gf2wLfsr, Gf2wPolyLcg, StateRecurrence, MAX_STATE_BITS};
