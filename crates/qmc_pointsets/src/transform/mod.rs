//! Container point sets that transform the coordinates of another set.
//!
//! Each container owns its inner point set and wraps the inner iterator, so
//! a digital net inside keeps its Gray-code incremental enumeration. Random
//! shifts and scrambles requested on [`AntitheticPointSet`] and
//! [`BakerTransformedPointSet`] are forwarded to the inner set;
//! [`RandomShiftedPointSet`] owns a modulo-1 shift of its own.

mod antithetic;
mod baker;
mod cached;
mod shifted;

pub use antithetic::{AntitheticMap, AntitheticPointSet};
pub use baker::{BakerMap, BakerTransformedPointSet};
pub use cached::{CachedPointSet, MAX_CACHED_POINTS};
pub use shifted::RandomShiftedPointSet;
