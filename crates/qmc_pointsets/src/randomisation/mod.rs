//! Randomisation strategies for point sets.
//!
//! A strategy owns a [`RandomStream`] and knows how to randomise one family
//! of point sets: [`RandomShift`] works on any [`ShiftablePointSet`], the
//! matrix scrambles need a [`ScramblablePointSet`](crate::pointset::ScramblablePointSet).
//! Strategies are `Clone`, so RQMC replications can each take a private
//! copy positioned on their own substream.

mod scramble;

pub use scramble::{
    IBinomialScrambleShift, LmScramble, LmScrambleShift, RightScrambleShift,
    StripedScrambleShift,
};

use qmc_core::error::ConfigError;
use qmc_core::stream::{RandomStream, SeededStream};
use tracing::trace;

use crate::pointset::{PointSet, ShiftablePointSet};

/// A way of randomising point sets of type `P`.
pub trait PointSetRandomisation<P: ?Sized> {
    /// Randomises `point_set` in place, drawing from the strategy's stream.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the point set rejects the randomisation.
    fn randomise(&mut self, point_set: &mut P) -> Result<(), ConfigError>;

    /// The stream randomness is drawn from.
    fn stream_mut(&mut self) -> &mut dyn RandomStream;

    /// Replaces the stream.
    fn set_stream(&mut self, stream: Box<dyn RandomStream>);
}

/// Shared constructors and stream accessors of the stream-owning strategies.
macro_rules! stream_strategy {
    ($name:ident) => {
        impl $name {
            /// Strategy drawing from `stream`.
            pub fn new(stream: Box<dyn RandomStream>) -> Self {
                Self { stream }
            }

            /// Strategy drawing from a [`SeededStream`] with `seed`.
            pub fn from_seed(seed: u64) -> Self {
                Self::new(Box::new(SeededStream::from_seed(seed)))
            }

            /// The stream randomness is drawn from.
            pub fn stream_mut(&mut self) -> &mut dyn RandomStream {
                self.stream.as_mut()
            }

            /// Replaces the stream.
            pub fn set_stream(&mut self, stream: Box<dyn RandomStream>) {
                self.stream = stream;
            }
        }
    };
}

macro_rules! stream_access {
    () => {
        fn stream_mut(&mut self) -> &mut dyn RandomStream {
            self.stream.as_mut()
        }

        fn set_stream(&mut self, stream: Box<dyn RandomStream>) {
            self.stream = stream;
        }
    };
}

pub(crate) use {stream_access, stream_strategy};

/// Clears any existing shift and shifts every dimension afresh.
pub(crate) fn reshift<P: ShiftablePointSet + ?Sized>(
    point_set: &mut P,
    stream: &mut dyn RandomStream,
) -> Result<(), ConfigError> {
    point_set.clear_random_shift();
    point_set.add_random_shift(0, point_set.dimension(), stream)
}

/// Leaves the point set untouched.
///
/// Useful as the deterministic baseline of an RQMC comparison.
#[derive(Clone, Debug)]
pub struct EmptyRandomisation {
    stream: Box<dyn RandomStream>,
}

stream_strategy!(EmptyRandomisation);

impl Default for EmptyRandomisation {
    fn default() -> Self {
        Self::from_seed(0)
    }
}

impl<P: PointSet + ?Sized> PointSetRandomisation<P> for EmptyRandomisation {
    fn randomise(&mut self, _point_set: &mut P) -> Result<(), ConfigError> {
        Ok(())
    }

    stream_access!();
}

/// Random shift over all dimensions: digital for nets, modulo 1 otherwise.
///
/// A previous shift is discarded first, so repeated calls give independent
/// shifts rather than accumulating them.
#[derive(Clone, Debug)]
pub struct RandomShift {
    stream: Box<dyn RandomStream>,
}

stream_strategy!(RandomShift);

impl<P: ShiftablePointSet + ?Sized> PointSetRandomisation<P> for RandomShift {
    fn randomise(&mut self, point_set: &mut P) -> Result<(), ConfigError> {
        trace!(dim = point_set.dimension(), "random shift");
        reshift(point_set, self.stream.as_mut())
    }

    stream_access!();
}
