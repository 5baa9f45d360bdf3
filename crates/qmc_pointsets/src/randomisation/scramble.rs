//! Matrix scramble strategies, optionally followed by a digital shift.

use qmc_core::error::ConfigError;
use qmc_core::stream::{RandomStream, SeededStream};
use tracing::trace;

use super::{reshift, stream_access, stream_strategy, PointSetRandomisation};
use crate::pointset::ScramblablePointSet;

/// Left matrix scramble only; an existing digital shift is kept.
#[derive(Clone, Debug)]
pub struct LmScramble {
    stream: Box<dyn RandomStream>,
}

stream_strategy!(LmScramble);

impl<P: ScramblablePointSet + ?Sized> PointSetRandomisation<P> for LmScramble {
    fn randomise(&mut self, point_set: &mut P) -> Result<(), ConfigError> {
        point_set
            .digital_net_mut()
            .left_matrix_scramble(self.stream.as_mut());
        Ok(())
    }

    stream_access!();
}

/// Left matrix scramble followed by a fresh digital shift.
#[derive(Clone, Debug)]
pub struct LmScrambleShift {
    stream: Box<dyn RandomStream>,
}

stream_strategy!(LmScrambleShift);

impl<P: ScramblablePointSet + ?Sized> PointSetRandomisation<P> for LmScrambleShift {
    fn randomise(&mut self, point_set: &mut P) -> Result<(), ConfigError> {
        trace!("left matrix scramble with shift");
        point_set
            .digital_net_mut()
            .left_matrix_scramble(self.stream.as_mut());
        reshift(point_set, self.stream.as_mut())
    }

    stream_access!();
}

/// Striped matrix scramble followed by a fresh digital shift.
#[derive(Clone, Debug)]
pub struct StripedScrambleShift {
    stream: Box<dyn RandomStream>,
}

stream_strategy!(StripedScrambleShift);

impl<P: ScramblablePointSet + ?Sized> PointSetRandomisation<P> for StripedScrambleShift {
    fn randomise(&mut self, point_set: &mut P) -> Result<(), ConfigError> {
        trace!("striped matrix scramble with shift");
        point_set
            .digital_net_mut()
            .striped_matrix_scramble(self.stream.as_mut());
        reshift(point_set, self.stream.as_mut())
    }

    stream_access!();
}

/// I-binomial matrix scramble followed by a fresh digital shift.
#[derive(Clone, Debug)]
pub struct IBinomialScrambleShift {
    stream: Box<dyn RandomStream>,
}

stream_strategy!(IBinomialScrambleShift);

impl<P: ScramblablePointSet + ?Sized> PointSetRandomisation<P> for IBinomialScrambleShift {
    fn randomise(&mut self, point_set: &mut P) -> Result<(), ConfigError> {
        trace!("i-binomial matrix scramble with shift");
        point_set
            .digital_net_mut()
            .i_binomial_matrix_scramble(self.stream.as_mut());
        reshift(point_set, self.stream.as_mut())
    }

    stream_access!();
}

/// Right (Faure-Tezuka) scramble followed by a fresh digital shift.
#[derive(Clone, Debug)]
pub struct RightScrambleShift {
    stream: Box<dyn RandomStream>,
}

stream_strategy!(RightScrambleShift);

impl<P: ScramblablePointSet + ?Sized> PointSetRandomisation<P> for RightScrambleShift {
    fn randomise(&mut self, point_set: &mut P) -> Result<(), ConfigError> {
        trace!("right matrix scramble with shift");
        point_set
            .digital_net_mut()
            .right_matrix_scramble(self.stream.as_mut());
        reshift(point_set, self.stream.as_mut())
    }

    stream_access!();
}
