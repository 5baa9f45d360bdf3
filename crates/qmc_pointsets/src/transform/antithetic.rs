//! Antithetic point set: `u -> 1 - u`.

use qmc_core::error::ConfigError;
use qmc_core::stream::RandomStream;

use crate::digital::DigitalNet;
use crate::pointset::{
    CoordinateMap, MappedIterator, PointSet, ScramblablePointSet, ShiftablePointSet,
};

/// Reflection `u -> 1 - u` of every coordinate.
#[derive(Clone, Copy, Debug, Default)]
pub struct AntitheticMap;

impl CoordinateMap for AntitheticMap {
    #[inline]
    fn apply(&self, _j: usize, u: f64) -> f64 {
        1.0 - u
    }
}

/// Point set whose coordinates are `1 - u` of an inner point set.
///
/// No epsilon correction is applied: an inner value of exactly 0 maps to 1.
#[derive(Clone, Debug)]
pub struct AntitheticPointSet<P> {
    inner: P,
}

impl<P: PointSet> AntitheticPointSet<P> {
    /// Wraps `inner`.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    /// The wrapped point set.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Unwraps the inner point set.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: PointSet> PointSet for AntitheticPointSet<P> {
    type Iter<'a>
        = MappedIterator<P::Iter<'a>, AntitheticMap>
    where
        Self: 'a;

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn num_points(&self) -> usize {
        self.inner.num_points()
    }

    fn coordinate(&self, i: usize, j: usize) -> f64 {
        AntitheticMap.apply(j, self.inner.coordinate(i, j))
    }

    fn iter(&self) -> Self::Iter<'_> {
        MappedIterator::new(self.inner.iter(), AntitheticMap)
    }
}

impl<P: ShiftablePointSet> ShiftablePointSet for AntitheticPointSet<P> {
    fn add_random_shift(
        &mut self,
        d1: usize,
        d2: usize,
        stream: &mut dyn RandomStream,
    ) -> Result<(), ConfigError> {
        self.inner.add_random_shift(d1, d2, stream)
    }

    fn clear_random_shift(&mut self) {
        self.inner.clear_random_shift();
    }
}

impl<P: ScramblablePointSet> ScramblablePointSet for AntitheticPointSet<P> {
    fn digital_net(&self) -> &DigitalNet {
        self.inner.digital_net()
    }

    fn digital_net_mut(&mut self) -> &mut DigitalNet {
        self.inner.digital_net_mut()
    }
}
