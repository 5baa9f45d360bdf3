//! Baker's (tent) transformation: `u -> 2u` below 1/2, `2(1 - u)` above.
//!
//! The map adds no zero avoidance of its own. An unshifted lattice keeps
//! its exact edges: `u = 0` stays 0 and `u = 1/2` becomes exactly 1.
//! Shifted inner sets never hit either value, since a modulo-1 shift
//! replaces 0 by [`EPSILON_HALF`](crate::pointset::EPSILON_HALF) and a
//! digital shift lifts every value by half the output resolution.

use qmc_core::error::ConfigError;
use qmc_core::stream::RandomStream;

use crate::digital::DigitalNet;
use crate::pointset::{
    CoordinateMap, MappedIterator, PointSet, ScramblablePointSet, ShiftablePointSet,
};

/// The tent map applied to every coordinate.
#[derive(Clone, Copy, Debug, Default)]
pub struct BakerMap;

impl CoordinateMap for BakerMap {
    #[inline]
    fn apply(&self, _j: usize, u: f64) -> f64 {
        if u < 0.5 {
            2.0 * u
        } else {
            2.0 * (1.0 - u)
        }
    }
}

/// Point set whose coordinates are the baker's transform of an inner set.
///
/// Combined with a random shift of the inner set, this gives the
/// tent-transformed shifted lattice rules.
#[derive(Clone, Debug)]
pub struct BakerTransformedPointSet<P> {
    inner: P,
}

impl<P: PointSet> BakerTransformedPointSet<P> {
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

impl<P: PointSet> PointSet for BakerTransformedPointSet<P> {
    type Iter<'a>
        = MappedIterator<P::Iter<'a>, BakerMap>
    where
        Self: 'a;

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn num_points(&self) -> usize {
        self.inner.num_points()
    }

    fn coordinate(&self, i: usize, j: usize) -> f64 {
        BakerMap.apply(j, self.inner.coordinate(i, j))
    }

    fn iter(&self) -> Self::Iter<'_> {
        MappedIterator::new(self.inner.iter(), BakerMap)
    }
}

impl<P: ShiftablePointSet> ShiftablePointSet for BakerTransformedPointSet<P> {
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

impl<P: ScramblablePointSet> ScramblablePointSet for BakerTransformedPointSet<P> {
    fn digital_net(&self) -> &DigitalNet {
        self.inner.digital_net()
    }

    fn digital_net_mut(&mut self) -> &mut DigitalNet {
        self.inner.digital_net_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Rank1Lattice;
    use approx::assert_relative_eq;

    #[test]
    fn test_tent_map_values() {
        assert_relative_eq!(BakerMap.apply(0, 0.2), 0.4);
        assert_relative_eq!(BakerMap.apply(0, 0.5), 1.0);
        assert_relative_eq!(BakerMap.apply(0, 0.75), 0.5);
    }

    #[test]
    fn test_unshifted_edges_are_exact() {
        let set = BakerTransformedPointSet::new(Rank1Lattice::new(4, &[1, 2]).unwrap());
        assert_eq!(set.coordinate(0, 0), 0.0);
        // point 2 is (1/2, 0)
        assert_eq!(set.coordinate(2, 0), 1.0);
        assert_eq!(set.coordinate(2, 1), 0.0);
    }

    #[test]
    fn test_lattice_coordinates() {
        let set = BakerTransformedPointSet::new(Rank1Lattice::new(5, &[1, 2]).unwrap());
        // point 3 of the lattice is (0.6, 0.2)
        assert_relative_eq!(set.coordinate(3, 0), 0.8);
        assert_relative_eq!(set.coordinate(3, 1), 0.4);
    }
}
