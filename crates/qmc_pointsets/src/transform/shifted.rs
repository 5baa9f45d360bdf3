//! Point set with its own random shift modulo 1.

use qmc_core::error::ConfigError;
use qmc_core::stream::RandomStream;

use crate::pointset::{MappedIterator, ModuloShift, PointSet, ShiftablePointSet};

/// Adds a modulo-1 random shift on top of any point set.
///
/// The shift belongs to the container; the inner set is never modified.
/// This gives a shift modulo 1 even when the inner set is a digital net,
/// whose own shift would be digital.
#[derive(Clone, Debug)]
pub struct RandomShiftedPointSet<P> {
    inner: P,
    shift: ModuloShift,
}

impl<P: PointSet> RandomShiftedPointSet<P> {
    /// Wraps `inner` with an inactive shift.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            shift: ModuloShift::new(),
        }
    }

    /// The wrapped point set.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// The container's shift.
    pub fn random_shift(&self) -> &ModuloShift {
        &self.shift
    }
}

impl<P: PointSet> PointSet for RandomShiftedPointSet<P> {
    type Iter<'a>
        = MappedIterator<P::Iter<'a>, &'a ModuloShift>
    where
        Self: 'a;

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn num_points(&self) -> usize {
        self.inner.num_points()
    }

    fn coordinate(&self, i: usize, j: usize) -> f64 {
        self.shift.apply(j, self.inner.coordinate(i, j))
    }

    fn iter(&self) -> Self::Iter<'_> {
        MappedIterator::new(self.inner.iter(), &self.shift)
    }
}

impl<P: PointSet> ShiftablePointSet for RandomShiftedPointSet<P> {
    fn add_random_shift(
        &mut self,
        d1: usize,
        d2: usize,
        stream: &mut dyn RandomStream,
    ) -> Result<(), ConfigError> {
        self.shift.add(d1, d2, stream)
    }

    fn clear_random_shift(&mut self) {
        self.shift.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digital::DigitalNet;
    use crate::pointset::PointSetIterator;
    use qmc_core::stream::SeededStream;

    #[test]
    fn test_shift_is_modulo_one_over_a_net() {
        let net = DigitalNet::identity(2, 3, 1).unwrap();
        let mut set = RandomShiftedPointSet::new(net.clone());
        let mut stream = SeededStream::from_seed(11);
        set.add_random_shift_all(&mut stream).unwrap();

        let shift = set.random_shift().value(0);
        for i in 0..8 {
            let mut expected = net.coordinate(i, 0) + shift;
            if expected >= 1.0 {
                expected -= 1.0;
            }
            assert!((set.coordinate(i, 0) - expected).abs() < 1e-15);
        }
    }

    #[test]
    fn test_iterator_sees_the_shift() {
        let mut set = RandomShiftedPointSet::new(DigitalNet::identity(2, 4, 2).unwrap());
        let mut stream = SeededStream::from_seed(5);
        set.add_random_shift(0, 2, &mut stream).unwrap();
        let mut it = set.iter();
        it.set_cur_point_index(9);
        assert_eq!(it.next_coordinate().unwrap(), set.coordinate(9, 0));
        assert_eq!(it.next_coordinate().unwrap(), set.coordinate(9, 1));
        set.clear_random_shift();
        assert!(!set.random_shift().is_active());
    }
}
