//! Generic iterators shared by the point-set families.

use qmc_core::error::PointSetError;

use super::{PointSet, PointSetIterator};

/// Iterator that reads coordinates through [`PointSet::coordinate`].
///
/// Used by point sets whose coordinates are cheap to compute directly
/// (lattices, cycle-based sets, radical-inverse sets, caches).
#[derive(Debug)]
pub struct CoordinateIterator<'a, P: ?Sized> {
    point_set: &'a P,
    point: usize,
    coord: usize,
}

impl<'a, P: PointSet + ?Sized> CoordinateIterator<'a, P> {
    /// Creates an iterator at point 0, coordinate 0.
    pub fn new(point_set: &'a P) -> Self {
        Self {
            point_set,
            point: 0,
            coord: 0,
        }
    }
}

impl<P: PointSet + ?Sized> PointSetIterator for CoordinateIterator<'_, P> {
    fn dimension(&self) -> usize {
        self.point_set.dimension()
    }

    fn num_points(&self) -> usize {
        self.point_set.num_points()
    }

    fn cur_point_index(&self) -> usize {
        self.point
    }

    fn cur_coordinate_index(&self) -> usize {
        self.coord
    }

    fn set_cur_point_index(&mut self, i: usize) {
        self.point = i;
        self.coord = 0;
    }

    fn reset_to_next_point(&mut self) -> usize {
        self.point += 1;
        self.coord = 0;
        self.point
    }

    fn set_cur_coordinate_index(&mut self, j: usize) {
        self.coord = j;
    }

    fn next_coordinate(&mut self) -> Result<f64, PointSetError> {
        self.check_position()?;
        let value = self.point_set.coordinate(self.point, self.coord);
        self.coord += 1;
        Ok(value)
    }
}

/// A per-coordinate transformation applied on top of another iterator.
pub trait CoordinateMap {
    /// Maps the value `u` read from coordinate `j`.
    fn apply(&self, j: usize, u: f64) -> f64;
}

impl<M: CoordinateMap + ?Sized> CoordinateMap for &M {
    #[inline]
    fn apply(&self, j: usize, u: f64) -> f64 {
        (**self).apply(j, u)
    }
}

/// Iterator that transforms the coordinates of an inner iterator.
///
/// The inner iterator keeps its own incremental machinery (for example
/// Gray-code updates of a digital net); only the values are mapped.
#[derive(Debug)]
pub struct MappedIterator<I, M> {
    inner: I,
    map: M,
}

impl<I: PointSetIterator, M: CoordinateMap> MappedIterator<I, M> {
    /// Wraps `inner`, mapping every coordinate through `map`.
    pub fn new(inner: I, map: M) -> Self {
        Self { inner, map }
    }

    /// Unwraps the inner iterator.
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: PointSetIterator, M: CoordinateMap> PointSetIterator for MappedIterator<I, M> {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn num_points(&self) -> usize {
        self.inner.num_points()
    }

    fn cur_point_index(&self) -> usize {
        self.inner.cur_point_index()
    }

    fn cur_coordinate_index(&self) -> usize {
        self.inner.cur_coordinate_index()
    }

    fn set_cur_point_index(&mut self, i: usize) {
        self.inner.set_cur_point_index(i);
    }

    fn reset_to_next_point(&mut self) -> usize {
        self.inner.reset_to_next_point()
    }

    fn set_cur_coordinate_index(&mut self, j: usize) {
        self.inner.set_cur_coordinate_index(j);
    }

    fn next_coordinate(&mut self) -> Result<f64, PointSetError> {
        let j = self.inner.cur_coordinate_index();
        let u = self.inner.next_coordinate()?;
        Ok(self.map.apply(j, u))
    }
}

/// Standard iterator over whole points, produced by
/// [`PointSetIterator::points`].
///
/// Yields one `Vec<f64>` of `dimension()` coordinates per point, starting
/// from the iterator's current point.
#[derive(Debug)]
pub struct Points<I> {
    inner: I,
}

impl<I: PointSetIterator> Points<I> {
    pub(crate) fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I: PointSetIterator> Iterator for Points<I> {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.inner.has_next_point() {
            return None;
        }
        let mut point = vec![0.0; self.inner.dimension()];
        self.inner.next_point(&mut point).ok()?;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self
            .inner
            .num_points()
            .saturating_sub(self.inner.cur_point_index());
        (left, Some(left))
    }
}

impl<I: PointSetIterator> ExactSizeIterator for Points<I> {}
