//! Point-set capabilities and the iterator protocol.
//!
//! Every point set is coordinate-addressable ([`PointSet::coordinate`]) and
//! sequentially enumerable through its own [`PointSetIterator`]. Point sets
//! that can be randomised expose that through separate capability traits:
//!
//! - [`ShiftablePointSet`]: random shift (digital for nets, modulo 1 otherwise)
//! - [`ScramblablePointSet`]: access to the underlying digital net for matrix scrambles
//!
//! Iterators borrow their point set immutably, so a point set cannot be
//! randomised while one of its iterators is alive.

mod iter;
mod shift;

pub use iter::{CoordinateIterator, CoordinateMap, MappedIterator, Points};
pub use shift::ModuloShift;

use qmc_core::error::{ConfigError, PointSetError};
use qmc_core::stream::RandomStream;

use crate::digital::DigitalNet;

/// Half-unit substituted for values that would otherwise be exactly 0
/// after a modulo-1 shift.
pub const EPSILON_HALF: f64 = 1.0 / (1u64 << 55) as f64;

/// A finite set of points in the unit hypercube.
pub trait PointSet {
    /// Iterator type, borrowing the point set.
    type Iter<'a>: PointSetIterator
    where
        Self: 'a;

    /// Number of coordinates per point.
    fn dimension(&self) -> usize;

    /// Number of points.
    fn num_points(&self) -> usize;

    /// Coordinate `j` of point `i`.
    ///
    /// `i < num_points()` and `j < dimension()` are preconditions; use
    /// [`checked_coordinate`](Self::checked_coordinate) for a validated read.
    fn coordinate(&self, i: usize, j: usize) -> f64;

    /// Creates a new iterator positioned at point 0, coordinate 0.
    fn iter(&self) -> Self::Iter<'_>;

    /// Coordinate `j` of point `i`, with range checks.
    ///
    /// # Errors
    ///
    /// Returns `PointSetError` if either index is out of range.
    fn checked_coordinate(&self, i: usize, j: usize) -> Result<f64, PointSetError> {
        if i >= self.num_points() {
            return Err(PointSetError::NoSuchPoint {
                point: i,
                num_points: self.num_points(),
            });
        }
        if j >= self.dimension() {
            return Err(PointSetError::NoSuchCoordinate {
                coordinate: j,
                dimension: self.dimension(),
            });
        }
        Ok(self.coordinate(i, j))
    }

    /// Writes the first `buffer.len()` coordinates of point `i`.
    fn point(&self, i: usize, buffer: &mut [f64]) -> Result<(), PointSetError> {
        for (j, value) in buffer.iter_mut().enumerate() {
            *value = self.checked_coordinate(i, j)?;
        }
        Ok(())
    }
}

/// Sequential access to the points of a point set.
///
/// The iterator keeps a current point index and a current coordinate
/// index. Reading a coordinate advances the coordinate index; moving to the
/// next point resets it to 0.
pub trait PointSetIterator {
    /// Dimension of the underlying point set.
    fn dimension(&self) -> usize;

    /// Number of points of the underlying point set.
    fn num_points(&self) -> usize;

    /// Index of the current point.
    fn cur_point_index(&self) -> usize;

    /// Index of the next coordinate to be read.
    fn cur_coordinate_index(&self) -> usize;

    /// Positions the iterator on point `i`, coordinate 0.
    fn set_cur_point_index(&mut self, i: usize);

    /// Moves to the next point, coordinate 0, and returns its index.
    fn reset_to_next_point(&mut self) -> usize;

    /// Sets the index of the next coordinate to be read.
    fn set_cur_coordinate_index(&mut self, j: usize);

    /// Returns the current coordinate and advances the coordinate index.
    ///
    /// # Errors
    ///
    /// Returns `PointSetError` past the last point or coordinate.
    fn next_coordinate(&mut self) -> Result<f64, PointSetError>;

    /// Rewinds to point 0, coordinate 0.
    fn reset_cur_point_index(&mut self) {
        self.set_cur_point_index(0);
    }

    /// Rewinds to coordinate 0 of the current point.
    fn reset_cur_coordinate_index(&mut self) {
        self.set_cur_coordinate_index(0);
    }

    /// True while the current point index is below the number of points.
    fn has_next_point(&self) -> bool {
        self.cur_point_index() < self.num_points()
    }

    /// True if the current coordinate can be read.
    fn has_next_coordinate(&self) -> bool {
        self.has_next_point() && self.cur_coordinate_index() < self.dimension()
    }

    /// Checks that the current point and coordinate are readable.
    fn check_position(&self) -> Result<(), PointSetError> {
        if !self.has_next_point() {
            return Err(PointSetError::NoSuchPoint {
                point: self.cur_point_index(),
                num_points: self.num_points(),
            });
        }
        if self.cur_coordinate_index() >= self.dimension() {
            return Err(PointSetError::NoSuchCoordinate {
                coordinate: self.cur_coordinate_index(),
                dimension: self.dimension(),
            });
        }
        Ok(())
    }

    /// Reads `buffer.len()` consecutive coordinates of the current point.
    ///
    /// Nothing is read if the request runs past the dimension.
    fn next_coordinates(&mut self, buffer: &mut [f64]) -> Result<(), PointSetError> {
        let end = self.cur_coordinate_index() + buffer.len();
        if end > self.dimension() {
            return Err(PointSetError::NoSuchCoordinate {
                coordinate: end - 1,
                dimension: self.dimension(),
            });
        }
        for value in buffer.iter_mut() {
            *value = self.next_coordinate()?;
        }
        Ok(())
    }

    /// Reads the first `buffer.len()` coordinates of the current point,
    /// then moves to the next point and returns its index.
    fn next_point(&mut self, buffer: &mut [f64]) -> Result<usize, PointSetError> {
        self.reset_cur_coordinate_index();
        self.next_coordinates(buffer)?;
        Ok(self.reset_to_next_point())
    }

    /// Adapts the iterator into a standard iterator over full points.
    fn points(self) -> Points<Self>
    where
        Self: Sized,
    {
        Points::new(self)
    }
}

/// Point sets that support a random shift.
///
/// Digital nets apply a digital shift (digit-wise addition modulo the
/// base); every other point set applies a shift modulo 1.
pub trait ShiftablePointSet: PointSet {
    /// Adds an independent random shift to dimensions `[d1, d2)`.
    ///
    /// Shift values for dimensions below `d1` are preserved.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDimensionRange` if `d1 >= d2`.
    fn add_random_shift(
        &mut self,
        d1: usize,
        d2: usize,
        stream: &mut dyn RandomStream,
    ) -> Result<(), ConfigError>;

    /// Removes the random shift.
    fn clear_random_shift(&mut self);

    /// Shifts every dimension of the point set.
    fn add_random_shift_all(&mut self, stream: &mut dyn RandomStream) -> Result<(), ConfigError> {
        self.add_random_shift(0, self.dimension(), stream)
    }
}

/// Point sets backed by a digital net, and therefore matrix-scramblable.
pub trait ScramblablePointSet: ShiftablePointSet {
    /// The underlying digital net.
    fn digital_net(&self) -> &DigitalNet;

    /// Mutable access to the underlying digital net.
    fn digital_net_mut(&mut self) -> &mut DigitalNet;
}

#[cfg(test)]
mod tests;
