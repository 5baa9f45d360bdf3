//! Tests for the generic iterator protocol.

use super::*;
use qmc_core::error::PointSetError;

/// Grid of `n` points in `dim` dimensions: coordinate `(i, j)` is `(i + j) / (n + dim)`.
struct Grid {
    n: usize,
    dim: usize,
}

impl PointSet for Grid {
    type Iter<'a> = CoordinateIterator<'a, Self>;

    fn dimension(&self) -> usize {
        self.dim
    }

    fn num_points(&self) -> usize {
        self.n
    }

    fn coordinate(&self, i: usize, j: usize) -> f64 {
        (i + j) as f64 / (self.n + self.dim) as f64
    }

    fn iter(&self) -> Self::Iter<'_> {
        CoordinateIterator::new(self)
    }
}

struct Negate;

impl CoordinateMap for Negate {
    fn apply(&self, _j: usize, u: f64) -> f64 {
        1.0 - u
    }
}

#[test]
fn test_next_point_advances_and_resets_coordinate() {
    let grid = Grid { n: 4, dim: 3 };
    let mut it = grid.iter();
    let mut buf = [0.0; 3];

    assert_eq!(it.next_point(&mut buf).unwrap(), 1);
    assert_eq!(buf, [0.0, 1.0 / 7.0, 2.0 / 7.0]);
    assert_eq!(it.cur_coordinate_index(), 0);
    assert_eq!(it.cur_point_index(), 1);
}

#[test]
fn test_reading_past_the_end_fails() {
    let grid = Grid { n: 2, dim: 2 };
    let mut it = grid.iter();
    it.set_cur_coordinate_index(2);
    assert_eq!(
        it.next_coordinate(),
        Err(PointSetError::NoSuchCoordinate {
            coordinate: 2,
            dimension: 2
        })
    );

    it.set_cur_point_index(2);
    assert!(!it.has_next_point());
    assert_eq!(
        it.next_coordinate(),
        Err(PointSetError::NoSuchPoint {
            point: 2,
            num_points: 2
        })
    );
}

#[test]
fn test_next_coordinates_is_all_or_nothing() {
    let grid = Grid { n: 2, dim: 3 };
    let mut it = grid.iter();
    it.set_cur_coordinate_index(1);
    let mut buf = [0.0; 3];
    assert!(it.next_coordinates(&mut buf).is_err());
    assert_eq!(it.cur_coordinate_index(), 1);
}

#[test]
fn test_points_adapter_yields_every_point() {
    let grid = Grid { n: 5, dim: 2 };
    let points: Vec<Vec<f64>> = grid.iter().points().collect();
    assert_eq!(points.len(), 5);
    for (i, p) in points.iter().enumerate() {
        assert_eq!(p[0], grid.coordinate(i, 0));
        assert_eq!(p[1], grid.coordinate(i, 1));
    }
}

#[test]
fn test_mapped_iterator_preserves_position() {
    let grid = Grid { n: 3, dim: 2 };
    let mut it = MappedIterator::new(grid.iter(), Negate);
    it.set_cur_point_index(2);
    assert_eq!(it.next_coordinate().unwrap(), 1.0 - grid.coordinate(2, 0));
    assert_eq!(it.cur_coordinate_index(), 1);
    assert_eq!(it.into_inner().cur_point_index(), 2);
}

#[test]
fn test_checked_coordinate() {
    let grid = Grid { n: 3, dim: 2 };
    assert!(grid.checked_coordinate(2, 1).is_ok());
    assert!(grid.checked_coordinate(3, 0).is_err());
    assert!(grid.checked_coordinate(0, 2).is_err());
}
