//! Materialised point set.

use qmc_core::error::ConfigError;
use tracing::{debug, warn};

use crate::pointset::{CoordinateIterator, PointSet};

/// Most points a cache will hold.
pub const MAX_CACHED_POINTS: usize = 1 << 20;

/// Coordinates of another point set, computed once and stored row-major.
///
/// Useful when the same points are read many times, or when the points
/// must be reordered (see [`sort_by_coordinate`](Self::sort_by_coordinate)).
#[derive(Clone, Debug, PartialEq)]
pub struct CachedPointSet {
    dim: usize,
    values: Vec<f64>,
}

impl CachedPointSet {
    /// Caches all points of `source`, up to [`MAX_CACHED_POINTS`].
    ///
    /// Unbounded sequences such as a default
    /// [`HaltonSequence`](crate::radical::HaltonSequence) report 2^31
    /// points; cache a prefix of them with [`with_size`](Self::with_size).
    pub fn new<P: PointSet + ?Sized>(source: &P) -> Self {
        Self::with_size(source, source.num_points(), source.dimension())
    }

    /// Caches the first `n` points and `dim` coordinates of `source`.
    ///
    /// Both sizes are capped to those of `source`, and `n` to
    /// [`MAX_CACHED_POINTS`].
    pub fn with_size<P: PointSet + ?Sized>(source: &P, n: usize, dim: usize) -> Self {
        let mut n = n.min(source.num_points());
        if n > MAX_CACHED_POINTS {
            warn!(requested = n, cap = MAX_CACHED_POINTS, "caching a truncated prefix");
            n = MAX_CACHED_POINTS;
        }
        let dim = dim.min(source.dimension());
        let mut values = Vec::with_capacity(n * dim);
        for i in 0..n {
            values.extend((0..dim).map(|j| source.coordinate(i, j)));
        }
        debug!(n, dim, "cached point set");
        Self { dim, values }
    }

    /// Builds a cache from explicit points.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the points do not all have `dim` coordinates.
    pub fn from_points(points: &[Vec<f64>], dim: usize) -> Result<Self, ConfigError> {
        if dim == 0 {
            return Err(ConfigError::InvalidDimension(dim));
        }
        if let Some(bad) = points.iter().position(|p| p.len() != dim) {
            return Err(ConfigError::InvalidParameter {
                name: "points",
                value: format!("point {} has {} coordinates, expected {}", bad, points[bad].len(), dim),
            });
        }
        Ok(Self {
            dim,
            values: points.concat(),
        })
    }

    /// Reorders the points by increasing coordinate `j`.
    pub fn sort_by_coordinate(&mut self, j: usize) {
        if self.dim == 0 || j >= self.dim {
            return;
        }
        let mut rows: Vec<&[f64]> = self.values.chunks(self.dim).collect();
        rows.sort_by(|a, b| a[j].total_cmp(&b[j]));
        self.values = rows.concat();
    }

    /// Point `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.dim..(i + 1) * self.dim]
    }
}

impl PointSet for CachedPointSet {
    type Iter<'a> = CoordinateIterator<'a, Self>;

    fn dimension(&self) -> usize {
        self.dim
    }

    fn num_points(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.values.len() / self.dim
        }
    }

    fn coordinate(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.dim + j]
    }

    fn iter(&self) -> Self::Iter<'_> {
        CoordinateIterator::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Rank1Lattice;
    use crate::radical::HaltonSequence;

    #[test]
    fn test_cache_matches_source() {
        let lattice = Rank1Lattice::korobov(31, 7, 3).unwrap();
        let cache = CachedPointSet::new(&lattice);
        assert_eq!(cache.num_points(), 31);
        for i in 0..31 {
            for j in 0..3 {
                assert_eq!(cache.coordinate(i, j), lattice.coordinate(i, j));
            }
        }
    }

    #[test]
    fn test_sort_by_coordinate() {
        let lattice = Rank1Lattice::new(8, &[1, 3]).unwrap();
        let mut cache = CachedPointSet::new(&lattice);
        cache.sort_by_coordinate(1);
        for i in 0..8 {
            assert_eq!(cache.coordinate(i, 1), i as f64 / 8.0);
        }
        // the same points, reordered: point with second coordinate 3/8 is i = 1
        assert_eq!(cache.row(3), &[0.125, 0.375]);
    }

    #[test]
    fn test_unbounded_sequence_is_truncated() {
        let halton = HaltonSequence::new(1).unwrap();
        let cache = CachedPointSet::new(&halton);
        assert_eq!(cache.num_points(), MAX_CACHED_POINTS);
        assert_eq!(cache.coordinate(3, 0), halton.coordinate(3, 0));

        let prefix = CachedPointSet::with_size(&halton, 8, 1);
        assert_eq!(prefix.num_points(), 8);
    }

    #[test]
    fn test_from_points_validates_lengths() {
        assert!(CachedPointSet::from_points(&[vec![0.1, 0.2], vec![0.3]], 2).is_err());
        let cache = CachedPointSet::from_points(&[vec![0.1, 0.2], vec![0.3, 0.4]], 2).unwrap();
        assert_eq!(cache.num_points(), 2);
    }
}
