//! Random shift modulo 1.

use qmc_core::error::ConfigError;
use qmc_core::stream::RandomStream;

use super::{CoordinateMap, EPSILON_HALF};

/// Per-dimension uniform shift added modulo 1.
///
/// Storage grows geometrically when a shift is requested beyond the
/// current capacity; values below the requested range are preserved. A
/// clone of the stream that produced the shift is retained so that later
/// extensions continue the same draw.
#[derive(Clone, Debug, Default)]
pub struct ModuloShift {
    values: Vec<f64>,
    dim: usize,
    stream: Option<Box<dyn RandomStream>>,
}

impl ModuloShift {
    /// Creates an empty (inactive) shift.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once any dimension has been shifted.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.dim > 0
    }

    /// Number of dimensions covered by the shift.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Shift value for dimension `j` (0 if not shifted).
    #[inline]
    pub fn value(&self, j: usize) -> f64 {
        if j < self.dim {
            self.values[j]
        } else {
            0.0
        }
    }

    /// Draws new shift values for dimensions `[d1, d2)`.
    pub fn add(
        &mut self,
        d1: usize,
        d2: usize,
        stream: &mut dyn RandomStream,
    ) -> Result<(), ConfigError> {
        if d1 >= d2 {
            return Err(ConfigError::InvalidDimensionRange { d1, d2 });
        }
        if d2 > self.values.len() {
            let capacity = d2.max(2 * self.values.len());
            self.values.resize(capacity, 0.0);
        }
        for value in &mut self.values[d1..d2] {
            *value = stream.next_double();
        }
        self.dim = self.dim.max(d2);
        self.stream = Some(stream.clone_box());
        Ok(())
    }

    /// Extends the shift to `d2` dimensions with the retained stream.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingShiftStream` if no shift was ever drawn.
    pub fn extend(&mut self, d2: usize) -> Result<(), ConfigError> {
        if d2 <= self.dim {
            return Ok(());
        }
        let mut stream = self.stream.take().ok_or(ConfigError::MissingShiftStream)?;
        let d1 = self.dim;
        self.add(d1, d2, stream.as_mut())
    }

    /// Removes the shift.
    pub fn clear(&mut self) {
        self.values.clear();
        self.dim = 0;
        self.stream = None;
    }

    /// Applies the shift of dimension `j` to `u`.
    ///
    /// Unshifted dimensions return `u` unchanged. A shifted value that
    /// lands exactly on 0 is replaced by [`EPSILON_HALF`].
    #[inline]
    pub fn apply(&self, j: usize, u: f64) -> f64 {
        if j >= self.dim {
            return u;
        }
        let mut x = u + self.values[j];
        if x >= 1.0 {
            x -= 1.0;
        }
        if x <= 0.0 {
            EPSILON_HALF
        } else {
            x
        }
    }
}

impl CoordinateMap for ModuloShift {
    #[inline]
    fn apply(&self, j: usize, u: f64) -> f64 {
        ModuloShift::apply(self, j, u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmc_core::stream::SeededStream;

    #[test]
    fn test_inactive_shift_is_identity() {
        let shift = ModuloShift::new();
        assert!(!shift.is_active());
        assert_eq!(shift.apply(0, 0.25), 0.25);
        assert_eq!(shift.apply(3, 0.0), 0.0);
    }

    #[test]
    fn test_add_preserves_lower_dimensions() {
        let mut stream = SeededStream::from_seed(1);
        let mut shift = ModuloShift::new();
        shift.add(0, 2, &mut stream).unwrap();
        let (v0, v1) = (shift.value(0), shift.value(1));

        shift.add(2, 9, &mut stream).unwrap();
        assert_eq!(shift.value(0), v0);
        assert_eq!(shift.value(1), v1);
        assert_eq!(shift.dimension(), 9);
    }

    #[test]
    fn test_extend_matches_single_draw() {
        let mut s1 = SeededStream::from_seed(11);
        let mut s2 = SeededStream::from_seed(11);

        let mut once = ModuloShift::new();
        once.add(0, 6, &mut s1).unwrap();

        let mut twice = ModuloShift::new();
        twice.add(0, 3, &mut s2).unwrap();
        twice.extend(6).unwrap();

        for j in 0..6 {
            assert_eq!(once.value(j), twice.value(j));
        }
    }

    #[test]
    fn test_extend_without_stream_fails() {
        let mut shift = ModuloShift::new();
        assert_eq!(shift.extend(2), Err(ConfigError::MissingShiftStream));
        assert!(shift.extend(0).is_ok());
    }

    #[test]
    fn test_apply_wraps_into_unit_interval() {
        let mut stream = SeededStream::from_seed(3);
        let mut shift = ModuloShift::new();
        shift.add(0, 1, &mut stream).unwrap();
        for k in 0..100 {
            let x = shift.apply(0, k as f64 / 100.0);
            assert!(x > 0.0 && x < 1.0);
        }
    }

    #[test]
    fn test_invalid_range() {
        let mut stream = SeededStream::from_seed(3);
        let mut shift = ModuloShift::new();
        assert!(shift.add(2, 2, &mut stream).is_err());
    }
}
