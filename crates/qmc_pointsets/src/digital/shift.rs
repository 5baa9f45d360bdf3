//! Digital shift storage.

use qmc_core::error::ConfigError;
use qmc_core::stream::RandomStream;

/// Random digital shift: `out_digits` digits in `[0, b)` per dimension.
///
/// Capacity grows geometrically; the covered dimension count only grows.
/// A clone of the producing stream is retained for later extensions.
#[derive(Clone, Debug)]
pub(crate) struct DigitalShift {
    base: u32,
    out_digits: usize,
    dim: usize,
    capacity: usize,
    digits: Vec<u32>,
    stream: Option<Box<dyn RandomStream>>,
}

impl DigitalShift {
    pub(crate) fn new(base: u32, out_digits: usize) -> Self {
        Self {
            base,
            out_digits,
            dim: 0,
            capacity: 0,
            digits: Vec::new(),
            stream: None,
        }
    }

    #[inline]
    pub(crate) fn dimension(&self) -> usize {
        self.dim
    }

    /// Shift digit `l` of dimension `j`; zero beyond the stored range.
    #[inline]
    pub(crate) fn digit(&self, j: usize, l: usize) -> u32 {
        if j < self.capacity {
            self.digits[j * self.out_digits + l]
        } else {
            0
        }
    }

    /// All digits of dimension `j`, if stored.
    pub(crate) fn digits(&self, j: usize) -> Option<&[u32]> {
        if j < self.dim {
            let start = j * self.out_digits;
            Some(&self.digits[start..start + self.out_digits])
        } else {
            None
        }
    }

    /// Packed base-2 word for dimension `j`: digit `l` at bit `w - 1 - l`.
    pub(crate) fn packed_word(&self, j: usize) -> u32 {
        let w = self.out_digits;
        (0..w).fold(0u32, |acc, l| acc | (self.digit(j, l) << (w - 1 - l)))
    }

    /// Copy with an unshifted dimension inserted at position 0.
    pub(crate) fn with_leading_zero_dimension(&self) -> Self {
        let w = self.out_digits;
        let mut digits = vec![0; w];
        digits.extend_from_slice(&self.digits[..self.dim * w]);
        Self {
            base: self.base,
            out_digits: w,
            dim: self.dim + 1,
            capacity: self.dim + 1,
            digits,
            stream: self.stream.clone(),
        }
    }

    pub(crate) fn add(
        &mut self,
        d1: usize,
        d2: usize,
        stream: &mut dyn RandomStream,
    ) -> Result<(), ConfigError> {
        if d1 >= d2 {
            return Err(ConfigError::InvalidDimensionRange { d1, d2 });
        }
        if d2 > self.capacity {
            self.capacity = d2.max(2 * self.capacity);
            self.digits.resize(self.capacity * self.out_digits, 0);
        }
        let top = self.base - 1;
        for d in &mut self.digits[d1 * self.out_digits..d2 * self.out_digits] {
            *d = stream.next_int(0, top);
        }
        self.dim = self.dim.max(d2);
        self.stream = Some(stream.clone_box());
        Ok(())
    }

    pub(crate) fn extend(&mut self, d2: usize) -> Result<(), ConfigError> {
        if d2 <= self.dim {
            return Ok(());
        }
        let mut stream = self.stream.take().ok_or(ConfigError::MissingShiftStream)?;
        let d1 = self.dim;
        self.add(d1, d2, stream.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmc_core::stream::SeededStream;

    #[test]
    fn test_capacity_doubles() {
        let mut stream = SeededStream::from_seed(1);
        let mut shift = DigitalShift::new(3, 4);
        shift.add(0, 3, &mut stream).unwrap();
        assert_eq!(shift.capacity, 3);
        shift.add(3, 4, &mut stream).unwrap();
        assert_eq!(shift.capacity, 6);
        assert_eq!(shift.dimension(), 4);
    }

    #[test]
    fn test_digits_in_range_and_preserved() {
        let mut stream = SeededStream::from_seed(2);
        let mut shift = DigitalShift::new(5, 3);
        shift.add(0, 2, &mut stream).unwrap();
        let first = shift.digits(0).unwrap().to_vec();
        assert!(first.iter().all(|&d| d < 5));

        shift.add(2, 10, &mut stream).unwrap();
        assert_eq!(shift.digits(0).unwrap(), first.as_slice());
        assert!(shift.digits(10).is_none());
        assert_eq!(shift.digit(50, 0), 0);
    }

    #[test]
    fn test_extend_without_stream() {
        let mut shift = DigitalShift::new(2, 8);
        assert_eq!(shift.extend(1), Err(ConfigError::MissingShiftStream));
    }

    #[test]
    fn test_leading_zero_dimension() {
        let mut stream = SeededStream::from_seed(6);
        let mut shift = DigitalShift::new(3, 2);
        shift.add(0, 2, &mut stream).unwrap();
        let moved = shift.with_leading_zero_dimension();
        assert_eq!(moved.dimension(), 3);
        assert_eq!(moved.digits(0).unwrap(), &[0, 0]);
        assert_eq!(moved.digits(2).unwrap(), shift.digits(1).unwrap());
    }

    #[test]
    fn test_packed_word() {
        let mut stream = SeededStream::from_seed(3);
        let mut shift = DigitalShift::new(2, 5);
        shift.add(0, 1, &mut stream).unwrap();
        let word = shift.packed_word(0);
        for l in 0..5 {
            assert_eq!((word >> (4 - l)) & 1, shift.digit(0, l));
        }
    }
}
