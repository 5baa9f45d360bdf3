//! Base-`b` digit expansions and Gray codes.
//!
//! Digits are stored least significant first: `digits[0]` is the units
//! digit. The base-`b` Gray code of `i` has digits
//! `g_c = (a_c - a_{c+1}) mod b`, where `a` are the ordinary digits. Between
//! `i` and `i + 1` exactly one Gray digit changes, and it increases by one
//! modulo `b`: this is what makes incremental point enumeration O(1).

/// Writes the base-`b` digits of `i` into `digits` and returns the number
/// of significant digits.
///
/// Digits beyond the returned count are set to zero. Higher digits of `i`
/// that do not fit in `digits` are dropped.
pub fn int_to_digits(base: u32, mut i: u64, digits: &mut [u32]) -> usize {
    let b = u64::from(base);
    let mut count = 0;
    for d in digits.iter_mut() {
        if i == 0 {
            *d = 0;
            continue;
        }
        *d = (i % b) as u32;
        i /= b;
        count += 1;
    }
    count
}

/// Converts ordinary digits to Gray-code digits.
///
/// `gray` must be at least as long as `digits`.
pub fn digits_to_gray(base: u32, digits: &[u32], gray: &mut [u32]) {
    let n = digits.len();
    for c in 0..n {
        let next = if c + 1 < n { digits[c + 1] } else { 0 };
        gray[c] = (digits[c] + base - next) % base;
    }
}

/// Writes the Gray-code digits of `i` and returns the number of
/// significant digits.
pub fn int_to_gray_digits(base: u32, i: u64, gray: &mut [u32]) -> usize {
    let mut digits = vec![0u32; gray.len()];
    let count = int_to_digits(base, i, &mut digits);
    digits_to_gray(base, &digits, gray);
    count
}

/// Order in which the points of a digital net are enumerated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IndexOrder {
    /// Base-`b` Gray code; one digit changes between consecutive points.
    #[default]
    Gray,
    /// Ordinary base-`b` counting.
    Natural,
}

/// Base-`b` counter that reports which digit position changed.
///
/// Shared by the Gray and natural-order iterators: incrementing returns the
/// lowest position `pos` whose digit was below `b - 1`. Digits below `pos`
/// wrap from `b - 1` to 0. In Gray code only digit `pos` changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitCounter {
    base: u32,
    digits: Vec<u32>,
}

impl DigitCounter {
    /// Creates a counter at zero with room for `len` digits.
    ///
    /// One spare digit is kept so that incrementing past `b^len - 1`
    /// reports position `len` instead of overflowing.
    pub fn new(base: u32, len: usize) -> Self {
        Self {
            base,
            digits: vec![0; len + 1],
        }
    }

    /// Base of the counter.
    #[inline]
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Number of usable digit positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.digits.len() - 1
    }

    /// True if the counter has no usable digit positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sets the counter to `i`.
    pub fn set(&mut self, i: u64) {
        int_to_digits(self.base, i, &mut self.digits);
    }

    /// Increments by one and returns the changed position.
    pub fn increment(&mut self) -> usize {
        let top = self.base - 1;
        let last = self.digits.len() - 1;
        let mut pos = 0;
        while pos < last && self.digits[pos] == top {
            self.digits[pos] = 0;
            pos += 1;
        }
        self.digits[pos] += 1;
        pos
    }

    /// Ordinary digit at position `c`.
    #[inline]
    pub fn digit(&self, c: usize) -> u32 {
        self.digits[c]
    }

    /// Gray-code digit at position `c`.
    #[inline]
    pub fn gray_digit(&self, c: usize) -> u32 {
        (self.digits[c] + self.base - self.digits[c + 1]) % self.base
    }

    /// Digit at position `c` under the given enumeration order.
    #[inline]
    pub fn digit_in(&self, order: IndexOrder, c: usize) -> u32 {
        match order {
            IndexOrder::Gray => self.gray_digit(c),
            IndexOrder::Natural => self.digit(c),
        }
    }

    /// The counter's value interpreted with the given enumeration order.
    ///
    /// For `Natural` this is the counted index; for `Gray` it is the integer
    /// whose ordinary digits are the Gray digits of the index.
    pub fn value_in(&self, order: IndexOrder) -> u64 {
        (0..self.len())
            .rev()
            .fold(0u64, |acc, c| acc * u64::from(self.base) + u64::from(self.digit_in(order, c)))
    }
}

/// Computes `base^exp` if it does not exceed `limit`.
pub fn checked_pow_within(base: u32, exp: usize, limit: u64) -> Option<u64> {
    let mut acc = 1u64;
    for _ in 0..exp {
        acc = acc.checked_mul(u64::from(base))?;
        if acc > limit {
            return None;
        }
    }
    Some(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_to_digits() {
        let mut d = [9u32; 5];
        assert_eq!(int_to_digits(3, 46, &mut d), 4); // 46 = 1201_3
        assert_eq!(d, [1, 0, 2, 1, 0]);
        assert_eq!(int_to_digits(2, 0, &mut d), 0);
        assert_eq!(d, [0; 5]);
    }

    #[test]
    fn test_binary_gray_matches_xor_formula() {
        let mut g = [0u32; 8];
        for i in 0..256u64 {
            int_to_gray_digits(2, i, &mut g);
            let value = g.iter().rev().fold(0u64, |acc, &x| acc * 2 + u64::from(x));
            assert_eq!(value, i ^ (i >> 1));
        }
    }

    #[test]
    fn test_counter_single_gray_digit_changes() {
        for base in [2u32, 3, 5, 7] {
            let mut counter = DigitCounter::new(base, 4);
            let n = u64::from(base).pow(4);
            for i in 0..n - 1 {
                let before: Vec<u32> = (0..4).map(|c| counter.gray_digit(c)).collect();
                let pos = counter.increment();
                let after: Vec<u32> = (0..4).map(|c| counter.gray_digit(c)).collect();
                for c in 0..4 {
                    if c == pos {
                        assert_eq!(after[c], (before[c] + 1) % base, "base {} i {}", base, i);
                    } else {
                        assert_eq!(after[c], before[c], "base {} i {}", base, i);
                    }
                }
            }
        }
    }

    #[test]
    fn test_counter_set_matches_increment() {
        let mut stepped = DigitCounter::new(3, 5);
        let mut direct = DigitCounter::new(3, 5);
        for i in 1..200u64 {
            stepped.increment();
            direct.set(i);
            assert_eq!(stepped, direct);
            assert_eq!(direct.value_in(IndexOrder::Natural), i);
        }
    }

    #[test]
    fn test_counter_overflow_reports_spare_position() {
        let mut counter = DigitCounter::new(2, 3);
        counter.set(7);
        assert_eq!(counter.increment(), 3);
    }

    #[test]
    fn test_gray_value_is_permutation() {
        let mut counter = DigitCounter::new(3, 3);
        let mut seen = vec![false; 27];
        for _ in 0..27 {
            let g = counter.value_in(IndexOrder::Gray) as usize;
            assert!(!seen[g]);
            seen[g] = true;
            counter.increment();
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_checked_pow_within() {
        assert_eq!(checked_pow_within(2, 31, 1 << 31), Some(1 << 31));
        assert_eq!(checked_pow_within(2, 32, 1 << 31), None);
        assert_eq!(checked_pow_within(3, 0, 1), Some(1));
    }
}
