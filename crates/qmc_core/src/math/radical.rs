//! Radical inverses and digit permutations.
//!
//! The radical inverse of `i` in base `b` mirrors the base-`b` digits of
//! `i` about the radix point. It returns exactly `0.0` for `i = 0`; no
//! epsilon correction is applied here.

/// Radical inverse of `i` in base `b`.
///
/// # Examples
///
/// ```rust
/// use qmc_core::math::radical_inverse;
///
/// // 6 = 110 in base 2 -> 0.011 = 0.375
/// assert_eq!(radical_inverse(2, 6), 0.375);
/// assert_eq!(radical_inverse(3, 0), 0.0);
/// ```
pub fn radical_inverse(base: u32, i: u64) -> f64 {
    let b = u64::from(base);
    let mut rest = i;
    let mut numerator = 0u64;
    let mut denominator = 1u64;
    while rest > 0 {
        numerator = numerator * b + rest % b;
        denominator *= b;
        rest /= b;
    }
    numerator as f64 / denominator as f64
}

/// Radical inverse of `i` with each digit mapped through `perm`.
///
/// `perm` must be a permutation of `0..base` fixing zero, so that the
/// infinitely many leading zero digits of `i` stay zero.
pub fn radical_inverse_permuted(base: u32, i: u64, perm: &[u32]) -> f64 {
    let b = u64::from(base);
    let mut rest = i;
    let mut numerator = 0u64;
    let mut denominator = 1u64;
    while rest > 0 {
        numerator = numerator * b + u64::from(perm[(rest % b) as usize]);
        denominator *= b;
        rest /= b;
    }
    numerator as f64 / denominator as f64
}

/// Faure's recursive digit permutation for base `b`.
///
/// Built from `(0, 1)` for base 2: an even base `2c` interleaves twice the
/// base-`c` permutation with its odd successor; an odd base `2c + 1` takes
/// the base-`2c` permutation, bumps every value `>= c`, and inserts `c` in
/// the middle.
pub fn faure_permutation(base: u32) -> Vec<u32> {
    if base <= 2 {
        return (0..base).collect();
    }
    if base % 2 == 0 {
        let half = faure_permutation(base / 2);
        let mut perm = Vec::with_capacity(base as usize);
        perm.extend(half.iter().map(|&s| 2 * s));
        perm.extend(half.iter().map(|&s| 2 * s + 1));
        perm
    } else {
        let c = (base - 1) / 2;
        let prev = faure_permutation(base - 1);
        let bump = |s: u32| if s >= c { s + 1 } else { s };
        let mut perm = Vec::with_capacity(base as usize);
        perm.extend(prev[..c as usize].iter().map(|&s| bump(s)));
        perm.push(c);
        perm.extend(prev[c as usize..].iter().map(|&s| bump(s)));
        perm
    }
}

/// Linear digit permutation `d -> f * d mod b`.
pub fn linear_permutation(base: u32, factor: u32) -> Vec<u32> {
    (0..base)
        .map(|d| ((u64::from(d) * u64::from(factor)) % u64::from(base)) as u32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_van_der_corput_base_2() {
        let expected = [0.0, 0.5, 0.25, 0.75, 0.125, 0.625, 0.375, 0.875];
        for (i, &e) in expected.iter().enumerate() {
            assert_eq!(radical_inverse(2, i as u64), e);
        }
    }

    #[test]
    fn test_base_3() {
        assert_relative_eq!(radical_inverse(3, 1), 1.0 / 3.0);
        assert_relative_eq!(radical_inverse(3, 5), 7.0 / 9.0); // 12_3 -> 0.21_3
    }

    #[test]
    fn test_faure_permutations() {
        assert_eq!(faure_permutation(2), vec![0, 1]);
        assert_eq!(faure_permutation(3), vec![0, 1, 2]);
        assert_eq!(faure_permutation(4), vec![0, 2, 1, 3]);
        assert_eq!(faure_permutation(5), vec![0, 3, 2, 1, 4]);
        assert_eq!(faure_permutation(7), vec![0, 2, 5, 3, 1, 4, 6]);
    }

    #[test]
    fn test_permutations_are_bijective() {
        for base in [2u32, 3, 5, 7, 11, 13, 31] {
            let mut perm = faure_permutation(base);
            assert_eq!(perm[0], 0);
            perm.sort_unstable();
            assert_eq!(perm, (0..base).collect::<Vec<_>>());

            let mut lin = linear_permutation(base, 2);
            lin.sort_unstable();
            assert_eq!(lin, (0..base).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_identity_permutation_matches_plain() {
        let id: Vec<u32> = (0..5).collect();
        for i in 0..200u64 {
            assert_eq!(radical_inverse_permuted(5, i, &id), radical_inverse(5, i));
        }
    }
}
