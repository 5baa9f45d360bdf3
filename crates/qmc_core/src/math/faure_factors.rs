//! Ranked Faure multiplicative factors per prime base.
//!
//! For every prime `b` below [`MAX_FAURE_BASE`], the multipliers
//! `f in [1, b)` are ranked by the quality of the two-dimensional lattice
//! `{(i/b, f i/b mod 1)}`: the smaller the largest partial quotient of the
//! continued fraction of `f/b`, the better. Ties are broken by the sum of
//! partial quotients, then by `f`. Restricted matrix scrambles draw their
//! diagonal entries from the first `sb` factors of this ranking.
//!
//! The table is built once, on first use, and shared read-only.

use std::sync::OnceLock;

use super::primes::{first_primes, prime_index};
use crate::error::ConfigError;

/// Exclusive upper bound on bases with a Faure-factor table.
pub const MAX_FAURE_BASE: u32 = 1024;

static TABLE: OnceLock<Vec<Vec<u32>>> = OnceLock::new();

/// Largest and summed partial quotients of `f / b`.
fn partial_quotient_score(f: u32, b: u32) -> (u32, u64) {
    let (mut p, mut q) = (b, f);
    let mut max = 0u32;
    let mut sum = 0u64;
    while q != 0 {
        let a = p / q;
        max = max.max(a);
        sum += u64::from(a);
        let r = p % q;
        p = q;
        q = r;
    }
    (max, sum)
}

fn ranked_factors(b: u32) -> Vec<u32> {
    let mut factors: Vec<u32> = (1..b).collect();
    factors.sort_by_key(|&f| {
        let (max, sum) = partial_quotient_score(f, b);
        (max, sum, f)
    });
    factors
}

fn table() -> &'static [Vec<u32>] {
    TABLE.get_or_init(|| {
        // every tabulated prime below the bound
        let primes = first_primes(172).unwrap_or(&[]);
        primes
            .iter()
            .take_while(|&&p| p < MAX_FAURE_BASE)
            .map(|&p| ranked_factors(p))
            .collect()
    })
}

/// Ranked Faure factors for `base`, best first.
///
/// # Errors
///
/// Returns `ConfigError::NoFaureTable` if `base` is not a prime below
/// [`MAX_FAURE_BASE`].
///
/// # Examples
///
/// ```rust
/// use qmc_core::math::faure_factors;
///
/// let factors = faure_factors(5).unwrap();
/// assert_eq!(factors.len(), 4);
/// assert!(faure_factors(6).is_err());
/// ```
pub fn faure_factors(base: u32) -> Result<&'static [u32], ConfigError> {
    if base >= MAX_FAURE_BASE {
        return Err(ConfigError::NoFaureTable(base));
    }
    let idx = prime_index(base).ok_or(ConfigError::NoFaureTable(base))?;
    table()
        .get(idx)
        .map(Vec::as_slice)
        .ok_or(ConfigError::NoFaureTable(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_quotients() {
        // 5/13 = [0; 2, 1, 1, 2]
        assert_eq!(partial_quotient_score(5, 13), (2, 6));
        // 1/b = [0; b]
        assert_eq!(partial_quotient_score(1, 7), (7, 7));
    }

    #[test]
    fn test_table_covers_primes_below_bound() {
        assert!(faure_factors(2).is_ok());
        assert!(faure_factors(1021).is_ok());
        assert_eq!(faure_factors(1031), Err(ConfigError::NoFaureTable(1031)));
        assert_eq!(faure_factors(9), Err(ConfigError::NoFaureTable(9)));
    }

    #[test]
    fn test_ranking_is_a_permutation_of_units() {
        for b in [2u32, 3, 5, 7, 31, 101] {
            let mut f = faure_factors(b).unwrap().to_vec();
            f.sort_unstable();
            assert_eq!(f, (1..b).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_trivial_multipliers_rank_last() {
        // f = 1 and f = b - 1 give the worst lattices
        let f = faure_factors(31).unwrap();
        let tail = &f[f.len() - 2..];
        assert!(tail.contains(&1));
        assert!(tail.contains(&30));
    }
}
