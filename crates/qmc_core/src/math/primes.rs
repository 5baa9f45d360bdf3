//! Process-wide table of small primes.
//!
//! The table is sieved once on first use and never mutated afterwards.

use std::sync::OnceLock;

use crate::error::ConfigError;

/// Upper bound of the sieve.
const SIEVE_LIMIT: usize = 10_000;

static PRIMES: OnceLock<Vec<u32>> = OnceLock::new();

fn table() -> &'static [u32] {
    PRIMES.get_or_init(|| {
        let mut composite = vec![false; SIEVE_LIMIT + 1];
        let mut primes = Vec::new();
        for n in 2..=SIEVE_LIMIT {
            if composite[n] {
                continue;
            }
            primes.push(n as u32);
            let mut m = n * n;
            while m <= SIEVE_LIMIT {
                composite[m] = true;
                m += n;
            }
        }
        primes
    })
}

/// Returns the first `count` primes.
///
/// # Errors
///
/// Returns `ConfigError::InvalidParameter` if more primes are requested
/// than the table holds (1229, every prime below 10 000).
pub fn first_primes(count: usize) -> Result<&'static [u32], ConfigError> {
    let primes = table();
    if count > primes.len() {
        return Err(ConfigError::InvalidParameter {
            name: "dimension",
            value: format!("at most {} prime bases are available", primes.len()),
        });
    }
    Ok(&primes[..count])
}

/// Position of `p` in the prime table, if it is a tabulated prime.
pub fn prime_index(p: u32) -> Option<usize> {
    table().binary_search(&p).ok()
}

/// Deterministic primality test by trial division.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Smallest prime greater than or equal to `n`.
pub fn next_prime(n: u64) -> u64 {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_primes() {
        assert_eq!(first_primes(6).unwrap(), &[2, 3, 5, 7, 11, 13]);
        assert_eq!(first_primes(1229).unwrap().last(), Some(&9973));
        assert!(first_primes(1230).is_err());
    }

    #[test]
    fn test_prime_index() {
        assert_eq!(prime_index(2), Some(0));
        assert_eq!(prime_index(13), Some(5));
        assert_eq!(prime_index(15), None);
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(8), 11);
        assert_eq!(next_prime(13), 13);
        assert!(is_prime(1_000_003));
        assert!(!is_prime(1_000_001));
    }
}
