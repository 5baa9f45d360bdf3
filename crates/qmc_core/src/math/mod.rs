//! Number-theoretic utilities for point-set construction.
//!
//! - [`digits`]: base-`b` digit expansions, Gray codes, the shared digit counter
//! - [`primes`]: process-wide prime table
//! - [`radical`]: radical inverses and digit permutations
//! - [`faure_factors`](mod@faure_factors): ranked Faure multiplicative factors per prime base

pub mod digits;
pub mod faure_factors;
pub mod primes;
pub mod radical;

pub use digits::{
    checked_pow_within, digits_to_gray, int_to_digits, int_to_gray_digits, DigitCounter,
    IndexOrder,
};
pub use faure_factors::{faure_factors, MAX_FAURE_BASE};
pub use primes::{first_primes, is_prime, next_prime, prime_index};
pub use radical::{
    faure_permutation, linear_permutation, radical_inverse, radical_inverse_permuted,
};
