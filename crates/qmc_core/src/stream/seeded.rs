//! Seeded pseudo-random stream with substreams.
//!
//! This module provides [`SeededStream`], a seeded wrapper around
//! `rand::rngs::StdRng` that implements [`RandomStream`].

use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::RandomStream;

/// Golden-ratio increment used to spread substream seeds.
const SUBSTREAM_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Reproducible uniform stream over `StdRng`.
///
/// Substream `k` is an independent `StdRng` seeded from `(seed, k)`, so
/// jumping to a substream is O(1) and results do not depend on how many
/// values earlier substreams consumed.
///
/// # Examples
///
/// ```rust
/// use qmc_core::stream::{RandomStream, SeededStream};
///
/// let mut stream = SeededStream::from_seed(42);
/// let u = stream.next_double();
/// assert!(u > 0.0 && u < 1.0);
///
/// let digit = stream.next_int(0, 4);
/// assert!(digit <= 4);
///
/// stream.reset_start_stream();
/// assert_eq!(stream.next_double(), u);
/// ```
#[derive(Clone, Debug)]
pub struct SeededStream {
    /// The underlying PRNG positioned within the current substream.
    inner: StdRng,
    /// The seed used for initialisation.
    seed: u64,
    /// Index of the current substream.
    substream: u64,
}

impl SeededStream {
    /// Creates a new stream positioned at the start of substream 0.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: Self::substream_rng(seed, 0),
            seed,
            substream: 0,
        }
    }

    /// Returns the seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the index of the current substream.
    #[inline]
    pub fn substream_index(&self) -> u64 {
        self.substream
    }

    fn substream_rng(seed: u64, substream: u64) -> StdRng {
        StdRng::seed_from_u64(seed ^ substream.wrapping_mul(SUBSTREAM_STRIDE))
    }
}

impl RandomStream for SeededStream {
    #[inline]
    fn next_double(&mut self) -> f64 {
        self.inner.sample(Open01)
    }

    #[inline]
    fn next_int(&mut self, lo: u32, hi: u32) -> u32 {
        self.inner.gen_range(lo..=hi)
    }

    fn reset_start_stream(&mut self) {
        self.substream = 0;
        self.inner = Self::substream_rng(self.seed, 0);
    }

    fn reset_start_substream(&mut self) {
        self.inner = Self::substream_rng(self.seed, self.substream);
    }

    fn reset_next_substream(&mut self) {
        self.substream += 1;
        self.inner = Self::substream_rng(self.seed, self.substream);
    }

    fn clone_box(&self) -> Box<dyn RandomStream> {
        Box::new(self.clone())
    }

    fn reset_to_substream(&mut self, index: u64) {
        self.substream = index;
        self.inner = Self::substream_rng(self.seed, index);
    }
}
