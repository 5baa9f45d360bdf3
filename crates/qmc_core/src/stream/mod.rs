//! # Uniform-Variate Streams
//!
//! Randomisation of point sets (digital shifts, matrix scrambles, modulo-1
//! shifts) draws its entropy from a [`RandomStream`]. The trait is the only
//! thing the point-set code depends on; [`SeededStream`] is the default
//! implementation over `rand::rngs::StdRng`.
//!
//! ## Stream Segmentation
//!
//! A stream is divided into substreams. `reset_start_stream` rewinds to the
//! first substream, `reset_start_substream` rewinds to the start of the
//! current one, and `reset_next_substream` moves to the next. RQMC
//! replications use substream `r` for replication `r`, which makes results
//! independent of scheduling order.

mod seeded;

pub use seeded::SeededStream;

/// Source of uniform variates with substream support.
///
/// Implementors must be cloneable into a box so that a point set can keep a
/// private copy of the stream that created its random shift, and extend the
/// shift later from the same source.
pub trait RandomStream: Send + Sync {
    /// Returns a uniform variate in the open interval (0, 1).
    fn next_double(&mut self) -> f64;

    /// Returns a uniform integer in `[lo, hi]` (both inclusive).
    ///
    /// # Panics
    ///
    /// Implementations may panic if `lo > hi`.
    fn next_int(&mut self, lo: u32, hi: u32) -> u32;

    /// Rewinds to the beginning of the first substream.
    fn reset_start_stream(&mut self);

    /// Rewinds to the beginning of the current substream.
    fn reset_start_substream(&mut self);

    /// Moves to the beginning of the next substream.
    fn reset_next_substream(&mut self);

    /// Clones the stream, preserving its exact position.
    fn clone_box(&self) -> Box<dyn RandomStream>;

    /// Fills `buffer` with uniform variates in (0, 1).
    fn fill_uniform(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.next_double();
        }
    }

    /// Positions the stream at the start of substream `index`.
    fn reset_to_substream(&mut self, index: u64) {
        self.reset_start_stream();
        for _ in 0..index {
            self.reset_next_substream();
        }
    }
}

impl Clone for Box<dyn RandomStream> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn RandomStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RandomStream")
    }
}

#[cfg(test)]
mod tests;
