//! Unit tests for the stream module.
//!
//! This module contains tests verifying:
//! - Seed reproducibility
//! - Open-interval range of `next_double`
//! - Inclusive range of `next_int`
//! - Substream segmentation semantics
//! - Boxed clones preserving stream position

use super::*;
use proptest::prelude::*;

/// Verifies that the same seed produces identical sequences.
#[test]
fn test_seed_reproducibility() {
    let mut s1 = SeededStream::from_seed(12345);
    let mut s2 = SeededStream::from_seed(12345);

    for _ in 0..100 {
        assert_eq!(s1.next_double(), s2.next_double());
        assert_eq!(s1.next_int(0, 6), s2.next_int(0, 6));
    }
}

/// Verifies that uniform values lie in the open interval (0, 1).
#[test]
fn test_uniform_open_range() {
    let mut stream = SeededStream::from_seed(42);

    for _ in 0..10_000 {
        let value = stream.next_double();
        assert!(value > 0.0, "Uniform value {} is not above 0", value);
        assert!(value < 1.0, "Uniform value {} is >= 1", value);
    }
}

/// Verifies that every integer of a small inclusive range is hit.
#[test]
fn test_next_int_covers_inclusive_range() {
    let mut stream = SeededStream::from_seed(7);
    let mut seen = [false; 5];

    for _ in 0..1_000 {
        let v = stream.next_int(1, 4);
        assert!((1..=4).contains(&v));
        seen[v as usize] = true;
    }
    assert!(!seen[0]);
    assert!(seen[1..].iter().all(|&s| s));
}

/// Verifies substream segmentation.
#[test]
fn test_substreams() {
    let mut stream = SeededStream::from_seed(99);
    let first = stream.next_double();

    stream.reset_next_substream();
    assert_eq!(stream.substream_index(), 1);
    let second = stream.next_double();
    assert_ne!(first, second);

    // Rewinding the substream replays it
    stream.next_double();
    stream.reset_start_substream();
    assert_eq!(stream.next_double(), second);

    // Rewinding the stream goes back to substream 0
    stream.reset_start_stream();
    assert_eq!(stream.substream_index(), 0);
    assert_eq!(stream.next_double(), first);

    // Direct positioning agrees with stepping
    let mut direct = SeededStream::from_seed(99);
    direct.reset_to_substream(1);
    assert_eq!(direct.next_double(), second);
}

/// Verifies that a boxed clone continues from the same position.
#[test]
fn test_clone_box_preserves_position() {
    let mut stream = SeededStream::from_seed(5);
    stream.next_double();
    stream.next_double();

    let mut copy: Box<dyn RandomStream> = stream.clone_box();
    for _ in 0..10 {
        assert_eq!(stream.next_double(), copy.next_double());
    }

    let mut copy2 = copy.clone();
    assert_eq!(copy.next_int(0, 100), copy2.next_int(0, 100));
}

/// Verifies that empty buffers are handled gracefully.
#[test]
fn test_fill_uniform_empty_buffer() {
    let mut stream = SeededStream::from_seed(42);
    let mut empty: Vec<f64> = vec![];
    stream.fill_uniform(&mut empty);

    let mut buffer = vec![0.0; 256];
    stream.fill_uniform(&mut buffer);
    assert!(buffer.iter().all(|&u| u > 0.0 && u < 1.0));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_next_int_within_bounds(seed in any::<u64>(), lo in 0u32..50, span in 0u32..50) {
        let mut stream = SeededStream::from_seed(seed);
        let hi = lo + span;
        for _ in 0..20 {
            let v = stream.next_int(lo, hi);
            prop_assert!(v >= lo && v <= hi);
        }
    }
}
