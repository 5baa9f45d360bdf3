//! Criterion benchmarks for qmc_core primitives.
//!
//! Measures field multiplication, radical inverses and the Gray-code digit
//! counter that drives incremental point enumeration.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qmc_core::field::Gf2w;
use qmc_core::math::{radical_inverse, DigitCounter};

/// Benchmark GF(2^w) multiplication for several field sizes.
fn bench_field_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("gf2w_multiply");

    for (w, modulus) in [(4u32, 0b0011u32), (8, 0b0001_1011), (16, 0b0010_1011)] {
        let field = Gf2w::new(w, modulus).unwrap();
        let mask = ((1u64 << w) - 1) as u32;
        group.bench_with_input(BenchmarkId::from_parameter(w), &field, |b, field| {
            b.iter(|| {
                let mut acc = 1u32;
                for x in 1..256u32 {
                    acc = field.multiply(black_box(acc), black_box(x & mask)) | 1;
                }
                acc
            });
        });
    }

    group.finish();
}

/// Benchmark radical inverses in small prime bases.
fn bench_radical_inverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("radical_inverse");

    for base in [2u32, 3, 7, 31] {
        group.bench_with_input(BenchmarkId::from_parameter(base), &base, |b, &base| {
            b.iter(|| (0..1024u64).map(|i| radical_inverse(base, black_box(i))).sum::<f64>());
        });
    }

    group.finish();
}

/// Benchmark the digit counter increment.
fn bench_digit_counter(c: &mut Criterion) {
    c.bench_function("digit_counter_increment_base2", |b| {
        b.iter(|| {
            let mut counter = DigitCounter::new(2, 20);
            let mut acc = 0usize;
            for _ in 0..(1 << 16) {
                acc += counter.increment();
            }
            black_box(acc)
        });
    });
}

criterion_group!(
    benches,
    bench_field_multiply,
    bench_radical_inverse,
    bench_digit_counter
);
criterion_main!(benches);
