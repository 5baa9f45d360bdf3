//! Criterion benchmarks for point-set enumeration and randomisation.
//!
//! Compares Gray-code iteration against direct coordinate evaluation, the
//! base-2 packed path against a general base, and the cost of scrambles.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qmc_core::stream::SeededStream;
use qmc_pointsets::digital::{FaureSequence, SobolSequence};
use qmc_pointsets::pointset::{PointSet, PointSetIterator};
use qmc_pointsets::Rank1Lattice;

fn sum_by_iterator<P: PointSet>(set: &P) -> f64 {
    let mut it = set.iter();
    let mut point = vec![0.0; set.dimension()];
    let mut sum = 0.0;
    while it.has_next_point() {
        if it.next_point(&mut point).is_err() {
            break;
        }
        sum += point.iter().sum::<f64>();
    }
    sum
}

fn sum_by_coordinate<P: PointSet>(set: &P) -> f64 {
    (0..set.num_points())
        .map(|i| (0..set.dimension()).map(|j| set.coordinate(i, j)).sum::<f64>())
        .sum()
}

/// Gray-code iteration versus random access on Sobol' points.
fn bench_sobol_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("sobol_enumeration");

    for k in [10usize, 14] {
        let sobol = SobolSequence::sobol(k, 16).unwrap();
        group.bench_with_input(BenchmarkId::new("gray_iterator", k), &sobol, |b, set| {
            b.iter(|| black_box(sum_by_iterator(set)));
        });
        group.bench_with_input(BenchmarkId::new("coordinate", k), &sobol, |b, set| {
            b.iter(|| black_box(sum_by_coordinate(set)));
        });
    }

    group.finish();
}

/// Iteration over a base-5 Faure net (general, unpacked path).
fn bench_faure_enumeration(c: &mut Criterion) {
    let faure = FaureSequence::faure(5, 5).unwrap();
    c.bench_function("faure_base5_iterator", |b| {
        b.iter(|| black_box(sum_by_iterator(&faure)));
    });
}

/// Left matrix scramble plus digital shift of a Sobol' net.
fn bench_scramble(c: &mut Criterion) {
    let sobol = SobolSequence::sobol(12, 16).unwrap();
    c.bench_function("sobol_lms_shift", |b| {
        b.iter(|| {
            let mut seq = sobol.clone();
            let mut stream = SeededStream::from_seed(7);
            seq.net_mut().left_matrix_scramble(&mut stream);
            seq.net_mut().add_random_shift(0, 16, &mut stream).unwrap();
            black_box(seq.coordinate(1, 0))
        });
    });
}

/// Iteration over a Korobov lattice.
fn bench_lattice(c: &mut Criterion) {
    let lattice = Rank1Lattice::korobov(4093, 1397, 16).unwrap();
    c.bench_function("korobov_iterator", |b| {
        b.iter(|| black_box(sum_by_iterator(&lattice)));
    });
}

criterion_group!(
    benches,
    bench_sobol_enumeration,
    bench_faure_enumeration,
    bench_scramble,
    bench_lattice,
);
criterion_main!(benches);
