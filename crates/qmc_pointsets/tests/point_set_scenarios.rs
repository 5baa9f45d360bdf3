//! Integration tests for the non-digital point sets, containers, file
//! loaders and RQMC replication.

use approx::assert_relative_eq;
use qmc_core::field::{Gf2w, Gf2wPolyLcg};
use qmc_core::stream::SeededStream;
use qmc_pointsets::digital::{DigitalNet, SobolSequence};
use qmc_pointsets::io::{load_digital_net, save_generator_matrices};
use qmc_pointsets::pointset::{PointSet, PointSetIterator};
use qmc_pointsets::randomisation::{PointSetRandomisation, RandomShift};
use qmc_pointsets::transform::{AntitheticPointSet, BakerTransformedPointSet, CachedPointSet};
use qmc_pointsets::{rqmc, CycleBasedPointSet, HammersleyPointSet, Rank1Lattice};

#[test]
fn test_lattice_scenario() {
    let lattice = Rank1Lattice::new(5, &[1, 2]).unwrap();
    let mut it = lattice.iter();
    it.set_cur_point_index(3);
    let mut point = [0.0; 2];
    it.next_point(&mut point).unwrap();
    assert_relative_eq!(point[0], 0.6);
    assert_relative_eq!(point[1], 0.2);
}

#[test]
fn test_lcg_cycle_completeness() {
    // 2 has order 10 modulo 11: {0} and one cycle of 10 states
    let set = CycleBasedPointSet::lcg(11, 2, 5).unwrap();
    assert_eq!(set.num_points(), 11);
    let mut firsts: Vec<u64> = set
        .iter()
        .points()
        .map(|p| (p[0] * 11.0).round() as u64)
        .collect();
    firsts.sort_unstable();
    assert_eq!(firsts, (0..11).collect::<Vec<_>>());
}

#[test]
fn test_primitive_poly_lcg_has_two_cycles() {
    let field = Gf2w::new(2, 0b11).unwrap();
    let lcg = Gf2wPolyLcg::new(field, vec![2, 1], 1).unwrap();
    let set = CycleBasedPointSet::from_recurrence(lcg, 4).unwrap();
    assert_eq!(set.num_points(), 16);
    let lengths: Vec<usize> = (0..set.num_cycles()).map(|c| set.cycle(c).len()).collect();
    assert_eq!(lengths.iter().sum::<usize>(), 16);
    assert_eq!(lengths[0], 1);
}

#[test]
fn test_unshifted_zero_asymmetry() {
    // lattice, cycle and radical points keep an exact zero; nets do not
    assert_eq!(Rank1Lattice::new(4, &[1]).unwrap().coordinate(0, 0), 0.0);
    assert_eq!(CycleBasedPointSet::lcg(7, 3, 1).unwrap().coordinate(0, 0), 0.0);
    assert_eq!(HammersleyPointSet::new(4, 2).unwrap().coordinate(0, 1), 0.0);
    assert!(DigitalNet::identity(2, 2, 1).unwrap().coordinate(0, 0) > 0.0);
}

#[test]
fn test_containers_wrap_a_randomised_net() {
    let mut set = AntitheticPointSet::new(SobolSequence::sobol(5, 3).unwrap());
    RandomShift::from_seed(17).randomise(&mut set).unwrap();
    let inner = set.inner().clone();
    for i in 0..32 {
        for j in 0..3 {
            assert_eq!(set.coordinate(i, j), 1.0 - inner.coordinate(i, j));
        }
    }

    let baker = BakerTransformedPointSet::new(inner);
    let cache = CachedPointSet::new(&baker);
    let from_iterator: Vec<Vec<f64>> = baker.iter().points().collect();
    for (i, p) in from_iterator.iter().enumerate() {
        assert_eq!(cache.row(i), p.as_slice());
    }
}

#[test]
fn test_saved_matrices_reload_into_the_same_net() {
    let seq = SobolSequence::sobol(4, 3).unwrap();
    let path = std::env::temp_dir().join(format!("qmc_matrices_{}.dat", std::process::id()));
    save_generator_matrices(&path, seq.net().generator_matrices()).unwrap();
    let net = load_digital_net(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(net.generator_matrices(), seq.net().generator_matrices());
    for i in 0..16 {
        for j in 0..3 {
            assert_eq!(net.coordinate(i, j), seq.coordinate(i, j));
        }
    }
}

#[test]
fn test_rqmc_shifted_lattice_estimate() {
    let lattice = Rank1Lattice::korobov(1021, 76, 3).unwrap();
    let estimate = rqmc::replicate_par(&lattice, &RandomShift::from_seed(99), 10, |x| {
        x.iter().map(|&u| 1.0 + (u - 0.5)).product()
    })
    .unwrap();
    assert_relative_eq!(estimate.mean, 1.0, epsilon = 1e-2);
    assert_eq!(estimate.replications, 10);
}

#[test]
fn test_shift_extension_continues_the_stream() {
    let mut a = DigitalNet::identity(2, 4, 4).unwrap();
    let mut b = a.clone();
    let mut stream = SeededStream::from_seed(31);
    a.add_random_shift(0, 2, &mut stream).unwrap();
    a.extend_random_shift(4).unwrap();

    let mut stream = SeededStream::from_seed(31);
    b.add_random_shift(0, 4, &mut stream).unwrap();
    for i in 0..16 {
        for j in 0..4 {
            assert_eq!(a.coordinate(i, j), b.coordinate(i, j));
        }
    }
}

#[test]
fn test_shift_extension_without_stream_fails() {
    let mut net = DigitalNet::identity(2, 3, 2).unwrap();
    assert!(net.extend_random_shift(2).is_err());
}
