//! CLI command implementations
//!
//! Each submodule implements one `qmc` command. The point-set selection and
//! randomisation arguments shared by the commands live here.

pub mod generate;
pub mod integrate;
pub mod matrices;

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use qmc_pointsets::digital::{DigitalNet, FaureSequence, SobolGenerator, SobolSequence};
use qmc_pointsets::io::{load_digital_net, load_sobol_directions};
use qmc_pointsets::randomisation::{
    IBinomialScrambleShift, LmScramble, LmScrambleShift, PointSetRandomisation, RandomShift,
    RightScrambleShift, StripedScrambleShift,
};
use qmc_pointsets::{
    CycleBasedPointSet, DigitPermutation, HaltonSequence, HammersleyPointSet, Rank1Lattice,
    ScramblablePointSet, ShiftablePointSet,
};
use tracing::{debug, info};

use crate::{CliError, Result};

/// Point-set families the CLI can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PointSetKind {
    /// Sobol' sequence (base 2)
    Sobol,
    /// Faure sequence (smallest prime base >= dim)
    Faure,
    /// Halton sequence in the first primes
    Halton,
    /// Hammersley point set
    Hammersley,
    /// Korobov lattice, generating vector (1, a, a^2, ...)
    Korobov,
    /// Rank-1 lattice with an explicit generating vector
    Lattice,
    /// Cycles of the multiplicative LCG x -> a x mod n
    Lcg,
}

/// Randomisations the CLI can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RandomisationKind {
    /// Deterministic points
    #[default]
    None,
    /// Random shift (digital for nets, modulo 1 otherwise)
    Shift,
    /// Left matrix scramble
    Lms,
    /// Left matrix scramble and digital shift
    LmsShift,
    /// Striped matrix scramble and digital shift
    StripedShift,
    /// I-binomial scramble and digital shift
    IbinomialShift,
    /// Right matrix scramble and digital shift
    RightShift,
}

/// Digit permutation of the Halton and Hammersley radical inverses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PermutationArg {
    /// Plain radical inverse
    #[default]
    Identity,
    /// Faure's recursive permutation
    Faure,
    /// Linear permutation by the best Faure factor
    FaureLemieux,
}

impl From<PermutationArg> for DigitPermutation {
    fn from(arg: PermutationArg) -> Self {
        match arg {
            PermutationArg::Identity => DigitPermutation::Identity,
            PermutationArg::Faure => DigitPermutation::Faure,
            PermutationArg::FaureLemieux => DigitPermutation::FaureLemieux,
        }
    }
}

/// Arguments selecting a point set
#[derive(Debug, Clone, Args)]
pub struct PointSetArgs {
    /// Point-set family
    #[arg(long, value_enum, default_value = "sobol")]
    pub kind: PointSetKind,

    /// Dimension
    #[arg(short, long, default_value_t = 2)]
    pub dim: usize,

    /// Number of digits k: b^k points for digital nets, 2^k otherwise
    #[arg(short = 'k', long, default_value_t = 10)]
    pub log_points: usize,

    /// Exact number of points (lattices, LCG, Hammersley, Halton)
    #[arg(short = 'n', long)]
    pub points: Option<usize>,

    /// Korobov or LCG multiplier
    #[arg(short = 'a', long)]
    pub multiplier: Option<u64>,

    /// Lattice generating vector, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub generator: Vec<u64>,

    /// Digit permutation for Halton and Hammersley
    #[arg(long, value_enum, default_value = "identity")]
    pub permutation: PermutationArg,

    /// Load the digital net from a generator-matrix file
    #[arg(long, value_name = "FILE", conflicts_with = "direction_file")]
    pub matrix_file: Option<PathBuf>,

    /// Build the Sobol' sequence from a direction-number file
    #[arg(long, value_name = "FILE")]
    pub direction_file: Option<PathBuf>,
}

/// A point set built from [`PointSetArgs`]
#[derive(Debug, Clone)]
pub enum BuiltPointSet {
    Sobol(SobolSequence),
    Faure(FaureSequence),
    Net(DigitalNet),
    Halton(HaltonSequence),
    Hammersley(HammersleyPointSet),
    Lattice(Rank1Lattice),
    Cycle(CycleBasedPointSet),
}

/// Operation over a concrete point set, split by its capabilities.
pub trait PointSetVisitor {
    type Output;

    /// Called for point sets backed by a digital net.
    fn visit_scramblable<P>(self, point_set: P) -> Self::Output
    where
        P: ScramblablePointSet + Clone + Send + Sync;

    /// Called for every other point set.
    fn visit_shiftable<P>(self, point_set: P) -> Self::Output
    where
        P: ShiftablePointSet + Clone + Send + Sync;
}

impl BuiltPointSet {
    /// Hands the concrete point set to `visitor`.
    pub fn accept<V: PointSetVisitor>(self, visitor: V) -> V::Output {
        match self {
            Self::Sobol(set) => visitor.visit_scramblable(set),
            Self::Faure(set) => visitor.visit_scramblable(set),
            Self::Net(set) => visitor.visit_scramblable(set),
            Self::Halton(set) => visitor.visit_shiftable(set),
            Self::Hammersley(set) => visitor.visit_shiftable(set),
            Self::Lattice(set) => visitor.visit_shiftable(set),
            Self::Cycle(set) => visitor.visit_shiftable(set),
        }
    }
}

impl PointSetArgs {
    /// Number of points for the non-digital families.
    fn num_points(&self) -> Result<usize> {
        if let Some(n) = self.points {
            return Ok(n);
        }
        if self.log_points >= usize::BITS as usize - 1 {
            return Err(CliError::InvalidArgument(format!(
                "--log-points {} is too large",
                self.log_points
            )));
        }
        Ok(1 << self.log_points)
    }

    fn multiplier(&self) -> Result<u64> {
        self.multiplier.ok_or_else(|| {
            CliError::InvalidArgument(format!("--multiplier is required for {:?}", self.kind))
        })
    }

    /// Builds the selected point set.
    pub fn build(&self) -> Result<BuiltPointSet> {
        if let Some(path) = &self.matrix_file {
            if !path.exists() {
                return Err(CliError::FileNotFound(path.display().to_string()));
            }
            info!(path = %path.display(), "loading generator matrices");
            return Ok(BuiltPointSet::Net(load_digital_net(path)?));
        }

        let built = match self.kind {
            PointSetKind::Sobol => {
                let generator = match &self.direction_file {
                    Some(path) => {
                        if !path.exists() {
                            return Err(CliError::FileNotFound(path.display().to_string()));
                        }
                        SobolGenerator::from_directions(load_sobol_directions(path)?)
                    }
                    None => SobolGenerator::joe_kuo(),
                };
                BuiltPointSet::Sobol(SobolSequence::sobol_with(
                    generator,
                    self.log_points,
                    self.dim,
                )?)
            }
            PointSetKind::Faure => {
                BuiltPointSet::Faure(FaureSequence::faure(self.log_points, self.dim)?)
            }
            PointSetKind::Halton => BuiltPointSet::Halton(
                HaltonSequence::with_permutation(self.dim, self.permutation.into())?
                    .with_num_points(self.num_points()?),
            ),
            PointSetKind::Hammersley => BuiltPointSet::Hammersley(
                HammersleyPointSet::with_permutation(
                    self.num_points()?,
                    self.dim,
                    self.permutation.into(),
                )?,
            ),
            PointSetKind::Korobov => BuiltPointSet::Lattice(Rank1Lattice::korobov(
                self.num_points()?,
                self.multiplier()?,
                self.dim,
            )?),
            PointSetKind::Lattice => {
                if self.generator.len() != self.dim {
                    return Err(CliError::InvalidArgument(format!(
                        "--generator has {} entries, expected {}",
                        self.generator.len(),
                        self.dim
                    )));
                }
                BuiltPointSet::Lattice(Rank1Lattice::new(self.num_points()?, &self.generator)?)
            }
            PointSetKind::Lcg => BuiltPointSet::Cycle(CycleBasedPointSet::lcg(
                self.num_points()? as u64,
                self.multiplier()?,
                self.dim,
            )?),
        };
        debug!(kind = ?self.kind, dim = self.dim, "built point set");
        Ok(built)
    }
}

/// Applies a shift-only randomisation.
pub fn randomise_shiftable<P>(point_set: &mut P, kind: RandomisationKind, seed: u64) -> Result<()>
where
    P: ShiftablePointSet,
{
    match kind {
        RandomisationKind::None => Ok(()),
        RandomisationKind::Shift => Ok(RandomShift::from_seed(seed).randomise(point_set)?),
        other => Err(CliError::InvalidArgument(format!(
            "randomisation {:?} needs a digital net (sobol, faure or --matrix-file)",
            other
        ))),
    }
}

/// Applies any randomisation to a digital-net point set.
pub fn randomise_scramblable<P>(point_set: &mut P, kind: RandomisationKind, seed: u64) -> Result<()>
where
    P: ScramblablePointSet,
{
    match kind {
        RandomisationKind::Lms => LmScramble::from_seed(seed).randomise(point_set)?,
        RandomisationKind::LmsShift => LmScrambleShift::from_seed(seed).randomise(point_set)?,
        RandomisationKind::StripedShift => {
            StripedScrambleShift::from_seed(seed).randomise(point_set)?
        }
        RandomisationKind::IbinomialShift => {
            IBinomialScrambleShift::from_seed(seed).randomise(point_set)?
        }
        RandomisationKind::RightShift => RightScrambleShift::from_seed(seed).randomise(point_set)?,
        RandomisationKind::None | RandomisationKind::Shift => {
            return randomise_shiftable(point_set, kind, seed)
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmc_pointsets::PointSet;

    fn args(kind: PointSetKind) -> PointSetArgs {
        PointSetArgs {
            kind,
            dim: 3,
            log_points: 4,
            points: None,
            multiplier: None,
            generator: Vec::new(),
            permutation: PermutationArg::Identity,
            matrix_file: None,
            direction_file: None,
        }
    }

    struct Size;

    impl PointSetVisitor for Size {
        type Output = (usize, usize, bool);

        fn visit_scramblable<P>(self, set: P) -> Self::Output
        where
            P: ScramblablePointSet + Clone + Send + Sync,
        {
            (set.num_points(), set.dimension(), true)
        }

        fn visit_shiftable<P>(self, set: P) -> Self::Output
        where
            P: ShiftablePointSet + Clone + Send + Sync,
        {
            (set.num_points(), set.dimension(), false)
        }
    }

    #[test]
    fn test_digital_kinds_are_scramblable() {
        assert_eq!(args(PointSetKind::Sobol).build().unwrap().accept(Size), (16, 3, true));
        // base 3 for dimension 3
        assert_eq!(args(PointSetKind::Faure).build().unwrap().accept(Size), (81, 3, true));
    }

    #[test]
    fn test_other_kinds_use_two_to_the_k_points() {
        assert_eq!(args(PointSetKind::Halton).build().unwrap().accept(Size), (16, 3, false));
        assert_eq!(
            args(PointSetKind::Hammersley).build().unwrap().accept(Size),
            (16, 3, false)
        );
        let mut korobov = args(PointSetKind::Korobov);
        korobov.multiplier = Some(5);
        assert_eq!(korobov.build().unwrap().accept(Size), (16, 3, false));
    }

    #[test]
    fn test_explicit_point_count_for_lcg() {
        let mut lcg = args(PointSetKind::Lcg);
        lcg.points = Some(31);
        lcg.multiplier = Some(3);
        assert_eq!(lcg.build().unwrap().accept(Size), (31, 3, false));
    }

    #[test]
    fn test_missing_or_mismatched_parameters() {
        assert!(matches!(
            args(PointSetKind::Korobov).build(),
            Err(CliError::InvalidArgument(_))
        ));
        let mut lattice = args(PointSetKind::Lattice);
        lattice.generator = vec![1, 5];
        assert!(matches!(lattice.build(), Err(CliError::InvalidArgument(_))));
        let mut missing = args(PointSetKind::Sobol);
        missing.direction_file = Some(PathBuf::from("no/such/directions.txt"));
        assert!(matches!(missing.build(), Err(CliError::FileNotFound(_))));
    }

    #[test]
    fn test_scrambles_rejected_for_lattices() {
        let mut lattice = Rank1Lattice::korobov(16, 5, 2).unwrap();
        assert!(randomise_shiftable(&mut lattice, RandomisationKind::Shift, 1).is_ok());
        assert!(matches!(
            randomise_shiftable(&mut lattice, RandomisationKind::LmsShift, 1),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_scramble_changes_sobol_points() {
        let mut sobol = SobolSequence::sobol(4, 2).unwrap();
        let before = sobol.coordinate(1, 1);
        randomise_scramblable(&mut sobol, RandomisationKind::LmsShift, 7).unwrap();
        assert_ne!(sobol.coordinate(1, 1), before);
    }
}
