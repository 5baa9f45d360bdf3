//! Integrate command implementation
//!
//! RQMC estimate of the integral over the unit cube of the Sobol' g-function
//! `prod_j (|4 x_j - 2| + a_j) / (1 + a_j)` with `a_j = j`, whose exact
//! value is 1.

use qmc_pointsets::randomisation::{
    EmptyRandomisation, IBinomialScrambleShift, LmScramble, LmScrambleShift,
    PointSetRandomisation, RandomShift, RightScrambleShift, StripedScrambleShift,
};
use qmc_pointsets::{PointSet, RqmcConfig, RqmcEstimate, ScramblablePointSet, ShiftablePointSet};
use tracing::info;

use super::{PointSetArgs, PointSetVisitor, RandomisationKind};
use crate::config::QmcConfig;
use crate::{CliError, Result};

/// Exact integral of [`g_function`] over the unit cube.
pub const EXACT_VALUE: f64 = 1.0;

/// Sobol' g-function with `a_j = j`.
pub fn g_function(x: &[f64]) -> f64 {
    x.iter()
        .enumerate()
        .map(|(j, &u)| {
            let a = j as f64;
            ((4.0 * u - 2.0).abs() + a) / (1.0 + a)
        })
        .product()
}

/// Run the integrate command
pub fn run(args: &PointSetArgs, randomise: RandomisationKind, config: &QmcConfig) -> Result<()> {
    info!(
        kind = ?args.kind,
        dim = args.dim,
        ?randomise,
        replications = config.replications,
        parallel = config.parallel,
        "starting RQMC integration"
    );
    let estimate = args.build()?.accept(Integrate { randomise, config })?;
    let p = config.precision;

    println!("points       {}", estimate.num_points);
    println!("replications {}", estimate.replications);
    println!("mean         {:.p$e}", estimate.mean);
    println!("variance     {:.p$e}", estimate.variance);
    println!("std error    {:.p$e}", estimate.std_error);
    println!("abs error    {:.p$e}", (estimate.mean - EXACT_VALUE).abs());
    Ok(())
}

struct Integrate<'a> {
    randomise: RandomisationKind,
    config: &'a QmcConfig,
}

impl Integrate<'_> {
    fn estimate<P, R>(&self, point_set: &P, randomisation: &R) -> Result<RqmcEstimate>
    where
        P: PointSet + Clone + Send + Sync,
        R: PointSetRandomisation<P> + Clone + Send + Sync,
    {
        let rqmc = RqmcConfig::builder()
            .replications(self.config.replications)
            .parallel(self.config.parallel)
            .build()?;
        Ok(rqmc.run(point_set, randomisation, g_function)?)
    }
}

impl PointSetVisitor for Integrate<'_> {
    type Output = Result<RqmcEstimate>;

    fn visit_scramblable<P>(self, point_set: P) -> Result<RqmcEstimate>
    where
        P: ScramblablePointSet + Clone + Send + Sync,
    {
        let seed = self.config.seed;
        match self.randomise {
            RandomisationKind::Lms => self.estimate(&point_set, &LmScramble::from_seed(seed)),
            RandomisationKind::LmsShift => {
                self.estimate(&point_set, &LmScrambleShift::from_seed(seed))
            }
            RandomisationKind::StripedShift => {
                self.estimate(&point_set, &StripedScrambleShift::from_seed(seed))
            }
            RandomisationKind::IbinomialShift => {
                self.estimate(&point_set, &IBinomialScrambleShift::from_seed(seed))
            }
            RandomisationKind::RightShift => {
                self.estimate(&point_set, &RightScrambleShift::from_seed(seed))
            }
            RandomisationKind::None | RandomisationKind::Shift => self.visit_shiftable(point_set),
        }
    }

    fn visit_shiftable<P>(self, point_set: P) -> Result<RqmcEstimate>
    where
        P: ShiftablePointSet + Clone + Send + Sync,
    {
        let seed = self.config.seed;
        match self.randomise {
            RandomisationKind::None => {
                self.estimate(&point_set, &EmptyRandomisation::from_seed(seed))
            }
            RandomisationKind::Shift => self.estimate(&point_set, &RandomShift::from_seed(seed)),
            other => Err(CliError::InvalidArgument(format!(
                "randomisation {:?} needs a digital net (sobol, faure or --matrix-file)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{PermutationArg, PointSetKind};
    use approx::assert_relative_eq;

    fn sobol_args() -> PointSetArgs {
        PointSetArgs {
            kind: PointSetKind::Sobol,
            dim: 3,
            log_points: 10,
            points: None,
            multiplier: None,
            generator: Vec::new(),
            permutation: PermutationArg::Identity,
            matrix_file: None,
            direction_file: None,
        }
    }

    #[test]
    fn test_g_function_values() {
        assert_relative_eq!(g_function(&[0.5]), 0.0);
        assert_relative_eq!(g_function(&[0.0, 0.5]), 2.0 * 0.5);
        assert_relative_eq!(g_function(&[]), 1.0);
    }

    #[test]
    fn test_scrambled_sobol_estimate_is_close() {
        let config = QmcConfig::default();
        let estimate = sobol_args()
            .build()
            .unwrap()
            .accept(Integrate {
                randomise: RandomisationKind::LmsShift,
                config: &config,
            })
            .unwrap();
        assert_eq!(estimate.replications, 16);
        assert_eq!(estimate.num_points, 1024);
        assert_relative_eq!(estimate.mean, EXACT_VALUE, epsilon = 0.01);
    }

    #[test]
    fn test_scramble_on_lattice_is_rejected() {
        let config = QmcConfig::default();
        let mut args = sobol_args();
        args.kind = PointSetKind::Korobov;
        args.multiplier = Some(5);
        let result = args.build().unwrap().accept(Integrate {
            randomise: RandomisationKind::Lms,
            config: &config,
        });
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    }
}
