//! Matrices command implementation
//!
//! Writes the generator matrices of a digital net, optionally after a
//! matrix scramble, in the generator-matrix file format.

use std::io::Write;
use std::path::Path;

use qmc_pointsets::io::{save_generator_matrices, write_generator_matrices};
use qmc_pointsets::{ScramblablePointSet, ShiftablePointSet};
use tracing::{info, warn};

use super::{randomise_scramblable, PointSetArgs, PointSetVisitor, RandomisationKind};
use crate::{CliError, Result};

/// Run the matrices command
pub fn run(
    args: &PointSetArgs,
    randomise: RandomisationKind,
    seed: u64,
    output: Option<&Path>,
) -> Result<()> {
    if matches!(
        randomise,
        RandomisationKind::Shift
            | RandomisationKind::LmsShift
            | RandomisationKind::StripedShift
            | RandomisationKind::IbinomialShift
            | RandomisationKind::RightShift
    ) {
        warn!(?randomise, "digital shifts are not part of the generator matrices");
    }
    args.build()?.accept(Matrices {
        randomise,
        seed,
        output,
    })
}

struct Matrices<'a> {
    randomise: RandomisationKind,
    seed: u64,
    output: Option<&'a Path>,
}

impl PointSetVisitor for Matrices<'_> {
    type Output = Result<()>;

    fn visit_scramblable<P>(self, mut point_set: P) -> Result<()>
    where
        P: ScramblablePointSet + Clone + Send + Sync,
    {
        randomise_scramblable(&mut point_set, self.randomise, self.seed)?;
        let matrices = point_set.digital_net().generator_matrices();
        match self.output {
            Some(path) => {
                save_generator_matrices(path, matrices)?;
                info!(path = %path.display(), "wrote generator matrices");
            }
            None => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                write_generator_matrices(&mut out, matrices)?;
                out.flush()?;
            }
        }
        Ok(())
    }

    fn visit_shiftable<P>(self, _point_set: P) -> Result<()>
    where
        P: ShiftablePointSet + Clone + Send + Sync,
    {
        Err(CliError::InvalidArgument(
            "only digital nets (sobol, faure or --matrix-file) have generator matrices"
                .to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{PermutationArg, PointSetKind};
    use qmc_pointsets::io::load_generator_matrices;

    fn args(kind: PointSetKind) -> PointSetArgs {
        PointSetArgs {
            kind,
            dim: 2,
            log_points: 3,
            points: None,
            multiplier: None,
            generator: Vec::new(),
            permutation: PermutationArg::Identity,
            matrix_file: None,
            direction_file: None,
        }
    }

    #[test]
    fn test_saved_faure_matrices_reload() {
        let path = std::env::temp_dir().join(format!("qmc_cli_faure_{}.txt", std::process::id()));
        run(&args(PointSetKind::Faure), RandomisationKind::None, 1, Some(&path)).unwrap();
        let matrices = load_generator_matrices(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(matrices.base(), 2);
        assert_eq!(matrices.dimension(), 2);
        assert_eq!(matrices.num_cols(), 3);
    }

    #[test]
    fn test_lattice_has_no_matrices() {
        let mut lattice = args(PointSetKind::Korobov);
        lattice.multiplier = Some(3);
        assert!(matches!(
            run(&lattice, RandomisationKind::None, 1, None),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
