//! qmc - command-line front end for quasi-Monte Carlo point sets
//!
//! # Commands
//!
//! - `qmc generate --kind sobol --dim 4 --log-points 10` - Print the points of a point set
//! - `qmc integrate --kind faure --randomise lms-shift` - RQMC estimate of a test integral
//! - `qmc matrices --kind sobol --output net.txt` - Write generator matrices
//!
//! # Configuration
//!
//! Settings come from `qmc.toml` (or `--config`), then `QMC_*` environment
//! variables, then command-line arguments.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::{PointSetArgs, RandomisationKind};
use config::{build_config, CliOverrides, LogLevel, OutputFormat};

/// Quasi-Monte Carlo point sets and randomisations
#[derive(Parser)]
#[command(name = "qmc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug log level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE", env = "QMC_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Seed of the randomisation stream
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Digits printed after the decimal point
    #[arg(short, long, global = true)]
    precision: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the points of a (randomised) point set
    Generate {
        #[command(flatten)]
        point_set: PointSetArgs,

        /// Randomisation applied before printing
        #[arg(short, long, value_enum, default_value = "none")]
        randomise: RandomisationKind,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Print at most this many points
        #[arg(long)]
        max_points: Option<usize>,
    },

    /// Estimate the integral of a product test function by RQMC
    Integrate {
        #[command(flatten)]
        point_set: PointSetArgs,

        /// Randomisation applied in each replication
        #[arg(short, long, value_enum, default_value = "shift")]
        randomise: RandomisationKind,

        /// Number of independent replications
        #[arg(short = 'm', long)]
        replications: Option<usize>,

        /// Run replications in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Write the generator matrices of a digital net
    Matrices {
        #[command(flatten)]
        point_set: PointSetArgs,

        /// Matrix scramble applied before writing
        #[arg(short, long, value_enum, default_value = "none")]
        randomise: RandomisationKind,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            config_file: self.config.clone(),
            seed: self.seed,
            log_level: if self.verbose {
                Some(LogLevel::Debug)
            } else {
                self.log_level
            },
            precision: self.precision,
            ..Default::default()
        };
        match &self.command {
            Commands::Generate { format, .. } => overrides.format = *format,
            Commands::Integrate {
                replications,
                parallel,
                ..
            } => {
                overrides.replications = *replications;
                overrides.parallel = *parallel;
            }
            Commands::Matrices { .. } => {}
        }
        overrides
    }
}

fn init_tracing(log_level: &str) {
    // Points go to stdout, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli.overrides()).context("failed to load configuration")?;

    init_tracing(config.log_level.as_filter_str());
    info!(
        seed = config.seed,
        replications = config.replications,
        format = ?config.format,
        precision = config.precision,
        parallel = config.parallel,
        "configuration loaded"
    );

    match &cli.command {
        Commands::Generate {
            point_set,
            randomise,
            max_points,
            ..
        } => commands::generate::run(point_set, *randomise, *max_points, &config)
            .context("generate failed")?,
        Commands::Integrate {
            point_set,
            randomise,
            ..
        } => commands::integrate::run(point_set, *randomise, &config)
            .context("integrate failed")?,
        Commands::Matrices {
            point_set,
            randomise,
            output,
        } => commands::matrices::run(point_set, *randomise, config.seed, output.as_deref())
            .context("matrices failed")?,
    }
    Ok(())
}
