//! CLI error types

use thiserror::Error;

/// Errors raised by the `qmc` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Argument combination the command cannot honour
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid `qmc.toml` or `QMC_*` setting
    #[error(transparent)]
    Settings(#[from] crate::config::ConfigError),

    /// Point-set construction or randomisation failed
    #[error(transparent)]
    Construction(#[from] qmc_core::ConfigError),

    /// Library error (iteration, file format, configuration)
    #[error(transparent)]
    Qmc(#[from] qmc_core::QmcError),

    /// Parameter file could not be read or written
    #[error(transparent)]
    Format(#[from] qmc_core::FormatError),

    /// Point enumeration ran out of range
    #[error(transparent)]
    PointSet(#[from] qmc_core::PointSetError),

    /// Writing CSV output failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing the output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for the CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
