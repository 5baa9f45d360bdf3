//! CLI configuration management
//!
//! Settings are read from a TOML file (`qmc.toml` by default), then
//! overridden by `QMC_*` environment variables, then by command-line
//! arguments.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use qmc_pointsets::rqmc::MAX_REPLICATIONS;
use serde::Deserialize;
use thiserror::Error;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "qmc.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: csv, table")]
    InvalidFormat(String),

    #[error("Invalid replication count: {0}. Must be between 2 and 1000000")]
    InvalidReplications(usize),

    #[error("Invalid precision: {0}. Must be between 1 and 17")]
    InvalidPrecision(usize),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Log levels accepted by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Layout of printed points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated coordinates, one point per line
    #[default]
    Csv,
    /// Aligned columns with a point-index column
    Table,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "table" => Ok(OutputFormat::Table),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// Settings shared by all `qmc` commands
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QmcConfig {
    /// Seed of the randomisation stream
    pub seed: u64,
    /// Number of RQMC replications
    pub replications: usize,
    /// Output layout of `qmc generate`
    pub format: OutputFormat,
    /// Log level
    pub log_level: LogLevel,
    /// Significant digits printed after the decimal point
    pub precision: usize,
    /// Run RQMC replications on the rayon pool
    pub parallel: bool,
}

impl Default for QmcConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            replications: 16,
            format: OutputFormat::Csv,
            log_level: LogLevel::Warn,
            precision: 10,
            parallel: false,
        }
    }
}

impl QmcConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: QmcConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides settings from `QMC_*` environment variables
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Overrides settings from a variable lookup
    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(seed) = var("QMC_SEED") {
            self.seed = parse_var("QMC_SEED", &seed)?;
        }
        if let Some(m) = var("QMC_REPLICATIONS") {
            self.replications = parse_var("QMC_REPLICATIONS", &m)?;
        }
        if let Some(format) = var("QMC_FORMAT") {
            self.format = OutputFormat::from_str(&format)?;
        }
        if let Some(level) = var("QMC_LOG_LEVEL") {
            self.log_level = LogLevel::from_str(&level)?;
        }
        if let Some(precision) = var("QMC_PRECISION") {
            self.precision = parse_var("QMC_PRECISION", &precision)?;
        }
        if let Some(parallel) = var("QMC_PARALLEL") {
            self.parallel = parallel.to_lowercase() == "true";
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_REPLICATIONS).contains(&self.replications) {
            return Err(ConfigError::InvalidReplications(self.replications));
        }
        if !(1..=17).contains(&self.precision) {
            return Err(ConfigError::InvalidPrecision(self.precision));
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliOverrides) {
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(m) = cli.replications {
            self.replications = m;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        if let Some(precision) = cli.precision {
            self.precision = precision;
        }
        if cli.parallel {
            self.parallel = true;
        }
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{}={} is not a valid number", name, value)))
}

/// Settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Config file path
    pub config_file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub replications: Option<usize>,
    pub format: Option<OutputFormat>,
    pub log_level: Option<LogLevel>,
    pub precision: Option<usize>,
    pub parallel: bool,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file (`--config`, or `qmc.toml` if present)
/// 4. Default values
pub fn build_config(cli: &CliOverrides) -> Result<QmcConfig, ConfigError> {
    let mut config = match &cli.config_file {
        Some(path) => QmcConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            QmcConfig::from_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => QmcConfig::default(),
    };

    config.apply_env()?;
    config.merge_with_cli(cli);
    config.validate()?;

    Ok(config)
}
