//! Randomised quasi-Monte Carlo replication.
//!
//! An RQMC estimate randomises a point set `m` times independently,
//! averages the integrand over all points of each randomisation, and
//! reports the mean and sample variance of the `m` averages.
//!
//! Replication `r` works on its own clone of the point set and of the
//! strategy, with the strategy's stream positioned on substream `r`. The
//! serial and parallel drivers therefore return identical estimates.

use qmc_core::error::{ConfigError, QmcError};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::pointset::{PointSet, PointSetIterator};
use crate::randomisation::PointSetRandomisation;

/// Upper bound on the number of replications.
pub const MAX_REPLICATIONS: usize = 1_000_000;

/// Result of an RQMC experiment.
#[derive(Clone, Debug, PartialEq)]
pub struct RqmcEstimate {
    /// Mean of the replication averages
    pub mean: f64,
    /// Sample variance of the replication averages
    pub variance: f64,
    /// Standard error of the mean, `sqrt(variance / m)`
    pub std_error: f64,
    /// Number of replications `m`
    pub replications: usize,
    /// Points per replication
    pub num_points: usize,
}

impl RqmcEstimate {
    fn from_averages(averages: &[f64], num_points: usize) -> Self {
        let m = averages.len() as f64;
        let mean = averages.iter().sum::<f64>() / m;
        let variance = averages.iter().map(|a| (a - mean) * (a - mean)).sum::<f64>() / (m - 1.0);
        Self {
            mean,
            variance,
            std_error: (variance / m).sqrt(),
            replications: averages.len(),
            num_points,
        }
    }
}

/// RQMC experiment settings.
///
/// # Examples
///
/// ```rust
/// use qmc_pointsets::rqmc::RqmcConfig;
///
/// let config = RqmcConfig::builder()
///     .replications(32)
///     .parallel(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.replications(), 32);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RqmcConfig {
    replications: usize,
    first_substream: u64,
    parallel: bool,
}

impl RqmcConfig {
    /// Creates a configuration builder.
    #[inline]
    pub fn builder() -> RqmcConfigBuilder {
        RqmcConfigBuilder::default()
    }

    /// Number of replications.
    #[inline]
    pub fn replications(&self) -> usize {
        self.replications
    }

    /// Substream used by the first replication.
    #[inline]
    pub fn first_substream(&self) -> u64 {
        self.first_substream
    }

    /// Whether replications run on the rayon thread pool.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` unless `2 <= replications <= MAX_REPLICATIONS`
    /// and the last substream index fits in a `u64`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_replications(self.replications)?;
        self.end_substream().map(|_| ())
    }

    /// One past the substream of the last replication.
    fn end_substream(&self) -> Result<u64, ConfigError> {
        self.first_substream
            .checked_add(self.replications as u64)
            .ok_or_else(|| ConfigError::InvalidParameter {
                name: "first_substream",
                value: format!(
                    "{} + {} replications overflows the substream index",
                    self.first_substream, self.replications
                ),
            })
    }

    /// Runs the experiment with the serial or parallel driver.
    ///
    /// # Errors
    ///
    /// As [`replicate`].
    pub fn run<P, R, F>(
        &self,
        point_set: &P,
        randomisation: &R,
        f: F,
    ) -> Result<RqmcEstimate, QmcError>
    where
        P: PointSet + Clone + Send + Sync,
        R: PointSetRandomisation<P> + Clone + Send + Sync,
        F: Fn(&[f64]) -> f64 + Sync,
    {
        check_replications(self.replications)?;
        let substreams = self.first_substream..self.end_substream()?;
        let averages = if self.parallel {
            substreams
                .into_par_iter()
                .map(|r| replication_average(point_set, randomisation, r, &f))
                .collect::<Result<Vec<f64>, QmcError>>()?
        } else {
            substreams
                .map(|r| replication_average(point_set, randomisation, r, &f))
                .collect::<Result<Vec<f64>, QmcError>>()?
        };
        let estimate = RqmcEstimate::from_averages(&averages, point_set.num_points());
        debug!(
            replications = estimate.replications,
            num_points = estimate.num_points,
            mean = estimate.mean,
            std_error = estimate.std_error,
            "RQMC estimate"
        );
        Ok(estimate)
    }
}

/// Builder for [`RqmcConfig`].
#[derive(Clone, Debug)]
pub struct RqmcConfigBuilder {
    replications: usize,
    first_substream: u64,
    parallel: bool,
}

impl Default for RqmcConfigBuilder {
    fn default() -> Self {
        Self {
            replications: 16,
            first_substream: 0,
            parallel: false,
        }
    }
}

impl RqmcConfigBuilder {
    /// Sets the number of replications (default 16).
    pub fn replications(mut self, m: usize) -> Self {
        self.replications = m;
        self
    }

    /// Sets the substream of the first replication (default 0).
    pub fn first_substream(mut self, index: u64) -> Self {
        self.first_substream = index;
        self
    }

    /// Runs replications in parallel (default off).
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the replication count is out of range.
    pub fn build(self) -> Result<RqmcConfig, ConfigError> {
        let config = RqmcConfig {
            replications: self.replications,
            first_substream: self.first_substream,
            parallel: self.parallel,
        };
        config.validate()?;
        Ok(config)
    }
}

fn check_replications(m: usize) -> Result<(), ConfigError> {
    if !(2..=MAX_REPLICATIONS).contains(&m) {
        return Err(ConfigError::InvalidParameter {
            name: "replications",
            value: format!("{} not in [2, {}]", m, MAX_REPLICATIONS),
        });
    }
    Ok(())
}

/// Average of `f` over one randomisation of `point_set`, drawn from
/// substream `substream` of the strategy's stream.
fn replication_average<P, R, F>(
    point_set: &P,
    randomisation: &R,
    substream: u64,
    f: &F,
) -> Result<f64, QmcError>
where
    P: PointSet + Clone,
    R: PointSetRandomisation<P> + Clone,
    F: Fn(&[f64]) -> f64,
{
    let mut set = point_set.clone();
    let mut strategy = randomisation.clone();
    strategy.stream_mut().reset_to_substream(substream);
    strategy.randomise(&mut set)?;

    let mut it = set.iter();
    let mut point = vec![0.0; set.dimension()];
    let mut sum = 0.0;
    while it.has_next_point() {
        it.next_point(&mut point)?;
        sum += f(&point);
    }
    trace!(substream, "finished replication");
    Ok(sum / set.num_points() as f64)
}

/// Serial RQMC estimate of the mean of `f` with `m` replications.
///
/// # Errors
///
/// Returns `QmcError::Config` if `m < 2` or the randomisation fails.
pub fn replicate<P, R, F>(
    point_set: &P,
    randomisation: &R,
    m: usize,
    f: F,
) -> Result<RqmcEstimate, QmcError>
where
    P: PointSet + Clone + Send + Sync,
    R: PointSetRandomisation<P> + Clone + Send + Sync,
    F: Fn(&[f64]) -> f64 + Sync,
{
    RqmcConfig::builder()
        .replications(m)
        .build()?
        .run(point_set, randomisation, f)
}

/// Parallel RQMC estimate; same result as [`replicate`].
///
/// # Errors
///
/// As [`replicate`].
pub fn replicate_par<P, R, F>(
    point_set: &P,
    randomisation: &R,
    m: usize,
    f: F,
) -> Result<RqmcEstimate, QmcError>
where
    P: PointSet + Clone + Send + Sync,
    R: PointSetRandomisation<P> + Clone + Send + Sync,
    F: Fn(&[f64]) -> f64 + Sync,
{
    RqmcConfig::builder()
        .replications(m)
        .parallel(true)
        .build()?
        .run(point_set, randomisation, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digital::SobolSequence;
    use crate::lattice::Rank1Lattice;
    use crate::randomisation::{EmptyRandomisation, LmScrambleShift, RandomShift};
    use approx::assert_relative_eq;

    fn product(x: &[f64]) -> f64 {
        x.iter().map(|&u| 2.0 * u).product()
    }

    #[test]
    fn test_serial_and_parallel_agree() {
        let sobol = SobolSequence::sobol(8, 4).unwrap();
        let strategy = LmScrambleShift::from_seed(2024);
        let serial = replicate(&sobol, &strategy, 8, product).unwrap();
        let parallel = replicate_par(&sobol, &strategy, 8, product).unwrap();
        assert_eq!(serial, parallel);
        assert_relative_eq!(serial.mean, 1.0, epsilon = 0.05);
        assert!(serial.variance > 0.0);
        assert_eq!(serial.num_points, 256);
    }

    #[test]
    fn test_deterministic_set_has_zero_variance() {
        let lattice = Rank1Lattice::korobov(127, 38, 2).unwrap();
        let estimate = replicate(&lattice, &EmptyRandomisation::default(), 4, product).unwrap();
        assert!(estimate.variance < 1e-24);
        assert!(estimate.std_error < 1e-12);
    }

    #[test]
    fn test_shifted_lattice_is_unbiased_for_linear_integrand() {
        let lattice = Rank1Lattice::korobov(64, 19, 1).unwrap();
        let estimate = replicate(&lattice, &RandomShift::from_seed(5), 16, |x| x[0]).unwrap();
        assert_relative_eq!(estimate.mean, 0.5, epsilon = 0.02);
    }

    #[test]
    fn test_replication_bounds() {
        let lattice = Rank1Lattice::korobov(8, 3, 1).unwrap();
        assert!(replicate(&lattice, &RandomShift::from_seed(1), 1, |x| x[0]).is_err());
        assert!(RqmcConfig::builder().replications(0).build().is_err());
    }

    #[test]
    fn test_substream_range_must_fit() {
        let result = RqmcConfig::builder()
            .replications(4)
            .first_substream(u64::MAX - 2)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "first_substream", .. })
        ));
        let config = RqmcConfig::builder()
            .replications(4)
            .first_substream(u64::MAX - 4)
            .build()
            .unwrap();
        assert_eq!(config.first_substream(), u64::MAX - 4);
    }

    #[test]
    fn test_input_point_set_is_not_modified() {
        let lattice = Rank1Lattice::korobov(16, 5, 2).unwrap();
        replicate(&lattice, &RandomShift::from_seed(3), 4, |x| x[0]).unwrap();
        assert_eq!(lattice.coordinate(0, 0), 0.0);
    }
}
