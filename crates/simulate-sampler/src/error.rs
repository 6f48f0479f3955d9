//! Error taxonomy for the sampler.

use simulate_dataset::DataSourceError;
use thiserror::Error;

/// Invalid sampler configuration. Raised before any work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rate must be a positive integer, got {0}")]
    InvalidRate(u64),

    #[error("interval must be greater than zero")]
    InvalidInterval,

    #[error("duration must be greater than zero")]
    InvalidDuration,
}

/// Failure while a generation is running.
///
/// Ends the sequence; records yielded before it stand.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplingError {
    #[error("exponential draw produced a non-finite sample count: {0}")]
    NonFiniteDraw(f64),
}

/// Any error the sampler can report.
#[derive(Error, Debug)]
pub enum SamplerError {
    #[error("Invalid sampler configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Data source error: {0}")]
    DataSource(#[from] DataSourceError),

    #[error("Sampling error: {0}")]
    Sampling(#[from] SamplingError),
}
