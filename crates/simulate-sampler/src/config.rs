//! Sampler configuration and its validators.

use crate::error::ConfigError;
use crate::seed::Seed;
use std::time::Duration;

/// Immutable sampler configuration.
///
/// Built through [`SamplerConfig::new`], which runs every validator, so a
/// value of this type always holds a positive rate, interval and duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Expected number of events per `interval`
    rate: u64,
    /// Length of one tick
    interval: Duration,
    /// Total duration budget
    duration: Duration,
    /// Optional seed for reproducible runs
    seed: Option<Seed>,
}

impl SamplerConfig {
    pub fn new(rate: u64, interval: Duration, duration: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            rate: validate_rate(rate)?,
            interval: validate_interval(interval)?,
            duration: validate_duration(duration)?,
            seed: None,
        })
    }

    /// Seed the random generator for reproducible output.
    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    /// Like [`with_seed`](Self::with_seed), but takes an optional seed.
    pub fn with_optional_seed(mut self, seed: Option<Seed>) -> Self {
        self.seed = seed;
        self
    }

    pub fn rate(&self) -> u64 {
        self.rate
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn seed(&self) -> Option<&Seed> {
        self.seed.as_ref()
    }

    /// Mean time between events in seconds: `interval / rate`.
    pub fn lambda(&self) -> f64 {
        self.interval.as_secs_f64() / self.rate as f64
    }
}

pub fn validate_rate(rate: u64) -> Result<u64, ConfigError> {
    if rate < 1 {
        return Err(ConfigError::InvalidRate(rate));
    }
    Ok(rate)
}

pub fn validate_interval(interval: Duration) -> Result<Duration, ConfigError> {
    if interval.is_zero() {
        return Err(ConfigError::InvalidInterval);
    }
    Ok(interval)
}

pub fn validate_duration(duration: Duration) -> Result<Duration, ConfigError> {
    if duration.is_zero() {
        return Err(ConfigError::InvalidDuration);
    }
    Ok(duration)
}
