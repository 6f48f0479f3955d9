//! Option resolution: command line and environment over the config file.

mod duration;
mod file;

pub use duration::parse_duration;
pub use file::{ConfigFile, Scalar};

use crate::{OutputFormat, SimulateOpts};
use anyhow::Context;
use simulate_sampler::{SamplerConfig, Seed};
use std::path::PathBuf;

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// CSV file to sample from
    pub csv_file: PathBuf,
    /// Validated sampler configuration
    pub sampler: SamplerConfig,
    /// Record encoding
    pub format: OutputFormat,
    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
    /// Validate and load without generating
    pub dry_run: bool,
}

/// Merge command-line options with the optional config file and validate them.
pub fn resolve(opts: &SimulateOpts) -> anyhow::Result<Settings> {
    let file = match &opts.config {
        Some(path) => ConfigFile::from_file(path)?,
        None => ConfigFile::default(),
    };

    let csv_file = opts
        .csv_file
        .clone()
        .or(file.csv)
        .context("Missing required option: --csv")?;

    let rate = opts
        .rate
        .or(file.rate)
        .context("Missing required option: --rate")?;

    let interval = opts
        .interval
        .clone()
        .or_else(|| file.interval.map(|s| s.to_string()))
        .context("Missing required option: --interval")?;
    let interval =
        parse_duration(&interval).with_context(|| format!("Invalid --interval: {interval}"))?;

    let duration = opts
        .duration
        .clone()
        .or_else(|| file.duration.map(|s| s.to_string()))
        .context("Missing required option: --duration")?;
    let duration =
        parse_duration(&duration).with_context(|| format!("Invalid --duration: {duration}"))?;

    let seed = opts
        .seed
        .clone()
        .or(file.seed)
        .map(|s| Seed::parse(&s));

    let sampler = SamplerConfig::new(rate, interval, duration)
        .context("Invalid simulation options")?
        .with_optional_seed(seed);

    Ok(Settings {
        csv_file,
        sampler,
        format: opts.format.or(file.format).unwrap_or_default(),
        output: opts.output.clone().or(file.output),
        dry_run: opts.dry_run,
    })
}
