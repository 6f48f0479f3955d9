//! Simulate Library
//!
//! Generates a stream of synthetic events by repeatedly sampling a CSV file.
//! For each sampling `interval` the number of events is drawn from an
//! exponential distribution whose mean is `rate`; events are drawn without
//! replacement from the file's rows and written as JSON lines or CSV for the
//! whole `duration`.
//!
//! # Crates
//!
//! - `simulate_dataset` - loads the CSV file into records keyed by header
//! - `simulate_sampler` - the rate-controlled sampler itself
//!
//! # CLI Usage
//!
//! ```bash
//! # 200 events per second on average for 30 seconds
//! simulate --csv population.csv --rate 200 --interval 00:00:01 --duration 00:00:30
//!
//! # Reproducible run written as CSV
//! simulate --csv population.csv --rate 5 --interval 1s --duration 1m --seed 42 \
//!   --format csv --output sample.csv
//!
//! # Options from a YAML file, with a flag overriding it
//! simulate --config simulate.yaml --rate 50
//! ```

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

pub mod config;
pub mod output;
pub mod run;

pub use config::{resolve, Settings};
pub use output::{open_sink, CsvSink, JsonlSink, RecordSink};
pub use run::{dry_run, run_simulation, DryRunSummary, RunMetrics};

#[derive(Parser, Clone, Debug)]
#[command(name = "simulate")]
#[command(about = "Generate events drawn from a CSV file using repeated random sampling")]
#[command(long_about = None)]
pub struct SimulateOpts {
    /// CSV file from which repeated random samples will be drawn
    #[arg(long = "csv", value_name = "PATH", env = "SIMULATE_CSV")]
    pub csv_file: Option<PathBuf>,

    /// Average event count during each sampling interval
    #[arg(long, env = "SIMULATE_RATE")]
    pub rate: Option<u64>,

    /// Sampling interval ([[HH:]MM:]SS, seconds, or a ms/s/m/h/d suffix)
    #[arg(long, env = "SIMULATE_INTERVAL")]
    pub interval: Option<String>,

    /// Duration of the simulation (same syntax as --interval)
    #[arg(long, env = "SIMULATE_DURATION")]
    pub duration: Option<String>,

    /// Value for initializing the random number generator
    #[arg(long, env = "SIMULATE_SEED")]
    pub seed: Option<String>,

    /// Output encoding for the generated events
    #[arg(long, value_enum, env = "SIMULATE_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write events to this file instead of stdout
    #[arg(long, short = 'o', value_name = "PATH", env = "SIMULATE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// YAML file providing defaults for the options above
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Validate options and load the CSV file without generating events
    #[arg(long)]
    pub dry_run: bool,
}

/// Encoding used when writing events.
#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line, fields in header order
    #[default]
    Jsonl,
    /// Header row followed by one row per event
    Csv,
}
