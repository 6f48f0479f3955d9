//! Command-line interface for simulate
//!
//! # Usage Examples
//!
//! ```bash
//! # Draw events from tweets.csv at 200 events/second on average for 30 seconds
//! simulate --csv tweets.csv --rate 200 --interval 00:00:01 --duration 00:00:30
//!
//! # Reproducible sample, written as CSV to a file
//! simulate --csv tweets.csv --rate 5 --interval 1s --duration 1m --seed 42 \
//!   --format csv --output sample.csv
//!
//! # Check the options and the CSV file without generating anything
//! RUST_LOG=info simulate --config simulate.yaml --dry-run
//! ```
//!
//! Events go to stdout (or `--output`); logs go to stderr and are controlled
//! with `RUST_LOG`.

use clap::Parser;
use simulate::{dry_run, open_sink, resolve, run_simulation, SimulateOpts};
use tracing::{debug, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for events
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = SimulateOpts::parse();
    debug!("simulate: {opts:?}");

    let settings = resolve(&opts)?;

    if settings.dry_run {
        dry_run(&settings)?;
        return Ok(());
    }

    let mut sink = open_sink(settings.format, settings.output.as_deref())?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install CTRL+C signal handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    run_simulation(&settings, sink.as_mut(), shutdown).await?;
    Ok(())
}
