//! Running a simulation end to end: sampler stream into a sink.

use crate::config::Settings;
use crate::output::RecordSink;
use anyhow::Context;
use futures::StreamExt;
use simulate_sampler::{Dataset, RateControlledSampler};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Metrics from a simulation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunMetrics {
    /// Number of events written to the sink.
    pub records_written: u64,
    /// Number of completed sampling intervals.
    pub ticks: u64,
    /// Ticks whose draw was clamped to the dataset size.
    pub clamped_ticks: u64,
    /// Total wall-clock time.
    pub total_duration: Duration,
    /// Whether the run was stopped before its duration ran out.
    pub interrupted: bool,
}

impl RunMetrics {
    /// Calculate events per second.
    pub fn records_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.records_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// What a `--dry-run` found.
#[derive(Debug, Clone, PartialEq)]
pub struct DryRunSummary {
    pub records: usize,
    pub headers: Vec<String>,
    pub lambda: f64,
    /// Ticks a full run performs when every tick fits in its interval.
    pub expected_ticks: u64,
}

/// Validate the dataset and configuration without generating anything.
pub fn dry_run(settings: &Settings) -> anyhow::Result<DryRunSummary> {
    let dataset = Dataset::from_path(&settings.csv_file)
        .with_context(|| format!("Failed to load '{}'", settings.csv_file.display()))?;

    let interval = settings.sampler.interval().as_nanos();
    let duration = settings.sampler.duration().as_nanos();
    let expected_ticks = duration.div_ceil(interval) as u64;

    let summary = DryRunSummary {
        records: dataset.len(),
        headers: dataset.headers().to_vec(),
        lambda: settings.sampler.lambda(),
        expected_ticks,
    };

    info!(
        "Dry run: {} records with fields {:?}; rate={} interval={:?} duration={:?} lambda={} expected ticks={}",
        summary.records,
        summary.headers,
        settings.sampler.rate(),
        settings.sampler.interval(),
        settings.sampler.duration(),
        summary.lambda,
        summary.expected_ticks
    );

    Ok(summary)
}

/// Generate events for the configured duration and write them to `sink`.
///
/// The run stops early when `shutdown` completes; events already written
/// stay written and the sink is flushed either way. A sampling failure ends
/// the run with an error after flushing.
pub async fn run_simulation<F>(
    settings: &Settings,
    sink: &mut dyn RecordSink,
    shutdown: F,
) -> anyhow::Result<RunMetrics>
where
    F: Future<Output = ()>,
{
    let dataset = Dataset::from_path(&settings.csv_file)
        .with_context(|| format!("Failed to load '{}'", settings.csv_file.display()))?;
    let mut sampler = RateControlledSampler::new(Arc::new(dataset), settings.sampler.clone());

    info!(
        "Simulating {} events per {:?} for {:?} from {}",
        settings.sampler.rate(),
        settings.sampler.interval(),
        settings.sampler.duration(),
        settings.csv_file.display()
    );

    let start_time = Instant::now();
    let mut metrics = RunMetrics::default();

    let outcome = {
        let events = sampler.stream();
        tokio::pin!(events);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Received interrupt signal, stopping simulation");
                    metrics.interrupted = true;
                    break Ok(());
                }
                next = events.next() => match next {
                    Some(Ok(record)) => {
                        if let Err(e) = sink.write_record(&record) {
                            break Err(e);
                        }
                        metrics.records_written += 1;
                    }
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("Simulation failed")),
                    None => break Ok(()),
                }
            }
        }
    };

    sink.finish()?;

    let stats = sampler.stats();
    metrics.ticks = stats.ticks;
    metrics.clamped_ticks = stats.clamped_ticks;
    metrics.total_duration = start_time.elapsed();
    debug!("Sampler stats: {stats:?}");

    info!(
        "Simulation {}: {} events over {} intervals in {:?} ({:.2} events/sec, interrupted={})",
        if outcome.is_ok() { "complete" } else { "failed" },
        metrics.records_written,
        metrics.ticks,
        metrics.total_duration,
        metrics.records_per_second(),
        metrics.interrupted
    );

    outcome?;
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::JsonlSink;
    use crate::OutputFormat;
    use simulate_sampler::SamplerConfig;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn settings(
        file: &NamedTempFile,
        rate: u64,
        interval: Duration,
        duration: Duration,
    ) -> Settings {
        Settings {
            csv_file: file.path().to_path_buf(),
            sampler: SamplerConfig::new(rate, interval, duration)
                .unwrap()
                .with_seed(42u64),
            format: OutputFormat::Jsonl,
            output: None,
            dry_run: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_writes_every_event() {
        let file = write_csv("letter\nA\nB\nC\nD\nE\n");
        let settings = settings(&file, 3, Duration::from_secs(1), Duration::from_secs(10));
        let mut sink = JsonlSink::new(Vec::new());

        let metrics = run_simulation(&settings, &mut sink, std::future::pending())
            .await
            .unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output.lines().count() as u64, metrics.records_written);
        assert!(output.lines().all(|l| l.starts_with("{\"letter\":")));
        assert_eq!(metrics.ticks, 10);
        assert!(!metrics.interrupted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_seed_same_output() {
        let file = write_csv("letter\nA\nB\nC\nD\nE\n");
        let settings = settings(&file, 2, Duration::from_millis(500), Duration::from_secs(5));

        let mut first = JsonlSink::new(Vec::new());
        let mut second = JsonlSink::new(Vec::new());
        run_simulation(&settings, &mut first, std::future::pending())
            .await
            .unwrap();
        run_simulation(&settings, &mut second, std::future::pending())
            .await
            .unwrap();

        assert_eq!(first.into_inner(), second.into_inner());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_early() {
        let file = write_csv("letter\nA\nB\nC\nD\nE\n");
        let settings = settings(&file, 3, Duration::from_secs(1), Duration::from_secs(3600));
        let mut sink = JsonlSink::new(Vec::new());

        let shutdown = tokio::time::sleep(Duration::from_secs(5));
        let metrics = run_simulation(&settings, &mut sink, shutdown).await.unwrap();

        assert!(metrics.interrupted);
        assert!(metrics.ticks < 3600);
    }

    #[tokio::test]
    async fn test_missing_csv_fails_before_writing() {
        let settings = Settings {
            csv_file: "/no/such/file.csv".into(),
            sampler: SamplerConfig::new(1, Duration::from_secs(1), Duration::from_secs(1)).unwrap(),
            format: OutputFormat::Jsonl,
            output: None,
            dry_run: false,
        };
        let mut sink = JsonlSink::new(Vec::new());

        let result = run_simulation(&settings, &mut sink, std::future::pending()).await;

        assert!(result.is_err());
        assert!(sink.into_inner().is_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct RejectingSink;

    impl RecordSink for RejectingSink {
        fn write_record(&mut self, _record: &simulate_sampler::Record) -> anyhow::Result<()> {
            anyhow::bail!("sink rejected event")
        }

        fn finish(&mut self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_run_still_logs_summary() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let file = write_csv("letter\nA\nB\nC\nD\nE\n");
        let settings = settings(&file, 3, Duration::from_secs(1), Duration::from_secs(10));

        let err = run_simulation(&settings, &mut RejectingSink, std::future::pending())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("sink rejected event"));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Simulation failed"), "{output}");
        assert!(output.contains("interrupted=false"), "{output}");
    }

    #[test]
    fn test_dry_run_summary() {
        let file = write_csv("id,text\n1,a\n2,b\n3,c\n");
        let settings = settings(&file, 4, Duration::from_secs(2), Duration::from_secs(7));

        let summary = dry_run(&settings).unwrap();

        assert_eq!(summary.records, 3);
        assert_eq!(summary.headers, vec!["id".to_string(), "text".to_string()]);
        assert!((summary.lambda - 0.5).abs() < f64::EPSILON);
        assert_eq!(summary.expected_ticks, 4);
    }

    #[test]
    fn test_records_per_second() {
        let metrics = RunMetrics {
            records_written: 50,
            total_duration: Duration::from_secs(10),
            ..Default::default()
        };
        assert!((metrics.records_per_second() - 5.0).abs() < f64::EPSILON);
        assert_eq!(RunMetrics::default().records_per_second(), 0.0);
    }
}
