//! Sinks that generated events are written to.

use crate::OutputFormat;
use anyhow::Context;
use simulate_dataset::Record;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Default buffer size for event output.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Destination for generated events.
///
/// Each record is flushed as soon as it is written so downstream consumers see
/// events at the pace they are generated.
pub trait RecordSink {
    fn write_record(&mut self, record: &Record) -> anyhow::Result<()>;

    /// Flush anything still buffered.
    fn finish(&mut self) -> anyhow::Result<()>;
}

/// Writes one JSON object per line.
pub struct JsonlSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonlSink<W> {
    fn write_record(&mut self, record: &Record) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, record).context("Failed to encode event")?;
        self.writer.write_all(b"\n")?;
        self.writer.flush().context("Failed to flush event output")
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.writer.flush().context("Failed to flush event output")
    }
}

/// Writes a header row before the first event, then one row per event.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    wrote_header: bool,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            wrote_header: false,
        }
    }

    pub fn into_inner(self) -> anyhow::Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_record(&mut self, record: &Record) -> anyhow::Result<()> {
        if !self.wrote_header {
            self.writer
                .write_record(record.headers())
                .context("Failed to write CSV header")?;
            self.wrote_header = true;
        }
        self.writer
            .write_record(record.values())
            .context("Failed to write CSV event")?;
        self.writer.flush().context("Failed to flush event output")
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.writer.flush().context("Failed to flush event output")
    }
}

/// Open the sink for `format`, writing to `output` or to stdout.
pub fn open_sink(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn RecordSink>> {
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            info!("Writing {format:?} events to {}", path.display());
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
            Box::new(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file))
        }
        None => Box::new(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, std::io::stdout())),
    };

    Ok(match format {
        OutputFormat::Jsonl => Box::new(JsonlSink::new(writer)),
        OutputFormat::Csv => Box::new(CsvSink::new(writer)),
    })
}
