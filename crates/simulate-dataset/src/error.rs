//! Error types for dataset loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a dataset.
///
/// All of them are fatal: a sampler is never built on top of a dataset that
/// failed to load.
#[derive(Error, Debug)]
pub enum DataSourceError {
    /// The source file could not be opened.
    #[error("Failed to open CSV file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input (malformed quoting, ragged rows, ...).
    #[error("Failed to read CSV from {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// The source has no header row.
    #[error("CSV source {source_name} has no header row")]
    MissingHeader { source_name: String },

    /// The source has a header row but no records.
    #[error("CSV source {source_name} contains no records")]
    Empty { source_name: String },

    /// An in-memory row does not match the header width.
    #[error("Column count mismatch in row {row}: expected {expected} columns, but found {found}")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
}
