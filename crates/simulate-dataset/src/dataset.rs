//! Loading CSV sources into an in-memory dataset.

use crate::error::DataSourceError;
use crate::record::Record;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// An ordered, immutable, non-empty list of records sharing one header row.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Arc<[String]>,
    records: Vec<Record>,
}

impl Dataset {
    /// Load a dataset from a CSV file whose first row holds the field names.
    ///
    /// The file handle is closed before this returns.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DataSourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DataSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Load a dataset from any CSV reader.
    ///
    /// `source_name` is only used in log lines and error messages.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self, DataSourceError> {
        let csv_error = |source: csv::Error| DataSourceError::Csv {
            source_name: source_name.to_string(),
            source,
        };

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Arc<[String]> = csv_reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>()
            .into();

        if headers.is_empty() {
            return Err(DataSourceError::MissingHeader {
                source_name: source_name.to_string(),
            });
        }

        debug!("CSV headers for {source_name}: {headers:?}");

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let row = result.map_err(csv_error)?;
            let values = row.iter().map(|v| v.to_string()).collect();
            records.push(Record::new(headers.clone(), values));
        }

        if records.is_empty() {
            return Err(DataSourceError::Empty {
                source_name: source_name.to_string(),
            });
        }

        info!(
            "Loaded {} records with {} fields from {source_name}",
            records.len(),
            headers.len()
        );

        Ok(Self { headers, records })
    }

    /// Build a dataset from in-memory rows.
    pub fn from_rows(
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, DataSourceError> {
        let source_name = "in-memory rows".to_string();
        if headers.is_empty() {
            return Err(DataSourceError::MissingHeader { source_name });
        }
        if rows.is_empty() {
            return Err(DataSourceError::Empty { source_name });
        }

        let headers: Arc<[String]> = headers.into();
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, values)| {
                if values.len() != headers.len() {
                    return Err(DataSourceError::ColumnCountMismatch {
                        row: i + 1,
                        expected: headers.len(),
                        found: values.len(),
                    });
                }
                Ok(Record::new(headers.clone(), values))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of records. Never zero.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; a dataset cannot be built without records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}
