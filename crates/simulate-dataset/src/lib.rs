//! In-memory CSV datasets for the simulate event sampler.
//!
//! A [`Dataset`] is an ordered, immutable list of [`Record`]s read once from a
//! CSV source whose first row names the fields. Every record shares the same
//! header slice, so cloning a record only copies its values.
//!
//! # Example
//!
//! ```rust
//! use simulate_dataset::Dataset;
//!
//! let csv = "word,count\nalpha,1\nbeta,2\n";
//! let dataset = Dataset::from_reader(csv.as_bytes(), "inline").unwrap();
//!
//! assert_eq!(dataset.len(), 2);
//! assert_eq!(dataset.get(1).unwrap().get("word"), Some("beta"));
//! ```

mod dataset;
mod error;
mod record;

pub use dataset::Dataset;
pub use error::DataSourceError;
pub use record::Record;
