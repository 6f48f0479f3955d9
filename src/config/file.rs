//! YAML configuration file for `simulate`.

use crate::OutputFormat;
use anyhow::Context;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Options read from a `--config` file.
///
/// Keys mirror the command-line flags; anything given on the command line or
/// through the environment wins over the file.
///
/// ```yaml
/// csv: data/tweets.csv
/// rate: 200
/// interval: "00:00:01"
/// duration: 30s
/// seed: 42
/// format: jsonl
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub csv: Option<PathBuf>,
    pub rate: Option<u64>,
    pub interval: Option<Scalar>,
    pub duration: Option<Scalar>,
    /// Kept as written, so `seed: 1.0` seeds like `--seed 1.0`.
    pub seed: Option<String>,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
}

/// A YAML scalar that may be written bare (`interval: 1`) or quoted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(u64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl ConfigFile {
    /// Load a configuration file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        // An empty document is a valid, empty configuration
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}
