//! Typed failures returned by the analysis engine.
//!
//! Every engine operation returns one of these instead of panicking or
//! defaulting to zero/empty values. Batch drivers collect them per item.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Failure to turn a single result document into a [`SimulationRecord`].
///
/// [`SimulationRecord`]: super::types::SimulationRecord
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed document {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("Document {path} has no '{section}' section")]
    MissingSection { path: PathBuf, section: &'static str },

    #[error("Metric '{metric}' in {path} has no samples")]
    EmptyMetric { path: PathBuf, metric: String },
}

impl LoadError {
    /// Short, stable name of the failure kind (used in batch listings).
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Unreadable { .. } => "unreadable",
            LoadError::Malformed { .. } => "malformed",
            LoadError::MissingSection { .. } => "missing-section",
            LoadError::EmptyMetric { .. } => "empty-metric",
        }
    }
}

/// Dataset Store mutation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Label '{label}' is already present in the dataset store")]
    DuplicateLabel { label: String },

    #[error("Source {source_path} has already been loaded as '{label}'")]
    SourceAlreadyLoaded { source_path: PathBuf, label: String },
}

/// Per-metric statistics failures
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum StatisticsError {
    #[error("metric has no samples")]
    Empty,

    #[error("sample {index} is not finite ({value})")]
    NonFinite { index: usize, value: String },

    #[error("accumulated statistics overflowed the f64 range")]
    Overflow,
}

/// Cross-run comparison failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComparisonError {
    #[error("Comparison requires at least 2 simulations, got {available}")]
    InsufficientData { available: usize },
}

/// Report generation failures
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Unsupported report format '{0}' (expected html, markdown or plain-text)")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure to write an artifact, report or export to durable storage
#[derive(Debug, thiserror::Error)]
#[error("Failed to write {path}: {source}")]
pub struct StorageError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl StorageError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Export serialization failures
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to encode processed data: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode processed data: {0}")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
