//! Processed-data export for downstream tooling.
//!
//! The export is a JSON document holding every current summary in store
//! order. `parse_export` reads it back; floats survive the round trip
//! exactly (`serde_json` is built with `float_roundtrip`).

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::{ExportError, StorageError};
use super::types::Summaries;

/// File name of the export inside the output directory
pub const EXPORT_FILE_NAME: &str = "processed_data.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// RFC 3339 UTC timestamp
    pub exported_at: String,
    pub simulation_count: usize,
}

/// Serialized dump of all current summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDataExport {
    pub metadata: ExportMetadata,
    pub simulations: Summaries,
}

impl ProcessedDataExport {
    pub fn new(summaries: &Summaries) -> Self {
        Self {
            metadata: ExportMetadata {
                exported_at: Utc::now().to_rfc3339(),
                simulation_count: summaries.len(),
            },
            simulations: summaries.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(ExportError::Encode)
    }
}

/// Serialize every summary to the export JSON text
pub fn export_processed_data(summaries: &Summaries) -> Result<String, ExportError> {
    ProcessedDataExport::new(summaries).to_json()
}

/// Parse export text produced by [`export_processed_data`]
pub fn parse_export(text: &str) -> Result<ProcessedDataExport, ExportError> {
    serde_json::from_str(text).map_err(ExportError::Decode)
}

/// Export `summaries` to `<output_dir>/processed_data.json`
pub fn write_export(summaries: &Summaries, output_dir: &Path) -> Result<std::path::PathBuf, ExportError> {
    let json = export_processed_data(summaries)?;

    fs::create_dir_all(output_dir).map_err(|e| StorageError::new(output_dir, e))?;
    let path = output_dir.join(EXPORT_FILE_NAME);
    fs::write(&path, json).map_err(|e| StorageError::new(&path, e))?;

    log::info!("Exported {} simulation summaries to {}", summaries.len(), path.display());
    Ok(path)
}
