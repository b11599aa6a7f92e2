use serde::{Deserialize, Serialize};

use crate::analysis::report::ReportFormat;
use crate::analysis::store::DuplicateLabelPolicy;

/// Analyzer configuration, loaded from an optional YAML file.
/// Every section and field has a default.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub general: GeneralConfig,
    pub loading: LoadingConfig,
    pub analysis: AnalysisSettings,
}

impl AnalyzerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.general.output_dir.trim().is_empty() {
            return Err(ValidationError::InvalidGeneral(
                "output_dir cannot be empty".to_string(),
            ));
        }

        if self.loading.extensions.is_empty() {
            return Err(ValidationError::InvalidLoading(
                "at least one input extension is required".to_string(),
            ));
        }
        if let Some(ext) = self.loading.extensions.iter().find(|e| e.trim().is_empty()) {
            return Err(ValidationError::InvalidLoading(format!(
                "invalid input extension '{}'",
                ext
            )));
        }

        if self.analysis.report_format.parse::<ReportFormat>().is_err() {
            return Err(ValidationError::InvalidAnalysis(format!(
                "unsupported report_format '{}' (expected html, markdown or plain-text)",
                self.analysis.report_format
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory receiving plots, reports and exports
    pub output_dir: String,
    pub log_level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoadingConfig {
    pub duplicate_labels: DuplicateLabelPolicy,
    /// Extensions picked up when an input is a directory (without dot)
    pub extensions: Vec<String>,
}

/// Which stages `analyze` runs and how the report looks
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    pub generate_plots: bool,
    pub generate_comparison: bool,
    pub generate_report: bool,
    pub export_data: bool,
    pub report_format: String,
    pub include_plot_refs: bool,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid loading configuration: {0}")]
    InvalidLoading(String),
    #[error("Invalid analysis configuration: {0}")]
    InvalidAnalysis(String),
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: "manet_analysis_output".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            duplicate_labels: DuplicateLabelPolicy::Suffix,
            extensions: vec!["json".to_string(), "yaml".to_string(), "yml".to_string()],
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            generate_plots: true,
            generate_comparison: true,
            generate_report: true,
            export_data: true,
            report_format: "html".to_string(),
            include_plot_refs: true,
        }
    }
}
