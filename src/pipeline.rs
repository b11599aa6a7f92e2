//! Batch loading and the full analysis run.
//!
//! The caller hands over source paths; each is loaded on its own and the
//! results are folded into a [`BatchOutcome`]. [`run_analysis`] then drives
//! the enabled stages over the populated store. A failing item or stage is
//! recorded and logged, and processing continues with the next one.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};

use crate::analysis::error::{ExportError, LoadError, ReportError, StoreError};
use crate::analysis::plot::{self, PlotOutcome};
use crate::analysis::report::{self, ReportContext};
use crate::analysis::{compare, export, loader, summarize_all, ComparisonResult, DatasetStore, Summaries};
use crate::config::AnalysisSettings;
use crate::utils::files::list_files_with_extensions;

/// Expand inputs into source files.
///
/// Files are kept as given, directories are replaced by their files with a
/// matching extension (sorted by name). Repeated paths keep their first
/// position.
pub fn collect_sources(inputs: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for input in inputs {
        let expanded = if input.is_dir() {
            let files = list_files_with_extensions(input, extensions)
                .wrap_err_with(|| format!("Failed to list result files in {:?}", input))?;
            if files.is_empty() {
                warn!("No result documents ({}) found in {:?}", extensions.join(", "), input);
            }
            files
        } else {
            vec![input.clone()]
        };

        for path in expanded {
            if seen.insert(path.clone()) {
                sources.push(path);
            }
        }
    }

    Ok(sources)
}

/// Why a source did not make it into the store
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct LoadedSource {
    pub source: PathBuf,
    pub label: String,
}

#[derive(Debug)]
pub struct FailedSource {
    pub source: PathBuf,
    pub error: SourceError,
}

/// Successes and failures of one batch load, each in input order
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub loaded: Vec<LoadedSource>,
    pub failed: Vec<FailedSource>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

fn load_one(store: &mut DatasetStore, source: &Path) -> Result<String, SourceError> {
    let record = loader::load(source)?;
    Ok(store.ingest(record)?)
}

/// Load every source into `store`; one failure never stops the batch
pub fn load_batch(store: &mut DatasetStore, sources: &[PathBuf]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for source in sources {
        match load_one(store, source) {
            Ok(label) => {
                info!("Loaded {:?} as '{}'", source, label);
                outcome.loaded.push(LoadedSource {
                    source: source.clone(),
                    label,
                });
            }
            Err(error) => {
                warn!("Failed to load {:?}: {}", source, error);
                outcome.failed.push(FailedSource {
                    source: source.clone(),
                    error,
                });
            }
        }
    }

    info!(
        "Batch load finished: {} loaded, {} failed, {} in store",
        outcome.loaded.len(),
        outcome.failed.len(),
        store.count()
    );
    outcome
}

/// A stage of [`run_analysis`] that did not complete
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("Report generation failed: {0}")]
    Report(#[from] ReportError),
    #[error("Data export failed: {0}")]
    Export(#[from] ExportError),
}

/// Everything one analysis run produced
#[derive(Debug, Default)]
pub struct AnalysisOutcome {
    pub summaries: Summaries,
    pub comparison: Option<ComparisonResult>,
    pub plots: PlotOutcome,
    pub report: Option<PathBuf>,
    pub export: Option<PathBuf>,
    /// Stages that were enabled but had nothing to do, with the reason
    pub skipped: Vec<String>,
    pub errors: Vec<StageError>,
}

impl AnalysisOutcome {
    /// No stage error and no failed plot write
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.plots.failures.is_empty()
    }
}

/// Run statistics and then every enabled stage over `store`
pub fn run_analysis(store: &DatasetStore, settings: &AnalysisSettings, output_dir: &Path) -> AnalysisOutcome {
    let mut outcome = AnalysisOutcome {
        summaries: summarize_all(store),
        ..AnalysisOutcome::default()
    };

    if settings.generate_comparison {
        match compare(outcome.summaries.values()) {
            Ok(result) => outcome.comparison = Some(result),
            Err(e) => {
                info!("Skipping comparison: {}", e);
                outcome.skipped.push(format!("comparison: {}", e));
            }
        }
    }

    if settings.generate_plots {
        outcome.plots = plot::render_all(store, outcome.comparison.as_ref(), output_dir);
    }

    if settings.generate_report {
        let context = ReportContext {
            artifacts: &outcome.plots.artifacts,
            comparison: outcome.comparison.as_ref(),
        };
        let written = report::generate(
            &outcome.summaries,
            &settings.report_format,
            settings.include_plot_refs,
            context,
        )
        .and_then(|document| document.write_to(output_dir).map_err(ReportError::from));

        match written {
            Ok(path) => outcome.report = Some(path),
            Err(e) => {
                warn!("Report generation failed: {}", e);
                outcome.errors.push(e.into());
            }
        }
    }

    if settings.export_data {
        match export::write_export(&outcome.summaries, output_dir) {
            Ok(path) => outcome.export = Some(path),
            Err(e) => {
                warn!("Data export failed: {}", e);
                outcome.errors.push(e.into());
            }
        }
    }

    info!(
        "Analysis finished: {} summaries, {} plots, {} stage error(s)",
        outcome.summaries.len(),
        outcome.plots.artifacts.len(),
        outcome.errors.len()
    );
    outcome
}
