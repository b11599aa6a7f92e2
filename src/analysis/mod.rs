//! Simulation result analysis engine.
//!
//! Loading, the dataset store, per-metric statistics, cross-run comparison,
//! SVG plots, reports and the processed-data export.

pub mod types;
pub mod error;
pub mod metric_kind;
pub mod loader;
pub mod store;
pub mod statistics;
pub mod comparison;
pub mod svg;
pub mod plot;
pub mod report;
pub mod export;

pub use types::*;
pub use error::{
    ComparisonError, ExportError, LoadError, ReportError, StatisticsError, StorageError, StoreError,
};
pub use metric_kind::{classify, MetricKind, Preference};
pub use loader::load;
pub use store::{DatasetStore, DuplicateLabelPolicy};
pub use statistics::{summarize, summarize_all};
pub use comparison::compare;
pub use plot::{list_gallery, render_all, render_comparison, render_performance, PlotOutcome};
pub use report::{generate, ReportContext, ReportDocument, ReportFormat};
pub use export::{export_processed_data, parse_export, write_export, ProcessedDataExport};
