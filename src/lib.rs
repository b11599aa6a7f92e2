//! # MANET Analyzer - Result analysis for MANET security simulations
//!
//! This library aggregates, compares, plots and reports the output of mobile
//! ad-hoc network (MANET) security simulations.
//!
//! ## Overview
//!
//! Each simulation run produces one result document: a configuration object
//! (node count, mobility model, attack type, ...) and a metrics object mapping
//! metric names (throughput, end-to-end delay, trust score, ...) to sample
//! sequences. The analyzer loads many such documents into a dataset store,
//! computes per-metric statistics, compares runs against a baseline, renders
//! SVG plots and writes HTML, Markdown or plain-text reports.
//!
//! ## Key Features
//!
//! - **Typed Loading**: JSON and YAML result documents with per-file typed failures
//! - **Metric Vocabulary**: Known metrics are normalised and tagged with a kind at load time
//! - **Statistics**: Count, mean, population std, min and max per metric
//! - **Comparison**: Baseline-relative differences and rankings across runs
//! - **Plots**: Time-series, histogram and comparison charts as SVG
//! - **Reports & Export**: Deterministic reports plus a JSON dump of all summaries
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `analysis::loader`: Result document parsing into `SimulationRecord`s
//! - `analysis::store`: The dataset store and its duplicate-label policy
//! - `analysis::statistics`: Per-metric statistics and simulation summaries
//! - `analysis::comparison`: Cross-run comparison against the first summary
//! - `analysis::plot`: SVG plot generation and the plot gallery
//! - `analysis::report`: Report documents and console overviews
//! - `analysis::export`: Processed-data export and re-parse
//! - `config` / `config_loader`: YAML analyzer configuration and CLI overrides
//! - `pipeline`: Source discovery, batch loading and the full analysis run
//! - `utils`: File naming and discovery helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use manet_analyzer::analysis::DatasetStore;
//! use manet_analyzer::{config_loader, pipeline};
//!
//! // Load configuration (defaults when no file is given)
//! let config = config_loader::load_or_default(Some(Path::new("analyzer.yaml")))?;
//!
//! // Load every result document in a directory
//! let sources = pipeline::collect_sources(&[PathBuf::from("results")], &config.loading.extensions)?;
//! let mut store = DatasetStore::with_policy(config.loading.duplicate_labels);
//! let batch = pipeline::load_batch(&mut store, &sources);
//! println!("{} loaded, {} failed", batch.loaded.len(), batch.failed.len());
//!
//! // Statistics, comparison, plots, report and export
//! let outcome = pipeline::run_analysis(&store, &config.analysis, Path::new(&config.general.output_dir));
//! println!("report: {:?}", outcome.report);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Result Document Format
//!
//! ```json
//! {
//!   "configuration": { "num_nodes": 50, "mobility": "random_waypoint", "attack_type": "blackhole" },
//!   "metrics": {
//!     "throughput": [120.5, 118.2, 121.9],
//!     "end_to_end_delay": [0.21, 0.25, 0.19]
//!   }
//! }
//! ```
//!
//! ## Error Handling
//!
//! Engine operations return typed errors (`LoadError`, `StoreError`,
//! `StatisticsError`, `ComparisonError`, `ReportError`, `StorageError`,
//! `ExportError`). The configuration and pipeline layers use `color_eyre`
//! for error reporting with context.

pub mod analysis;
pub mod config;
pub mod config_loader;
pub mod pipeline;
pub mod utils;
