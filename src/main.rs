//! MANET simulation analysis CLI.
//!
//! Loads simulation result documents and runs statistics, comparison, plots,
//! reports and data export over them.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, Context, Result};

use manet_analyzer::analysis::{self, plot, report, DatasetStore, DuplicateLabelPolicy, ReportContext};
use manet_analyzer::config::AnalyzerConfig;
use manet_analyzer::config_loader::{self, CliOverrides};
use manet_analyzer::pipeline;
use manet_analyzer::utils::file_size_label;

#[derive(Parser)]
#[command(name = "manet-analyzer")]
#[command(about = "Aggregate, compare, plot and report MANET security simulation results")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Analyzer configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for plots, reports and exports
    #[arg(short, long)]
    output: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Number of parallel workers (0 = auto-detect)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Result documents or directories containing them
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// How to label distinct sources that share a file stem
    #[arg(long, value_enum)]
    duplicate_labels: Option<LabelPolicy>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LabelPolicy {
    Reject,
    Suffix,
}

impl From<LabelPolicy> for DuplicateLabelPolicy {
    fn from(policy: LabelPolicy) -> Self {
        match policy {
            LabelPolicy::Reject => DuplicateLabelPolicy::Reject,
            LabelPolicy::Suffix => DuplicateLabelPolicy::Suffix,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis (statistics, comparison, plots, report, export)
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Report format (html, markdown, plain-text)
        #[arg(long)]
        format: Option<String>,

        /// Skip plot generation
        #[arg(long)]
        no_plots: bool,

        /// Skip the cross-run comparison
        #[arg(long)]
        no_comparison: bool,

        /// Skip the report
        #[arg(long)]
        no_report: bool,

        /// Skip the processed-data export
        #[arg(long)]
        no_export: bool,

        /// Leave plot references out of the report
        #[arg(long)]
        no_plot_refs: bool,
    },

    /// Print per-simulation statistics
    Stats {
        #[command(flatten)]
        input: InputArgs,

        /// Full statistics table instead of the quick overview
        #[arg(long)]
        detailed: bool,
    },

    /// Compare simulations against the first one
    Compare {
        #[command(flatten)]
        input: InputArgs,

        /// Also write comparison plots
        #[arg(long)]
        plots: bool,
    },

    /// Generate performance and comparison plots
    Plot {
        #[command(flatten)]
        input: InputArgs,

        /// Only per-simulation performance plots
        #[arg(long)]
        no_comparison: bool,
    },

    /// Generate a report
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Report format (html, markdown, plain-text)
        #[arg(long)]
        format: Option<String>,

        /// Include a comparison section
        #[arg(long)]
        compare: bool,
    },

    /// Export processed statistics as JSON
    Export {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List the plots in the output directory
    Gallery,
}

impl Commands {
    fn overrides(&self, cli: &Cli) -> CliOverrides {
        let mut overrides = CliOverrides {
            output_dir: cli.output.clone(),
            log_level: cli.log_level.clone(),
            ..CliOverrides::default()
        };

        match self {
            Commands::Analyze {
                input,
                format,
                no_plots,
                no_comparison,
                no_report,
                no_export,
                no_plot_refs,
            } => {
                overrides.duplicate_labels = input.duplicate_labels.map(Into::into);
                overrides.report_format = format.clone();
                overrides.no_plots = *no_plots;
                overrides.no_comparison = *no_comparison;
                overrides.no_report = *no_report;
                overrides.no_export = *no_export;
                overrides.no_plot_refs = *no_plot_refs;
            }
            Commands::Report { input, format, .. } => {
                overrides.duplicate_labels = input.duplicate_labels.map(Into::into);
                overrides.report_format = format.clone();
            }
            Commands::Stats { input, .. }
            | Commands::Compare { input, .. }
            | Commands::Plot { input, .. }
            | Commands::Export { input } => {
                overrides.duplicate_labels = input.duplicate_labels.map(Into::into);
            }
            Commands::Gallery => {}
        }

        overrides
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut config = config_loader::load_or_default(cli.config.as_deref())?;
    config_loader::apply_overrides(&mut config, &cli.command.overrides(&cli))?;

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.general.log_level))
        .init();

    // Set thread pool size
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let output_dir = PathBuf::from(&config.general.output_dir);

    match &cli.command {
        Commands::Analyze { input, .. } => {
            let store = load_store(&config, &input.inputs)?;
            let outcome = pipeline::run_analysis(&store, &config.analysis, &output_dir);

            report::print_summary(&outcome.summaries, outcome.comparison.as_ref());
            for note in &outcome.skipped {
                println!("Skipped {}", note);
            }
            for failure in &outcome.plots.failures {
                println!("Plot failed: {}", failure);
            }
            for error in &outcome.errors {
                println!("Error: {}", error);
            }
            if !outcome.plots.artifacts.is_empty() {
                println!("Plots written: {}", outcome.plots.artifacts.len());
            }
            if let Some(path) = &outcome.report {
                println!("Report: {}", path.display());
            }
            if let Some(path) = &outcome.export {
                println!("Processed data: {}", path.display());
            }
            println!("Results saved to {}", output_dir.display());
        }
        Commands::Stats { input, detailed } => {
            let store = load_store(&config, &input.inputs)?;
            let summaries = analysis::summarize_all(&store);
            if *detailed {
                println!("{}", report::detailed_statistics(&summaries));
            } else {
                println!("{}", report::quick_overview(&summaries));
            }
        }
        Commands::Compare { input, plots } => {
            let store = load_store(&config, &input.inputs)?;
            let summaries = analysis::summarize_all(&store);
            let comparison = analysis::compare(summaries.values())?;
            print_comparison(&comparison);

            if *plots {
                let outcome = plot::render_comparison_result(&comparison, &output_dir);
                print_plot_outcome(&outcome);
            }
        }
        Commands::Plot { input, no_comparison } => {
            let store = load_store(&config, &input.inputs)?;
            let comparison = if *no_comparison {
                None
            } else {
                let summaries = analysis::summarize_all(&store);
                analysis::compare(summaries.values())
                    .map_err(|e| log::info!("Skipping comparison plots: {}", e))
                    .ok()
            };
            let outcome = plot::render_all(&store, comparison.as_ref(), &output_dir);
            print_plot_outcome(&outcome);
        }
        Commands::Report { input, compare, .. } => {
            let store = load_store(&config, &input.inputs)?;
            let summaries = analysis::summarize_all(&store);

            let comparison = if *compare {
                Some(analysis::compare(summaries.values())?)
            } else {
                None
            };
            // Reference plots from an earlier `plot` or `analyze` run
            let artifacts = plot::existing_artifacts(&store, comparison.as_ref(), &output_dir);

            let context = ReportContext {
                artifacts: &artifacts,
                comparison: comparison.as_ref(),
            };
            let document = report::generate(
                &summaries,
                &config.analysis.report_format,
                config.analysis.include_plot_refs,
                context,
            )?;
            let path = document.write_to(&output_dir)?;
            println!("Report: {}", path.display());
        }
        Commands::Export { input } => {
            let store = load_store(&config, &input.inputs)?;
            let summaries = analysis::summarize_all(&store);
            let path = analysis::write_export(&summaries, &output_dir)?;
            println!("Processed data: {} ({})", path.display(), file_size_label(&path));
        }
        Commands::Gallery => {
            print_gallery(&output_dir)?;
        }
    }

    Ok(())
}

/// Collect sources, load them and report per-file failures.
/// Fails only when nothing could be loaded.
fn load_store(config: &AnalyzerConfig, inputs: &[PathBuf]) -> Result<DatasetStore> {
    let sources = pipeline::collect_sources(inputs, &config.loading.extensions)?;
    if sources.is_empty() {
        bail!("No result documents found in the given inputs");
    }

    let mut store = DatasetStore::with_policy(config.loading.duplicate_labels);
    let batch = pipeline::load_batch(&mut store, &sources);

    for loaded in &batch.loaded {
        println!("Loaded   {} -> {}", loaded.source.display(), loaded.label);
    }
    for failed in &batch.failed {
        println!("Failed   {}: {}", failed.source.display(), failed.error);
    }

    if store.is_empty() {
        bail!("None of the {} result documents could be loaded", sources.len());
    }
    Ok(store)
}

fn print_comparison(comparison: &analysis::ComparisonResult) {
    println!("\nComparison against baseline '{}'", comparison.baseline);
    println!("{}", "=".repeat(60));
    for (name, metric) in &comparison.metrics {
        println!("\n{}", analysis::metric_kind::display_name(name));
        for entry in &metric.entries {
            println!(
                "  {:<24} {:>14.4}  {}",
                entry.label, entry.mean, entry.relative_difference
            );
        }
        println!("  Ranking: {}", metric.ranking.join(" > "));
        if let Some(best) = &metric.best {
            println!("  Best: {}", best);
        }
    }
    if !comparison.skipped.is_empty() {
        println!("\nNot compared: {}", comparison.skipped.join(", "));
    }
}

fn print_plot_outcome(outcome: &plot::PlotOutcome) {
    for artifact in &outcome.artifacts {
        println!("  [{}] {}", artifact.kind, artifact.path.display());
    }
    for failure in &outcome.failures {
        println!("  failed: {}", failure);
    }
    println!(
        "{} plot(s) written, {} failed",
        outcome.artifacts.len(),
        outcome.failures.len()
    );
}

fn print_gallery(output_dir: &Path) -> Result<()> {
    if !output_dir.is_dir() {
        bail!("Output directory {} does not exist", output_dir.display());
    }
    let images = plot::list_gallery(output_dir)
        .with_context(|| format!("Failed to list plots in {}", output_dir.display()))?;

    if images.is_empty() {
        println!("No plots in {}", output_dir.display());
        return Ok(());
    }

    println!("Plots in {}:", output_dir.display());
    for image in &images {
        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("  {:<50} {:>10}", name, file_size_label(image));
    }
    Ok(())
}
