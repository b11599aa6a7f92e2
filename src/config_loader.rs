use crate::analysis::store::DuplicateLabelPolicy;
use crate::config::AnalyzerConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<AnalyzerConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration file {:?}", config_path))?;

    let config: AnalyzerConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration file {:?}", config_path))?;

    config.validate()?;

    Ok(config)
}

/// Load the configuration file if one is given, otherwise use defaults
pub fn load_or_default(config_path: Option<&Path>) -> Result<AnalyzerConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using defaults");
            Ok(AnalyzerConfig::default())
        }
    }
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output_dir: Option<String>,
    pub log_level: Option<String>,
    pub report_format: Option<String>,
    pub duplicate_labels: Option<DuplicateLabelPolicy>,
    pub no_plots: bool,
    pub no_comparison: bool,
    pub no_report: bool,
    pub no_export: bool,
    pub no_plot_refs: bool,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut AnalyzerConfig, overrides: &CliOverrides) -> Result<()> {
    if let Some(dir) = &overrides.output_dir {
        info!("Output directory override: {}", dir);
        config.general.output_dir = dir.clone();
    }

    if let Some(level) = &overrides.log_level {
        config.general.log_level = level.clone();
    }

    if let Some(format) = &overrides.report_format {
        info!("Report format override: {}", format);
        config.analysis.report_format = format.clone();
    }

    if let Some(policy) = overrides.duplicate_labels {
        config.loading.duplicate_labels = policy;
    }

    if overrides.no_plots {
        config.analysis.generate_plots = false;
        if config.analysis.include_plot_refs && !overrides.no_plot_refs {
            warn!("Plots disabled; the report will not reference any plots");
        }
    }
    if overrides.no_comparison {
        config.analysis.generate_comparison = false;
    }
    if overrides.no_report {
        config.analysis.generate_report = false;
    }
    if overrides.no_export {
        config.analysis.export_data = false;
    }
    if overrides.no_plot_refs {
        config.analysis.include_plot_refs = false;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
