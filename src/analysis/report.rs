//! Report generation for simulation summaries.
//!
//! Renders HTML, Markdown or plain-text documents. Rendering is pure and
//! deterministic for the same inputs; writing to disk is a separate step.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::{ReportError, StorageError};
use super::metric_kind::display_name;
use super::svg::escape;
use super::types::{Artifact, ComparisonResult, SimulationSummary, Summaries};

/// Base name of written report files
pub const REPORT_FILE_STEM: &str = "analysis_report";

const RULE_WIDTH: usize = 80;

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    Markdown,
    PlainText,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Markdown => "md",
            ReportFormat::PlainText => "txt",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "plain-text" | "plain_text" | "txt" | "text" => Ok(ReportFormat::PlainText),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Html => write!(f, "html"),
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::PlainText => write!(f, "plain-text"),
        }
    }
}

/// Optional extra material for a report
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportContext<'a> {
    /// Plots available for reference; ignored unless plot refs are requested
    pub artifacts: &'a [Artifact],
    pub comparison: Option<&'a ComparisonResult>,
}

/// A rendered report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub format: ReportFormat,
    pub content: String,
}

impl ReportDocument {
    pub fn file_name(&self) -> String {
        format!("{}.{}", REPORT_FILE_STEM, self.format.extension())
    }

    /// Write the report into `output_dir`. The content goes to a temporary
    /// file first and is renamed into place, so a failed write leaves no
    /// partial report behind.
    pub fn write_to(&self, output_dir: &Path) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(output_dir).map_err(|e| StorageError::new(output_dir, e))?;

        let path = output_dir.join(self.file_name());
        let tmp = output_dir.join(format!(".{}.tmp", self.file_name()));

        if let Err(e) = fs::write(&tmp, &self.content) {
            let _ = fs::remove_file(&tmp);
            return Err(StorageError::new(&path, e));
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(StorageError::new(&path, e));
        }

        log::info!("{} report written to {}", self.format, path.display());
        Ok(path)
    }
}

/// Render `summaries` (in store order) in the requested `format`.
///
/// With `include_plot_refs` set, the report lists the context's artifacts;
/// when there are none the plot section is simply left out.
pub fn generate(
    summaries: &Summaries,
    format: &str,
    include_plot_refs: bool,
    context: ReportContext<'_>,
) -> Result<ReportDocument, ReportError> {
    let format: ReportFormat = format.parse()?;
    let artifacts: &[Artifact] = if include_plot_refs { context.artifacts } else { &[] };

    let content = match format {
        ReportFormat::Html => render_html(summaries, context.comparison, artifacts),
        ReportFormat::Markdown => render_markdown(summaries, context.comparison, artifacts),
        ReportFormat::PlainText => render_text(summaries, context.comparison, artifacts),
    };

    Ok(ReportDocument { format, content })
}

/// `1234567` -> `"1,234,567"`
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn text_summary(position: usize, summary: &SimulationSummary) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("-".repeat(RULE_WIDTH));
    lines.push(format!("SIMULATION {}: {}", position, summary.label));
    lines.push("-".repeat(RULE_WIDTH));
    lines.push(format!("Data Points: {}", group_thousands(summary.data_points)));
    lines.push(String::new());

    lines.push("Configuration Parameters:".to_string());
    for (key, value) in &summary.configuration {
        lines.push(format!("  {:<25}: {}", key, value));
    }
    lines.push(String::new());

    lines.push("Performance Metrics:".to_string());
    lines.push(format!(
        "{:<24} {:>8} {:>14} {:>14} {:>14} {:>14}",
        "Metric", "Count", "Mean", "Std", "Min", "Max"
    ));
    lines.push("-".repeat(RULE_WIDTH + 13));
    for (name, stats) in &summary.metrics {
        lines.push(format!(
            "{:<24} {:>8} {:>14.6} {:>14.6} {:>14.6} {:>14.6}",
            name, stats.count, stats.mean, stats.std, stats.min, stats.max
        ));
    }
    if !summary.failed_metrics.is_empty() {
        lines.push(String::new());
        lines.push("Metrics without statistics:".to_string());
        for (name, err) in &summary.failed_metrics {
            lines.push(format!("  {}: {}", name, err));
        }
    }
    lines.push(String::new());
    lines
}

fn render_text(summaries: &Summaries, comparison: Option<&ComparisonResult>, artifacts: &[Artifact]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("=".repeat(RULE_WIDTH));
    lines.push("                    MANET SECURITY SIMULATION ANALYSIS REPORT".to_string());
    lines.push("=".repeat(RULE_WIDTH));
    lines.push(String::new());
    lines.push(format!("Total Simulations: {}", summaries.len()));
    lines.push(String::new());

    for (i, summary) in summaries.values().enumerate() {
        lines.extend(text_summary(i + 1, summary));
    }

    if let Some(cmp) = comparison {
        lines.push("=".repeat(RULE_WIDTH));
        lines.push(format!("COMPARISON (baseline: {})", cmp.baseline));
        lines.push("=".repeat(RULE_WIDTH));
        for (name, metric) in &cmp.metrics {
            lines.push(String::new());
            lines.push(format!("{}:", display_name(name)));
            lines.push(format!("  Ranking (by mean, descending): {}", metric.ranking.join(", ")));
            if let Some(best) = &metric.best {
                lines.push(format!("  Best: {}", best));
            }
            for entry in &metric.entries {
                lines.push(format!(
                    "  {:<24} mean {:>14.6}  vs baseline {}",
                    entry.label, entry.mean, entry.relative_difference
                ));
            }
        }
        if !cmp.skipped.is_empty() {
            lines.push(String::new());
            lines.push(format!("Not compared (missing in some runs): {}", cmp.skipped.join(", ")));
        }
        lines.push(String::new());
    }

    if !artifacts.is_empty() {
        lines.push("=".repeat(RULE_WIDTH));
        lines.push("PLOTS".to_string());
        lines.push("=".repeat(RULE_WIDTH));
        for artifact in artifacts {
            lines.push(format!("  [{}] {} - {}", artifact.kind, artifact.file_name(), artifact.description()));
        }
        lines.push(String::new());
    }

    lines.push("=".repeat(RULE_WIDTH));
    lines.join("\n")
}

/// Table cell text: pipes escaped, line breaks flattened
fn markdown_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn render_markdown(
    summaries: &Summaries,
    comparison: Option<&ComparisonResult>,
    artifacts: &[Artifact],
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# MANET Security Simulation Analysis Report".to_string());
    lines.push(String::new());
    lines.push(format!("**Total simulations:** {}", summaries.len()));
    lines.push(String::new());

    for summary in summaries.values() {
        lines.push(format!("## {}", summary.label));
        lines.push(String::new());
        lines.push(format!("**Data points:** {}", group_thousands(summary.data_points)));
        lines.push(String::new());

        lines.push("### Configuration".to_string());
        lines.push(String::new());
        lines.push("| Parameter | Value |".to_string());
        lines.push("|---|---|".to_string());
        for (key, value) in &summary.configuration {
            lines.push(format!("| {} | {} |", markdown_cell(key), markdown_cell(&value.to_string())));
        }
        lines.push(String::new());

        lines.push("### Metrics".to_string());
        lines.push(String::new());
        lines.push("| Metric | Count | Mean | Std | Min | Max |".to_string());
        lines.push("|---|---:|---:|---:|---:|---:|".to_string());
        for (name, stats) in &summary.metrics {
            lines.push(format!(
                "| {} | {} | {:.6} | {:.6} | {:.6} | {:.6} |",
                markdown_cell(name),
                stats.count,
                stats.mean,
                stats.std,
                stats.min,
                stats.max
            ));
        }
        for (name, err) in &summary.failed_metrics {
            lines.push(format!(
                "| {} | - | _{}_ | | | |",
                markdown_cell(name),
                markdown_cell(&err.to_string())
            ));
        }
        lines.push(String::new());
    }

    if let Some(cmp) = comparison {
        lines.push(format!("## Comparison (baseline: {})", cmp.baseline));
        lines.push(String::new());
        for (name, metric) in &cmp.metrics {
            lines.push(format!("### {}", display_name(name)));
            lines.push(String::new());
            lines.push(format!("Ranking: {}", metric.ranking.join(" > ")));
            lines.push(String::new());
            lines.push("| Simulation | Mean | Std | vs. baseline |".to_string());
            lines.push("|---|---:|---:|---:|".to_string());
            for entry in &metric.entries {
                lines.push(format!(
                    "| {} | {:.6} | {:.6} | {} |",
                    markdown_cell(&entry.label),
                    entry.mean,
                    entry.std,
                    entry.relative_difference
                ));
            }
            lines.push(String::new());
        }
        if !cmp.skipped.is_empty() {
            lines.push(format!("Not compared: {}", cmp.skipped.join(", ")));
            lines.push(String::new());
        }
    }

    if !artifacts.is_empty() {
        lines.push("## Plots".to_string());
        lines.push(String::new());
        for artifact in artifacts {
            lines.push(format!("![{}]({})", artifact.description(), artifact.file_name()));
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

fn render_html(summaries: &Summaries, comparison: Option<&ComparisonResult>, artifacts: &[Artifact]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("<!DOCTYPE html>".to_string());
    lines.push("<html lang=\"en\">".to_string());
    lines.push("<head>".to_string());
    lines.push("<meta charset=\"utf-8\">".to_string());
    lines.push("<title>MANET Security Simulation Analysis Report</title>".to_string());
    lines.push(
        "<style>body{font-family:Arial,sans-serif;margin:2em;}table{border-collapse:collapse;margin-bottom:1em;}\
         th,td{border:1px solid #bdbdbd;padding:4px 8px;}td.num{text-align:right;}th{background:#eeeeee;}</style>"
            .to_string(),
    );
    lines.push("</head>".to_string());
    lines.push("<body>".to_string());
    lines.push("<h1>MANET Security Simulation Analysis Report</h1>".to_string());
    lines.push(format!("<p>Total simulations: {}</p>", summaries.len()));

    for summary in summaries.values() {
        lines.extend(html_summary(summary));
    }

    if let Some(cmp) = comparison {
        lines.push(format!("<h2>Comparison (baseline: {})</h2>", escape(&cmp.baseline)));
        for (name, metric) in &cmp.metrics {
            lines.push(format!("<h3>{}</h3>", escape(&display_name(name))));
            lines.push(format!(
                "<p>Ranking: {}</p>",
                escape(&metric.ranking.join(" > "))
            ));
            lines.push("<table>".to_string());
            lines.push("<tr><th>Simulation</th><th>Mean</th><th>Std</th><th>vs. baseline</th></tr>".to_string());
            for entry in &metric.entries {
                lines.push(format!(
                    "<tr><td>{}</td><td class=\"num\">{:.6}</td><td class=\"num\">{:.6}</td><td class=\"num\">{}</td></tr>",
                    escape(&entry.label),
                    entry.mean,
                    entry.std,
                    entry.relative_difference
                ));
            }
            lines.push("</table>".to_string());
        }
        if !cmp.skipped.is_empty() {
            lines.push(format!("<p>Not compared: {}</p>", escape(&cmp.skipped.join(", "))));
        }
    }

    if !artifacts.is_empty() {
        lines.push("<h2>Plots</h2>".to_string());
        for artifact in artifacts {
            let file = escape(&artifact.file_name());
            lines.push(format!(
                "<figure><img src=\"{}\" alt=\"{}\"><figcaption>{}</figcaption></figure>",
                file,
                file,
                escape(&artifact.description())
            ));
        }
    }

    lines.push("</body>".to_string());
    lines.push("</html>".to_string());
    lines.join("\n")
}

fn html_summary(summary: &SimulationSummary) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!("<h2>{}</h2>", escape(&summary.label)));
    lines.push(format!("<p>Data points: {}</p>", group_thousands(summary.data_points)));

    lines.push("<table>".to_string());
    lines.push("<tr><th>Parameter</th><th>Value</th></tr>".to_string());
    for (key, value) in &summary.configuration {
        lines.push(format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(key),
            escape(&value.to_string())
        ));
    }
    lines.push("</table>".to_string());

    lines.push("<table>".to_string());
    lines.push(
        "<tr><th>Metric</th><th>Count</th><th>Mean</th><th>Std</th><th>Min</th><th>Max</th></tr>".to_string(),
    );
    for (name, stats) in &summary.metrics {
        lines.push(format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{:.6}</td><td class=\"num\">{:.6}</td>\
             <td class=\"num\">{:.6}</td><td class=\"num\">{:.6}</td></tr>",
            escape(name),
            stats.count,
            stats.mean,
            stats.std,
            stats.min,
            stats.max
        ));
    }
    for (name, err) in &summary.failed_metrics {
        lines.push(format!(
            "<tr><td>{}</td><td colspan=\"5\"><em>{}</em></td></tr>",
            escape(name),
            escape(&err.to_string())
        ));
    }
    lines.push("</table>".to_string());
    lines
}

/// Short per-simulation overview: data points, node count and the first
/// three metric means
pub fn quick_overview(summaries: &Summaries) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("QUICK STATISTICS OVERVIEW".to_string());
    lines.push("=".repeat(50));
    lines.push(String::new());

    for (i, summary) in summaries.values().enumerate() {
        lines.push(format!("Simulation {}: {}", i + 1, summary.label));
        lines.push(format!("   Data Points: {}", group_thousands(summary.data_points)));
        let nodes = summary
            .configuration
            .get("num_nodes")
            .map(|v| v.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        lines.push(format!("   Nodes: {}", nodes));
        for (name, stats) in summary.metrics.iter().take(3) {
            lines.push(format!("   {}: {:.4}", display_name(name), stats.mean));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Fixed-width statistics table for every simulation
pub fn detailed_statistics(summaries: &Summaries) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("DETAILED STATISTICAL ANALYSIS".to_string());
    lines.push("=".repeat(RULE_WIDTH));
    lines.push(String::new());
    for (i, summary) in summaries.values().enumerate() {
        lines.extend(text_summary(i + 1, summary));
    }
    lines.join("\n")
}

/// Print a summary of the loaded simulations to stdout
pub fn print_summary(summaries: &Summaries, comparison: Option<&ComparisonResult>) {
    println!("\n=== MANET SIMULATION ANALYSIS SUMMARY ===\n");
    println!("Simulations: {}", summaries.len());
    for summary in summaries.values() {
        println!("\n{} ({} data points)", summary.label, group_thousands(summary.data_points));
        for (name, stats) in &summary.metrics {
            println!("  {}: Mean={:.4}, Std={:.4}", display_name(name), stats.mean, stats.std);
        }
        for name in summary.failed_metrics.keys() {
            println!("  {}: statistics unavailable", display_name(name));
        }
    }

    if let Some(cmp) = comparison {
        println!("\nComparison against '{}':", cmp.baseline);
        for (name, metric) in &cmp.metrics {
            println!("  {}: {}", display_name(name), metric.ranking.join(" > "));
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::comparison::compare;
    use crate::analysis::error::StatisticsError;
    use crate::analysis::metric_kind::MetricKind;
    use crate::analysis::types::{ArtifactKind, ConfigValue, Configuration, MetricStatistics};
    use indexmap::IndexMap;
    use tempfile::TempDir;

    fn summary(label: &str, mean: f64) -> SimulationSummary {
        let mut configuration = Configuration::new();
        configuration.insert("num_nodes".to_string(), ConfigValue::Integer(50));
        configuration.insert("attack_type".to_string(), ConfigValue::Text("<blackhole>".to_string()));
        let mut metrics = IndexMap::new();
        metrics.insert(
            "throughput".to_string(),
            MetricStatistics {
                kind: MetricKind::Throughput,
                count: 3,
                mean,
                std: 1.0,
                min: mean - 1.0,
                max: mean + 1.0,
            },
        );
        SimulationSummary {
            label: label.to_string(),
            configuration,
            data_points: 1234,
            metrics,
            failed_metrics: IndexMap::new(),
        }
    }

    fn summaries() -> Summaries {
        [summary("beta", 20.0), summary("alpha", 10.0)]
            .into_iter()
            .map(|s| (s.label.clone(), s))
            .collect()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("HTML".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("txt".parse::<ReportFormat>().unwrap(), ReportFormat::PlainText);
        assert_eq!("plain-text".parse::<ReportFormat>().unwrap(), ReportFormat::PlainText);
        assert!(matches!(
            "xml".parse::<ReportFormat>(),
            Err(ReportError::UnsupportedFormat(f)) if f == "xml"
        ));
    }

    #[test]
    fn test_unsupported_format_fails() {
        let err = generate(&summaries(), "xml", false, ReportContext::default()).unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_text_report_preserves_store_order() {
        let doc = generate(&summaries(), "plain-text", false, ReportContext::default()).unwrap();
        let beta = doc.content.find("SIMULATION 1: beta").unwrap();
        let alpha = doc.content.find("SIMULATION 2: alpha").unwrap();
        assert!(beta < alpha);
        assert!(doc.content.contains("Data Points: 1,234"));
        assert!(doc.content.contains("num_nodes"));
        assert!(doc.content.contains("20.000000"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        for format in ["html", "markdown", "txt"] {
            let a = generate(&summaries(), format, true, ReportContext::default()).unwrap();
            let b = generate(&summaries(), format, true, ReportContext::default()).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_html_escapes_values() {
        let doc = generate(&summaries(), "html", false, ReportContext::default()).unwrap();
        assert!(doc.content.contains("&lt;blackhole&gt;"));
        assert!(!doc.content.contains("<blackhole>"));
    }

    #[test]
    fn test_plot_section_only_with_artifacts() {
        let doc = generate(&summaries(), "markdown", true, ReportContext::default()).unwrap();
        assert!(!doc.content.contains("## Plots"));

        let artifacts = vec![Artifact {
            path: PathBuf::from("out/beta_performance.svg"),
            kind: ArtifactKind::Performance,
            label: Some("beta".to_string()),
            metric: None,
            metric_kind: None,
        }];
        let context = ReportContext {
            artifacts: &artifacts,
            comparison: None,
        };
        let doc = generate(&summaries(), "markdown", true, context).unwrap();
        assert!(doc.content.contains("## Plots"));
        assert!(doc.content.contains("(beta_performance.svg)"));

        let doc = generate(&summaries(), "markdown", false, context).unwrap();
        assert!(!doc.content.contains("## Plots"));
    }

    #[test]
    fn test_comparison_and_failed_metrics_rendered() {
        let mut sums = summaries();
        sums["alpha"]
            .failed_metrics
            .insert("trust_score".to_string(), StatisticsError::Empty);
        let cmp = compare(sums.values()).unwrap();
        let context = ReportContext {
            artifacts: &[],
            comparison: Some(&cmp),
        };
        let doc = generate(&sums, "txt", false, context).unwrap();
        assert!(doc.content.contains("COMPARISON (baseline: beta)"));
        assert!(doc.content.contains("-50.00%"));
        assert!(doc.content.contains("trust_score: metric has no samples"));
    }

    #[test]
    fn test_markdown_table_cells_escaped() {
        let mut a = summary("run|a", 10.0);
        a.configuration
            .insert("routing".to_string(), ConfigValue::Text("aodv|dsr\nolsr".to_string()));
        let b = summary("b", 20.0);
        let mut sums: Summaries = [a, b].into_iter().map(|s| (s.label.clone(), s)).collect();
        let metric = sums["b"].metrics["throughput"];
        sums["b"].metrics.insert("rx|tx".to_string(), metric);
        let cmp = compare(sums.values()).unwrap();

        let context = ReportContext {
            artifacts: &[],
            comparison: Some(&cmp),
        };
        let doc = generate(&sums, "markdown", false, context).unwrap();
        assert!(doc.content.contains("| routing | aodv\\|dsr olsr |"));
        assert!(doc.content.contains("| rx\\|tx | 3 |"));
        assert!(doc.content.contains("| run\\|a | 10.000000 |"));
    }

    #[test]
    fn test_write_to_uses_format_extension() {
        let dir = TempDir::new().unwrap();
        let doc = generate(&summaries(), "md", false, ReportContext::default()).unwrap();
        let path = doc.write_to(dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "analysis_report.md");
        assert_eq!(fs::read_to_string(&path).unwrap(), doc.content);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_quick_overview() {
        let overview = quick_overview(&summaries());
        assert!(overview.contains("Simulation 1: beta"));
        assert!(overview.contains("Nodes: 50"));
        assert!(overview.contains("Throughput: 20.0000"));
    }

    #[test]
    fn test_detailed_statistics_table() {
        let table = detailed_statistics(&summaries());
        assert!(table.starts_with("DETAILED STATISTICAL ANALYSIS"));
        assert!(table.contains("SIMULATION 2: alpha"));
        assert!(table.contains("attack_type"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
