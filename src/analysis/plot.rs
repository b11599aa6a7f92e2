//! Plot generation for single runs and cross-run comparisons.
//!
//! Charts are written as SVG files whose names derive from label, metric and
//! plot kind, so repeated calls overwrite earlier output for the same label.
//! Names that collide within one call are suffixed. A failed write is
//! reported for that artifact only.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::comparison::compare;
use super::error::{ComparisonError, StorageError};
use super::metric_kind::display_name;
use super::store::DatasetStore;
use super::svg::{color, Anchor, AxisRange, Panel, SvgDocument};
use super::types::{
    Artifact, ArtifactKind, ComparisonResult, MetricSeries, SimulationRecord, SimulationSummary,
};
use crate::utils::files::{list_files_with_extensions, slugify};

const WIDTH: f64 = 900.0;
const PANEL_HEIGHT: f64 = 200.0;
const PANEL_SPACING: f64 = 90.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 60.0;

/// Histograms never use more bins than this
const MAX_BINS: usize = 30;

/// Image extensions shown in the gallery listing
pub const GALLERY_EXTENSIONS: &[&str] = &["svg", "png", "jpg"];

/// Artifacts written by one plotting call plus the writes that failed
#[derive(Debug, Default)]
pub struct PlotOutcome {
    pub artifacts: Vec<Artifact>,
    pub failures: Vec<StorageError>,
    names: FileNames,
}

impl PlotOutcome {
    fn write(&mut self, artifact: Artifact, content: String) {
        match write_artifact(&artifact.path, &content) {
            Ok(()) => {
                log::debug!("Wrote {}", artifact.path.display());
                self.artifacts.push(artifact);
            }
            Err(e) => {
                log::warn!("{}", e);
                self.failures.push(e);
            }
        }
    }
}

/// File names handed out during one plotting run.
///
/// Distinct labels or metrics can slug to the same name (`hop count` and
/// `hop_count`); later claims get `_2`, `_3`, ... before the extension so
/// no plot overwrites another.
#[derive(Debug, Default)]
struct FileNames(HashSet<String>);

impl FileNames {
    fn claim(&mut self, name: String) -> String {
        if self.0.insert(name.clone()) {
            return name;
        }
        let (stem, extension) = match name.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{}", ext)),
            None => (name.as_str(), String::new()),
        };
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}{}", stem, n, extension);
            if self.0.insert(candidate.clone()) {
                log::debug!("Plot file name '{}' already taken, using '{}'", name, candidate);
                return candidate;
            }
            n += 1;
        }
    }
}

fn write_artifact(path: &Path, content: &str) -> Result<(), StorageError> {
    fs::write(path, content).map_err(|e| StorageError::new(path, e))
}

fn ensure_dir(output_dir: &Path) {
    // A failure here surfaces as per-artifact write failures
    if let Err(e) = fs::create_dir_all(output_dir) {
        log::warn!("Cannot create plot directory {}: {}", output_dir.display(), e);
    }
}

pub fn performance_file_name(label: &str) -> String {
    format!("{}_performance.svg", slugify(label))
}

pub fn distribution_file_name(label: &str, metric: &str) -> String {
    format!("{}_{}_distribution.svg", slugify(label), slugify(metric))
}

pub fn comparison_file_name(metric: &str) -> String {
    format!("comparison_{}.svg", slugify(metric))
}

pub const RELATIVE_DIFFERENCE_FILE: &str = "comparison_relative_difference.svg";

/// Performance figure first, then one histogram per metric
fn performance_artifacts(record: &SimulationRecord, output_dir: &Path, names: &mut FileNames) -> Vec<Artifact> {
    let mut artifacts = vec![Artifact {
        path: output_dir.join(names.claim(performance_file_name(&record.label))),
        kind: ArtifactKind::Performance,
        label: Some(record.label.clone()),
        metric: None,
        metric_kind: None,
    }];

    for (name, series) in &record.metrics {
        artifacts.push(Artifact {
            path: output_dir.join(names.claim(distribution_file_name(&record.label, name))),
            kind: ArtifactKind::Performance,
            label: Some(record.label.clone()),
            metric: Some(name.clone()),
            metric_kind: Some(series.kind),
        });
    }
    artifacts
}

/// One bar chart per compared metric, then the relative-difference chart
fn comparison_artifacts(comparison: &ComparisonResult, output_dir: &Path, names: &mut FileNames) -> Vec<Artifact> {
    if comparison.metrics.is_empty() {
        return Vec::new();
    }
    // Claimed first so a metric slugging to `relative_difference` moves aside
    let relative = names.claim(RELATIVE_DIFFERENCE_FILE.to_string());

    let mut artifacts: Vec<Artifact> = comparison
        .metrics
        .iter()
        .map(|(name, metric_cmp)| Artifact {
            path: output_dir.join(names.claim(comparison_file_name(name))),
            kind: ArtifactKind::Comparison,
            label: None,
            metric: Some(name.clone()),
            metric_kind: Some(metric_cmp.kind),
        })
        .collect();

    artifacts.push(Artifact {
        path: output_dir.join(relative),
        kind: ArtifactKind::Comparison,
        label: None,
        metric: None,
        metric_kind: None,
    });
    artifacts
}

fn write_performance(outcome: &mut PlotOutcome, record: &SimulationRecord, output_dir: &Path) {
    let written = outcome.artifacts.len();
    let failed = outcome.failures.len();

    for artifact in performance_artifacts(record, output_dir, &mut outcome.names) {
        let svg = match &artifact.metric {
            Some(name) => distribution_svg(&record.label, name, &record.metrics[name]),
            None => performance_svg(record),
        };
        outcome.write(artifact, svg);
    }

    log::info!(
        "Performance plots for '{}': {} written, {} failed",
        record.label,
        outcome.artifacts.len() - written,
        outcome.failures.len() - failed
    );
}

fn write_comparison(outcome: &mut PlotOutcome, comparison: &ComparisonResult, output_dir: &Path) {
    let written = outcome.artifacts.len();
    let failed = outcome.failures.len();

    for artifact in comparison_artifacts(comparison, output_dir, &mut outcome.names) {
        let svg = match &artifact.metric {
            Some(name) => comparison_bar_svg(comparison, name),
            None => relative_difference_svg(comparison),
        };
        outcome.write(artifact, svg);
    }

    log::info!(
        "Comparison plots: {} written, {} failed",
        outcome.artifacts.len() - written,
        outcome.failures.len() - failed
    );
}

/// Time-series figure (one panel per metric) and a histogram per metric
pub fn render_performance(record: &SimulationRecord, output_dir: &Path) -> PlotOutcome {
    ensure_dir(output_dir);
    let mut outcome = PlotOutcome::default();
    write_performance(&mut outcome, record, output_dir);
    outcome
}

/// Performance plots for every record, then the comparison charts if given.
/// File names are unique across the whole call.
pub fn render_all(store: &DatasetStore, comparison: Option<&ComparisonResult>, output_dir: &Path) -> PlotOutcome {
    ensure_dir(output_dir);
    let mut outcome = PlotOutcome::default();
    for (_, record) in store.all() {
        write_performance(&mut outcome, record, output_dir);
    }
    if let Some(comparison) = comparison {
        write_comparison(&mut outcome, comparison, output_dir);
    }
    outcome
}

/// Comparison charts across two or more summaries (baseline first)
pub fn render_comparison<'a, I>(summaries: I, output_dir: &Path) -> Result<PlotOutcome, ComparisonError>
where
    I: IntoIterator<Item = &'a SimulationSummary>,
{
    let comparison = compare(summaries)?;
    Ok(render_comparison_result(&comparison, output_dir))
}

/// Comparison charts for an already computed comparison
pub fn render_comparison_result(comparison: &ComparisonResult, output_dir: &Path) -> PlotOutcome {
    ensure_dir(output_dir);
    let mut outcome = PlotOutcome::default();
    write_comparison(&mut outcome, comparison, output_dir);
    outcome
}

/// Existing plot images in `output_dir`, sorted by name
pub fn list_gallery(output_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let extensions: Vec<String> = GALLERY_EXTENSIONS.iter().map(|e| e.to_string()).collect();
    list_files_with_extensions(output_dir, &extensions)
}

/// Artifacts [`render_all`] would produce for this store (and comparison)
/// that are already on disk
pub fn existing_artifacts(
    store: &DatasetStore,
    comparison: Option<&ComparisonResult>,
    output_dir: &Path,
) -> Vec<Artifact> {
    let mut names = FileNames::default();
    let mut expected = Vec::new();

    for (_, record) in store.all() {
        expected.extend(performance_artifacts(record, output_dir, &mut names));
    }
    if let Some(comparison) = comparison {
        expected.extend(comparison_artifacts(comparison, output_dir, &mut names));
    }

    expected.retain(|artifact| artifact.path.is_file());
    expected
}

fn performance_svg(record: &SimulationRecord) -> String {
    let panels = record.metrics.len().max(1);
    let height = MARGIN_TOP + panels as f64 * (PANEL_HEIGHT + PANEL_SPACING);
    let mut doc = SvgDocument::new(WIDTH, height);
    doc.text(
        WIDTH / 2.0,
        28.0,
        &format!("Performance metrics: {}", record.label),
        16.0,
        Anchor::Middle,
    );

    if record.metrics.is_empty() {
        doc.text(WIDTH / 2.0, height / 2.0, "No metrics recorded", 12.0, Anchor::Middle);
        return doc.finish();
    }

    for (i, (name, series)) in record.metrics.iter().enumerate() {
        let points: Vec<(f64, f64)> = series
            .samples
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(idx, v)| ((idx + 1) as f64, *v))
            .collect();

        let panel = Panel {
            x: MARGIN_LEFT,
            y: MARGIN_TOP + i as f64 * (PANEL_HEIGHT + PANEL_SPACING),
            width: WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
            height: PANEL_HEIGHT,
            x_range: AxisRange::from_values(points.iter().map(|(x, _)| *x)),
            y_range: AxisRange::from_values(points.iter().map(|(_, y)| *y)),
        };
        panel.draw_axes(&mut doc, &display_name(name), "Sample", &series.kind.axis_label());

        let stroke = color(i);
        let pixels: Vec<(f64, f64)> = points.iter().map(|(x, y)| (panel.px(*x), panel.py(*y))).collect();
        doc.polyline(&pixels, stroke);
        if pixels.len() <= 60 {
            for (x, y) in &pixels {
                doc.circle(*x, *y, 2.5, stroke);
            }
        }

        let skipped = series.samples.len() - points.len();
        if skipped > 0 {
            doc.text(
                panel.x + panel.width,
                panel.y - 8.0,
                &format!("{} non-finite sample(s) omitted", skipped),
                10.0,
                Anchor::End,
            );
        }
    }

    doc.finish()
}

fn distribution_svg(label: &str, metric: &str, series: &MetricSeries) -> String {
    let values: Vec<f64> = series.samples.iter().copied().filter(|v| v.is_finite()).collect();
    let range = AxisRange::from_values(values.iter().copied());

    let bins = ((values.len() as f64).sqrt().ceil() as usize).clamp(1, MAX_BINS);
    let mut counts = vec![0usize; bins];
    for v in &values {
        let bin = ((range.fraction(*v) * bins as f64) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(0);

    let height = MARGIN_TOP + PANEL_HEIGHT + PANEL_SPACING;
    let mut doc = SvgDocument::new(WIDTH, height);
    doc.text(
        WIDTH / 2.0,
        28.0,
        &format!("{} distribution: {}", display_name(metric), label),
        16.0,
        Anchor::Middle,
    );

    let panel = Panel {
        x: MARGIN_LEFT,
        y: MARGIN_TOP,
        width: WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
        height: PANEL_HEIGHT,
        x_range: range,
        y_range: AxisRange::from_values([max_count as f64]).including_zero(),
    };
    panel.draw_axes(&mut doc, series.kind.description(), &series.kind.axis_label(), "Count");

    let bin_width = range.span() / bins as f64;
    for (i, count) in counts.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        let left = panel.px(range.min + i as f64 * bin_width);
        let right = panel.px(range.min + (i + 1) as f64 * bin_width);
        let top = panel.py(*count as f64);
        doc.rect(left, top, right - left - 1.0, panel.py(0.0) - top, color(0), Some("#ffffff"));
    }

    if values.is_empty() {
        doc.text(
            panel.x + panel.width / 2.0,
            panel.y + panel.height / 2.0,
            "No finite samples",
            12.0,
            Anchor::Middle,
        );
    }

    doc.finish()
}

fn comparison_bar_svg(comparison: &ComparisonResult, metric: &str) -> String {
    let metric_cmp = &comparison.metrics[metric];
    let entries = &metric_cmp.entries;

    let bounds = entries
        .iter()
        .flat_map(|e| [e.mean - e.std, e.mean + e.std]);
    let y_range = AxisRange::from_values(bounds).including_zero();

    let height = MARGIN_TOP + PANEL_HEIGHT + PANEL_SPACING + 20.0;
    let mut doc = SvgDocument::new(WIDTH, height);
    doc.text(
        WIDTH / 2.0,
        28.0,
        &format!("{} comparison", display_name(metric)),
        16.0,
        Anchor::Middle,
    );

    let panel = Panel {
        x: MARGIN_LEFT,
        y: MARGIN_TOP,
        width: WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
        height: PANEL_HEIGHT,
        x_range: AxisRange {
            min: 0.0,
            max: entries.len().max(1) as f64,
        },
        y_range,
    };
    panel.draw_frame(&mut doc, metric_cmp.kind.description(), &metric_cmp.kind.axis_label());

    let slot = panel.width / entries.len().max(1) as f64;
    let zero = panel.py(0.0);
    for (i, entry) in entries.iter().enumerate() {
        let center = panel.px(i as f64 + 0.5);
        let bar_width = slot * 0.6;
        let top = panel.py(entry.mean);
        let (y, h) = if top <= zero { (top, zero - top) } else { (zero, top - zero) };
        let fill = if metric_cmp.best.as_deref() == Some(entry.label.as_str()) {
            color(2)
        } else {
            color(0)
        };
        doc.rect(center - bar_width / 2.0, y, bar_width, h, fill, None);

        if entry.std > 0.0 {
            let hi = panel.py(entry.mean + entry.std);
            let lo = panel.py(entry.mean - entry.std);
            doc.line(center, hi, center, lo, "#212121", 1.0);
            doc.line(center - 6.0, hi, center + 6.0, hi, "#212121", 1.0);
            doc.line(center - 6.0, lo, center + 6.0, lo, "#212121", 1.0);
        }

        doc.text(center, panel.y + panel.height + 16.0, &entry.label, 11.0, Anchor::Middle);
        doc.text(
            center,
            panel.y + panel.height + 32.0,
            &entry.relative_difference.to_string(),
            10.0,
            Anchor::Middle,
        );
    }

    doc.finish()
}

fn relative_difference_svg(comparison: &ComparisonResult) -> String {
    let others: Vec<&String> = comparison
        .labels
        .iter()
        .filter(|label| **label != comparison.baseline)
        .collect();

    let percents = comparison
        .metrics
        .values()
        .flat_map(|m| m.entries.iter().filter_map(|e| e.relative_difference.percent()));
    let y_range = AxisRange::from_values(percents).including_zero();

    let legend_height = 20.0 * others.len() as f64;
    let height = MARGIN_TOP + PANEL_HEIGHT + PANEL_SPACING + legend_height;
    let mut doc = SvgDocument::new(WIDTH, height);
    doc.text(
        WIDTH / 2.0,
        28.0,
        &format!("Relative difference vs. baseline '{}'", comparison.baseline),
        16.0,
        Anchor::Middle,
    );

    let groups = comparison.metrics.len().max(1);
    let panel = Panel {
        x: MARGIN_LEFT,
        y: MARGIN_TOP,
        width: WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
        height: PANEL_HEIGHT,
        x_range: AxisRange {
            min: 0.0,
            max: groups as f64,
        },
        y_range,
    };
    panel.draw_frame(&mut doc, "Percentage difference of the mean", "Difference (%)");

    let zero = panel.py(0.0);
    doc.line(panel.x, zero, panel.x + panel.width, zero, "#616161", 1.0);

    let slot = panel.width / groups as f64;
    let bar_width = slot * 0.8 / others.len().max(1) as f64;
    for (g, (name, metric_cmp)) in comparison.metrics.iter().enumerate() {
        let group_left = panel.px(g as f64) + slot * 0.1;
        for (i, label) in others.iter().enumerate() {
            let x = group_left + i as f64 * bar_width;
            let Some(entry) = metric_cmp.entries.iter().find(|e| &e.label == *label) else {
                continue;
            };
            match entry.relative_difference.percent() {
                Some(p) => {
                    let top = panel.py(p);
                    let (y, h) = if top <= zero { (top, zero - top) } else { (zero, top - zero) };
                    doc.rect(x, y, bar_width - 2.0, h, color(i + 1), None);
                }
                None => {
                    doc.text(
                        x + bar_width / 2.0,
                        zero - 4.0,
                        &entry.relative_difference.to_string(),
                        9.0,
                        Anchor::Middle,
                    );
                }
            }
        }
        doc.text(
            panel.px(g as f64 + 0.5),
            panel.y + panel.height + 16.0,
            &display_name(name),
            11.0,
            Anchor::Middle,
        );
    }

    let legend_top = panel.y + panel.height + 40.0;
    for (i, label) in others.iter().enumerate() {
        let y = legend_top + i as f64 * 20.0;
        doc.rect(panel.x, y, 12.0, 12.0, color(i + 1), None);
        doc.text(panel.x + 18.0, y + 10.0, label, 11.0, Anchor::Start);
    }

    doc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metric_kind::MetricKind;
    use crate::analysis::statistics::summarize;
    use crate::analysis::types::Configuration;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    fn record(label: &str, metrics: &[(&str, Vec<f64>)]) -> SimulationRecord {
        SimulationRecord {
            label: label.to_string(),
            source: PathBuf::from(format!("{}.json", label)),
            configuration: Configuration::new(),
            metrics: metrics
                .iter()
                .map(|(name, samples)| (name.to_string(), MetricSeries::new(MetricKind::of(name), samples.clone())))
                .collect::<IndexMap<_, _>>(),
        }
    }

    #[test]
    fn test_performance_plots_named_deterministically() {
        let dir = TempDir::new().unwrap();
        let rec = record("run A", &[("throughput", vec![1.0, 2.0, 3.0]), ("trust_score", vec![0.4, 0.6])]);

        let outcome = render_performance(&rec, dir.path());
        assert!(outcome.failures.is_empty());
        let names: Vec<_> = outcome.artifacts.iter().map(|a| a.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "run_A_performance.svg",
                "run_A_throughput_distribution.svg",
                "run_A_trust_score_distribution.svg"
            ]
        );
        for artifact in &outcome.artifacts {
            assert_eq!(artifact.kind, ArtifactKind::Performance);
            let svg = fs::read_to_string(&artifact.path).unwrap();
            assert!(svg.contains("<svg"));
        }
    }

    #[test]
    fn test_metrics_sharing_a_slug_get_distinct_files() {
        let dir = TempDir::new().unwrap();
        let rec = record("run", &[("hop count", vec![1.0, 2.0]), ("hop_count", vec![9.0, 9.5])]);

        let outcome = render_performance(&rec, dir.path());
        assert!(outcome.failures.is_empty());
        let names: Vec<_> = outcome.artifacts.iter().map(|a| a.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "run_performance.svg",
                "run_hop_count_distribution.svg",
                "run_hop_count_distribution_2.svg"
            ]
        );
        assert_eq!(list_gallery(dir.path()).unwrap().len(), 3);
        let first = fs::read_to_string(&outcome.artifacts[1].path).unwrap();
        let second = fs::read_to_string(&outcome.artifacts[2].path).unwrap();
        assert_ne!(first, second);

        let mut store = DatasetStore::new();
        store.ingest(rec).unwrap();
        assert_eq!(existing_artifacts(&store, None, dir.path()), outcome.artifacts);
    }

    #[test]
    fn test_labels_and_comparison_names_sharing_a_slug() {
        let dir = TempDir::new().unwrap();
        let mut store = DatasetStore::new();
        store.add("run A", record("run A", &[("relative difference", vec![1.0])])).unwrap();
        store.add("run_A", record("run_A", &[("relative difference", vec![2.0])])).unwrap();
        let summaries = crate::analysis::statistics::summarize_all(&store);
        let comparison = compare(summaries.values()).unwrap();

        let outcome = render_all(&store, Some(&comparison), dir.path());
        assert!(outcome.failures.is_empty());
        let names: Vec<_> = outcome.artifacts.iter().map(|a| a.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "run_A_performance.svg",
                "run_A_relative_difference_distribution.svg",
                "run_A_performance_2.svg",
                "run_A_relative_difference_distribution_2.svg",
                "comparison_relative_difference_2.svg",
                RELATIVE_DIFFERENCE_FILE,
            ]
        );
        assert_eq!(list_gallery(dir.path()).unwrap().len(), names.len());
        assert_eq!(existing_artifacts(&store, Some(&comparison), dir.path()), outcome.artifacts);
    }

    #[test]
    fn test_distribution_caption_uses_tagged_kind() {
        let dir = TempDir::new().unwrap();
        let mut rec = record("run", &[("custom_latency", vec![0.1, 0.2])]);
        rec.metrics["custom_latency"].kind = MetricKind::EndToEndDelay;

        let outcome = render_performance(&rec, dir.path());
        let histogram = &outcome.artifacts[1];
        assert_eq!(histogram.metric_kind, Some(MetricKind::EndToEndDelay));
        assert_eq!(
            histogram.description(),
            format!("Distribution of {}", MetricKind::EndToEndDelay.description().to_lowercase())
        );
    }

    #[test]
    fn test_single_constant_metric_is_plotted() {
        let dir = TempDir::new().unwrap();
        let rec = record("flat", &[("throughput", vec![5.0, 5.0, 5.0])]);
        let outcome = render_performance(&rec, dir.path());
        assert_eq!(outcome.artifacts.len(), 2);
        let svg = fs::read_to_string(&outcome.artifacts[0].path).unwrap();
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_non_finite_samples_do_not_break_plot() {
        let dir = TempDir::new().unwrap();
        let rec = record("odd", &[("trust_score", vec![0.5, f64::NAN, 0.7])]);
        let outcome = render_performance(&rec, dir.path());
        assert!(outcome.failures.is_empty());
        let svg = fs::read_to_string(&outcome.artifacts[0].path).unwrap();
        assert!(svg.contains("1 non-finite sample(s) omitted"));
    }

    #[test]
    fn test_write_failures_are_per_artifact() {
        let dir = TempDir::new().unwrap();
        // A directory occupying the histogram's file name makes only that write fail
        fs::create_dir(dir.path().join(distribution_file_name("r", "throughput"))).unwrap();
        let rec = record("r", &[("throughput", vec![1.0, 2.0]), ("end_to_end_delay", vec![0.1])]);

        let outcome = render_performance(&rec, dir.path());
        assert_eq!(outcome.artifacts.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].path.ends_with("r_throughput_distribution.svg"));
    }

    #[test]
    fn test_comparison_plots() {
        let dir = TempDir::new().unwrap();
        let a = summarize(&record("A", &[("throughput", vec![10.0]), ("hop_count", vec![3.0])]));
        let b = summarize(&record("B", &[("throughput", vec![20.0])]));
        let c = summarize(&record("C", &[("throughput", vec![15.0])]));

        let outcome = render_comparison([&a, &b, &c], dir.path()).unwrap();
        let names: Vec<_> = outcome.artifacts.iter().map(|a| a.file_name()).collect();
        assert_eq!(names, vec!["comparison_throughput.svg", RELATIVE_DIFFERENCE_FILE]);
        assert!(outcome.artifacts.iter().all(|a| a.kind == ArtifactKind::Comparison));
    }

    #[test]
    fn test_comparison_requires_two_summaries() {
        let dir = TempDir::new().unwrap();
        let a = summarize(&record("A", &[("throughput", vec![10.0])]));
        let err = render_comparison([&a], dir.path()).unwrap_err();
        assert_eq!(err, ComparisonError::InsufficientData { available: 1 });
        assert!(list_gallery(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_gallery_lists_images_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.svg"), "").unwrap();
        fs::write(dir.path().join("a.png"), "").unwrap();
        fs::write(dir.path().join("report.html"), "").unwrap();
        let gallery = list_gallery(dir.path()).unwrap();
        assert_eq!(gallery.len(), 2);
        assert!(gallery[0].ends_with("a.png"));
    }

    #[test]
    fn test_existing_artifacts_match_written_files() {
        let dir = TempDir::new().unwrap();
        let mut store = DatasetStore::new();
        store.add("A", record("A", &[("throughput", vec![1.0, 2.0])])).unwrap();
        store.add("B", record("B", &[("throughput", vec![3.0])])).unwrap();

        assert!(existing_artifacts(&store, None, dir.path()).is_empty());

        let written = render_performance(store.get("A").unwrap(), dir.path());
        let found = existing_artifacts(&store, None, dir.path());
        assert_eq!(found, written.artifacts);
    }
}
