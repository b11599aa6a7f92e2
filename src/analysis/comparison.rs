//! Cross-run comparison of simulation summaries.
//!
//! The first summary is the baseline. Only metrics with statistics in every
//! summary are compared; the rest are reported as skipped.

use indexmap::{IndexMap, IndexSet};

use super::error::ComparisonError;
use super::metric_kind::{MetricKind, Preference};
use super::types::{
    ComparisonEntry, ComparisonResult, MetricComparison, RelativeDifference, SimulationSummary,
};

/// Compare two or more summaries given in baseline-first order
pub fn compare<'a, I>(summaries: I) -> Result<ComparisonResult, ComparisonError>
where
    I: IntoIterator<Item = &'a SimulationSummary>,
{
    let summaries: Vec<&SimulationSummary> = summaries.into_iter().collect();
    if summaries.len() < 2 {
        return Err(ComparisonError::InsufficientData {
            available: summaries.len(),
        });
    }

    let baseline = summaries[0];

    // Every metric name seen anywhere, in first-seen order
    let mut seen: IndexSet<&str> = IndexSet::new();
    for summary in &summaries {
        seen.extend(summary.metrics.keys().map(String::as_str));
        seen.extend(summary.failed_metrics.keys().map(String::as_str));
    }

    let mut metrics = IndexMap::new();
    let mut skipped = Vec::new();

    for name in seen {
        let in_all = summaries.iter().all(|s| s.metrics.contains_key(name));
        if !in_all {
            log::debug!("Metric '{}' is not available in every simulation, skipping", name);
            skipped.push(name.to_string());
            continue;
        }

        let baseline_mean = baseline.metrics[name].mean;
        let entries: Vec<ComparisonEntry> = summaries
            .iter()
            .map(|s| {
                let stats = &s.metrics[name];
                ComparisonEntry {
                    label: s.label.clone(),
                    mean: stats.mean,
                    std: stats.std,
                    relative_difference: RelativeDifference::between(stats.mean, baseline_mean),
                }
            })
            .collect();

        metrics.insert(name.to_string(), compare_metric(baseline.metrics[name].kind, entries));
    }

    if !skipped.is_empty() {
        log::info!(
            "{} metric(s) excluded from comparison: {}",
            skipped.len(),
            skipped.join(", ")
        );
    }

    Ok(ComparisonResult {
        baseline: baseline.label.clone(),
        labels: summaries.iter().map(|s| s.label.clone()).collect(),
        metrics,
        skipped,
    })
}

fn compare_metric(kind: MetricKind, entries: Vec<ComparisonEntry>) -> MetricComparison {
    // Stable sort keeps input order among equal means
    let mut ordered: Vec<&ComparisonEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    let ranking: Vec<String> = ordered.iter().map(|e| e.label.clone()).collect();

    let best = match kind.preference() {
        Preference::HigherIsBetter => ranking.first().cloned(),
        Preference::LowerIsBetter => {
            // Lowest mean, earliest label on ties
            let lowest = ordered.last().map(|e| e.mean);
            entries
                .iter()
                .find(|e| Some(e.mean) == lowest)
                .map(|e| e.label.clone())
        }
        Preference::Neutral => None,
    };

    MetricComparison {
        kind,
        ranking,
        best,
        entries,
    }
}
