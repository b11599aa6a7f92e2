//! Per-metric descriptive statistics.
//!
//! All computation is in `f64`. The standard deviation is the population
//! deviation (divide by `count`): a run's samples are the complete observed
//! population for that run.

use indexmap::IndexMap;
use rayon::prelude::*;

use super::error::StatisticsError;
use super::metric_kind::MetricKind;
use super::store::DatasetStore;
use super::types::{MetricSeries, MetricStatistics, SimulationRecord, SimulationSummary, Summaries};

/// Samples above this magnitude are rescaled before accumulating
const SCALE_THRESHOLD: f64 = 1e150;

impl MetricStatistics {
    /// Statistics of one sample sequence.
    ///
    /// Fails on an empty sequence and on the first NaN/infinite sample. Any
    /// finite sequence has finite statistics. The kind is left as
    /// [`MetricKind::Other`]; [`MetricSeries::statistics`] tags it.
    pub fn from_samples(samples: &[f64]) -> Result<Self, StatisticsError> {
        if samples.is_empty() {
            return Err(StatisticsError::Empty);
        }

        if let Some((index, value)) = samples.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(StatisticsError::NonFinite {
                index,
                value: value.to_string(),
            });
        }

        let count = samples.len();
        let n = count as f64;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Very large magnitudes are summed in units of the largest one so the
        // accumulators stay finite
        let max_abs = min.abs().max(max.abs());
        let scale = if max_abs > SCALE_THRESHOLD { max_abs } else { 1.0 };

        let scaled_mean = samples.iter().map(|x| x / scale).sum::<f64>() / n;
        let scaled_variance = samples
            .iter()
            .map(|x| (x / scale - scaled_mean).powi(2))
            .sum::<f64>()
            / n;
        let mean = scaled_mean * scale;
        let std = scaled_variance.sqrt() * scale;

        if !mean.is_finite() || !std.is_finite() {
            return Err(StatisticsError::Overflow);
        }

        Ok(Self {
            kind: MetricKind::Other,
            count,
            // Rounding in the sum can push the mean a ulp outside the sample range
            mean: mean.clamp(min, max),
            std,
            min,
            max,
        })
    }
}

impl MetricSeries {
    /// Statistics of the samples, tagged with the series kind
    pub fn statistics(&self) -> Result<MetricStatistics, StatisticsError> {
        MetricStatistics::from_samples(&self.samples).map(|stats| MetricStatistics {
            kind: self.kind,
            ..stats
        })
    }
}

/// Summarise one record. A metric whose statistics fail is listed in
/// `failed_metrics`; the other metrics are unaffected.
pub fn summarize(record: &SimulationRecord) -> SimulationSummary {
    let mut metrics = IndexMap::with_capacity(record.metrics.len());
    let mut failed_metrics = IndexMap::new();

    for (name, series) in &record.metrics {
        match series.statistics() {
            Ok(stats) => {
                metrics.insert(name.clone(), stats);
            }
            Err(e) => {
                log::warn!("Skipping metric '{}' of '{}': {}", name, record.label, e);
                failed_metrics.insert(name.clone(), e);
            }
        }
    }

    SimulationSummary {
        label: record.label.clone(),
        configuration: record.configuration.clone(),
        data_points: record.data_points(),
        metrics,
        failed_metrics,
    }
}

/// Summarise every record in the store, preserving insertion order.
///
/// Records are summarised in parallel; the store is borrowed immutably so
/// no `add`/`clear` can interleave.
pub fn summarize_all(store: &DatasetStore) -> Summaries {
    let records: Vec<(&str, &SimulationRecord)> = store.all().collect();

    let summaries: Vec<(String, SimulationSummary)> = records
        .par_iter()
        .map(|(label, record)| (label.to_string(), summarize(record)))
        .collect();

    log::info!("Computed summaries for {} simulations", summaries.len());
    summaries.into_iter().collect()
}
