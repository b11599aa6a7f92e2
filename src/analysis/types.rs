//! Core data types for simulation aggregation and comparison.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::StatisticsError;
use super::metric_kind::{MetricKind, Preference};

/// A scalar configuration parameter of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => write!(f, "N/A"),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Ordered parameter name -> value mapping (node count, mobility model, attack type, ...)
pub type Configuration = IndexMap<String, ConfigValue>;

/// Sample sequence of one metric, tagged with its kind at load time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub kind: MetricKind,
    pub samples: Vec<f64>,
}

impl MetricSeries {
    pub fn new(kind: MetricKind, samples: Vec<f64>) -> Self {
        Self { kind, samples }
    }
}

/// One simulation run: configuration plus metric sample sequences
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRecord {
    pub label: String,
    /// Document the record was parsed from; used to reject re-loads
    pub source: PathBuf,
    pub configuration: Configuration,
    pub metrics: IndexMap<String, MetricSeries>,
}

impl SimulationRecord {
    /// Total sample count across every metric of the record
    pub fn data_points(&self) -> usize {
        self.metrics.values().map(|series| series.samples.len()).sum()
    }
}

/// Descriptive statistics of one metric sequence (population std)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStatistics {
    /// Kind tagged on the series at load time
    #[serde(default)]
    pub kind: MetricKind,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Computed statistics for one loaded record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub label: String,
    pub configuration: Configuration,
    /// Sum of sample counts across all metrics of the record
    pub data_points: usize,
    pub metrics: IndexMap<String, MetricStatistics>,
    /// Metrics whose statistics could not be computed; the rest of the
    /// summary is still valid
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub failed_metrics: IndexMap<String, StatisticsError>,
}

/// Summaries keyed by label, in Dataset Store insertion order
pub type Summaries = IndexMap<String, SimulationSummary>;

/// Percentage difference of a mean relative to the baseline mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RelativeDifference {
    Percent(f64),
    /// Baseline mean is zero and this mean is positive, or the percentage
    /// exceeds the f64 range upwards
    PositiveInfinity,
    /// Baseline mean is zero and this mean is negative, or the percentage
    /// exceeds the f64 range downwards
    NegativeInfinity,
    /// Baseline mean and this mean are both zero
    Undefined,
}

impl RelativeDifference {
    pub fn between(mean: f64, baseline: f64) -> Self {
        if baseline == 0.0 {
            if mean > 0.0 {
                RelativeDifference::PositiveInfinity
            } else if mean < 0.0 {
                RelativeDifference::NegativeInfinity
            } else {
                RelativeDifference::Undefined
            }
        } else {
            let difference = mean - baseline;
            let percent = if difference.is_finite() {
                difference / baseline * 100.0
            } else {
                (mean / baseline - 1.0) * 100.0
            };
            if percent.is_finite() {
                RelativeDifference::Percent(percent)
            } else if percent > 0.0 {
                RelativeDifference::PositiveInfinity
            } else if percent < 0.0 {
                RelativeDifference::NegativeInfinity
            } else {
                RelativeDifference::Undefined
            }
        }
    }

    /// Finite percentage, if there is one
    pub fn percent(&self) -> Option<f64> {
        match self {
            RelativeDifference::Percent(p) => Some(*p),
            _ => None,
        }
    }
}

impl fmt::Display for RelativeDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeDifference::Percent(p) => write!(f, "{:+.2}%", p),
            RelativeDifference::PositiveInfinity => write!(f, "+inf%"),
            RelativeDifference::NegativeInfinity => write!(f, "-inf%"),
            RelativeDifference::Undefined => write!(f, "undefined"),
        }
    }
}

/// One label's standing for a compared metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub label: String,
    pub mean: f64,
    pub std: f64,
    pub relative_difference: RelativeDifference,
}

/// Cross-run comparison of one metric common to all summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub kind: MetricKind,
    /// Labels ordered by descending mean; ties keep input order
    pub ranking: Vec<String>,
    /// Best label according to the metric kind's preference, if it has one
    pub best: Option<String>,
    /// Per-label entries in input order
    pub entries: Vec<ComparisonEntry>,
}

impl MetricComparison {
    pub fn preference(&self) -> Preference {
        self.kind.preference()
    }
}

/// Result of comparing two or more summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// First summary in input order; reference for relative differences
    pub baseline: String,
    pub labels: Vec<String>,
    pub metrics: IndexMap<String, MetricComparison>,
    /// Metrics not present (or not computable) in every summary
    pub skipped: Vec<String>,
}

/// Category of a generated plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Performance,
    Comparison,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Performance => write!(f, "performance"),
            ArtifactKind::Comparison => write!(f, "comparison"),
        }
    }
}

/// A plot file written to durable storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    /// Simulation the plot belongs to (performance plots only)
    pub label: Option<String>,
    /// Metric shown, when the plot is about a single metric
    pub metric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_kind: Option<MetricKind>,
}

impl Artifact {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Caption for gallery listings and reports
    pub fn description(&self) -> String {
        match (&self.metric, self.kind) {
            (Some(_), ArtifactKind::Performance) => format!(
                "Distribution of {}",
                self.metric_kind.unwrap_or_default().description().to_lowercase()
            ),
            (Some(metric), ArtifactKind::Comparison) => format!(
                "Mean {} per simulation with standard deviation",
                super::metric_kind::display_name(metric).to_lowercase()
            ),
            (None, ArtifactKind::Performance) => {
                "Metric samples over the course of the run, one panel per metric".to_string()
            }
            (None, ArtifactKind::Comparison) => {
                "Relative difference of every simulation against the baseline".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_value_untagged_parsing() {
        let config: Configuration = serde_json::from_str(
            r#"{"num_nodes": 50, "speed": 2.5, "mobility": "random_waypoint", "attack": null, "secure": true}"#,
        )
        .unwrap();
        assert_eq!(config["num_nodes"], ConfigValue::Integer(50));
        assert_eq!(config["speed"], ConfigValue::Float(2.5));
        assert_eq!(config["mobility"], ConfigValue::Text("random_waypoint".to_string()));
        assert_eq!(config["attack"], ConfigValue::Null);
        assert_eq!(config["secure"], ConfigValue::Bool(true));
        let keys: Vec<_> = config.keys().cloned().collect();
        assert_eq!(keys, vec!["num_nodes", "speed", "mobility", "attack", "secure"]);
    }

    #[test]
    fn test_relative_difference_zero_baseline() {
        assert_eq!(RelativeDifference::between(5.0, 0.0), RelativeDifference::PositiveInfinity);
        assert_eq!(RelativeDifference::between(-5.0, 0.0), RelativeDifference::NegativeInfinity);
        assert_eq!(RelativeDifference::between(0.0, 0.0), RelativeDifference::Undefined);
        assert_eq!(RelativeDifference::between(15.0, 10.0), RelativeDifference::Percent(50.0));
    }

    #[test]
    fn test_relative_difference_tiny_or_huge_operands() {
        assert_eq!(RelativeDifference::between(1.0, 1e-310), RelativeDifference::PositiveInfinity);
        assert_eq!(RelativeDifference::between(1.0, -1e-310), RelativeDifference::NegativeInfinity);
        assert_eq!(
            RelativeDifference::between(-1.7e308, 1.7e308),
            RelativeDifference::Percent(-200.0)
        );
        assert_eq!(
            RelativeDifference::between(1.7e308, 1e-300),
            RelativeDifference::PositiveInfinity
        );
    }

    #[test]
    fn test_relative_difference_display() {
        assert_eq!(RelativeDifference::Percent(100.0).to_string(), "+100.00%");
        assert_eq!(RelativeDifference::Undefined.to_string(), "undefined");
    }

    #[test]
    fn test_data_points_sums_all_metrics() {
        let mut metrics = IndexMap::new();
        metrics.insert("throughput".to_string(), MetricSeries::new(MetricKind::Throughput, vec![1.0, 2.0]));
        metrics.insert("trust_score".to_string(), MetricSeries::new(MetricKind::TrustScore, vec![0.5; 5]));
        let record = SimulationRecord {
            label: "run".to_string(),
            source: PathBuf::from("run.json"),
            configuration: Configuration::new(),
            metrics,
        };
        assert_eq!(record.data_points(), 7);
    }
}
