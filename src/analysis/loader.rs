//! Record loader for simulation result documents.
//!
//! Parses one JSON or YAML result document into a validated
//! [`SimulationRecord`]. Loading never touches the Dataset Store; callers add
//! the record themselves, so a failed load leaves the store unchanged.

use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::error::LoadError;
use super::metric_kind::classify;
use super::types::{Configuration, MetricSeries, SimulationRecord};

/// Encoding of a result document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` are YAML, everything else is treated as JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Top-level shape of a result document; unknown fields are ignored
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(alias = "config")]
    configuration: Option<Configuration>,
    metrics: Option<RawMetrics>,
}

/// Metric samples keyed by raw name; a name declared twice is an error
#[derive(Debug)]
struct RawMetrics(IndexMap<String, Vec<f64>>);

impl<'de> Deserialize<'de> for RawMetrics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetricsVisitor;

        impl<'de> Visitor<'de> for MetricsVisitor {
            type Value = RawMetrics;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of metric names to sample sequences")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawMetrics, A::Error> {
                let mut metrics = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, samples)) = access.next_entry::<String, Vec<f64>>()? {
                    if metrics.contains_key(&name) {
                        return Err(de::Error::custom(format!("duplicate metric '{}'", name)));
                    }
                    metrics.insert(name, samples);
                }
                Ok(RawMetrics(metrics))
            }
        }

        deserializer.deserialize_map(MetricsVisitor)
    }
}

/// Label derived from a source identifier (the file stem)
pub fn label_for(source: &Path) -> String {
    source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "simulation".to_string())
}

/// Load a single result document from disk
pub fn load(source: &Path) -> Result<SimulationRecord, LoadError> {
    log::debug!("Loading simulation result from {}", source.display());

    let content = fs::read_to_string(source).map_err(|e| LoadError::Unreadable {
        path: source.to_path_buf(),
        source: e,
    })?;

    parse_document(source, &content, DocumentFormat::from_path(source))
}

/// Parse document text that came from `source`
pub fn parse_document(
    source: &Path,
    content: &str,
    format: DocumentFormat,
) -> Result<SimulationRecord, LoadError> {
    let malformed = |reason: String| LoadError::Malformed {
        path: source.to_path_buf(),
        reason,
    };

    let raw: RawDocument = match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?,
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| malformed(e.to_string()))?,
    };

    let configuration = raw.configuration.ok_or_else(|| LoadError::MissingSection {
        path: source.to_path_buf(),
        section: "configuration",
    })?;
    let RawMetrics(raw_metrics) = raw.metrics.ok_or_else(|| LoadError::MissingSection {
        path: source.to_path_buf(),
        section: "metrics",
    })?;

    let mut metrics: IndexMap<String, MetricSeries> = IndexMap::with_capacity(raw_metrics.len());
    for (raw_name, samples) in raw_metrics {
        if samples.is_empty() {
            return Err(LoadError::EmptyMetric {
                path: source.to_path_buf(),
                metric: raw_name,
            });
        }

        let (name, kind) = classify(&raw_name);
        if metrics.contains_key(&name) {
            return Err(malformed(format!(
                "metric '{}' resolves to '{}', which is already declared",
                raw_name, name
            )));
        }
        metrics.insert(name, MetricSeries::new(kind, samples));
    }

    let record = SimulationRecord {
        label: label_for(source),
        source: source.to_path_buf(),
        configuration,
        metrics,
    };

    log::debug!(
        "Parsed '{}': {} parameters, {} metrics, {} data points",
        record.label,
        record.configuration.len(),
        record.metrics.len(),
        record.data_points()
    );

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metric_kind::MetricKind;
    use crate::analysis::types::ConfigValue;
    use std::io::Write;
    use std::path::PathBuf;

    fn parse_json(content: &str) -> Result<SimulationRecord, LoadError> {
        parse_document(Path::new("run_a.json"), content, DocumentFormat::Json)
    }

    #[test]
    fn test_parse_valid_document() {
        let record = parse_json(
            r#"{
                "configuration": {"num_nodes": 20, "attack_type": "blackhole"},
                "metrics": {
                    "Throughput": [10.0, 12.0, 11.0],
                    "End-to-End Delay": [0.2, 0.3],
                    "hop_count": [3, 4, 5, 4]
                },
                "generator": "ns-3"
            }"#,
        )
        .unwrap();

        assert_eq!(record.label, "run_a");
        assert_eq!(record.configuration["num_nodes"], ConfigValue::Integer(20));
        let names: Vec<_> = record.metrics.keys().cloned().collect();
        assert_eq!(names, vec!["throughput", "end_to_end_delay", "hop_count"]);
        assert_eq!(record.metrics["throughput"].kind, MetricKind::Throughput);
        assert_eq!(record.metrics["hop_count"].kind, MetricKind::Other);
        assert_eq!(record.data_points(), 9);
    }

    #[test]
    fn test_config_alias_accepted() {
        let record = parse_json(r#"{"config": {"seed": 1}, "metrics": {"pdr": [0.9]}}"#).unwrap();
        assert_eq!(record.configuration["seed"], ConfigValue::Integer(1));
        assert!(record.metrics.contains_key("packet_delivery_ratio"));
    }

    #[test]
    fn test_malformed_document() {
        let err = parse_json("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));

        let err = parse_json(r#"{"configuration": {}, "metrics": {"throughput": "fast"}}"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));

        let err = parse_json(r#"{"configuration": {"nested": {"a": 1}}, "metrics": {"x": [1]}}"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn test_missing_sections() {
        match parse_json(r#"{"metrics": {"throughput": [1.0]}}"#).unwrap_err() {
            LoadError::MissingSection { section, .. } => assert_eq!(section, "configuration"),
            other => panic!("unexpected error: {other}"),
        }
        match parse_json(r#"{"configuration": {}}"#).unwrap_err() {
            LoadError::MissingSection { section, .. } => assert_eq!(section, "metrics"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_metric_rejected() {
        match parse_json(r#"{"configuration": {}, "metrics": {"throughput": []}}"#).unwrap_err() {
            LoadError::EmptyMetric { metric, .. } => assert_eq!(metric, "throughput"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_colliding_metric_keys_rejected() {
        let err = parse_json(r#"{"configuration": {}, "metrics": {"Throughput": [1], "throughput ": [2]}}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn test_repeated_metric_key_rejected() {
        let err = parse_json(r#"{"configuration": {}, "metrics": {"throughput": [], "throughput": [1.0]}}"#)
            .unwrap_err();
        match err {
            LoadError::Malformed { reason, .. } => assert!(reason.contains("duplicate metric 'throughput'")),
            other => panic!("unexpected error: {other}"),
        }

        let err = parse_json(r#"{"configuration": {}, "metrics": {"delay": [5.0], "delay": [1.0]}}"#).unwrap_err();
        assert_eq!(err.kind(), "malformed");

        let yaml = "configuration: {}\nmetrics:\n  throughput: [1.0]\n  throughput: [2.0]\n";
        let err = parse_document(Path::new("dup.yaml"), yaml, DocumentFormat::Yaml).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }));
    }

    #[test]
    fn test_metrics_null_is_missing() {
        let err = parse_json(r#"{"configuration": {}, "metrics": null}"#).unwrap_err();
        assert!(matches!(err, LoadError::MissingSection { section: "metrics", .. }));
    }

    #[test]
    fn test_yaml_document_with_non_finite_samples() {
        let yaml = r#"
configuration:
  num_nodes: 30
  mobility: random_waypoint
metrics:
  trust_score: [0.5, .nan, 0.7]
"#;
        let record = parse_document(Path::new("trust.yaml"), yaml, DocumentFormat::Yaml).unwrap();
        assert_eq!(record.label, "trust");
        assert!(record.metrics["trust_score"].samples[1].is_nan());
    }

    #[test]
    fn test_load_from_file_and_unreadable() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"configuration": {{"num_nodes": 10}}, "metrics": {{"throughput": [1.0, 2.0]}}}}"#).unwrap();
        let record = load(file.path()).unwrap();
        assert_eq!(record.source, file.path());

        let err = load(&PathBuf::from("/nonexistent/run.json")).unwrap_err();
        assert_eq!(err.kind(), "unreadable");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.YML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("a")), DocumentFormat::Json);
    }
}
