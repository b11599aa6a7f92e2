//! Dataset store: the loaded records of one analysis session.
//!
//! An explicit instance is passed to every engine call. The store does no
//! internal locking; at most one mutating call may be in flight at a time.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::StoreError;
use super::types::SimulationRecord;

/// How a label collision between distinct sources is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateLabelPolicy {
    /// Keep the label; `add` reports the collision
    Reject,
    /// Append `_2`, `_3`, ... until the label is free
    #[default]
    Suffix,
}

/// Ordered mapping `label -> SimulationRecord`
#[derive(Debug, Default)]
pub struct DatasetStore {
    records: IndexMap<String, SimulationRecord>,
    sources: HashSet<PathBuf>,
    policy: DuplicateLabelPolicy,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicateLabelPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> DuplicateLabelPolicy {
        self.policy
    }

    /// Insert a record under `label`; fails if the label is taken
    pub fn add(&mut self, label: impl Into<String>, mut record: SimulationRecord) -> Result<(), StoreError> {
        let label = label.into();
        if self.records.contains_key(&label) {
            return Err(StoreError::DuplicateLabel { label });
        }

        record.label = label.clone();
        self.sources.insert(record.source.clone());
        self.records.insert(label, record);
        Ok(())
    }

    /// Label a new record would receive under the store's policy
    pub fn resolve_label(&self, base: &str) -> String {
        if self.policy == DuplicateLabelPolicy::Reject || !self.records.contains_key(base) {
            return base.to_string();
        }

        (2..)
            .map(|n| format!("{}_{}", base, n))
            .find(|candidate| !self.records.contains_key(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Whether a record from `source` is already in the store
    pub fn contains_source(&self, source: &Path) -> bool {
        self.sources.contains(source)
    }

    /// Add a freshly loaded record: reject a re-load of the same source,
    /// then resolve its label and insert it. Returns the final label.
    pub fn ingest(&mut self, record: SimulationRecord) -> Result<String, StoreError> {
        if self.contains_source(&record.source) {
            let label = self
                .records
                .values()
                .find(|existing| existing.source == record.source)
                .map(|existing| existing.label.clone())
                .unwrap_or_default();
            return Err(StoreError::SourceAlreadyLoaded {
                source_path: record.source,
                label,
            });
        }

        let label = self.resolve_label(&record.label);
        if label != record.label {
            log::info!(
                "Label '{}' already in use, storing {} as '{}'",
                record.label,
                record.source.display(),
                label
            );
        }
        self.add(label.clone(), record)?;
        Ok(label)
    }

    /// Drop every record; a no-op on an empty store
    pub fn clear(&mut self) {
        self.records.clear();
        self.sources.clear();
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&SimulationRecord> {
        self.records.get(label)
    }

    /// Records in insertion order
    pub fn all(&self) -> impl Iterator<Item = (&str, &SimulationRecord)> {
        self.records.iter().map(|(label, record)| (label.as_str(), record))
    }

    pub fn labels(&self) -> Vec<String> {
        self.records.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metric_kind::MetricKind;
    use crate::analysis::types::{Configuration, MetricSeries};

    fn record(label: &str, source: &str) -> SimulationRecord {
        let mut metrics = IndexMap::new();
        metrics.insert(
            "throughput".to_string(),
            MetricSeries::new(MetricKind::Throughput, vec![1.0, 2.0]),
        );
        SimulationRecord {
            label: label.to_string(),
            source: PathBuf::from(source),
            configuration: Configuration::new(),
            metrics,
        }
    }

    #[test]
    fn test_add_and_count() {
        let mut store = DatasetStore::new();
        store.add("a", record("a", "a.json")).unwrap();
        store.add("b", record("b", "b.json")).unwrap();
        assert_eq!(store.count(), 2);
        assert_eq!(store.labels(), vec!["a", "b"]);
    }

    #[test]
    fn test_add_duplicate_label_fails() {
        let mut store = DatasetStore::new();
        store.add("a", record("a", "one/a.json")).unwrap();
        let err = store.add("a", record("a", "two/a.json")).unwrap_err();
        assert_eq!(err, StoreError::DuplicateLabel { label: "a".to_string() });
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_ingest_suffixes_colliding_labels() {
        let mut store = DatasetStore::new();
        assert_eq!(store.ingest(record("run", "x/run.json")).unwrap(), "run");
        assert_eq!(store.ingest(record("run", "y/run.json")).unwrap(), "run_2");
        assert_eq!(store.ingest(record("run", "z/run.json")).unwrap(), "run_3");
        assert_eq!(store.get("run_2").unwrap().label, "run_2");
    }

    #[test]
    fn test_ingest_reject_policy() {
        let mut store = DatasetStore::with_policy(DuplicateLabelPolicy::Reject);
        store.ingest(record("run", "x/run.json")).unwrap();
        let err = store.ingest(record("run", "y/run.json")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateLabel { .. }));
    }

    #[test]
    fn test_ingest_same_source_twice_rejected() {
        let mut store = DatasetStore::new();
        store.ingest(record("run", "x/run.json")).unwrap();
        let err = store.ingest(record("run", "x/run.json")).unwrap_err();
        assert_eq!(
            err,
            StoreError::SourceAlreadyLoaded {
                source_path: PathBuf::from("x/run.json"),
                label: "run".to_string()
            }
        );
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = DatasetStore::new();
        store.clear();
        assert!(store.is_empty());

        store.ingest(record("a", "a.json")).unwrap();
        store.clear();
        store.clear();
        assert_eq!(store.count(), 0);
        assert!(!store.contains_source(Path::new("a.json")));
    }
}
