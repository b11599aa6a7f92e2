//! Metric vocabulary and classification.
//!
//! Metric keys are normalised when a record is loaded and looked up in a
//! fixed table. The resulting [`MetricKind`] travels with the samples so
//! plots and reports never have to guess from substrings of a name.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Known category of a simulated metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Throughput,
    EndToEndDelay,
    PacketDeliveryRatio,
    PacketLoss,
    TrustScore,
    RoutingOverhead,
    EnergyConsumption,
    DetectionRate,
    FalsePositiveRate,
    /// Anything outside the known vocabulary; kept verbatim
    #[default]
    Other,
}

/// Which direction of a metric counts as an improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    HigherIsBetter,
    LowerIsBetter,
    Neutral,
}

/// One row of the classification table
struct VocabularyEntry {
    canonical: &'static str,
    aliases: &'static [&'static str],
    kind: MetricKind,
}

const VOCABULARY: &[VocabularyEntry] = &[
    VocabularyEntry {
        canonical: "throughput",
        aliases: &["throughput_kbps", "throughput_mbps", "avg_throughput", "network_throughput"],
        kind: MetricKind::Throughput,
    },
    VocabularyEntry {
        canonical: "end_to_end_delay",
        aliases: &["delay", "e2e_delay", "end2end_delay", "latency", "avg_delay"],
        kind: MetricKind::EndToEndDelay,
    },
    VocabularyEntry {
        canonical: "packet_delivery_ratio",
        aliases: &["pdr", "delivery_ratio", "packet_delivery_rate"],
        kind: MetricKind::PacketDeliveryRatio,
    },
    VocabularyEntry {
        canonical: "packet_loss",
        aliases: &["packet_loss_ratio", "loss_rate", "dropped_packets", "packet_drop_rate"],
        kind: MetricKind::PacketLoss,
    },
    VocabularyEntry {
        canonical: "trust_score",
        aliases: &["trust", "trust_scores", "trust_value", "avg_trust"],
        kind: MetricKind::TrustScore,
    },
    VocabularyEntry {
        canonical: "routing_overhead",
        aliases: &["overhead", "control_overhead", "normalized_routing_load", "nrl"],
        kind: MetricKind::RoutingOverhead,
    },
    VocabularyEntry {
        canonical: "energy_consumption",
        aliases: &["energy", "energy_consumed", "residual_energy_drop"],
        kind: MetricKind::EnergyConsumption,
    },
    VocabularyEntry {
        canonical: "detection_rate",
        aliases: &["detection_accuracy", "attack_detection_rate", "true_positive_rate"],
        kind: MetricKind::DetectionRate,
    },
    VocabularyEntry {
        canonical: "false_positive_rate",
        aliases: &["fpr", "false_alarm_rate", "false_positives"],
        kind: MetricKind::FalsePositiveRate,
    },
];

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\-]+").expect("Invalid separator regex"));

/// Normalise a metric key for vocabulary matching:
/// trim, lowercase, collapse whitespace and `-` runs into `_`.
pub fn normalize_key(raw: &str) -> String {
    SEPARATORS
        .replace_all(raw.trim(), "_")
        .to_lowercase()
}

/// Resolve a raw metric key to its stored name and kind.
///
/// Known metrics (canonical name or alias) map to the canonical name.
/// Unknown metrics keep the raw key unchanged and are tagged [`MetricKind::Other`].
pub fn classify(raw: &str) -> (String, MetricKind) {
    let normalized = normalize_key(raw);
    VOCABULARY
        .iter()
        .find(|entry| entry.canonical == normalized || entry.aliases.contains(&normalized.as_str()))
        .map(|entry| (entry.canonical.to_string(), entry.kind))
        .unwrap_or_else(|| (raw.to_string(), MetricKind::Other))
}

impl MetricKind {
    /// Kind of an already-stored metric name
    pub fn of(name: &str) -> Self {
        classify(name).1
    }

    pub fn title(self) -> &'static str {
        match self {
            MetricKind::Throughput => "Throughput",
            MetricKind::EndToEndDelay => "End-to-End Delay",
            MetricKind::PacketDeliveryRatio => "Packet Delivery Ratio",
            MetricKind::PacketLoss => "Packet Loss",
            MetricKind::TrustScore => "Trust Score",
            MetricKind::RoutingOverhead => "Routing Overhead",
            MetricKind::EnergyConsumption => "Energy Consumption",
            MetricKind::DetectionRate => "Detection Rate",
            MetricKind::FalsePositiveRate => "False Positive Rate",
            MetricKind::Other => "Metric",
        }
    }

    /// Axis unit; empty for dimensionless or unknown metrics
    pub fn unit(self) -> &'static str {
        match self {
            MetricKind::Throughput => "kbps",
            MetricKind::EndToEndDelay => "s",
            MetricKind::PacketDeliveryRatio
            | MetricKind::PacketLoss
            | MetricKind::DetectionRate
            | MetricKind::FalsePositiveRate => "ratio",
            MetricKind::RoutingOverhead => "packets",
            MetricKind::EnergyConsumption => "J",
            MetricKind::TrustScore | MetricKind::Other => "",
        }
    }

    /// Axis label: title plus unit when there is one
    pub fn axis_label(self) -> String {
        match self.unit() {
            "" => self.title().to_string(),
            unit => format!("{} ({})", self.title(), unit),
        }
    }

    pub fn preference(self) -> Preference {
        match self {
            MetricKind::Throughput
            | MetricKind::PacketDeliveryRatio
            | MetricKind::TrustScore
            | MetricKind::DetectionRate => Preference::HigherIsBetter,
            MetricKind::EndToEndDelay
            | MetricKind::PacketLoss
            | MetricKind::RoutingOverhead
            | MetricKind::EnergyConsumption
            | MetricKind::FalsePositiveRate => Preference::LowerIsBetter,
            MetricKind::Other => Preference::Neutral,
        }
    }

    /// One-line description used for plot captions and report legends
    pub fn description(self) -> &'static str {
        match self {
            MetricKind::Throughput => "Data delivered per unit time across the network",
            MetricKind::EndToEndDelay => "Time for a packet to travel from source to destination",
            MetricKind::PacketDeliveryRatio => "Fraction of sent packets that reached their destination",
            MetricKind::PacketLoss => "Packets dropped in transit, including by malicious nodes",
            MetricKind::TrustScore => "Trust assigned to nodes by the security mechanism",
            MetricKind::RoutingOverhead => "Control traffic spent on route discovery and maintenance",
            MetricKind::EnergyConsumption => "Energy spent by nodes during the run",
            MetricKind::DetectionRate => "Share of attacks correctly detected",
            MetricKind::FalsePositiveRate => "Share of benign behaviour flagged as malicious",
            MetricKind::Other => "Simulation metric outside the known vocabulary",
        }
    }
}

/// Human-friendly title for a stored metric name: known metrics use the
/// table title, unknown ones are title-cased from their key.
pub fn display_name(name: &str) -> String {
    match MetricKind::of(name) {
        MetricKind::Other => name
            .split(|c: char| c == '_' || c.is_whitespace())
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        kind => kind.title().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  End To End-Delay "), "end_to_end_delay");
        assert_eq!(normalize_key("Throughput"), "throughput");
        assert_eq!(normalize_key("trust   score"), "trust_score");
    }

    #[test]
    fn test_classify_known_and_aliases() {
        assert_eq!(classify("Throughput"), ("throughput".to_string(), MetricKind::Throughput));
        assert_eq!(classify("E2E Delay"), ("end_to_end_delay".to_string(), MetricKind::EndToEndDelay));
        assert_eq!(classify("PDR"), ("packet_delivery_ratio".to_string(), MetricKind::PacketDeliveryRatio));
        assert_eq!(classify("trust"), ("trust_score".to_string(), MetricKind::TrustScore));
    }

    #[test]
    fn test_axis_labels() {
        assert_eq!(MetricKind::EndToEndDelay.axis_label(), "End-to-End Delay (s)");
        assert_eq!(MetricKind::TrustScore.axis_label(), "Trust Score");
    }

    #[test]
    fn test_unknown_metric_kept_verbatim() {
        assert_eq!(classify("Blackhole Hits"), ("Blackhole Hits".to_string(), MetricKind::Other));
    }

    #[test]
    fn test_preferences() {
        assert_eq!(MetricKind::Throughput.preference(), Preference::HigherIsBetter);
        assert_eq!(MetricKind::EndToEndDelay.preference(), Preference::LowerIsBetter);
        assert_eq!(MetricKind::Other.preference(), Preference::Neutral);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("throughput"), "Throughput");
        assert_eq!(display_name("hop_count"), "Hop Count");
    }
}
