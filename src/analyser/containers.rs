use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::utils;

/// One packet observation, as printed on a single capture line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PacketRecord {
    pub timestamp: String,
    pub source: String,
    pub destination_address: String,
    pub destination_port: Option<String>,
    pub flags: Option<String>,
    /// Digits as printed, leading zeros included.
    pub length: Option<String>,
}

impl PacketRecord {
    /// SSH-suspect: destination port 22, or "ssh" anywhere in the source.
    pub fn is_ssh_suspect(&self) -> bool {
        self.destination_port.as_deref() == Some("22")
            || utils::contains_ignore_ascii_case(&self.source, "ssh")
    }
}

/// Running counters for a single source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SourceAggregate {
    pub total: usize,
    pub ssh_suspect: usize,
    pub ports: BTreeMap<String, usize>,
}

impl SourceAggregate {
    fn merge(&mut self, other: &SourceAggregate) {
        self.total += other.total;
        self.ssh_suspect += other.ssh_suspect;
        for (port, count) in &other.ports {
            *self.ports.entry(port.clone()).or_insert(0) += count;
        }
    }

    /// Visited ports, most visited first.
    pub fn ports_by_count(&self) -> Vec<(String, usize)> {
        utils::sort_by_count_desc(self.ports.iter().map(|(p, c)| (p.clone(), *c)))
    }
}

/// Per-source aggregates for one detection pass, keyed by source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    pub sources: BTreeMap<String, SourceAggregate>,
}

impl Aggregates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a single record into the counters.
    pub fn observe(&mut self, record: &PacketRecord) {
        let entry = self.sources.entry(record.source.clone()).or_default();

        entry.total += 1;

        if record.is_ssh_suspect() {
            entry.ssh_suspect += 1;
        }

        if let Some(port) = record.destination_port.as_deref().filter(|p| !p.is_empty()) {
            *entry.ports.entry(port.to_string()).or_insert(0) += 1;
        }
    }

    /// Combines aggregates built over disjoint shards of the same capture.
    pub fn merge(mut self, other: &Aggregates) -> Self {
        for (source, aggregate) in &other.sources {
            self.sources.entry(source.clone()).or_default().merge(aggregate);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn packet_count(&self) -> usize {
        self.sources.values().map(|s| s.total).sum()
    }

    /// Every source ranked by total packet count, keeping the first `n`.
    /// Independent of any alert threshold.
    pub fn top_talkers(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked = utils::sort_by_count_desc(
            self.sources.iter().map(|(src, agg)| (src.clone(), agg.total)),
        );
        ranked.truncate(n);
        ranked
    }

    /// Every source with at least one SSH-suspect packet, busiest first.
    pub fn ssh_activity(&self) -> Vec<(String, usize)> {
        utils::sort_by_count_desc(
            self.sources
                .iter()
                .filter(|(_, agg)| agg.ssh_suspect > 0)
                .map(|(src, agg)| (src.clone(), agg.ssh_suspect)),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertRule {
    SshBruteforce,
    PortScan,
    TrafficVolume,
}

impl fmt::Display for AlertRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            AlertRule::SshBruteforce => "SSH_BRUTEFORCE",
            AlertRule::PortScan => "PORT_SCAN",
            AlertRule::TrafficVolume => "TRAFFIC_VOLUME",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Evidence {
    Count(usize),
    /// (port, visits), most visited first.
    Ports(Vec<(String, usize)>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub rule: AlertRule,
    pub source: String,
    pub evidence: Evidence,
}

impl Alert {
    /// The count for count-based rules, or the number of distinct ports.
    pub fn magnitude(&self) -> usize {
        match &self.evidence {
            Evidence::Count(n) => *n,
            Evidence::Ports(ports) => ports.len(),
        }
    }
}

/// Everything a detection pass produces. Empty alert lists mean the rule was
/// evaluated and flagged nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetectionReport {
    pub aggregates: Aggregates,
    pub ssh_alerts: Vec<Alert>,
    pub scan_alerts: Vec<Alert>,
    pub traffic_alerts: Vec<Alert>,
}

impl DetectionReport {
    pub fn alert_count(&self) -> usize {
        self.ssh_alerts.len() + self.scan_alerts.len() + self.traffic_alerts.len()
    }
}
