use super::containers::{Aggregates, Alert, AlertRule, Evidence};
use super::utils;

/// A source is flagged once its SSH-suspect count goes above this.
pub const SSH_BRUTEFORCE_THRESHOLD: usize = 20;
/// Distinct destination ports a source may touch before it counts as a scan.
pub const PORT_SCAN_THRESHOLD: usize = 10;
/// Total packets a source may send before it counts as abnormal traffic.
pub const TRAFFIC_VOLUME_THRESHOLD: usize = 100;

/// Flags sources with more than [SSH_BRUTEFORCE_THRESHOLD] SSH-suspect packets.
/// Highest count first.
pub fn scan_for_ssh_bruteforce(aggregates: &Aggregates) -> Vec<Alert> {
    log::info!("Looking for SSH brute force.");

    let flagged = utils::sort_by_count_desc(
        aggregates
            .sources
            .iter()
            .filter(|(_, agg)| agg.ssh_suspect > SSH_BRUTEFORCE_THRESHOLD)
            .map(|(src, agg)| (src.clone(), agg.ssh_suspect)),
    );

    flagged
        .into_iter()
        .map(|(source, count)| {
            log::warn!("Suspicious SSH activity from {source} ({count} attempts)");
            Alert {
                rule: AlertRule::SshBruteforce,
                source,
                evidence: Evidence::Count(count),
            }
        })
        .collect()
}

/// Flags sources that visited more than [PORT_SCAN_THRESHOLD] distinct ports.
///
/// Sources come out in key order; each alert carries every visited port, most
/// visited first.
pub fn scan_for_port_scans(aggregates: &Aggregates) -> Vec<Alert> {
    log::info!("Looking for port scans.");

    aggregates
        .sources
        .iter()
        .filter(|(_, agg)| agg.ports.len() > PORT_SCAN_THRESHOLD)
        .map(|(source, agg)| {
            log::warn!("Probable port scan from {source} ({} ports)", agg.ports.len());
            Alert {
                rule: AlertRule::PortScan,
                source: source.clone(),
                evidence: Evidence::Ports(agg.ports_by_count()),
            }
        })
        .collect()
}

/// Flags sources with more than [TRAFFIC_VOLUME_THRESHOLD] packets.
/// Highest count first.
pub fn scan_for_traffic_volume(aggregates: &Aggregates) -> Vec<Alert> {
    log::info!("Looking for abnormal traffic volume.");

    let flagged = utils::sort_by_count_desc(
        aggregates
            .sources
            .iter()
            .filter(|(_, agg)| agg.total > TRAFFIC_VOLUME_THRESHOLD)
            .map(|(src, agg)| (src.clone(), agg.total)),
    );

    flagged
        .into_iter()
        .map(|(source, count)| {
            log::warn!("Abnormal traffic from {source} ({count} packets)");
            Alert {
                rule: AlertRule::TrafficVolume,
                source,
                evidence: Evidence::Count(count),
            }
        })
        .collect()
}
