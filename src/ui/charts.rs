//! Bar chart data for the alert categories. Rendering is left to whatever consumes the JSON.
use serde::Serialize;

use crate::analyser::containers::{DetectionReport, Evidence};
use crate::analyser::utils;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    /// File stem a renderer should use for the image.
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<(String, usize)>,
}

/// SSH alerts as (source, attempts). `None` when nothing was flagged.
pub fn ssh_chart(report: &DetectionReport) -> Option<ChartSeries> {
    if report.ssh_alerts.is_empty() {
        return None;
    }

    Some(ChartSeries {
        name: "ssh_alertes".to_string(),
        title: "Suspicious SSH activity".to_string(),
        x_label: "Source".to_string(),
        y_label: "Attempts".to_string(),
        bars: report
            .ssh_alerts
            .iter()
            .map(|a| (a.source.clone(), a.magnitude()))
            .collect(),
    })
}

/// One (port, visits) chart per port scan alert.
pub fn scan_charts(report: &DetectionReport) -> Vec<ChartSeries> {
    report
        .scan_alerts
        .iter()
        .filter_map(|alert| match &alert.evidence {
            Evidence::Ports(ports) => Some(ChartSeries {
                name: format!("scan_ports_{}", utils::sanitize_file_stem(&alert.source)),
                title: format!("Port scan from {}", alert.source),
                x_label: "Port".to_string(),
                y_label: "Attempts".to_string(),
                bars: ports.clone(),
            }),
            Evidence::Count(_) => None,
        })
        .collect()
}

/// Top `n` sources by packet count, whether or not they were flagged.
pub fn top_traffic_chart(report: &DetectionReport, n: usize) -> ChartSeries {
    ChartSeries {
        name: "top_trafic".to_string(),
        title: format!("Top {n} hosts by traffic"),
        x_label: "Source".to_string(),
        y_label: "Packets".to_string(),
        bars: report.aggregates.top_talkers(n),
    }
}

pub fn all_charts(report: &DetectionReport, top: usize) -> Vec<ChartSeries> {
    let mut charts: Vec<ChartSeries> = ssh_chart(report).into_iter().collect();
    charts.extend(scan_charts(report));
    charts.push(top_traffic_chart(report, top));
    charts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyser::containers::PacketRecord;
    use crate::analyser::core;

    fn records() -> Vec<PacketRecord> {
        let mut records = Vec::new();
        for i in 0..30 {
            records.push(PacketRecord {
                timestamp: "00:00:00.0".to_string(),
                source: "10.0.0.66".to_string(),
                destination_address: "10.0.0.1".to_string(),
                destination_port: Some(if i < 22 { "22".to_string() } else { (1000 + i).to_string() }),
                flags: None,
                length: None,
            });
        }
        for port in 0..12 {
            records.push(PacketRecord {
                timestamp: "00:00:01.0".to_string(),
                source: "fe80::1".to_string(),
                destination_address: "fe80::2".to_string(),
                destination_port: Some(port.to_string()),
                flags: None,
                length: None,
            });
        }
        records
    }

    #[test]
    fn charts_follow_alerts() {
        let report = core::detect(&records());
        let charts = all_charts(&report, 5);

        assert_eq!(charts.len(), 3);
        assert_eq!(charts[0].name, "ssh_alertes");
        assert_eq!(charts[0].bars, vec![("10.0.0.66".to_string(), 22)]);
        assert_eq!(charts[1].name, "scan_ports_fe80__1");
        assert_eq!(charts[1].bars.len(), 12);
        assert_eq!(charts[2].name, "top_trafic");
        assert_eq!(charts[2].bars[0], ("10.0.0.66".to_string(), 30));
    }

    #[test]
    fn top_traffic_chart_without_alerts() {
        let report = core::detect(&records()[..5]);
        assert!(ssh_chart(&report).is_none());
        assert!(scan_charts(&report).is_empty());
        assert_eq!(top_traffic_chart(&report, 5).bars, vec![("10.0.0.66".to_string(), 5)]);
    }
}
