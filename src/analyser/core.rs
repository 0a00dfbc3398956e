use super::containers::{Aggregates, DetectionReport, PacketRecord};
use super::scan;

/// Builds per-source aggregates in one forward pass over the records.
pub fn aggregate(records: &[PacketRecord]) -> Aggregates {
    let mut aggregates = Aggregates::new();
    for record in records {
        aggregates.observe(record);
    }

    log::info!(
        "Aggregated {} packets from {} sources.",
        aggregates.packet_count(),
        aggregates.sources.len()
    );
    aggregates
}

/// Runs every detection rule over an aggregate snapshot.
pub fn evaluate(aggregates: Aggregates) -> DetectionReport {
    let ssh_alerts = scan::scan_for_ssh_bruteforce(&aggregates);
    let scan_alerts = scan::scan_for_port_scans(&aggregates);
    let traffic_alerts = scan::scan_for_traffic_volume(&aggregates);

    log::info!(
        "Flagged {} SSH, {} port scan and {} traffic sources.",
        ssh_alerts.len(),
        scan_alerts.len(),
        traffic_alerts.len()
    );

    DetectionReport {
        aggregates,
        ssh_alerts,
        scan_alerts,
        traffic_alerts,
    }
}

/// Aggregates the records, then evaluates the rules once over the final counters.
pub fn detect(records: &[PacketRecord]) -> DetectionReport {
    log::info!("Starting analysis.");
    evaluate(aggregate(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyser::containers::{AlertRule, Evidence};
    use crate::analyser::parser;

    fn record(source: &str, port: &str) -> PacketRecord {
        PacketRecord {
            timestamp: "09:15:00.000000".to_string(),
            source: source.to_string(),
            destination_address: "10.0.0.9".to_string(),
            destination_port: Some(port.to_string()),
            flags: Some("S".to_string()),
            length: Some("0".to_string()),
        }
    }

    #[test]
    fn ssh_boundary() {
        let over: Vec<PacketRecord> = (0..21).map(|_| record("1.1.1.1", "22")).collect();
        let report = detect(&over);
        assert_eq!(report.ssh_alerts.len(), 1);
        assert_eq!(report.ssh_alerts[0].evidence, Evidence::Count(21));

        let at: Vec<PacketRecord> = (0..20).map(|_| record("1.1.1.1", "22")).collect();
        assert!(detect(&at).ssh_alerts.is_empty());
    }

    #[test]
    fn port_scan_boundary() {
        let eleven: Vec<PacketRecord> = (1..=11).map(|p| record("2.2.2.2", &p.to_string())).collect();
        let report = detect(&eleven);
        assert_eq!(report.scan_alerts.len(), 1);
        assert_eq!(report.scan_alerts[0].rule, AlertRule::PortScan);
        assert_eq!(report.scan_alerts[0].magnitude(), 11);

        let ten: Vec<PacketRecord> = (1..=10).map(|p| record("2.2.2.2", &p.to_string())).collect();
        assert!(detect(&ten).scan_alerts.is_empty());
    }

    #[test]
    fn traffic_boundary() {
        let records: Vec<PacketRecord> = (0..101).map(|_| record("3.3.3.3", "80")).collect();
        let report = detect(&records);
        assert_eq!(report.traffic_alerts.len(), 1);
        assert_eq!(report.traffic_alerts[0].source, "3.3.3.3");
        assert_eq!(report.traffic_alerts[0].evidence, Evidence::Count(101));
    }

    #[test]
    fn detect_is_idempotent() {
        let mut records: Vec<PacketRecord> = (0..150).map(|i| record("4.4.4.4", &(i % 15).to_string())).collect();
        records.extend((0..30).map(|_| record("sshd-host", "8080")));

        let first = detect(&records);
        let second = detect(&records);
        assert_eq!(first, second);
        assert_eq!(first.alert_count(), 3);
    }

    #[test]
    fn empty_input_is_evaluated_with_no_alerts() {
        let report = detect(&[]);
        assert!(report.aggregates.is_empty());
        assert_eq!(report.alert_count(), 0);
    }

    #[test]
    fn end_to_end_ssh_only_capture() {
        let mut capture = String::from("tcpdump: verbose output suppressed, use -v for full protocol decode\n");
        for i in 0..25 {
            capture.push_str(&format!(
                "10:20:{:02}.{:06} IP 1.2.3.4 > 10.0.0.1.22: Flags [S], seq {}, win 64240, length 0\n",
                i, i * 7, i
            ));
            capture.push_str("\t0x0000:  4500 003c 1c46 4000 4006 b1e6 ac10 0a63\n");
        }

        let records = parser::parse_lines(capture.lines());
        assert_eq!(records.len(), 25);

        let report = detect(&records);
        assert_eq!(report.ssh_alerts.len(), 1);
        assert_eq!(report.ssh_alerts[0].source, "1.2.3.4");
        assert_eq!(report.ssh_alerts[0].evidence, Evidence::Count(25));
        assert!(report.scan_alerts.is_empty());
        assert!(report.traffic_alerts.is_empty());
    }
}
