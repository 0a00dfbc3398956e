use crate::analyser::containers::{Alert, DetectionReport};
use crate::ui::charts::ChartSeries;
use ansi_term::Colour;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// Everything emitted in JSON mode.
#[derive(Debug, Serialize)]
pub struct AnalysisOutput<'a> {
    pub generated_at: String,
    pub capture_file: String,
    pub records_parsed: usize,
    pub report: &'a DetectionReport,
    pub top_talkers: Vec<(String, usize)>,
    pub charts: &'a [ChartSeries],
}

pub fn print_results(report: &DetectionReport, records_parsed: usize, top: usize) {
    println!("\n\u{250F}\u{2501}\u{2501}\u{2501}\u{2501} Results");
    print_summary(report, records_parsed);
    print_ssh(report);
    print_scans(report);
    print_traffic(report);
    print_top_talkers(report, top);
    println!("\u{2517}\u{2501}\u{2501}\u{2501}\u{2501}");
}

fn print_summary(report: &DetectionReport, records_parsed: usize) {
    println!("\u{2503}");
    println!("\u{2503} Packets parsed   : {}", Colour::Fixed(226).paint(records_parsed.to_string()));
    println!("\u{2503} Sources          : {}", Colour::Fixed(226).paint(report.aggregates.sources.len().to_string()));
    println!("\u{2503} Alerts           : {}", Colour::Red.paint(report.alert_count().to_string()));
    println!("\u{2503} ");
}

fn print_ssh(report: &DetectionReport) {
    println!("\u{2503} {} (many SSH attempts)", Colour::Cyan.bold().paint("SSH activity"));
    for (source, count) in report.aggregates.ssh_activity() {
        println!("\u{2503}   {source} \u{2192} {count} packets");
    }
    for alert in &report.ssh_alerts {
        print_alert(alert, &format!("Suspicious SSH activity from {} ({} attempts)", alert.source, alert.magnitude()));
    }
    println!("\u{2503} ");
}

fn print_scans(report: &DetectionReport) {
    println!("\u{2503} {} (many ports probed)", Colour::Cyan.bold().paint("Port scans"));
    for alert in &report.scan_alerts {
        print_alert(alert, &format!("Probable scan from {} ({} ports)", alert.source, alert.magnitude()));
    }
    println!("\u{2503} ");
}

fn print_traffic(report: &DetectionReport) {
    println!("\u{2503} {} (network saturation)", Colour::Cyan.bold().paint("Abnormal traffic"));
    for alert in &report.traffic_alerts {
        print_alert(alert, &format!("Abnormal traffic from {} ({} packets)", alert.source, alert.magnitude()));
    }
    println!("\u{2503} ");
}

fn print_top_talkers(report: &DetectionReport, top: usize) {
    println!("\u{2503} {}", Colour::Cyan.bold().paint(format!("Top {top} talkers")));
    for (rank, (source, count)) in report.aggregates.top_talkers(top).iter().enumerate() {
        println!("\u{2503}   {}. {source} \u{2192} {}", rank + 1, Colour::Fixed(226).paint(count.to_string()));
    }
}

fn print_alert(alert: &Alert, message: &str) {
    println!("\u{2503}   {} {}", Colour::Red.bold().paint(format!("[{}]", alert.rule)), message);
}

pub fn data_as_json(output: &AnalysisOutput) -> serde_json::Result<String> {
    serde_json::to_string_pretty(output)
}

pub fn data_to_file(json: String, path: &Path) -> io::Result<()> {
    fs::write(path, json)?;
    log::info!("Wrote JSON output to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyser::{core, parser};
    use crate::ui::charts;

    #[test]
    fn json_carries_alerts_and_charts() {
        let lines: Vec<String> = (0..21)
            .map(|i| format!("07:00:00.{i:03} IP 172.16.0.9.5000 > 172.16.0.1.22: Flags [S], length 0"))
            .collect();
        let records = parser::parse_lines(&lines);
        let report = core::detect(&records);
        let chart_data = charts::all_charts(&report, 5);

        let output = AnalysisOutput {
            generated_at: "2024-01-01 00:00:00".to_string(),
            capture_file: "capture.txt".to_string(),
            records_parsed: records.len(),
            report: &report,
            top_talkers: report.aggregates.top_talkers(5),
            charts: &chart_data,
        };

        let json: serde_json::Value = serde_json::from_str(&data_as_json(&output).unwrap()).unwrap();
        assert_eq!(json["records_parsed"], 21);
        assert_eq!(json["report"]["ssh_alerts"][0]["rule"], "SSH_BRUTEFORCE");
        assert_eq!(json["report"]["ssh_alerts"][0]["evidence"]["count"], 21);
        assert_eq!(json["report"]["scan_alerts"].as_array().unwrap().len(), 0);
        assert_eq!(json["charts"].as_array().unwrap().len(), 2);
        assert_eq!(json["top_talkers"][0][0], "172.16.0.9.5000");
    }
}
