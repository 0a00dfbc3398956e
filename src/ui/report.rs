//! Markdown report of a detection pass.
use std::fmt::{self, Write};
use std::fs;
use std::io;
use std::path::Path;

use crate::analyser::containers::DetectionReport;
use crate::ui::charts::{self, ChartSeries};

fn image_link(alt: &str, chart: &ChartSeries) -> String {
    format!("![{alt}]({}.png)", chart.name)
}

/// Renders the report. `generated_at` goes into the header verbatim.
pub fn render_markdown(
    report: &DetectionReport,
    capture_file: &str,
    generated_at: &str,
    top: usize,
) -> Result<String, fmt::Error> {
    let mut md = String::new();
    write_report(&mut md, report, capture_file, generated_at, top)?;
    Ok(md)
}

fn write_report<W: Write>(
    md: &mut W,
    report: &DetectionReport,
    capture_file: &str,
    generated_at: &str,
    top: usize,
) -> fmt::Result {
    writeln!(md, "# Network traffic analysis report\n")?;
    writeln!(md, "Capture: `{capture_file}`  ")?;
    writeln!(md, "Generated: {generated_at}\n")?;
    writeln!(md, "## Objective\nAnalyse a network capture to detect suspicious activity.\n")?;

    writeln!(md, "## Suspicious SSH activity")?;
    if report.ssh_alerts.is_empty() {
        writeln!(md, "No suspicious SSH activity detected.\n")?;
    } else {
        for alert in &report.ssh_alerts {
            writeln!(md, "- {} : {} SSH attempts", alert.source, alert.magnitude())?;
        }
        if let Some(chart) = charts::ssh_chart(report) {
            writeln!(md, "\n{}\n", image_link("SSH activity", &chart))?;
        }
    }

    writeln!(md, "## Suspicious port scans")?;
    if report.scan_alerts.is_empty() {
        writeln!(md, "No port scan detected.\n")?;
    } else {
        for (alert, chart) in report.scan_alerts.iter().zip(charts::scan_charts(report)) {
            writeln!(md, "- {} : {} ports probed", alert.source, alert.magnitude())?;
            writeln!(md, "{}\n", image_link("Port scan", &chart))?;
        }
    }

    writeln!(md, "## Abnormal traffic")?;
    if report.traffic_alerts.is_empty() {
        writeln!(md, "No abnormal traffic detected.\n")?;
    } else {
        for alert in &report.traffic_alerts {
            writeln!(md, "- {} : {} packets sent", alert.source, alert.magnitude())?;
        }
        writeln!(md)?;
    }

    let top_chart = charts::top_traffic_chart(report, top);
    writeln!(md, "### Top {top} hosts by traffic\n")?;
    writeln!(md, "| Source | Packets |\n|---|---|")?;
    for (source, count) in &top_chart.bars {
        writeln!(md, "| {source} | {count} |")?;
    }
    writeln!(md, "\n{}\n", image_link("Top traffic", &top_chart))?;

    writeln!(md, "## Conclusion")?;
    if report.alert_count() == 0 {
        writeln!(md, "No potentially malicious behaviour stood out in this capture.")
    } else {
        writeln!(
            md,
            "{} alert(s) point to potentially malicious behaviour: {} SSH, {} port scan, {} abnormal traffic.",
            report.alert_count(),
            report.ssh_alerts.len(),
            report.scan_alerts.len(),
            report.traffic_alerts.len()
        )
    }
}

pub fn save_markdown(markdown: &str, path: &Path) -> io::Result<()> {
    fs::write(path, markdown)?;
    log::info!("Markdown report written to {}", path.display());
    Ok(())
}
