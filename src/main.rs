use anyhow::{Context, Result};
use capsniff::analyser;
use capsniff::ui::{charts, export, output, report};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::fs;
use std::path::{Path, PathBuf};

/// capsniff flags suspicious hosts in a text packet capture
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text capture file to analyze (tcpdump output)
    #[arg(short = 'f', long, value_parser)]
    file: PathBuf,

    /// Directory to write the report, chart data and JSON into
    #[arg(short = 'o', long, value_parser)]
    output_dir: Option<PathBuf>,

    /// Semicolon-delimited table of every parsed packet
    #[arg(short = 'c', long, default_value = "capture.csv", value_parser)]
    csv: PathBuf,

    /// Number of sources in the top traffic ranking, default is 5
    #[arg(short = 't', long, default_value_t = 5, value_parser)]
    top: usize,

    /// Display output as formatted JSON
    #[arg(short = 'j', long, action = ArgAction::SetTrue)]
    json: bool,

    /// Do not print the console summary
    #[arg(short = 'q', long, action = ArgAction::SetTrue)]
    quiet: bool,
}

/// Level used when `RUST_LOG` is not set. Logs go to stderr so `--json` keeps stdout clean.
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

fn logger() -> SimpleLogger {
    SimpleLogger::new().with_level(DEFAULT_LOG_LEVEL).env()
}

fn main() -> Result<()> {
    logger().init().context("failed to initialise logger")?;

    let args = Args::parse();

    if let Err(err) = run(&args) {
        log::error!("{err:#}");
        return Err(err);
    }

    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let out = match args.output_dir.as_deref() {
        Some(out_dir) => {
            log::info!("Output directory {}", out_dir.display());
            fs::create_dir_all(out_dir)
                .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
            Some(out_dir)
        }
        None => {
            log::warn!("No output directory specified.");
            None
        }
    };

    let records = analyser::parser::load_file(&args.file)
        .with_context(|| format!("failed to read capture {}", args.file.display()))?;

    let csv_path = out.map(|dir| dir.join(&args.csv)).unwrap_or_else(|| args.csv.clone());
    export::save_table(&records, &csv_path)
        .with_context(|| format!("failed to write table {}", csv_path.display()))?;

    let detection = analyser::core::detect(&records);
    let chart_data = charts::all_charts(&detection, args.top);
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let capture_file = args.file.display().to_string();

    // ---- Output ----
    if args.json {
        let data = output::AnalysisOutput {
            generated_at: generated_at.clone(),
            capture_file: capture_file.clone(),
            records_parsed: records.len(),
            report: &detection,
            top_talkers: detection.aggregates.top_talkers(args.top),
            charts: &chart_data,
        };
        let json = output::data_as_json(&data).context("failed to serialise results")?;
        match out {
            Some(dir) => write_json(json, &dir.join("capsniff.json"))?,
            None => println!("{json}"),
        }
    } else if !args.quiet {
        output::print_results(&detection, records.len(), args.top);
    }

    if let Some(dir) = out {
        let charts_json = serde_json::to_string_pretty(&chart_data).context("failed to serialise chart data")?;
        write_json(charts_json, &dir.join("charts.json"))?;

        let markdown = report::render_markdown(&detection, &capture_file, &generated_at, args.top)
            .context("failed to render report")?;
        let report_path = dir.join("rapport_final.md");
        report::save_markdown(&markdown, &report_path)
            .with_context(|| format!("failed to write report {}", report_path.display()))?;
    }

    Ok(())
}

fn write_json(json: String, path: &Path) -> Result<()> {
    output::data_to_file(json, path).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_stays_quiet_by_default() {
        if std::env::var("RUST_LOG").is_err() {
            assert_eq!(logger().max_level(), LevelFilter::Warn);
        }
    }

    #[test]
    fn json_flag_parses() {
        let args = Args::try_parse_from(["capsniff", "-f", "cap.txt", "-j"]).unwrap();
        assert!(args.json);
        assert_eq!(args.csv, PathBuf::from("capture.csv"));
        assert_eq!(args.top, 5);
        assert!(args.output_dir.is_none());
    }
}
