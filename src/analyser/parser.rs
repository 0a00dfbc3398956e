//! Turns human-readable capture lines (tcpdump style) into [PacketRecord]s.
use lazy_static::lazy_static;
use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use super::containers::PacketRecord;
use super::utils;

lazy_static! {
    /// Required part of a header line: time of day, `IP`, source `>` destination.
    static ref HEADER_RE: Regex = Regex::new(
        r"(?P<time>[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]+)\s+IP\s+(?P<src>[^ ]+)\s+>\s+(?P<dst>[^:]+):"
    ).unwrap();
    static ref FLAGS_RE: Regex = Regex::new(r"Flags\s+\[([^\]]+)\]").unwrap();
    static ref LENGTH_RE: Regex = Regex::new(r"length\s+([0-9]+)").unwrap();
}

/// Parses a single capture line.
///
/// Returns `None` for hex-dump lines and for anything that does not carry the
/// timestamp/source/destination header. Those are expected and not errors.
pub fn parse_line(line: &str) -> Option<PacketRecord> {
    if utils::is_hex_dump_line(line) {
        return None;
    }

    let caps = HEADER_RE.captures(line)?;
    let (destination_address, destination_port) = split_destination(&caps["dst"]);

    let flags = FLAGS_RE
        .captures(line)
        .map(|c| c[1].to_string());

    let length = LENGTH_RE
        .captures(line)
        .map(|c| c[1].to_string());

    Some(PacketRecord {
        timestamp: caps["time"].to_string(),
        source: caps["src"].to_string(),
        destination_address,
        destination_port,
        flags,
        length,
    })
}

/// Splits `host.port` style destinations.
///
/// If the last `.`-segment is numeric it is taken as the port. This is purely
/// textual: `v2.service.8` comes out as address `v2.service`, port `8`.
pub fn split_destination(destination: &str) -> (String, Option<String>) {
    match destination.rsplit_once('.') {
        Some((address, port)) if utils::is_numeric(port) => {
            (address.to_string(), Some(port.to_string()))
        }
        _ => (destination.to_string(), None),
    }
}

/// Parses every line, keeping the records in input order.
pub fn parse_lines<I, S>(lines: I) -> Vec<PacketRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut skipped = 0usize;
    let records: Vec<PacketRecord> = lines
        .into_iter()
        .filter_map(|line| {
            let record = parse_line(line.as_ref());
            if record.is_none() {
                skipped += 1;
            }
            record
        })
        .collect();

    log::debug!("Parsed {} records, skipped {} lines", records.len(), skipped);
    records
}

/// Reads a capture dump from disk and parses it.
///
/// Bytes that are not valid UTF-8 are dropped rather than rejected.
pub fn load_file(path: &Path) -> io::Result<Vec<PacketRecord>> {
    log::info!("Loading capture file {}", path.display());

    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();

    for chunk in reader.split(b'\n') {
        let chunk = chunk?;
        let line = utils::decode_dropping_invalid(&chunk);
        lines.push(line.trim_end_matches('\r').to_string());
    }

    log::info!("Read {} lines from {}", lines.len(), path.display());
    Ok(parse_lines(lines))
}
