//! Semicolon-delimited table of every parsed record.
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::analyser::containers::PacketRecord;

pub const DELIMITER: char = ';';
pub const LINE_TERMINATOR: &str = "\r\n";
pub const HEADER: [&str; 6] = ["Heure", "Source", "IP_Destination", "Port_Destination", "Flags", "Taille"];

/// Quotes a field only when it holds the delimiter, a quote or a line break.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([DELIMITER, '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn write_row<W: Write>(out: &mut W, fields: &[&str]) -> io::Result<()> {
    let row: Vec<Cow<str>> = fields.iter().map(|f| escape_field(f)).collect();
    write!(out, "{}{LINE_TERMINATOR}", row.join(&DELIMITER.to_string()))
}

/// Writes the header and one row per record, absent fields left empty.
pub fn write_table<W: Write>(records: &[PacketRecord], out: &mut W) -> io::Result<()> {
    write_row(out, &HEADER)?;

    for record in records {
        write_row(
            out,
            &[
                &record.timestamp,
                &record.source,
                &record.destination_address,
                record.destination_port.as_deref().unwrap_or(""),
                record.flags.as_deref().unwrap_or(""),
                record.length.as_deref().unwrap_or(""),
            ],
        )?;
    }

    Ok(())
}

pub fn save_table(records: &[PacketRecord], path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_table(records, &mut out)?;
    out.flush()?;
    log::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
