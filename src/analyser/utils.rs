//! Contains utilities and helper functions shared by the parser and the detector.

/// Prefix of the payload hex-dump lines printed under a packet header.
pub const HEX_DUMP_MARKER: &str = "0x";

/// Checks whether a line is a hex-dump continuation line.
/// These never carry header information, so the parser drops them before matching.
pub fn is_hex_dump_line(line: &str) -> bool {
    line.trim_start().starts_with(HEX_DUMP_MARKER)
}

/// ASCII case-insensitive substring check. Independent of locale.
pub fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// True for a non-empty run of ASCII digits.
pub fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Sorts (label, count) pairs by descending count.
///
/// The sort is stable, so equal counts keep the order they came in with. Callers
/// iterate a `BTreeMap` or sort by label first, which makes ties come out by label.
pub fn sort_by_count_desc<I>(pairs: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = (String, usize)>,
{
    let mut sorted: Vec<(String, usize)> = pairs.into_iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
}

/// Decodes UTF-8, dropping invalid byte sequences and keeping everything else as is.
pub fn decode_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Turns a source identifier into something usable as a file stem.
pub fn sanitize_file_stem(source: &str) -> String {
    source
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') { c } else { '_' })
        .collect()
}
