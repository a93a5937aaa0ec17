//! Report header location and table extraction.
//!
//! Ozon exports carry a few lines of boilerplate (report title, period,
//! seller name) before the real column header. The header row is found by
//! looking for two marker column names inside a bounded window of leading
//! lines, with a fixed fallback index when no line matches.

use crate::models::HeaderLocation;
use tracing::debug;

/// Split text into lines on `\n` or `\r\n`
///
/// A trailing newline produces a final empty line, so `"a\nb\n"` has three
/// lines. Lines are physical: a quoted cell spanning a newline counts as two
/// lines, which shifts every header index after it.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Find the line index of the table header
///
/// Returns the first line within `scan_lines` that contains every marker.
/// Otherwise falls back to `fallback_index` when the text has enough lines
/// to reach it, or to line 0.
pub fn locate_header(
    text: &str,
    markers: &[&str],
    scan_lines: usize,
    fallback_index: usize,
) -> HeaderLocation {
    let lines = split_lines(text);

    let detected = lines
        .iter()
        .take(scan_lines)
        .position(|line| markers.iter().all(|marker| line.contains(marker)));

    match detected {
        Some(line_index) => {
            debug!("Header row detected at line {}", line_index);
            HeaderLocation {
                line_index,
                detected: true,
            }
        }
        None => {
            let line_index = if lines.len() > fallback_index {
                fallback_index
            } else {
                0
            };
            debug!(
                "No header markers in first {} lines, using line {}",
                scan_lines, line_index
            );
            HeaderLocation {
                line_index,
                detected: false,
            }
        }
    }
}

/// The delimited table starting at the header line, header included
pub fn table_text(text: &str, header_index: usize) -> String {
    split_lines(text)
        .get(header_index..)
        .map(|lines| lines.join("\n"))
        .unwrap_or_default()
}

/// Pick the field delimiter from the header line
///
/// Semicolon wins when it appears more often than comma outside quotes.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    let mut in_quotes = false;
    let mut commas = 0usize;
    let mut semicolons = 0usize;

    for ch in header_line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => commas += 1,
            ';' if !in_quotes => semicolons += 1,
            _ => {}
        }
    }

    if semicolons > commas { b';' } else { b',' }
}
