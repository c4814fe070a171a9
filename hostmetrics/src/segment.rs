//! Line splitting and section marker lookup.

use tracing::debug;

use crate::error::ParseError;
use crate::os::OsType;

pub const PID_HEADER: &str = "PID";
pub const PROCESSES_MARKER: &str = "---PROCESSES---";
pub const DISK_MARKER: &str = "---DISK---";
pub const RAM_MARKER: &str = "---RAM---";

/// Positions of the three section markers in the line list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    /// Process table header (Linux) or `---PROCESSES---` (Windows).
    pub processes: usize,
    pub disk: usize,
    pub ram: usize,
}

/// Trimmed, non-empty lines of a capture.
pub fn split_lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

fn is_process_marker(os: OsType, line: &str) -> bool {
    match os {
        OsType::Linux => line.starts_with(PID_HEADER),
        OsType::Windows => line.contains(PROCESSES_MARKER),
    }
}

/// Find the first occurrence of each marker. A line claims at most one
/// marker, checked in section order. The process marker has to come after
/// the two header lines and the sections have to be in order.
pub fn locate(lines: &[&str], os: OsType) -> Result<Markers, ParseError> {
    let mut processes = None;
    let mut disk = None;
    let mut ram = None;

    for (i, line) in lines.iter().enumerate() {
        if processes.is_none() && is_process_marker(os, line) {
            processes = Some(i);
        } else if disk.is_none() && line.contains(DISK_MARKER) {
            disk = Some(i);
        } else if ram.is_none() && line.contains(RAM_MARKER) {
            ram = Some(i);
        }
    }
    debug!(?os, ?processes, ?disk, ?ram, "section markers");

    match (processes, disk, ram) {
        (Some(p), Some(d), Some(r)) if p > 1 && d > p && r > d => Ok(Markers {
            processes: p,
            disk: d,
            ram: r,
        }),
        _ => Err(ParseError::Markers { os }),
    }
}

/// Split on whitespace runs into at most `max` fields; the last field keeps
/// the remainder of the line untouched.
pub fn split_fields(line: &str, max: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(max);
    let mut rest = line.trim();
    while !rest.is_empty() {
        if fields.len() + 1 == max {
            fields.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(end) => {
                fields.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }
    fields
}

/// `lines[start..end]`, empty when the range is inverted or out of bounds.
pub fn section<'a, 'b>(lines: &'b [&'a str], start: usize, end: usize) -> &'b [&'a str] {
    let end = end.min(lines.len());
    if start >= end {
        &[]
    } else {
        &lines[start..end]
    }
}
