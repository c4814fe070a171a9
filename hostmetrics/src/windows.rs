//! Windows (PowerShell) capture layout.
//!
//! ```text
//! 12.3456
//! 8
//! ---PROCESSES---
//! 4120 chrome 845.2 512000000
//! ---DISK---
//! C: 64424509440 42949672960 107374182400
//! ---RAM---
//! TotalVisibleMemorySize FreePhysicalMemory
//! ---------------------- ------------------
//!               16777216            8388608
//! ```
//!
//! Unlike the Linux path, the CPU usage line must be numeric: a bad value
//! fails the whole capture.

use tracing::debug;

use crate::assemble::{parse_cores, summarize_disks};
use crate::error::{FieldError, ParseError};
use crate::segment::{section, split_fields, Markers};
use crate::types::{DiskDetail, DiskVolume, Metrics, ProcessSample, RamSummary};
use crate::units::{format_decimal, is_all_digits, round1, round2, round3, GIB, KIB, MIB};

pub const MAIN_VOLUME: &str = "C:";

pub fn extract(lines: &[&str], markers: Markers) -> Result<Metrics, ParseError> {
    let mut metrics = Metrics {
        cpu_usage: parse_cpu_usage(lines[0])?,
        cpu_cores: parse_cores(lines[1]),
        ..Metrics::default()
    };

    metrics.ram_usage = parse_ram(section(lines, markers.ram + 1, lines.len()));

    let rows = section(lines, markers.processes + 1, markers.disk);
    metrics.top_cpu_processes = parse_processes(rows, metrics.total_ram_bytes());

    metrics.disk_usage = parse_disks(section(lines, markers.disk + 1, markers.ram));

    debug!(
        processes = metrics.top_cpu_processes.len(),
        disks = metrics.disk_usage.first().map_or(0, |d| d.details.len()),
        ram = metrics.ram_usage.is_some(),
        "parsed windows capture"
    );
    Ok(metrics)
}

fn parse_cpu_usage(raw: &str) -> Result<String, FieldError> {
    let value: f64 = raw.parse().map_err(|_| FieldError::Float {
        raw: raw.to_string(),
    })?;
    Ok(format!("{}%", format_decimal(round2(value))))
}

/// `Get-Process | Format-Table -HideTableHeaders` rows: `Id ProcessName CPU WS`.
pub fn parse_processes(lines: &[&str], total_ram_bytes: i64) -> Vec<ProcessSample> {
    lines
        .iter()
        .filter_map(|line| parse_process(line, total_ram_bytes))
        .collect()
}

fn parse_process(line: &str, total_ram_bytes: i64) -> Option<ProcessSample> {
    let fields = split_fields(line, 4);
    let [pid, name, cpu, ws] = fields.as_slice() else {
        return None;
    };

    let cpu_percent = if *cpu == "N/A" {
        0.0
    } else {
        cpu.parse::<f64>().map(round2).unwrap_or(0.0)
    };

    let (memory_percent, memory_gb) = match parse_count(ws) {
        Some(bytes) => {
            let percent = if total_ram_bytes > 0 {
                round2(bytes / total_ram_bytes as f64 * 100.0)
            } else {
                0.0
            };
            (percent, round3(bytes / GIB))
        }
        None => (0.0, 0.0),
    };

    Some(ProcessSample {
        pid: pid.to_string(),
        ppid: None,
        name: name.to_string(),
        cpu_percent,
        memory_percent,
        memory_gb,
    })
}

/// `Win32_LogicalDisk` rows: `DeviceID UsedBytes FreeBytes SizeBytes`.
pub fn parse_disks(lines: &[&str]) -> Vec<DiskVolume> {
    let details = lines.iter().filter_map(|l| parse_disk_row(l)).collect();
    summarize_disks(details, MAIN_VOLUME)
}

fn parse_disk_row(line: &str) -> Option<DiskDetail> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [name, used, free, size] = parts.as_slice() else {
        return None;
    };

    let (used_gb, free_gb, size_gb, use_percent) =
        match (used.parse::<i64>(), free.parse::<i64>(), size.parse::<i64>()) {
            (Ok(used), Ok(free), Ok(size)) => {
                let used_gb = round2(used as f64 / GIB);
                let free_gb = round2(free as f64 / GIB);
                let size_gb = round2(size as f64 / GIB);
                let use_percent = if size_gb > 0.0 {
                    format!("{}%", format_decimal(round1(used_gb / size_gb * 100.0)))
                } else {
                    "0%".to_string()
                };
                (used_gb, free_gb, size_gb, use_percent)
            }
            _ => (0.0, 0.0, 0.0, "0%".to_string()),
        };

    Some(DiskDetail {
        filesystem: name.to_string(),
        size_gb,
        used_gb,
        avail_gb: free_gb,
        use_percent,
        mounted_on: name.to_string(),
    })
}

/// `Win32_OperatingSystem`: the first row holding exactly two numbers,
/// `TotalVisibleMemorySize FreePhysicalMemory`, both in KB.
pub fn parse_ram(lines: &[&str]) -> Option<RamSummary> {
    let (total, free) = lines.iter().find_map(|l| {
        let parts: Vec<&str> = l.split_whitespace().collect();
        match parts.as_slice() {
            [total, free] if is_all_digits(total) && is_all_digits(free) => Some((*total, *free)),
            _ => None,
        }
    })?;

    let total_kb = parse_count(total)?;
    let free_kb = parse_count(free)?;
    let used_kb = total_kb - free_kb;

    Some(RamSummary {
        total_gb: round2(total_kb / MIB),
        used_gb: round2(used_kb / MIB),
        free_gb: round2(free_kb / MIB),
        total_bytes: total
            .parse::<i64>()
            .map_or(i64::MAX, |kb| kb.saturating_mul(KIB as i64)),
    })
}

/// Integer token as f64, so all-digit values past `i64::MAX` keep their size.
fn parse_count(raw: &str) -> Option<f64> {
    match raw.parse::<i64>() {
        Ok(n) => Some(n as f64),
        Err(_) if is_all_digits(raw) => raw.parse().ok(),
        Err(_) => None,
    }
}
