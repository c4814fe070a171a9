//! Linux capture layout.
//!
//! ```text
//! 7.43
//! 4
//! PID PPID CMD                         %MEM %CPU
//! 812    1 /usr/bin/dockerd -H fd://    2.1  3.5
//! ---DISK---
//! Filesystem      Size  Used Avail Use% Mounted on
//! /dev/root        29G  6.1G   23G  22% /
//! ---RAM---
//!                total        used        free      shared  buff/cache   available
//! Mem:            3834        1123         412           1        2298        2467
//! ```

use tracing::debug;

use crate::assemble::{parse_cores, summarize_disks};
use crate::error::ParseError;
use crate::segment::{section, split_fields, Markers};
use crate::types::{DiskDetail, DiskVolume, Metrics, ProcessSample, RamSummary};
use crate::units::{convert_to_gb, round2, round3};

/// `ps ... | head -n 11`: one header plus at most ten rows.
pub const MAX_PROCESSES: usize = 10;
pub const MAIN_FILESYSTEM: &str = "/dev/root";

pub fn extract(lines: &[&str], markers: Markers) -> Result<Metrics, ParseError> {
    let mut metrics = Metrics {
        // passed through unchecked
        cpu_usage: format!("{}%", lines[0]),
        cpu_cores: parse_cores(lines[1]),
        ..Metrics::default()
    };

    // process memory is derived from total RAM, so RAM goes first
    metrics.ram_usage = parse_ram(section(lines, markers.ram + 1, lines.len()));

    let first_row = markers.processes + 1;
    let rows = section(lines, first_row, (first_row + MAX_PROCESSES).min(markers.disk));
    metrics.top_cpu_processes = parse_processes(rows, metrics.total_ram_gb());

    metrics.disk_usage = parse_disks(section(lines, markers.disk + 1, markers.ram));

    debug!(
        processes = metrics.top_cpu_processes.len(),
        disks = metrics.disk_usage.first().map_or(0, |d| d.details.len()),
        ram = metrics.ram_usage.is_some(),
        "parsed linux capture"
    );
    Ok(metrics)
}

pub fn parse_processes(lines: &[&str], total_ram_gb: f64) -> Vec<ProcessSample> {
    lines
        .iter()
        .filter_map(|line| parse_process(line, total_ram_gb))
        .collect()
}

fn parse_process(line: &str, total_ram_gb: f64) -> Option<ProcessSample> {
    let fields = split_fields(line, 5);
    let [pid, ppid, cmd, mem, cpu] = fields.as_slice() else {
        return None;
    };

    let (cpu_percent, memory_percent, memory_gb) = match (cpu.parse::<f64>(), mem.parse::<f64>()) {
        (Ok(cpu), Ok(mem)) => (cpu, mem, round3(mem / 100.0 * total_ram_gb)),
        _ => (0.0, 0.0, 0.0),
    };

    Some(ProcessSample {
        pid: pid.to_string(),
        ppid: Some(ppid.to_string()),
        name: cmd.trim().to_string(),
        cpu_percent,
        memory_percent,
        memory_gb,
    })
}

/// `df -h` rows; the first line is the column header.
pub fn parse_disks(lines: &[&str]) -> Vec<DiskVolume> {
    let details = lines.iter().skip(1).filter_map(|l| parse_disk_row(l)).collect();
    summarize_disks(details, MAIN_FILESYSTEM)
}

fn parse_disk_row(line: &str) -> Option<DiskDetail> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 6 {
        return None;
    }
    // mount points with spaces are cut at the first token
    Some(DiskDetail {
        filesystem: parts[0].to_string(),
        size_gb: convert_to_gb(parts[1]),
        used_gb: convert_to_gb(parts[2]),
        avail_gb: convert_to_gb(parts[3]),
        use_percent: parts[4].to_string(),
        mounted_on: parts[5].to_string(),
    })
}

/// `free -m`: the first `Mem:` row with at least three values.
pub fn parse_ram(lines: &[&str]) -> Option<RamSummary> {
    let parts = lines
        .iter()
        .filter(|l| l.trim().to_ascii_lowercase().starts_with("mem:"))
        .map(|l| l.split_whitespace().collect::<Vec<_>>())
        .find(|parts| parts.len() >= 4)?;

    let total_mb: i64 = parts[1].parse().ok()?;
    let used_mb: i64 = parts[2].parse().ok()?;
    let free_mb: i64 = parts[3].parse().ok()?;

    Some(RamSummary {
        total_gb: round2(total_mb as f64 / 1024.0),
        used_gb: round2(used_mb as f64 / 1024.0),
        free_gb: round2(free_mb as f64 / 1024.0),
        total_bytes: total_mb.saturating_mul(1024 * 1024),
    })
}
