//! Pieces shared by both extractors when building the final record.

use crate::types::{DiskDetail, DiskVolume};

/// Core count from the second header line; unreadable counts become 0.
pub fn parse_cores(line: &str) -> i64 {
    line.trim().parse().unwrap_or(0)
}

/// Elevate the main volume (by filesystem name, else the first row) to a
/// single summary entry carrying every row as `details`. No rows, no entry.
pub fn summarize_disks(details: Vec<DiskDetail>, main_filesystem: &str) -> Vec<DiskVolume> {
    let main = details
        .iter()
        .find(|d| d.filesystem == main_filesystem)
        .or_else(|| details.first())
        .cloned();

    match main {
        Some(main) => vec![DiskVolume {
            name: main.filesystem,
            free_gb: main.avail_gb,
            used_gb: main.used_gb,
            total_gb: main.size_gb,
            use_percent: main.use_percent,
            details,
        }],
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(fs: &str, size: f64) -> DiskDetail {
        DiskDetail {
            filesystem: fs.into(),
            size_gb: size,
            used_gb: size / 2.0,
            avail_gb: size / 2.0,
            use_percent: "50%".into(),
            mounted_on: "/".into(),
        }
    }

    #[test]
    fn prefers_named_filesystem() {
        let out = summarize_disks(vec![detail("/dev/xvda1", 8.0), detail("/dev/root", 30.0)], "/dev/root");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "/dev/root");
        assert_eq!(out[0].total_gb, 30.0);
        assert_eq!(out[0].details.len(), 2);
        assert_eq!(out[0].details[0].filesystem, "/dev/xvda1");
    }

    #[test]
    fn falls_back_to_first_row() {
        let out = summarize_disks(vec![detail("D:", 100.0), detail("E:", 50.0)], "C:");
        assert_eq!(out[0].name, "D:");
        assert_eq!(out[0].free_gb, 50.0);
    }

    #[test]
    fn no_rows_no_volume() {
        assert!(summarize_disks(Vec::new(), "/dev/root").is_empty());
    }

    #[test]
    fn cores_default_to_zero() {
        assert_eq!(parse_cores("8"), 8);
        assert_eq!(parse_cores("eight"), 0);
        assert_eq!(parse_cores(""), 0);
    }
}
