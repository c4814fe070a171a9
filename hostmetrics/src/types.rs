//! Data types returned to the caller.
//! Keep this module minimal and stable: it defines the output schema.

use serde::{Serialize, Serializer};

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct ProcessSample {
    pub pid: String,
    // only the Linux process table reports a parent pid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ppid: Option<String>,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub memory_gb: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct DiskDetail {
    pub filesystem: String,
    pub size_gb: f64,
    pub used_gb: f64,
    pub avail_gb: f64,
    pub use_percent: String,
    pub mounted_on: String,
}

/// The main volume, summarized, with every parsed filesystem under `details`.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct DiskVolume {
    pub name: String,
    pub free_gb: f64,
    pub used_gb: f64,
    pub total_gb: f64,
    pub use_percent: String,
    pub details: Vec<DiskDetail>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct RamSummary {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub total_bytes: i64,
}

#[derive(Debug, Serialize, Clone, PartialEq, Default)]
pub struct Metrics {
    pub cpu_usage: String,
    pub cpu_cores: i64,
    pub top_cpu_processes: Vec<ProcessSample>,
    pub disk_usage: Vec<DiskVolume>,
    // None serializes as `{}`
    #[serde(serialize_with = "ram_or_empty")]
    pub ram_usage: Option<RamSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Metrics {
    /// Default metrics carrying only an error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn total_ram_gb(&self) -> f64 {
        self.ram_usage.as_ref().map_or(0.0, |r| r.total_gb)
    }

    pub fn total_ram_bytes(&self) -> i64 {
        self.ram_usage.as_ref().map_or(0, |r| r.total_bytes)
    }
}

fn ram_or_empty<S: Serializer>(ram: &Option<RamSummary>, s: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;
    match ram {
        Some(r) => r.serialize(s),
        None => s.serialize_map(Some(0))?.end(),
    }
}
