//! Turn captured command output from a remote Linux or Windows host into a
//! normalized [`Metrics`] record.
//!
//! [`parse_output`] never fails: structural problems and unexpected errors
//! come back as a default record with `error` set, while unreadable numeric
//! fields degrade to zero without an error.

pub mod assemble;
pub mod error;
pub mod linux;
pub mod os;
pub mod remote;
pub mod segment;
pub mod types;
pub mod units;
pub mod windows;

use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

pub use error::{CollectError, FieldError, ParseError};
pub use os::OsType;
pub use remote::{collect_metrics, CommandStatus, Invocation};
pub use types::{DiskDetail, DiskVolume, Metrics, ProcessSample, RamSummary};
pub use units::convert_to_gb;

/// Extract metrics from the lines of a capture whose markers were found.
pub fn extract(os: OsType, lines: &[&str], markers: segment::Markers) -> Result<Metrics, ParseError> {
    match os {
        OsType::Linux => linux::extract(lines, markers),
        OsType::Windows => windows::extract(lines, markers),
    }
}

fn try_parse(raw: &str, os: OsType) -> Result<Metrics, ParseError> {
    let lines = segment::split_lines(raw);
    let markers = segment::locate(&lines, os)?;
    match catch_unwind(AssertUnwindSafe(|| extract(os, &lines, markers))) {
        Ok(result) => result,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ParseError::Panic(msg))
        }
    }
}

/// Parse a full capture. Always returns a record; see the crate docs for the
/// error policy.
pub fn parse_output(raw: &str, os: OsType) -> Metrics {
    match try_parse(raw, os) {
        Ok(metrics) => metrics,
        Err(e) => {
            warn!(%os, "capture not parsed: {e}");
            Metrics::failed(e.to_string())
        }
    }
}
