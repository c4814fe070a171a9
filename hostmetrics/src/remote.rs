//! Boundary with the remote execution service.
//!
//! Sending the commands and polling for the result happen elsewhere; this
//! module holds the command scripts whose output the engine understands and
//! the status check that gates parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::error::CollectError;
use crate::os::OsType;
use crate::parse_output;
use crate::types::Metrics;

const LINUX_COMMANDS: &[&str] = &[
    "mpstat 1 1 | awk '/Average/ {print 100 - $NF}'",
    "nproc",
    "ps -eo pid,ppid,cmd,%mem,%cpu --sort=-%cpu -w | head -n 11",
    "echo '---DISK---'",
    "df -h",
    "echo '---RAM---'",
    "free -m",
];

const WINDOWS_COMMANDS: &[&str] = &[
    "(Get-Counter '\\Processor(_Total)\\% Processor Time').CounterSamples[0].CookedValue",
    "(Get-CimInstance Win32_ComputerSystem).NumberOfLogicalProcessors",
    "Write-Output '---PROCESSES---'",
    "Get-Process | Sort-Object CPU -Descending | Select-Object -First 10 Id,ProcessName,CPU,WS | Format-Table -AutoSize -HideTableHeaders",
    "Write-Output '---DISK---'",
    "Get-CimInstance Win32_LogicalDisk | Where-Object { $_.DriveType -eq 3 } | ForEach-Object { \"$($_.DeviceID) $($_.Size - $_.FreeSpace) $($_.FreeSpace) $($_.Size)\" }",
    "Write-Output '---RAM---'",
    "Get-CimInstance Win32_OperatingSystem | Select-Object TotalVisibleMemorySize,FreePhysicalMemory",
];

impl OsType {
    /// Ordered script lines producing a capture in this OS's layout.
    pub fn remote_commands(self) -> &'static [&'static str] {
        match self {
            OsType::Linux => LINUX_COMMANDS,
            OsType::Windows => WINDOWS_COMMANDS,
        }
    }

    /// Run document that executes [`OsType::remote_commands`].
    pub fn document_name(self) -> &'static str {
        match self {
            OsType::Linux => "AWS-RunShellScript",
            OsType::Windows => "AWS-RunPowerShellScript",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandStatus {
    Pending,
    InProgress,
    Delayed,
    Success,
    Cancelled,
    TimedOut,
    Failed,
    Cancelling,
    #[serde(other)]
    Unknown,
}

impl CommandStatus {
    /// Polling stops at these.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            CommandStatus::Success
                | CommandStatus::Failed
                | CommandStatus::Cancelled
                | CommandStatus::TimedOut
        )
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Final state of a command invocation, as returned by the polling call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    #[serde(rename = "Status")]
    pub status: CommandStatus,
    #[serde(rename = "StandardOutputContent", default)]
    pub stdout: String,
}

/// Parse the invocation's stdout, but only if the command succeeded.
pub fn collect_metrics(invocation: &Invocation, os: OsType) -> Result<Metrics, CollectError> {
    if invocation.status != CommandStatus::Success {
        warn!(status = %invocation.status, "remote command did not succeed");
        return Err(CollectError::CommandFailed {
            status: invocation.status,
        });
    }
    Ok(parse_output(&invocation.stdout, os))
}
