//! Gating of parsing on the remote command status.
use hostmetrics::{collect_metrics, CollectError, CommandStatus, Invocation, OsType};

const STDOUT: &str = "2.0\n1\nPID PPID CMD %MEM %CPU\n---DISK---\n---RAM---\nMem: 1024 512 512\n";

#[test]
fn success_is_parsed() {
    let inv = Invocation {
        status: CommandStatus::Success,
        stdout: STDOUT.to_string(),
    };
    let m = collect_metrics(&inv, OsType::Linux).expect("parsed");
    assert_eq!(m.cpu_usage, "2.0%");
    assert_eq!(m.ram_usage.unwrap().total_gb, 1.0);
}

#[test]
fn success_with_bad_output_still_returns_metrics() {
    let inv = Invocation {
        status: CommandStatus::Success,
        stdout: String::new(),
    };
    let m = collect_metrics(&inv, OsType::Windows).expect("parse errors are not command failures");
    assert!(m.error.is_some());
}

#[test]
fn other_statuses_are_command_failures() {
    for status in [
        CommandStatus::Failed,
        CommandStatus::Cancelled,
        CommandStatus::TimedOut,
        CommandStatus::InProgress,
    ] {
        let inv = Invocation {
            status,
            stdout: STDOUT.to_string(),
        };
        assert_eq!(
            collect_metrics(&inv, OsType::Linux),
            Err(CollectError::CommandFailed { status })
        );
    }
}

#[test]
fn invocation_record_from_json() {
    let inv: Invocation = serde_json::from_str(
        r#"{"Status": "Success", "StandardOutputContent": "1\n2\n", "CommandId": "abc"}"#,
    )
    .unwrap();
    assert_eq!(inv.status, CommandStatus::Success);
    assert_eq!(inv.stdout, "1\n2\n");

    let inv: Invocation = serde_json::from_str(r#"{"Status": "Failed"}"#).unwrap();
    assert_eq!(inv.status, CommandStatus::Failed);
    assert!(inv.stdout.is_empty());

    let inv: Invocation = serde_json::from_str(r#"{"Status": "Undeliverable"}"#).unwrap();
    assert_eq!(inv.status, CommandStatus::Unknown);
    assert!(!inv.status.is_terminal());
}

#[test]
fn documents_per_os() {
    assert_eq!(OsType::Linux.document_name(), "AWS-RunShellScript");
    assert_eq!(OsType::Windows.document_name(), "AWS-RunPowerShellScript");
    assert_eq!(OsType::Windows.remote_commands().len(), 8);
}
