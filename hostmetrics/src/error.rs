use thiserror::Error;

use crate::os::OsType;
use crate::remote::CommandStatus;

/// A field the engine must read and cannot degrade to a default.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("could not convert string to float: '{raw}'")]
    Float { raw: String },
}

/// Why an OS branch produced no metrics. The `Display` text is what ends up
/// in `Metrics::error`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error(
        "Error parsing {} output: Could not find all required markers or they are out of order.",
        .os.label()
    )]
    Markers { os: OsType },

    #[error("General parsing error: {0}")]
    Field(#[from] FieldError),

    #[error("General parsing error: {0}")]
    Panic(String),
}

/// Failure at the boundary with the remote execution service, reported
/// before and instead of any parsing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectError {
    #[error("SSM command failed (status: {status})")]
    CommandFailed { status: CommandStatus },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_message_names_the_os() {
        let e = ParseError::Markers { os: OsType::Linux };
        assert_eq!(
            e.to_string(),
            "Error parsing Linux output: Could not find all required markers or they are out of order."
        );
        let e = ParseError::Markers { os: OsType::Windows };
        assert!(e.to_string().starts_with("Error parsing Windows output:"));
    }

    #[test]
    fn field_errors_are_general() {
        let e: ParseError = FieldError::Float { raw: "abc".into() }.into();
        assert_eq!(
            e.to_string(),
            "General parsing error: could not convert string to float: 'abc'"
        );
    }

    #[test]
    fn command_failed_mentions_status() {
        let e = CollectError::CommandFailed {
            status: CommandStatus::TimedOut,
        };
        assert_eq!(e.to_string(), "SSM command failed (status: TimedOut)");
    }
}
