//! Error type shared by the dispatcher, command builder and process runner.

use std::time::Duration;

use thiserror::Error;

use crate::zfs::{Action, ResourceMode};

pub type ZfsResult<T> = Result<T, ZfsError>;

/// Coarse classification used by presentation layers to pick a message style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any process was spawned; nothing changed.
    Validation,
    /// The external tool reported a problem on stderr (or a non-zero exit).
    CommandFailed,
    /// The tool could not be started or did not finish.
    Execution,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::CommandFailed => "command-failed",
            ErrorKind::Execution => "execution",
        }
    }
}

#[derive(Error, Debug)]
pub enum ZfsError {
    #[error("{action} is not supported for {mode}s")]
    Unsupported { mode: ResourceMode, action: Action },

    #[error("no target selected for {action}")]
    NoTarget { action: Action },

    #[error("{action} requires a non-empty {field}")]
    MissingInput { action: Action, field: &'static str },

    #[error("{action} must be confirmed before it is run")]
    NotConfirmed { action: Action },

    /// Raw stderr is kept verbatim for display.
    #[error("`{command}` failed: {}", .stderr.trim_end())]
    CommandFailed { command: String, stderr: String },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ZfsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZfsError::Unsupported { .. }
            | ZfsError::NoTarget { .. }
            | ZfsError::MissingInput { .. }
            | ZfsError::NotConfirmed { .. } => ErrorKind::Validation,
            ZfsError::CommandFailed { .. } => ErrorKind::CommandFailed,
            ZfsError::Spawn { .. } | ZfsError::Timeout { .. } | ZfsError::Config(_) => {
                ErrorKind::Execution
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_kinds() {
        let err = ZfsError::NoTarget {
            action: Action::Destroy,
        };
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "no target selected for destroy");

        let err = ZfsError::Unsupported {
            mode: ResourceMode::Dataset,
            action: Action::Rollback,
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "rollback is not supported for datasets");
    }

    #[test]
    fn command_failed_keeps_raw_stderr() {
        let err = ZfsError::CommandFailed {
            command: "zfs destroy tank/x".into(),
            stderr: "cannot open 'tank/x': dataset does not exist\n".into(),
        };
        assert_eq!(err.kind(), ErrorKind::CommandFailed);
        assert!(err.to_string().ends_with("dataset does not exist"));
        if let ZfsError::CommandFailed { stderr, .. } = err {
            assert!(stderr.ends_with('\n'));
        }
    }
}
