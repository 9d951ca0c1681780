//! Error types for the gradebook core.
//!
//! Every core operation returns [`Result`]. The terminal UI matches on the
//! variant to decide what to tell the operator; none of these are fatal.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the gradebook core.
#[derive(Debug, Error)]
pub enum GradebookError {
    /// Input was rejected before any state changed (blank name, mark out of
    /// range, blank search query, duplicate first attempt, ...).
    #[error("{0}")]
    Validation(String),

    /// No student exists with the given ID.
    #[error("no student with ID {0}")]
    NotFound(String),

    /// A filesystem operation failed.
    #[error("storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record file could not be parsed.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

impl GradebookError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        GradebookError::Validation(message.into())
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GradebookError::Storage {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the error was caused by operator input rather than
    /// by the filesystem.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            GradebookError::Validation(_) | GradebookError::NotFound(_)
        )
    }
}

/// Convenience alias used throughout the core.
pub type Result<T, E = GradebookError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_are_classified() {
        assert!(GradebookError::validation("bad").is_user_error());
        assert!(GradebookError::NotFound("12345678".into()).is_user_error());
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(!GradebookError::storage("/tmp/x", io).is_user_error());
    }

    #[test]
    fn messages_name_the_subject() {
        let err = GradebookError::NotFound("87654321".into());
        assert_eq!(err.to_string(), "no student with ID 87654321");

        let err = GradebookError::MalformedRecord {
            line: 4,
            reason: "expected attempt count".into(),
        };
        assert!(err.to_string().contains("line 4"));
    }
}
