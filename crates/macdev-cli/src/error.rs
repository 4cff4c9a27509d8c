//! Error types for macdev-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end the process with a non-zero status
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from macdev-core
    #[error(transparent)]
    Core(#[from] macdev_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// `check` found problems
    #[error("Environment check failed with {count} issue(s)")]
    CheckFailed { count: usize },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_display_unchanged() {
        let err = CliError::from(macdev_core::Error::UntrackedPackage {
            spec: "node@20".into(),
        });
        assert_eq!(err.to_string(), "Package 'node@20' is not tracked");
    }

    #[test]
    fn check_failed_counts_issues() {
        let err = CliError::CheckFailed { count: 2 };
        assert!(err.to_string().contains("2 issue(s)"));
    }
}
