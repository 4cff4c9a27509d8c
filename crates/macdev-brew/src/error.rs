//! Error types for macdev-brew

/// Result type for package manager operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while driving the external package manager
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The executable could not be spawned at all
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited unsuccessfully
    #[error("'{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// The command succeeded but its output made no sense
    #[error("Unexpected output from '{command}': {message}")]
    UnexpectedOutput { command: String, message: String },
}

impl Error {
    pub fn failed(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            stderr: stderr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_display() {
        let err = Error::failed("brew uninstall node", "Error: No such keg");
        let display = err.to_string();
        assert!(display.contains("brew uninstall node"));
        assert!(display.contains("No such keg"));
    }
}
