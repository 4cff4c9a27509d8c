//! Error types for macdev-core

use std::path::PathBuf;

/// Result type for macdev-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a macdev operation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The external package manager is not installed
    #[error("Homebrew is not installed. Install it from https://brew.sh")]
    ManagerUnavailable,

    /// No local manifest where one is required
    #[error("No manifest found at {path}. Run 'macdev init' first.")]
    ManifestNotFound { path: PathBuf },

    /// A manifest or lock file exists but is not valid TOML for its schema
    #[error("Failed to parse {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// The package is not tracked in any manifest section that applies
    #[error("Package '{spec}' is not tracked")]
    UntrackedPackage { spec: String },

    /// An impure or cask add for a package this project tracks as pure
    #[error("Package '{spec}' is tracked as pure in this project. Run 'macdev remove {spec}' first.")]
    TrackedAsPure { spec: String },

    /// The user's home directory could not be determined
    #[error("Could not determine the home directory")]
    NoHomeDir,

    /// Package manager error from macdev-brew
    #[error(transparent)]
    Brew(#[from] macdev_brew::Error),

    /// Filesystem error from macdev-fs
    #[error(transparent)]
    Fs(#[from] macdev_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}
