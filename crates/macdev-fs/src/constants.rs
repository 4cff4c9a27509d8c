//! Well-known paths inside a macdev project.

use std::path::{Path, PathBuf};

/// Project-relative locations owned by macdev.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPath {
    /// The `.macdev` directory
    StateDir,
    /// The local manifest, `.macdev/manifest.toml`
    Manifest,
    /// The lock file, `.macdev/manifest.lock`
    Lock,
    /// The symlink profile, `.macdev/profile`
    Profile,
    /// The interpreter environment, `.macdev/venv`
    Venv,
}

impl ProjectPath {
    /// Get the path relative to the project root.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateDir => ".macdev",
            Self::Manifest => ".macdev/manifest.toml",
            Self::Lock => ".macdev/manifest.lock",
            Self::Profile => ".macdev/profile",
            Self::Venv => ".macdev/venv",
        }
    }

    /// Resolve against a project root.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(self.as_str())
    }
}

/// Binary directory inside a profile.
pub const PROFILE_BIN: &str = "bin";

/// Global manifest location relative to the user's home directory.
pub const GLOBAL_MANIFEST: &str = ".config/macdev/manifest.toml";

impl AsRef<Path> for ProjectPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_state_dir() {
        for path in [
            ProjectPath::Manifest,
            ProjectPath::Lock,
            ProjectPath::Profile,
            ProjectPath::Venv,
        ] {
            assert!(path.as_str().starts_with(ProjectPath::StateDir.as_str()));
        }
    }

    #[test]
    fn under_joins_root() {
        let root = Path::new("/work/project");
        assert_eq!(
            ProjectPath::Lock.under(root),
            PathBuf::from("/work/project/.macdev/manifest.lock")
        );
    }
}
