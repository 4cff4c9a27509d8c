//! Engine configuration
//!
//! Everything that would otherwise be read from process state (working
//! directory, home directory, environment flags) is collected here and
//! handed to the engine at construction.

use std::path::{Path, PathBuf};

use macdev_fs::ProjectPath;
use macdev_fs::constants::{GLOBAL_MANIFEST, PROFILE_BIN};

use crate::{Error, Result};

/// Explicit configuration for a [`crate::Engine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Project directory holding `.macdev/`
    pub project_root: PathBuf,
    /// Per-user global manifest file
    pub global_manifest: PathBuf,
    /// Already running inside an isolated macdev shell
    pub isolated: bool,
    /// Create `.macdev/venv` after the interpreter is added
    pub create_venv: bool,
}

impl EngineConfig {
    /// Configuration with explicit paths.
    pub fn new(project_root: impl Into<PathBuf>, global_manifest: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            global_manifest: global_manifest.into(),
            isolated: false,
            create_venv: true,
        }
    }

    /// Configuration using the user's default global manifest location.
    pub fn for_user(project_root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(project_root, default_global_manifest()?))
    }

    pub fn with_isolated(mut self, isolated: bool) -> Self {
        self.isolated = isolated;
        self
    }

    pub fn with_venv(mut self, create_venv: bool) -> Self {
        self.create_venv = create_venv;
        self
    }

    pub fn local_manifest_path(&self) -> PathBuf {
        ProjectPath::Manifest.under(&self.project_root)
    }

    pub fn lock_path(&self) -> PathBuf {
        ProjectPath::Lock.under(&self.project_root)
    }

    pub fn profile_dir(&self) -> PathBuf {
        ProjectPath::Profile.under(&self.project_root)
    }

    pub fn profile_bin(&self) -> PathBuf {
        self.profile_dir().join(PROFILE_BIN)
    }

    pub fn venv_dir(&self) -> PathBuf {
        ProjectPath::Venv.under(&self.project_root)
    }

    pub fn global_manifest_path(&self) -> &Path {
        &self.global_manifest
    }
}

/// `~/.config/macdev/manifest.toml`
pub fn default_global_manifest() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
    Ok(home.join(GLOBAL_MANIFEST))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_live_under_project() {
        let config = EngineConfig::new("/work/app", "/home/u/.config/macdev/manifest.toml");
        assert_eq!(
            config.local_manifest_path(),
            PathBuf::from("/work/app/.macdev/manifest.toml")
        );
        assert_eq!(config.lock_path(), PathBuf::from("/work/app/.macdev/manifest.lock"));
        assert_eq!(config.profile_bin(), PathBuf::from("/work/app/.macdev/profile/bin"));
        assert_eq!(config.venv_dir(), PathBuf::from("/work/app/.macdev/venv"));
    }

    #[test]
    fn builders_set_flags() {
        let config = EngineConfig::new("/p", "/g")
            .with_isolated(true)
            .with_venv(false);
        assert!(config.isolated);
        assert!(!config.create_venv);
    }
}
