//! Typed results of engine operations
//!
//! No-op outcomes are explicit variants so callers (and tests) can tell
//! "nothing to do" apart from "ran and changed nothing".

use std::path::PathBuf;

use crate::lock::LockOutcome;
use crate::profile::{InterpreterLinks, RebuildReport};
use crate::venv::VenvOutcome;

/// Package classification chosen for an add or found on removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    Pure,
    Impure,
    Cask,
}

impl std::fmt::Display for PackageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pure => "pure",
            Self::Impure => "impure",
            Self::Cask => "cask",
        })
    }
}

/// Flags for [`crate::Engine::add`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddOptions {
    pub impure: bool,
    pub cask: bool,
}

impl AddOptions {
    pub fn pure() -> Self {
        Self::default()
    }

    pub fn impure() -> Self {
        Self {
            impure: true,
            cask: false,
        }
    }

    pub fn cask() -> Self {
        Self {
            impure: true,
            cask: true,
        }
    }

    pub fn kind(&self) -> PackageKind {
        if self.cask {
            PackageKind::Cask
        } else if self.impure {
            PackageKind::Impure
        } else {
            PackageKind::Pure
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReport {
    /// Canonical spec that was installed
    pub spec: String,
    pub kind: PackageKind,
    /// The package was staged for gc and has been taken back
    pub restored_from_gc: bool,
    /// A cask was requested without `impure` and installed system-wide anyway
    pub cask_forced_impure: bool,
    /// Profile links created for a pure package
    pub linked: Vec<String>,
    pub interpreter: Option<InterpreterLinks>,
    pub venv: Option<VenvOutcome>,
    /// Untracked dependencies unlinked after a pure install
    pub unlinked_dependencies: Vec<String>,
    /// Set when the lock file was touched
    pub lock: Option<LockOutcome>,
}

impl AddReport {
    pub(crate) fn new(spec: String, kind: PackageKind) -> Self {
        Self {
            spec,
            kind,
            restored_from_gc: false,
            cask_forced_impure: false,
            linked: Vec::new(),
            interpreter: None,
            venv: None,
            unlinked_dependencies: Vec::new(),
            lock: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveReport {
    pub spec: String,
    pub kind: PackageKind,
    /// Key now staged in the gc set
    pub gc_key: String,
    /// Removed from this project's manifest
    pub removed_locally: bool,
    pub lock: Option<LockOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub installed: Vec<String>,
    pub rebuild: RebuildReport,
    pub venv: Option<VenvOutcome>,
    pub lock: LockOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    Tapped,
    AlreadyTapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UntapOutcome {
    Untapped,
    NotTapped,
}

/// Report from a sync operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Whether every sub-pass completed without error
    pub success: bool,
    /// Actions taken during the operation
    pub actions: Vec<String>,
    /// Errors encountered during the operation
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn success() -> Self {
        Self {
            success: true,
            actions: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: String) -> Self {
        self.actions.push(action);
        self
    }

    pub(crate) fn record_error(&mut self, error: String) {
        self.success = false;
        self.errors.push(error);
    }

    /// Nothing was out of sync
    pub fn is_noop(&self) -> bool {
        self.actions.is_empty() && self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GcOutcome {
    /// Nothing staged and nothing to purge; no external calls were made
    NothingToCollect,
    Collected(GcReport),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GcReport {
    /// Keys uninstalled and dropped from the manifest
    pub removed: Vec<String>,
    /// Keys whose uninstall failed, with the reason; still staged
    pub failed: Vec<(String, String)>,
    /// The manager's cleanup step succeeded
    pub cleaned: bool,
    pub lock: Option<LockOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// No pure or impure packages are tracked
    NothingToUpgrade,
    Upgraded(UpgradeReport),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeReport {
    pub upgraded: Vec<String>,
    pub up_to_date: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub profile_rebuilt: bool,
    /// The interpreter changed; an existing venv may need recreating
    pub interpreter_hint: bool,
    pub lock: Option<LockOutcome>,
}

/// A single failed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckIssue {
    ManifestMissing { path: PathBuf },
    PackagesMissing { packages: Vec<String> },
    ProfileEmpty { path: PathBuf },
}

impl std::fmt::Display for CheckIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ManifestMissing { path } => write!(f, "No manifest found at {}", path.display()),
            Self::PackagesMissing { packages } => {
                write!(f, "Missing packages: {}", packages.join(", "))
            }
            Self::ProfileEmpty { path } => write!(f, "Profile is empty: {}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub issues: Vec<CheckIssue>,
    /// Set when a missing lock file was generated
    pub lock: Option<LockOutcome>,
}

impl CheckReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}
