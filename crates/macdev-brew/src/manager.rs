//! The PackageManager trait and the facts it reports

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Exact version and origin formula of an installed package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaInfo {
    /// Installed version, e.g. "3.11.7"
    pub version: String,
    /// Fully qualified formula the version came from, e.g. "python@3.11"
    pub formula: String,
}

/// Result of asking the manager to upgrade a single package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeStatus {
    /// A newer version was installed
    Upgraded,
    /// Nothing to do
    AlreadyUpToDate,
}

/// Capabilities macdev consumes from the external package manager.
///
/// Specs are passed through verbatim (`name` or `name@version`). Query
/// methods never fail: a lookup the manager cannot answer yields `None`,
/// `false` or an empty list. Mutating methods return `Err` when the
/// manager reports failure; whether that is fatal is the caller's call.
pub trait PackageManager {
    /// Whether the manager executable is usable at all.
    fn is_available(&self) -> bool;

    /// Install a formula (no-op if present) and return its prefix.
    ///
    /// With `link == false` the formula is unlinked afterwards so it is
    /// not visible system-wide.
    fn install(&self, spec: &str, link: bool) -> Result<PathBuf>;

    /// Install a cask.
    fn install_cask(&self, spec: &str) -> Result<()>;

    fn uninstall(&self, spec: &str) -> Result<()>;

    fn uninstall_cask(&self, spec: &str) -> Result<()>;

    fn is_installed(&self, spec: &str) -> bool;

    fn is_cask_installed(&self, spec: &str) -> bool;

    /// Remove a formula's system-wide links.
    fn unlink(&self, spec: &str) -> Result<()>;

    /// Upgrade a single formula or cask.
    fn upgrade(&self, spec: &str) -> Result<UpgradeStatus>;

    /// Remove stale downloads and old versions.
    fn cleanup(&self) -> Result<()>;

    fn is_tapped(&self, tap: &str) -> bool;

    fn tap(&self, tap: &str) -> Result<()>;

    fn untap(&self, tap: &str) -> Result<()>;

    /// Installation prefix of an installed formula.
    fn prefix_of(&self, spec: &str) -> Option<PathBuf>;

    /// Exact version and origin formula.
    fn info(&self, spec: &str) -> Option<FormulaInfo>;

    /// Direct and transitive dependency names, in manager order.
    fn dependencies_of(&self, spec: &str) -> Vec<String>;
}
