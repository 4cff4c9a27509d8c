//! Lock Engine
//!
//! The lock file is a disposable snapshot of exact versions for the
//! project's pure packages and their dependencies:
//!
//! ```toml
//! [metadata]
//! generated = "2026-01-01T00:00:00+00:00"
//! macdev_version = "0.1.0"
//!
//! [packages.python]
//! version = "3.11.7"
//! formula = "python@3.11"
//!
//! [dependencies."python:readline"]
//! version = "8.2.1"
//! formula = "readline"
//! ```
//!
//! Only packages listed in the local manifest ever appear. Impure
//! packages and casks are invisible to this module.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::manifest::LocalManifest;
use crate::resolver::Resolver;
use crate::spec::PackageSpec;
use crate::Result;

/// Separator in `dependencies` keys, `package:dependency`
pub const DEPENDENCY_SEPARATOR: char = ':';

/// When and by what the snapshot was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockMetadata {
    /// RFC 3339 timestamp
    pub generated: String,
    pub macdev_version: String,
}

impl Default for LockMetadata {
    fn default() -> Self {
        Self {
            generated: Utc::now().to_rfc3339(),
            macdev_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Exact version of one installed formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedPackage {
    pub version: String,
    pub formula: String,
}

impl From<macdev_brew::FormulaInfo> for LockedPackage {
    fn from(info: macdev_brew::FormulaInfo) -> Self {
        Self {
            version: info.version,
            formula: info.formula,
        }
    }
}

/// The reproducibility snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockFile {
    pub metadata: LockMetadata,
    #[serde(default)]
    pub packages: BTreeMap<String, LockedPackage>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, LockedPackage>,
}

impl LockFile {
    /// Empty snapshot stamped with the current time.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_package(&mut self, name: impl Into<String>, locked: LockedPackage) {
        self.packages.insert(name.into(), locked);
    }

    pub fn add_dependency(&mut self, package: &str, dependency: &str, locked: LockedPackage) {
        self.dependencies.insert(
            format!("{package}{DEPENDENCY_SEPARATOR}{dependency}"),
            locked,
        );
    }

    /// Dependencies recorded for one package, `(name, entry)`.
    pub fn dependencies_of<'a>(
        &'a self,
        package: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a LockedPackage)> + 'a {
        self.dependencies.iter().filter_map(move |(key, locked)| {
            let (owner, dep) = key.split_once(DEPENDENCY_SEPARATOR)?;
            (owner == package).then_some((dep, locked))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.dependencies.is_empty()
    }

    pub fn load(path: &Path) -> Result<Self> {
        crate::manifest::load_toml(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        crate::manifest::save_toml(path, self)
    }

    /// Build a snapshot of every resolvable local package.
    ///
    /// Packages the resolver knows nothing about are left out; partial
    /// snapshots are acceptable.
    pub fn generate(local: &LocalManifest, resolver: &Resolver<'_>) -> Self {
        let mut lock = Self::new();

        for (key, version) in local.entries() {
            let spec = PackageSpec::from_entry(key, version);
            let Some(info) = resolver.fetch_version_and_origin(&spec) else {
                tracing::info!(package = %spec, "skipping unresolvable package in lock");
                continue;
            };
            lock.add_package(key, info.into());

            for dep in resolver.fetch_dependencies(&spec) {
                match resolver.fetch_version_and_origin(&PackageSpec::parse(&dep)) {
                    Some(info) => lock.add_dependency(key, &dep, info.into()),
                    None => tracing::debug!(package = %spec, dependency = %dep, "dependency not resolvable"),
                }
            }
        }

        lock
    }
}

/// What happened to the lock file after a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockOutcome {
    /// A snapshot was written
    Written { packages: usize, dependencies: usize },
    /// No pure packages remain; the old lock file was deleted
    Removed,
    /// No pure packages and no lock file to delete
    Absent,
    /// Regeneration failed; the caller's result stands
    Failed(String),
}

impl LockOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Regenerate or delete the lock file at `path`.
///
/// Never fails: errors are logged and reported as [`LockOutcome::Failed`]
/// so the operation this is attached to keeps its own result.
pub fn regenerate(path: &Path, local: &LocalManifest, resolver: &Resolver<'_>) -> LockOutcome {
    let result = if local.is_empty() {
        macdev_fs::io::remove_file_if_exists(path)
            .map(|removed| {
                if removed {
                    tracing::info!(path = %path.display(), "removed lock file");
                    LockOutcome::Removed
                } else {
                    LockOutcome::Absent
                }
            })
            .map_err(crate::Error::from)
    } else {
        let lock = LockFile::generate(local, resolver);
        lock.save(path).map(|()| {
            tracing::debug!(
                path = %path.display(),
                packages = lock.packages.len(),
                dependencies = lock.dependencies.len(),
                "wrote lock file"
            );
            LockOutcome::Written {
                packages: lock.packages.len(),
                dependencies: lock.dependencies.len(),
            }
        })
    };

    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to update lock file");
        LockOutcome::Failed(e.to_string())
    })
}
