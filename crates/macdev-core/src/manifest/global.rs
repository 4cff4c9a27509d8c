//! Per-user global manifest

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::spec::{PackageSpec, WILDCARD};
use crate::Result;

/// How a tracked package is installed.
///
/// A key carries exactly one classification, so the same spec can never
/// be pure and impure at once. `python@3.11` and `python` are different
/// keys and may be classified differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tracking {
    /// Installed unlinked, exposed only through project profiles
    Pure { version: String },
    /// Installed and linked system-wide
    Impure,
    /// GUI application, always system-wide
    Cask,
}

/// Everything macdev has installed for this user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "GlobalManifestFile", into = "GlobalManifestFile")]
pub struct GlobalManifest {
    tracked: BTreeMap<String, Tracking>,
    gc: BTreeMap<String, String>,
    taps: BTreeSet<String>,
}

/// On-disk layout: five independent sections.
///
/// `packages` is always written; the other sections are omitted when
/// empty. Set-like sections are stored as `name = true` tables.
#[derive(Debug, Default, Serialize, Deserialize)]
struct GlobalManifestFile {
    #[serde(default)]
    packages: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    impure: BTreeMap<String, bool>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    casks: BTreeMap<String, bool>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    gc: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    taps: BTreeMap<String, bool>,
}

impl From<GlobalManifestFile> for GlobalManifest {
    fn from(file: GlobalManifestFile) -> Self {
        let mut tracked: BTreeMap<String, Tracking> = file
            .packages
            .into_iter()
            .map(|(key, version)| (key, Tracking::Pure { version }))
            .collect();

        let flagged = |section: BTreeMap<String, bool>| {
            section
                .into_iter()
                .filter(|(_, enabled)| *enabled)
                .map(|(key, _)| key)
                .collect::<Vec<_>>()
        };

        for (key, tracking) in flagged(file.impure)
            .into_iter()
            .map(|k| (k, Tracking::Impure))
            .chain(flagged(file.casks).into_iter().map(|k| (k, Tracking::Cask)))
        {
            if let Some(existing) = tracked.get(&key) {
                tracing::warn!(
                    package = %key,
                    kept = ?existing,
                    dropped = ?tracking,
                    "package listed in two manifest sections"
                );
                continue;
            }
            tracked.insert(key, tracking);
        }

        Self {
            tracked,
            gc: file.gc,
            taps: flagged(file.taps).into_iter().collect(),
        }
    }
}

impl From<GlobalManifest> for GlobalManifestFile {
    fn from(manifest: GlobalManifest) -> Self {
        let mut file = GlobalManifestFile {
            gc: manifest.gc,
            taps: manifest.taps.into_iter().map(|t| (t, true)).collect(),
            ..Default::default()
        };

        for (key, tracking) in manifest.tracked {
            match tracking {
                Tracking::Pure { version } => {
                    file.packages.insert(key, version);
                }
                Tracking::Impure => {
                    file.impure.insert(key, true);
                }
                Tracking::Cask => {
                    file.casks.insert(key, true);
                }
            }
        }

        file
    }
}

impl GlobalManifest {
    /// Load from disk.
    ///
    /// # Errors
    ///
    /// `ManifestNotFound` when the file is absent, `ManifestParse` when
    /// it is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        super::load_toml(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        super::save_toml(path, self)
    }

    pub fn tracking(&self, key: &str) -> Option<&Tracking> {
        self.tracked.get(key)
    }

    pub fn is_pure(&self, key: &str) -> bool {
        matches!(self.tracked.get(key), Some(Tracking::Pure { .. }))
    }

    pub fn is_impure(&self, key: &str) -> bool {
        matches!(self.tracked.get(key), Some(Tracking::Impure))
    }

    pub fn is_cask(&self, key: &str) -> bool {
        matches!(self.tracked.get(key), Some(Tracking::Cask))
    }

    /// Stored version of a pure entry.
    pub fn pure_version(&self, key: &str) -> Option<&str> {
        match self.tracked.get(key) {
            Some(Tracking::Pure { version }) => Some(version),
            _ => None,
        }
    }

    /// Pure entries as stored, `(key, version)`.
    pub fn pure(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tracked.iter().filter_map(|(key, tracking)| match tracking {
            Tracking::Pure { version } => Some((key.as_str(), version.as_str())),
            _ => None,
        })
    }

    pub fn impure(&self) -> impl Iterator<Item = &str> {
        self.keys_of(Tracking::Impure)
    }

    pub fn casks(&self) -> impl Iterator<Item = &str> {
        self.keys_of(Tracking::Cask)
    }

    fn keys_of(&self, wanted: Tracking) -> impl Iterator<Item = &str> {
        self.tracked
            .iter()
            .filter(move |(_, tracking)| **tracking == wanted)
            .map(|(key, _)| key.as_str())
    }

    /// Record a pure package.
    ///
    /// Versioned specs are keyed by the full spec with a wildcard value;
    /// unversioned specs by the bare name.
    pub fn insert_pure(&mut self, spec: &PackageSpec) {
        self.insert_pure_entry(spec.to_string(), WILDCARD);
    }

    /// Record a pure entry exactly as given.
    pub fn insert_pure_entry(&mut self, key: impl Into<String>, version: impl Into<String>) {
        self.tracked.insert(
            key.into(),
            Tracking::Pure {
                version: version.into(),
            },
        );
    }

    pub fn insert_impure(&mut self, key: impl Into<String>) {
        self.tracked.insert(key.into(), Tracking::Impure);
    }

    pub fn insert_cask(&mut self, key: impl Into<String>) {
        self.tracked.insert(key.into(), Tracking::Cask);
    }

    pub fn remove_tracked(&mut self, key: &str) -> Option<Tracking> {
        self.tracked.remove(key)
    }

    /// Remove a key only if it is pure, returning its stored version.
    pub fn remove_pure(&mut self, key: &str) -> Option<String> {
        if !self.is_pure(key) {
            return None;
        }
        match self.tracked.remove(key) {
            Some(Tracking::Pure { version }) => Some(version),
            _ => None,
        }
    }

    /// Key under which `spec` is recorded as pure, if any.
    ///
    /// Matches the canonical spec key, or for a versioned spec a bare-name
    /// key whose stored version equals the spec's version.
    pub fn find_pure(&self, spec: &PackageSpec) -> Option<String> {
        let exact = spec.to_string();
        if self.is_pure(&exact) {
            return Some(exact);
        }

        let version = spec.version()?;
        match self.pure_version(spec.name()) {
            Some(stored) if stored == version => Some(spec.name().to_string()),
            _ => None,
        }
    }

    /// Whether a formula name appears anywhere, tracked or staged for gc.
    pub fn knows(&self, key: &str) -> bool {
        self.tracked.contains_key(key) || self.gc.contains_key(key)
    }

    pub fn has_tracked(&self) -> bool {
        !self.tracked.is_empty()
    }

    pub fn gc(&self) -> &BTreeMap<String, String> {
        &self.gc
    }

    /// Stage a package for physical removal.
    pub fn stage_gc(&mut self, key: impl Into<String>, version: impl Into<String>) {
        self.gc.insert(key.into(), version.into());
    }

    pub fn remove_gc(&mut self, key: &str) -> Option<String> {
        self.gc.remove(key)
    }

    /// Take a package back out of the gc set before it is reinstalled.
    ///
    /// Clears both the canonical spec and the bare name. Returns whether
    /// anything was restored.
    pub fn restore_from_gc(&mut self, spec: &PackageSpec) -> bool {
        let exact = self.gc.remove(&spec.to_string()).is_some();
        let bare = self.gc.remove(spec.name()).is_some();
        exact || bare
    }

    pub fn taps(&self) -> &BTreeSet<String> {
        &self.taps
    }

    pub fn add_tap(&mut self, tap: impl Into<String>) -> bool {
        self.taps.insert(tap.into())
    }

    pub fn remove_tap(&mut self, tap: &str) -> bool {
        self.taps.remove(tap)
    }
}
