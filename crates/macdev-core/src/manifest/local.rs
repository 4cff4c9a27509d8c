//! Project-local manifest

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::spec::PackageSpec;
use crate::Result;

/// Pure packages required by one project, `name = "version"`.
///
/// The type has no impure, cask, gc or tap fields, so nothing but
/// `[packages]` can ever be written to a project. Unknown sections in an
/// existing file are ignored on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalManifest {
    #[serde(default)]
    packages: BTreeMap<String, String>,
}

impl LocalManifest {
    /// Parse a manifest from TOML content.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

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

    /// Record a pure package under its bare name.
    ///
    /// A later version pin or wildcard for the same name replaces the
    /// earlier one, so a name never appears twice.
    pub fn insert(&mut self, spec: &PackageSpec) -> Option<String> {
        self.packages
            .insert(spec.name().to_string(), spec.version_or_wildcard().to_string())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.packages.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.packages.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.packages.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Raw `(key, version)` entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.packages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries as canonical specs, in key order.
    pub fn specs(&self) -> Vec<PackageSpec> {
        self.entries()
            .map(|(key, version)| PackageSpec::from_entry(key, version))
            .collect()
    }
}
