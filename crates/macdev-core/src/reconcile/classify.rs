//! Which manifest entry a user-supplied spec refers to
//!
//! Precedence, first match wins:
//!
//! 1. cask tracked under the exact spec
//! 2. pure package matching the exact spec (local or global)
//! 3. impure package tracked under the exact spec
//! 4. versioned specs only: pure package tracked under the bare name
//! 5. versioned specs only: impure package tracked under the bare name
//!
//! For a bare request like `python`, a local `python = "3.11"` counts as
//! an exact match. For `python@3.12` it does not, so a pin is never
//! removed by a request for a different version.

use crate::manifest::{GlobalManifest, LocalManifest};
use crate::spec::{PackageSpec, WILDCARD};

/// A resolved manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Cask { key: String },
    Impure { key: String },
    /// At least one of the two keys is set
    Pure {
        local_key: Option<String>,
        global_key: Option<String>,
    },
}

impl Classification {
    pub fn is_pure(&self) -> bool {
        matches!(self, Self::Pure { .. })
    }
}

/// Classify `spec` against the manifests. `None` means untracked.
pub fn classify(
    spec: &PackageSpec,
    local: Option<&LocalManifest>,
    global: &GlobalManifest,
) -> Option<Classification> {
    let canonical = spec.to_string();

    if global.is_cask(&canonical) {
        return Some(Classification::Cask { key: canonical });
    }

    let local_key = local.and_then(|l| exact_local_key(l, spec));
    let global_key = global.find_pure(spec).or_else(|| {
        // local `python = "3.11"` is tracked globally as `python@3.11`
        let version = local.zip(local_key.as_deref()).and_then(|(l, k)| l.get(k))?;
        let key = PackageSpec::new(spec.name(), Some(version)).to_string();
        global.is_pure(&key).then_some(key)
    });
    if local_key.is_some() || global_key.is_some() {
        return Some(Classification::Pure {
            local_key,
            global_key,
        });
    }

    if global.is_impure(&canonical) {
        return Some(Classification::Impure { key: canonical });
    }

    if !spec.is_versioned() {
        return None;
    }

    let name = spec.name();
    let local_key = local
        .filter(|l| l.get(name) == Some(WILDCARD))
        .map(|_| name.to_string());
    let global_key = global.is_pure(name).then(|| name.to_string());
    if local_key.is_some() || global_key.is_some() {
        return Some(Classification::Pure {
            local_key,
            global_key,
        });
    }

    global.is_impure(name).then(|| Classification::Impure {
        key: name.to_string(),
    })
}

/// Local key holding exactly this spec.
fn exact_local_key(local: &LocalManifest, spec: &PackageSpec) -> Option<String> {
    let canonical = spec.to_string();
    if local.contains_key(&canonical) {
        return Some(canonical);
    }

    let stored = local.get(spec.name())?;
    match spec.version() {
        None => Some(spec.name().to_string()),
        Some(version) if version == stored => Some(spec.name().to_string()),
        Some(_) => None,
    }
}

/// The fully versioned spec a pure entry stands for.
///
/// Version comes from the request, then the local entry, then the stored
/// global entry.
pub fn reconstruct_spec(
    spec: &PackageSpec,
    local_entry: Option<(&str, &str)>,
    global_entry: Option<(&str, &str)>,
) -> PackageSpec {
    if spec.is_versioned() {
        return spec.clone();
    }

    [local_entry, global_entry]
        .into_iter()
        .flatten()
        .map(|(key, version)| PackageSpec::from_entry(key, version))
        .find(PackageSpec::is_versioned)
        .unwrap_or_else(|| spec.clone())
}
