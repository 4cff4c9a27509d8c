//! Package Resolver
//!
//! Read-only questions about what the package manager has installed.
//! Nothing is cached: every call reflects the manager's present state.

use std::path::PathBuf;

use macdev_brew::{FormulaInfo, PackageManager};

use crate::spec::PackageSpec;

/// Queries against an installed package set.
pub struct Resolver<'a> {
    manager: &'a dyn PackageManager,
}

impl<'a> Resolver<'a> {
    pub fn new(manager: &'a dyn PackageManager) -> Self {
        Self { manager }
    }

    /// Installation prefix, or `None` when the manager cannot say.
    pub fn resolve_prefix(&self, spec: &PackageSpec) -> Option<PathBuf> {
        let prefix = self.manager.prefix_of(&spec.to_string());
        if prefix.is_none() {
            tracing::debug!(package = %spec, "no prefix reported");
        }
        prefix
    }

    /// Exact installed version and the formula it came from.
    pub fn fetch_version_and_origin(&self, spec: &PackageSpec) -> Option<FormulaInfo> {
        self.manager
            .info(&spec.to_string())
            .filter(|info| !info.version.is_empty() && !info.formula.is_empty())
    }

    /// Dependency names in manager order, never including the package itself.
    pub fn fetch_dependencies(&self, spec: &PackageSpec) -> Vec<String> {
        let canonical = spec.to_string();
        self.manager
            .dependencies_of(&canonical)
            .into_iter()
            .filter(|dep| !dep.is_empty() && *dep != canonical && dep != spec.name())
            .collect()
    }
}
