//! Environment health check

use crate::Result;

use super::engine::Engine;
use super::report::{CheckIssue, CheckReport};

impl Engine {
    /// Verify the project against the manifests and the profile.
    ///
    /// Fails when the local manifest is missing, when any local package
    /// is not in the global manifest, or when the profile has no
    /// binaries (even for an empty manifest). A healthy project without
    /// a lock file gets one.
    pub fn check(&self) -> Result<CheckReport> {
        let mut report = CheckReport::default();

        let Some(local) = self.load_local() else {
            report.issues.push(CheckIssue::ManifestMissing {
                path: self.config().local_manifest_path(),
            });
            return Ok(report);
        };

        let global = self.load_global();
        let missing: Vec<String> = local
            .specs()
            .into_iter()
            .filter(|spec| global.find_pure(spec).is_none())
            .map(|spec| spec.to_string())
            .collect();
        if !missing.is_empty() {
            report.issues.push(CheckIssue::PackagesMissing { packages: missing });
        }

        let profile = self.profile();
        if !profile.is_populated() {
            report.issues.push(CheckIssue::ProfileEmpty {
                path: profile.bin_dir(),
            });
        }

        if report.is_healthy() && !self.config().lock_path().exists() {
            report.lock = Some(self.regenerate_lock(&local));
        }

        tracing::debug!(issues = report.issues.len(), "check finished");
        Ok(report)
    }
}
