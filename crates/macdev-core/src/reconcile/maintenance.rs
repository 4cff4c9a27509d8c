//! sync, gc and upgrade

use macdev_brew::UpgradeStatus;

use crate::profile::is_interpreter;
use crate::spec::PackageSpec;
use crate::{Error, Result};

use super::classify::{Classification, classify, reconstruct_spec};
use super::engine::Engine;
use super::report::{AddOptions, GcOutcome, GcReport, SyncReport, UpgradeOutcome, UpgradeReport};

impl Engine {
    /// Bring the machine in line with the manifests.
    ///
    /// Taps, local pure packages, impure packages and casks are separate
    /// passes; an error in one is recorded and the others still run. A
    /// pure package already in the global manifest counts as synced.
    pub fn sync(&self) -> Result<SyncReport> {
        self.ensure_manager()?;
        let manager = self.manager();
        let global = self.load_global();
        let mut report = SyncReport::success();

        for tap in global.taps() {
            if manager.is_tapped(tap) {
                continue;
            }
            match manager.tap(tap) {
                Ok(()) => report = report.with_action(format!("Tapped {tap}")),
                Err(e) => report.record_error(format!("Failed to tap {tap}: {e}")),
            }
        }

        if let Some(local) = self.load_local() {
            for spec in local.specs() {
                if global.find_pure(&spec).is_some() {
                    continue;
                }
                report = self.sync_one(report, &spec, AddOptions::pure());
            }
        }

        for name in global.impure() {
            if !manager.is_installed(name) {
                report = self.sync_one(report, &PackageSpec::parse(name), AddOptions::impure());
            }
        }

        for name in global.casks() {
            if !manager.is_cask_installed(name) {
                report = self.sync_one(report, &PackageSpec::parse(name), AddOptions::cask());
            }
        }

        tracing::info!(
            actions = report.actions.len(),
            errors = report.errors.len(),
            "sync finished"
        );
        Ok(report)
    }

    fn sync_one(&self, mut report: SyncReport, spec: &PackageSpec, options: AddOptions) -> SyncReport {
        let kind = options.kind();
        match self.add(&spec.to_string(), options) {
            Ok(_) => report.with_action(format!("Installed {spec} ({kind})")),
            Err(e) => {
                report.record_error(format!("Failed to install {spec}: {e}"));
                report
            }
        }
    }

    /// Uninstall everything staged for removal.
    ///
    /// With `all`, every pure package is uninstalled too. Failed
    /// uninstalls stay staged for the next run. When there is nothing to
    /// do, no external call is made and the lock is left alone.
    pub fn gc(&self, all: bool) -> Result<GcOutcome> {
        let mut global = self.load_global();
        let purge: Vec<(String, String)> = if all {
            global
                .pure()
                .map(|(key, version)| (key.to_string(), version.to_string()))
                .collect()
        } else {
            Vec::new()
        };

        if global.gc().is_empty() && purge.is_empty() {
            return Ok(GcOutcome::NothingToCollect);
        }

        self.ensure_manager()?;
        let manager = self.manager();
        let mut report = GcReport::default();

        let staged: Vec<(String, String)> = global
            .gc()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (key, version) in staged {
            let target = PackageSpec::from_entry(&key, &version).to_string();
            let result = if manager.is_cask_installed(&target) {
                manager.uninstall_cask(&target)
            } else {
                manager.uninstall(&target)
            };

            match result {
                Ok(()) => {
                    global.remove_gc(&key);
                    report.removed.push(key);
                }
                Err(e) => {
                    tracing::warn!(package = %key, error = %e, "uninstall failed, keeping in gc");
                    report.failed.push((key, e.to_string()));
                }
            }
        }

        for (key, version) in purge {
            let target = PackageSpec::from_entry(&key, &version).to_string();
            global.remove_pure(&key);
            match manager.uninstall(&target) {
                Ok(()) => report.removed.push(key),
                Err(e) => {
                    tracing::warn!(package = %key, error = %e, "uninstall failed, staging for gc");
                    global.stage_gc(key.clone(), version);
                    report.failed.push((key, e.to_string()));
                }
            }
        }

        self.save_global(&global)?;

        report.cleaned = match manager.cleanup() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "cleanup failed");
                false
            }
        };
        report.lock = self.regenerate_project_lock(self.load_local().as_ref());

        tracing::info!(
            removed = report.removed.len(),
            failed = report.failed.len(),
            "garbage collection finished"
        );
        Ok(GcOutcome::Collected(report))
    }

    /// Upgrade one tracked package, or every pure and impure package.
    ///
    /// # Errors
    ///
    /// `UntrackedPackage` for a target that is not tracked. A failed
    /// targeted upgrade is returned as an error; during upgrade-all,
    /// failures are collected in the report.
    pub fn upgrade(&self, target: Option<&str>) -> Result<UpgradeOutcome> {
        match target {
            Some(raw) => self.upgrade_one(&PackageSpec::parse(raw)),
            None => self.upgrade_all(),
        }
    }

    fn upgrade_one(&self, spec: &PackageSpec) -> Result<UpgradeOutcome> {
        let local = self.load_local();
        let global = self.load_global();
        let classification =
            classify(spec, local.as_ref(), &global).ok_or_else(|| Error::UntrackedPackage {
                spec: spec.to_string(),
            })?;
        self.ensure_manager()?;

        let target = match &classification {
            Classification::Cask { key } | Classification::Impure { key } => PackageSpec::parse(key),
            Classification::Pure {
                local_key,
                global_key,
            } => reconstruct_spec(
                spec,
                local_key
                    .as_deref()
                    .and_then(|k| Some((k, local.as_ref()?.get(k)?))),
                global_key
                    .as_deref()
                    .and_then(|k| Some((k, global.pure_version(k)?))),
            ),
        };

        let mut report = UpgradeReport::default();
        match self.manager().upgrade(&target.to_string())? {
            UpgradeStatus::Upgraded => report.upgraded.push(target.to_string()),
            UpgradeStatus::AlreadyUpToDate => report.up_to_date.push(target.to_string()),
        }

        if classification.is_pure() && !report.upgraded.is_empty() {
            report.profile_rebuilt = self.rebuild_local_profile()?;
            report.interpreter_hint = is_interpreter(&target);
        }
        report.lock = self.regenerate_project_lock(local.as_ref());
        Ok(UpgradeOutcome::Upgraded(report))
    }

    fn upgrade_all(&self) -> Result<UpgradeOutcome> {
        let global = self.load_global();
        let pure: Vec<PackageSpec> = global
            .pure()
            .map(|(key, version)| PackageSpec::from_entry(key, version))
            .collect();
        let system: Vec<PackageSpec> = global
            .impure()
            .chain(global.casks())
            .map(PackageSpec::parse)
            .collect();

        if pure.is_empty() && system.is_empty() {
            return Ok(UpgradeOutcome::NothingToUpgrade);
        }
        self.ensure_manager()?;

        let mut report = UpgradeReport::default();
        for spec in pure.iter().chain(&system) {
            let name = spec.to_string();
            match self.manager().upgrade(&name) {
                Ok(UpgradeStatus::Upgraded) => report.upgraded.push(name),
                Ok(UpgradeStatus::AlreadyUpToDate) => report.up_to_date.push(name),
                Err(e) => {
                    tracing::warn!(package = %name, error = %e, "upgrade failed");
                    report.failed.push((name, e.to_string()));
                }
            }
        }

        if !pure.is_empty() {
            report.profile_rebuilt = self.rebuild_local_profile()?;
        }
        report.interpreter_hint = pure
            .iter()
            .any(|spec| is_interpreter(spec) && report.upgraded.contains(&spec.to_string()));
        report.lock = self.regenerate_project_lock(self.load_local().as_ref());

        tracing::info!(upgraded = report.upgraded.len(), "upgrade finished");
        Ok(UpgradeOutcome::Upgraded(report))
    }

    /// Rebuild the profile from the local manifest, if this is a project.
    fn rebuild_local_profile(&self) -> Result<bool> {
        let Some(local) = self.load_local() else {
            return Ok(false);
        };
        self.profile().rebuild(&local.specs(), &self.resolver())?;
        Ok(true)
    }
}
