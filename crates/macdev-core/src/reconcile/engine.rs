//! Engine construction and the package lifecycle operations
//!
//! add, remove, install, list, init and the tap commands live here;
//! sync, gc, upgrade and check are in sibling modules.

use macdev_brew::PackageManager;

use crate::config::EngineConfig;
use crate::lock::{self, LockOutcome};
use crate::manifest::{GlobalManifest, LocalManifest};
use crate::profile::Profile;
use crate::resolver::Resolver;
use crate::spec::{PackageSpec, WILDCARD};
use crate::venv::{self, VenvOutcome};
use crate::{Error, Result};

use super::classify::{Classification, classify, reconstruct_spec};
use super::report::{
    AddOptions, AddReport, InitOutcome, InstallReport, PackageKind, RemoveReport, TapOutcome,
    UntapOutcome,
};

/// Keeps the local manifest, global manifest, lock file and profile of
/// one project consistent.
///
/// Operations run sequentially and block on the package manager.
pub struct Engine {
    config: EngineConfig,
    manager: Box<dyn PackageManager>,
}

impl Engine {
    pub fn new(config: EngineConfig, manager: Box<dyn PackageManager>) -> Self {
        Self { config, manager }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn manager(&self) -> &dyn PackageManager {
        self.manager.as_ref()
    }

    pub(crate) fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.manager.as_ref())
    }

    pub fn profile(&self) -> Profile {
        Profile::new(self.config.profile_dir())
    }

    pub(crate) fn ensure_manager(&self) -> Result<()> {
        if self.manager.is_available() {
            Ok(())
        } else {
            Err(Error::ManagerUnavailable)
        }
    }

    /// The local manifest, or `None` when absent or unreadable.
    pub fn load_local(&self) -> Option<LocalManifest> {
        let path = self.config.local_manifest_path();
        match LocalManifest::load(&path) {
            Ok(manifest) => Some(manifest),
            Err(Error::ManifestNotFound { .. }) => None,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable local manifest");
                None
            }
        }
    }

    pub(crate) fn require_local(&self) -> Result<LocalManifest> {
        self.load_local().ok_or_else(|| Error::ManifestNotFound {
            path: self.config.local_manifest_path(),
        })
    }

    pub(crate) fn save_local(&self, local: &LocalManifest) -> Result<()> {
        local.save(&self.config.local_manifest_path())
    }

    /// The global manifest; empty when absent or unreadable.
    pub fn load_global(&self) -> GlobalManifest {
        match GlobalManifest::load(self.config.global_manifest_path()) {
            Ok(manifest) => manifest,
            Err(Error::ManifestNotFound { .. }) => GlobalManifest::default(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable global manifest");
                GlobalManifest::default()
            }
        }
    }

    pub(crate) fn save_global(&self, global: &GlobalManifest) -> Result<()> {
        global.save(self.config.global_manifest_path())
    }

    /// Regenerate the lock from `local`, or delete it when `local` is empty.
    pub(crate) fn regenerate_lock(&self, local: &LocalManifest) -> LockOutcome {
        lock::regenerate(&self.config.lock_path(), local, &self.resolver())
    }

    /// Regenerate the lock for a project whose manifest loaded.
    ///
    /// Without a readable local manifest the lock file is left alone.
    pub(crate) fn regenerate_project_lock(&self, local: Option<&LocalManifest>) -> Option<LockOutcome> {
        match local {
            Some(local) => Some(self.regenerate_lock(local)),
            None => {
                tracing::debug!("no readable local manifest, leaving lock file alone");
                None
            }
        }
    }

    pub(crate) fn ensure_venv(&self) -> Option<VenvOutcome> {
        self.config
            .create_venv
            .then(|| venv::ensure(&self.config.profile_bin(), &self.config.venv_dir()))
    }

    /// Create an empty local manifest unless one exists.
    pub fn init(&self) -> Result<InitOutcome> {
        let path = self.config.local_manifest_path();
        if path.exists() {
            return Ok(InitOutcome::AlreadyExists);
        }

        self.save_local(&LocalManifest::default())?;
        tracing::info!(path = %path.display(), "created manifest");
        Ok(InitOutcome::Created)
    }

    /// Install a package and start tracking it.
    ///
    /// # Errors
    ///
    /// `ManagerUnavailable` without Homebrew, `ManifestNotFound` for a
    /// pure add outside a project (checked before anything is installed),
    /// `TrackedAsPure` for an impure or cask add of a package the local
    /// manifest declares, and any install failure.
    pub fn add(&self, raw: &str, options: AddOptions) -> Result<AddReport> {
        let spec = PackageSpec::parse(raw);
        self.ensure_manager()?;

        match options.kind() {
            PackageKind::Pure => self.add_pure(&spec),
            PackageKind::Impure => {
                self.reject_local_pure(&spec)?;
                self.add_impure(&spec)
            }
            PackageKind::Cask => {
                self.reject_local_pure(&spec)?;
                self.add_cask(&spec, !options.impure)
            }
        }
    }

    /// A package declared in the local manifest stays pure until removed.
    fn reject_local_pure(&self, spec: &PackageSpec) -> Result<()> {
        if let Some(local) = self.load_local()
            && local.contains_key(spec.name())
        {
            return Err(Error::TrackedAsPure {
                spec: spec.to_string(),
            });
        }
        Ok(())
    }

    fn add_pure(&self, spec: &PackageSpec) -> Result<AddReport> {
        let mut local = self.require_local()?;
        let mut global = self.load_global();
        let mut report = AddReport::new(spec.to_string(), PackageKind::Pure);

        report.restored_from_gc = global.restore_from_gc(spec);
        if spec.is_versioned() && global.pure_version(spec.name()) == Some(WILDCARD) {
            global.remove_pure(spec.name());
        }

        let prefix = self.manager.install(&spec.to_string(), false)?;
        let (linked, interpreter) = self.profile().link_package(spec, &prefix)?;
        report.linked = linked;

        local.insert(spec);
        self.save_local(&local)?;

        if global.find_pure(spec).is_none() {
            global.insert_pure(spec);
        }
        report.unlinked_dependencies = self.unlink_untracked_dependencies(spec, &global);
        self.save_global(&global)?;
        tracing::info!(package = %spec, "added pure package");

        if interpreter.is_some() {
            report.venv = self.ensure_venv();
        }
        report.interpreter = interpreter;
        report.lock = Some(self.regenerate_lock(&local));
        Ok(report)
    }

    fn add_impure(&self, spec: &PackageSpec) -> Result<AddReport> {
        let mut global = self.load_global();
        let mut report = AddReport::new(spec.to_string(), PackageKind::Impure);
        report.restored_from_gc = global.restore_from_gc(spec);

        self.manager.install(&spec.to_string(), true)?;
        global.insert_impure(spec.to_string());
        self.save_global(&global)?;
        tracing::info!(package = %spec, "added impure package");
        Ok(report)
    }

    fn add_cask(&self, spec: &PackageSpec, forced: bool) -> Result<AddReport> {
        if forced {
            tracing::info!(package = %spec, "casks are always installed system-wide");
        }

        let mut global = self.load_global();
        let mut report = AddReport::new(spec.to_string(), PackageKind::Cask);
        report.cask_forced_impure = forced;
        report.restored_from_gc = global.restore_from_gc(spec);

        self.manager.install_cask(&spec.to_string())?;
        global.insert_cask(spec.to_string());
        self.save_global(&global)?;
        tracing::info!(package = %spec, "added cask");
        Ok(report)
    }

    /// Unlink dependencies macdev does not track, so only the profile
    /// exposes them. Failures are ignored.
    fn unlink_untracked_dependencies(&self, spec: &PackageSpec, global: &GlobalManifest) -> Vec<String> {
        let mut unlinked = Vec::new();
        for dep in self.resolver().fetch_dependencies(spec) {
            if global.knows(&dep) {
                continue;
            }
            match self.manager.unlink(&dep) {
                Ok(()) => unlinked.push(dep),
                Err(e) => tracing::debug!(dependency = %dep, error = %e, "could not unlink dependency"),
            }
        }
        unlinked
    }

    /// Stop tracking a package and stage it for gc.
    ///
    /// # Errors
    ///
    /// `UntrackedPackage` when the spec matches no manifest entry.
    pub fn remove(&self, raw: &str) -> Result<RemoveReport> {
        let spec = PackageSpec::parse(raw);
        let local = self.load_local();
        let mut global = self.load_global();

        let classification =
            classify(&spec, local.as_ref(), &global).ok_or_else(|| Error::UntrackedPackage {
                spec: spec.to_string(),
            })?;

        match classification {
            Classification::Cask { key } => {
                global.remove_tracked(&key);
                global.stage_gc(key.clone(), WILDCARD);
                self.save_global(&global)?;
                tracing::info!(package = %key, "removed cask");
                Ok(RemoveReport {
                    spec: spec.to_string(),
                    kind: PackageKind::Cask,
                    gc_key: key,
                    removed_locally: false,
                    lock: None,
                })
            }
            Classification::Impure { key } => {
                global.remove_tracked(&key);
                global.stage_gc(key.clone(), WILDCARD);
                self.save_global(&global)?;
                tracing::info!(package = %key, "removed impure package");
                Ok(RemoveReport {
                    spec: spec.to_string(),
                    kind: PackageKind::Impure,
                    gc_key: key,
                    removed_locally: false,
                    lock: self.regenerate_project_lock(local.as_ref()),
                })
            }
            Classification::Pure {
                local_key,
                global_key,
            } => self.remove_pure(&spec, local, global, local_key, global_key),
        }
    }

    fn remove_pure(
        &self,
        spec: &PackageSpec,
        local: Option<LocalManifest>,
        mut global: GlobalManifest,
        local_key: Option<String>,
        global_key: Option<String>,
    ) -> Result<RemoveReport> {
        let loaded = local.is_some();
        let mut local = local.unwrap_or_default();

        let local_entry = local_key
            .as_deref()
            .and_then(|key| local.get(key).map(|version| (key.to_string(), version.to_string())));
        let global_entry = global_key.as_deref().and_then(|key| {
            global
                .pure_version(key)
                .map(|version| (key.to_string(), version.to_string()))
        });
        let target = reconstruct_spec(
            spec,
            local_entry.as_ref().map(|(k, v)| (k.as_str(), v.as_str())),
            global_entry.as_ref().map(|(k, v)| (k.as_str(), v.as_str())),
        );

        let removed_locally = match &local_key {
            Some(key) => {
                local.remove(key);
                self.save_local(&local)?;
                self.profile().rebuild(&local.specs(), &self.resolver())?;
                true
            }
            None => false,
        };

        if let Some(key) = &global_key {
            global.remove_pure(key);
        }
        let gc_key = target.to_string();
        global.stage_gc(gc_key.clone(), target.version_or_wildcard());
        self.save_global(&global)?;
        tracing::info!(package = %gc_key, "removed pure package");

        Ok(RemoveReport {
            spec: spec.to_string(),
            kind: PackageKind::Pure,
            gc_key,
            removed_locally,
            lock: loaded.then(|| self.regenerate_lock(&local)),
        })
    }

    /// Install every package in the local manifest and rebuild the profile.
    pub fn install(&self) -> Result<InstallReport> {
        let local = self.require_local()?;
        self.ensure_manager()?;
        let mut global = self.load_global();

        let mut installed = Vec::new();
        for spec in local.specs() {
            self.manager.install(&spec.to_string(), false)?;
            global.restore_from_gc(&spec);
            if global.find_pure(&spec).is_none() {
                global.insert_pure(&spec);
            }
            installed.push(spec.to_string());
        }
        if !installed.is_empty() {
            self.save_global(&global)?;
        }

        let rebuild = self.profile().rebuild(&local.specs(), &self.resolver())?;
        let venv = match &rebuild.interpreter {
            Some(_) => self.ensure_venv(),
            None => None,
        };

        Ok(InstallReport {
            installed,
            rebuild,
            venv,
            lock: self.regenerate_lock(&local),
        })
    }

    /// Everything tracked for this user.
    pub fn list(&self) -> GlobalManifest {
        self.load_global()
    }

    pub fn tap(&self, name: &str) -> Result<TapOutcome> {
        self.ensure_manager()?;
        let outcome = if self.manager.is_tapped(name) {
            TapOutcome::AlreadyTapped
        } else {
            self.manager.tap(name)?;
            TapOutcome::Tapped
        };

        let mut global = self.load_global();
        if global.add_tap(name) {
            self.save_global(&global)?;
        }
        Ok(outcome)
    }

    pub fn untap(&self, name: &str) -> Result<UntapOutcome> {
        self.ensure_manager()?;
        let tapped = self.manager.is_tapped(name);
        if tapped {
            self.manager.untap(name)?;
        }

        let mut global = self.load_global();
        let recorded = global.remove_tap(name);
        if recorded {
            self.save_global(&global)?;
        }

        Ok(if tapped || recorded {
            UntapOutcome::Untapped
        } else {
            UntapOutcome::NotTapped
        })
    }
}
