//! [`FakeBrew`]: a scriptable stand-in for Homebrew.
//!
//! Installing a formula materializes a fake prefix under a temp
//! directory with `bin/` (and optionally `libexec/bin/`) files, so the
//! profile builder has real files to link. Clones share state: keep one
//! clone in the test and box the other into the engine.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::rc::Rc;

use macdev_brew::{Error, FormulaInfo, PackageManager, Result, UpgradeStatus};
use tempfile::TempDir;

/// Catalogue entry describing what installing a spec produces
#[derive(Debug, Clone, Default)]
pub struct FakeFormula {
    pub bin: Vec<String>,
    pub libexec_bin: Vec<String>,
    pub info: Option<FormulaInfo>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    unavailable: bool,
    catalogue: BTreeMap<String, FakeFormula>,
    installed: BTreeSet<String>,
    casks: BTreeSet<String>,
    taps: BTreeSet<String>,
    failing: BTreeSet<String>,
    upgrades: BTreeMap<String, UpgradeStatus>,
    calls: Vec<String>,
}

#[derive(Clone)]
pub struct FakeBrew {
    state: Rc<RefCell<State>>,
    cellar: Rc<TempDir>,
}

impl Default for FakeBrew {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBrew {
    pub fn new() -> Self {
        Self {
            state: Rc::default(),
            cellar: Rc::new(TempDir::new().unwrap()),
        }
    }

    /// Box a clone for handing to an engine.
    pub fn boxed(&self) -> Box<dyn PackageManager> {
        Box::new(self.clone())
    }

    /// Register what installing `spec` produces.
    pub fn formula(&self, spec: &str, formula: FakeFormula) -> &Self {
        self.state
            .borrow_mut()
            .catalogue
            .insert(spec.to_string(), formula);
        self
    }

    /// Register a formula with the given `bin/` entries and default info.
    pub fn with_bin(&self, spec: &str, bin: &[&str]) -> &Self {
        self.formula(
            spec,
            FakeFormula {
                bin: bin.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
        )
    }

    pub fn set_dependencies(&self, spec: &str, deps: &[&str]) -> &Self {
        self.state
            .borrow_mut()
            .catalogue
            .entry(spec.to_string())
            .or_default()
            .dependencies = deps.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn set_info(&self, spec: &str, version: &str, formula: &str) -> &Self {
        self.state
            .borrow_mut()
            .catalogue
            .entry(spec.to_string())
            .or_default()
            .info = Some(FormulaInfo {
            version: version.to_string(),
            formula: formula.to_string(),
        });
        self
    }

    pub fn set_available(&self, available: bool) -> &Self {
        self.state.borrow_mut().unavailable = !available;
        self
    }

    /// Make every mutating call for `spec` fail.
    pub fn fail(&self, spec: &str) -> &Self {
        self.state.borrow_mut().failing.insert(spec.to_string());
        self
    }

    pub fn succeed(&self, spec: &str) -> &Self {
        self.state.borrow_mut().failing.remove(spec);
        self
    }

    pub fn set_upgrade(&self, spec: &str, status: UpgradeStatus) -> &Self {
        self.state
            .borrow_mut()
            .upgrades
            .insert(spec.to_string(), status);
        self
    }

    /// Pretend `spec` is installed without recording a call.
    pub fn preinstall(&self, spec: &str) -> &Self {
        self.materialize(spec);
        self.state.borrow_mut().installed.insert(spec.to_string());
        self
    }

    pub fn pretap(&self, tap: &str) -> &Self {
        self.state.borrow_mut().taps.insert(tap.to_string());
        self
    }

    /// Every call made so far, e.g. `"install rust --no-link"`.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    /// Number of calls starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn installed(&self) -> Vec<String> {
        self.state.borrow().installed.iter().cloned().collect()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }

    fn check(&self, spec: &str, command: &str) -> Result<()> {
        if self.state.borrow().failing.contains(spec) {
            Err(Error::failed(
                format!("brew {command} {spec}"),
                format!("Error: simulated failure for {spec}"),
            ))
        } else {
            Ok(())
        }
    }

    fn prefix_path(&self, spec: &str) -> PathBuf {
        self.cellar.path().join("Cellar").join(spec)
    }

    fn materialize(&self, spec: &str) -> PathBuf {
        let formula = self
            .state
            .borrow()
            .catalogue
            .get(spec)
            .cloned()
            .unwrap_or_else(|| FakeFormula {
                bin: vec![base_name(spec).to_string()],
                ..Default::default()
            });

        let prefix = self.prefix_path(spec);
        for (dir, names) in [("bin", &formula.bin), ("libexec/bin", &formula.libexec_bin)] {
            if names.is_empty() {
                continue;
            }
            let dir = prefix.join(dir);
            fs::create_dir_all(&dir).unwrap();
            for name in names {
                let path = dir.join(name);
                fs::write(&path, "#!/bin/sh\n").unwrap();
                fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            }
        }
        fs::create_dir_all(&prefix).unwrap();
        prefix
    }
}

fn base_name(spec: &str) -> &str {
    match spec.rfind('@') {
        Some(pos) if pos > 0 => &spec[..pos],
        _ => spec,
    }
}

impl PackageManager for FakeBrew {
    fn is_available(&self) -> bool {
        !self.state.borrow().unavailable
    }

    fn install(&self, spec: &str, link: bool) -> Result<PathBuf> {
        self.record(if link {
            format!("install {spec}")
        } else {
            format!("install {spec} --no-link")
        });
        self.check(spec, "install")?;

        let prefix = self.materialize(spec);
        self.state.borrow_mut().installed.insert(spec.to_string());
        Ok(prefix)
    }

    fn install_cask(&self, spec: &str) -> Result<()> {
        self.record(format!("install --cask {spec}"));
        self.check(spec, "install --cask")?;
        self.state.borrow_mut().casks.insert(spec.to_string());
        Ok(())
    }

    fn uninstall(&self, spec: &str) -> Result<()> {
        self.record(format!("uninstall {spec}"));
        self.check(spec, "uninstall")?;
        self.state.borrow_mut().installed.remove(spec);
        Ok(())
    }

    fn uninstall_cask(&self, spec: &str) -> Result<()> {
        self.record(format!("uninstall --cask {spec}"));
        self.check(spec, "uninstall --cask")?;
        self.state.borrow_mut().casks.remove(spec);
        Ok(())
    }

    fn is_installed(&self, spec: &str) -> bool {
        self.state.borrow().installed.contains(spec)
    }

    fn is_cask_installed(&self, spec: &str) -> bool {
        self.state.borrow().casks.contains(spec)
    }

    fn unlink(&self, spec: &str) -> Result<()> {
        self.record(format!("unlink {spec}"));
        self.check(spec, "unlink")
    }

    fn upgrade(&self, spec: &str) -> Result<UpgradeStatus> {
        self.record(format!("upgrade {spec}"));
        self.check(spec, "upgrade")?;
        Ok(self
            .state
            .borrow()
            .upgrades
            .get(spec)
            .copied()
            .unwrap_or(UpgradeStatus::AlreadyUpToDate))
    }

    fn cleanup(&self) -> Result<()> {
        self.record("cleanup".to_string());
        Ok(())
    }

    fn is_tapped(&self, tap: &str) -> bool {
        self.state.borrow().taps.contains(tap)
    }

    fn tap(&self, tap: &str) -> Result<()> {
        self.record(format!("tap {tap}"));
        self.check(tap, "tap")?;
        self.state.borrow_mut().taps.insert(tap.to_string());
        Ok(())
    }

    fn untap(&self, tap: &str) -> Result<()> {
        self.record(format!("untap {tap}"));
        self.check(tap, "untap")?;
        self.state.borrow_mut().taps.remove(tap);
        Ok(())
    }

    fn prefix_of(&self, spec: &str) -> Option<PathBuf> {
        self.is_installed(spec).then(|| self.prefix_path(spec))
    }

    fn info(&self, spec: &str) -> Option<FormulaInfo> {
        let state = self.state.borrow();
        if let Some(info) = state.catalogue.get(spec).and_then(|f| f.info.clone()) {
            return Some(info);
        }
        state.installed.contains(spec).then(|| FormulaInfo {
            version: "1.0.0".to_string(),
            formula: spec.to_string(),
        })
    }

    fn dependencies_of(&self, spec: &str) -> Vec<String> {
        self.state
            .borrow()
            .catalogue
            .get(spec)
            .map(|f| f.dependencies.clone())
            .unwrap_or_default()
    }
}
