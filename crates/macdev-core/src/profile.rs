//! Profile Builder
//!
//! A profile is `.macdev/profile/bin`: a flat directory of symlinks into
//! package prefixes. It has no state of its own and can be deleted and
//! rebuilt from the local manifest at any time.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use macdev_fs::constants::PROFILE_BIN;
use macdev_fs::link;
use regex::Regex;

use crate::resolver::Resolver;
use crate::spec::PackageSpec;
use crate::Result;

/// Package names treated as the interpreter family
pub const INTERPRETERS: &[&str] = &["python", "python3"];

/// Secondary binary directory inside a prefix, holding unversioned aliases
const LIBEXEC_BIN: &str = "libexec/bin";

static VERSIONED_INTERPRETER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^python3\.(\d+)$").expect("valid regex"));

static VERSIONED_INSTALLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^pip3\.(\d+)$").expect("valid regex"));

/// Whether a spec names the interpreter family.
pub fn is_interpreter(spec: &PackageSpec) -> bool {
    INTERPRETERS.contains(&spec.name())
}

/// Convenience links created for the interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterLinks {
    /// Versioned binary the aliases point at, e.g. `python3.11`
    pub interpreter: String,
    /// Versioned installer, e.g. `pip3.11`, when one was present
    pub installer: Option<String>,
}

/// Result of a full profile rebuild
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    /// Link names created, in creation order
    pub linked: Vec<String>,
    /// Packages with no resolvable prefix
    pub skipped: Vec<String>,
    /// Set when interpreter normalization produced aliases
    pub interpreter: Option<InterpreterLinks>,
}

/// The isolated binary view of one project.
#[derive(Debug, Clone)]
pub struct Profile {
    root: PathBuf,
}

impl Profile {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(PROFILE_BIN)
    }

    /// Link every entry of `<prefix>/bin` and `<prefix>/libexec/bin`.
    ///
    /// Later entries replace earlier ones with the same name.
    pub fn link_prefix(&self, prefix: &Path) -> Result<Vec<String>> {
        let bin = self.bin_dir();
        let mut linked = link::link_entries(&prefix.join(PROFILE_BIN), &bin)?;
        linked.extend(link::link_entries(&prefix.join(LIBEXEC_BIN), &bin)?);
        tracing::debug!(prefix = %prefix.display(), count = linked.len(), "linked prefix");
        Ok(linked)
    }

    /// Link one package and normalize it when it is the interpreter.
    pub fn link_package(
        &self,
        spec: &PackageSpec,
        prefix: &Path,
    ) -> Result<(Vec<String>, Option<InterpreterLinks>)> {
        let linked = self.link_prefix(prefix)?;
        let interpreter = if is_interpreter(spec) {
            self.normalize_interpreter(spec.version())?
        } else {
            None
        };
        Ok((linked, interpreter))
    }

    /// Delete the whole profile and recreate it from `specs`, in order.
    ///
    /// Packages whose prefix cannot be resolved are skipped with a warning.
    pub fn rebuild(&self, specs: &[PackageSpec], resolver: &Resolver<'_>) -> Result<RebuildReport> {
        if link::remove_tree(&self.root)? {
            tracing::debug!(path = %self.root.display(), "cleared profile");
        }
        std::fs::create_dir_all(self.bin_dir())
            .map_err(|e| macdev_fs::Error::io(self.bin_dir(), e))?;

        let mut report = RebuildReport::default();
        for spec in specs {
            let Some(prefix) = resolver.resolve_prefix(spec) else {
                tracing::warn!(package = %spec, "could not find install prefix, skipping");
                report.skipped.push(spec.to_string());
                continue;
            };

            let (linked, interpreter) = self.link_package(spec, &prefix)?;
            report.linked.extend(linked);
            if interpreter.is_some() {
                report.interpreter = interpreter;
            }
        }

        tracing::info!(
            path = %self.root.display(),
            links = report.linked.len(),
            skipped = report.skipped.len(),
            "rebuilt profile"
        );
        Ok(report)
    }

    /// Point `python3`/`python` (and `pip3`/`pip`) at a versioned binary.
    ///
    /// Prefers the binary matching `preferred` (e.g. `3.11`), otherwise
    /// the highest minor version present. Links are relative so the
    /// profile can be moved. Returns `None` with a warning when no
    /// versioned interpreter is linked.
    pub fn normalize_interpreter(&self, preferred: Option<&str>) -> Result<Option<InterpreterLinks>> {
        let bin = self.bin_dir();
        let names = link::entry_names(&bin)?;

        let Some(interpreter) = pick_versioned(&names, &VERSIONED_INTERPRETER, "python", preferred)
        else {
            tracing::warn!(path = %bin.display(), "no versioned python3.x binary found, not normalizing");
            return Ok(None);
        };

        for alias in ["python3", "python"] {
            link::force_symlink(Path::new(&interpreter), &bin.join(alias))?;
        }

        let installer = pick_versioned(&names, &VERSIONED_INSTALLER, "pip", preferred);
        if let Some(installer) = &installer {
            for alias in ["pip3", "pip"] {
                link::force_symlink(Path::new(installer), &bin.join(alias))?;
            }
        }

        tracing::debug!(interpreter = %interpreter, installer = ?installer, "normalized interpreter");
        Ok(Some(InterpreterLinks {
            interpreter,
            installer,
        }))
    }

    /// Names currently linked, sorted.
    pub fn binaries(&self) -> Result<Vec<String>> {
        Ok(link::entry_names(&self.bin_dir())?)
    }

    /// Whether the binary directory exists and has at least one entry.
    pub fn is_populated(&self) -> bool {
        self.binaries().map(|b| !b.is_empty()).unwrap_or(false)
    }
}

/// Choose among `<stem>3.N` names: the one matching `preferred`'s minor
/// version if present, otherwise the highest `N`.
fn pick_versioned(
    names: &[String],
    pattern: &Regex,
    stem: &str,
    preferred: Option<&str>,
) -> Option<String> {
    let versioned: Vec<(u32, &String)> = names
        .iter()
        .filter_map(|name| {
            let minor = pattern.captures(name)?.get(1)?.as_str().parse().ok()?;
            Some((minor, name))
        })
        .collect();

    let wanted = preferred
        .and_then(|v| v.strip_prefix("3."))
        .and_then(|rest| rest.split('.').next())
        .map(|minor| format!("{stem}3.{minor}"));
    if let Some(wanted) = wanted
        && let Some((_, name)) = versioned.iter().find(|(_, name)| **name == wanted)
    {
        return Some((*name).clone());
    }

    versioned
        .into_iter()
        .max_by_key(|(minor, _)| *minor)
        .map(|(_, name)| name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case(&["python3.11", "python3.12"], None, Some("python3.12"))]
    #[case(&["python3.11", "python3.12"], Some("3.11"), Some("python3.11"))]
    #[case(&["python3.9", "python3.10"], None, Some("python3.10"))]
    #[case(&["python3.11-config", "python3.11"], None, Some("python3.11"))]
    #[case(&["python3.11"], Some("3.13"), Some("python3.11"))]
    #[case(&["python3", "idle3"], None, None)]
    fn picks_interpreter(
        #[case] present: &[&str],
        #[case] preferred: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let picked = pick_versioned(&names(present), &VERSIONED_INTERPRETER, "python", preferred);
        assert_eq!(picked.as_deref(), expected);
    }

    #[test]
    fn interpreter_family() {
        assert!(is_interpreter(&PackageSpec::parse("python@3.11")));
        assert!(is_interpreter(&PackageSpec::parse("python")));
        assert!(!is_interpreter(&PackageSpec::parse("pythonista")));
    }

    #[test]
    fn normalize_links_relative_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let profile = Profile::new(dir.path().join("profile"));
        let bin = profile.bin_dir();
        std::fs::create_dir_all(&bin).unwrap();
        for name in ["python3.11", "python3.11-config", "pip3.11"] {
            std::fs::write(bin.join(name), "").unwrap();
        }

        let links = profile.normalize_interpreter(None).unwrap().unwrap();
        assert_eq!(links.interpreter, "python3.11");
        assert_eq!(links.installer.as_deref(), Some("pip3.11"));
        for alias in ["python", "python3"] {
            assert_eq!(
                std::fs::read_link(bin.join(alias)).unwrap(),
                PathBuf::from("python3.11")
            );
        }
        assert_eq!(std::fs::read_link(bin.join("pip")).unwrap(), PathBuf::from("pip3.11"));
    }

    #[test]
    fn normalize_without_versioned_binary_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let profile = Profile::new(dir.path());
        std::fs::create_dir_all(profile.bin_dir()).unwrap();
        std::fs::write(profile.bin_dir().join("idle3"), "").unwrap();

        assert_eq!(profile.normalize_interpreter(None).unwrap(), None);
        assert_eq!(profile.binaries().unwrap(), vec!["idle3".to_string()]);
    }

    #[test]
    fn missing_profile_is_not_populated() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!Profile::new(dir.path().join("nope")).is_populated());
    }
}
