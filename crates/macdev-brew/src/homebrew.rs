//! Live package manager driving the `brew` executable

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::manager::{FormulaInfo, PackageManager, UpgradeStatus};

/// Homebrew, reached through its command line.
#[derive(Debug, Clone)]
pub struct Homebrew {
    program: PathBuf,
}

impl Homebrew {
    /// Use `brew` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("brew")
    }

    /// Use a specific `brew` executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        format!("{} {}", self.program.display(), args.join(" "))
    }

    /// Run with captured output.
    fn output(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!(command = %self.command_line(args), "running");
        Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| Error::Spawn {
                command: self.command_line(args),
                source,
            })
    }

    /// Run with captured output, returning stdout on success.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::failed(self.command_line(args), stderr.trim()))
        }
    }

    /// Run with the terminal attached so the user sees brew's progress.
    fn run_attached(&self, args: &[&str]) -> Result<()> {
        tracing::debug!(command = %self.command_line(args), "running attached");
        let status = Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|source| Error::Spawn {
                command: self.command_line(args),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::failed(
                self.command_line(args),
                format!("exited with {}", status),
            ))
        }
    }

    fn succeeds(&self, args: &[&str]) -> bool {
        Command::new(&self.program)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

impl Default for Homebrew {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageManager for Homebrew {
    fn is_available(&self) -> bool {
        self.succeeds(&["--version"])
    }

    fn install(&self, spec: &str, link: bool) -> Result<PathBuf> {
        if !self.is_installed(spec) {
            self.run_attached(&["install", spec])?;
        }

        if !link {
            // Already-unlinked kegs make brew complain; that is fine
            if let Err(e) = self.unlink(spec) {
                tracing::debug!(spec, error = %e, "unlink after install failed");
            }
        }

        self.prefix_of(spec).ok_or_else(|| Error::UnexpectedOutput {
            command: self.command_line(&["--prefix", spec]),
            message: format!("no prefix reported for installed package {}", spec),
        })
    }

    fn install_cask(&self, spec: &str) -> Result<()> {
        if self.is_cask_installed(spec) {
            return Ok(());
        }
        self.run_attached(&["install", "--cask", spec])
    }

    fn uninstall(&self, spec: &str) -> Result<()> {
        self.run(&["uninstall", spec]).map(|_| ())
    }

    fn uninstall_cask(&self, spec: &str) -> Result<()> {
        self.run(&["uninstall", "--cask", spec]).map(|_| ())
    }

    fn is_installed(&self, spec: &str) -> bool {
        self.succeeds(&["list", "--formula", spec])
    }

    fn is_cask_installed(&self, spec: &str) -> bool {
        self.succeeds(&["list", "--cask", spec])
    }

    fn unlink(&self, spec: &str) -> Result<()> {
        let stdout = self.run(&["unlink", spec])?;
        let stdout = stdout.trim();
        if !stdout.is_empty() && !stdout.contains("0 symlinks removed") {
            tracing::info!(spec, "{}", stdout);
        }
        Ok(())
    }

    fn upgrade(&self, spec: &str) -> Result<UpgradeStatus> {
        let args = ["upgrade", spec];
        let output = self.output(&args)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(Error::failed(self.command_line(&args), stderr.trim()));
        }
        Ok(classify_upgrade(&stdout, &stderr))
    }

    fn cleanup(&self) -> Result<()> {
        self.run_attached(&["cleanup"])
    }

    fn is_tapped(&self, tap: &str) -> bool {
        match self.run(&["tap"]) {
            Ok(stdout) => tap_listed(&stdout, tap),
            Err(e) => {
                tracing::debug!(error = %e, "listing taps failed");
                false
            }
        }
    }

    fn tap(&self, tap: &str) -> Result<()> {
        self.run_attached(&["tap", tap])
    }

    fn untap(&self, tap: &str) -> Result<()> {
        self.run_attached(&["untap", tap])
    }

    fn prefix_of(&self, spec: &str) -> Option<PathBuf> {
        let stdout = self.run(&["--prefix", spec]).ok()?;
        let prefix = stdout.trim();
        if prefix.is_empty() {
            None
        } else {
            Some(PathBuf::from(prefix))
        }
    }

    fn info(&self, spec: &str) -> Option<FormulaInfo> {
        match self.run(&["info", "--json=v2", spec]) {
            Ok(stdout) => parse_info_json(&stdout),
            Err(e) => {
                tracing::debug!(spec, error = %e, "brew info failed");
                None
            }
        }
    }

    fn dependencies_of(&self, spec: &str) -> Vec<String> {
        match self.run(&["deps", "--formula", spec]) {
            Ok(stdout) => parse_lines(&stdout),
            Err(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct InfoDocument {
    #[serde(default)]
    formulae: Vec<FormulaDocument>,
    #[serde(default)]
    casks: Vec<CaskDocument>,
}

#[derive(Debug, Deserialize)]
struct FormulaDocument {
    name: String,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    versions: Option<VersionsDocument>,
    #[serde(default)]
    installed: Vec<InstalledDocument>,
}

#[derive(Debug, Deserialize)]
struct VersionsDocument {
    #[serde(default)]
    stable: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InstalledDocument {
    version: String,
}

#[derive(Debug, Deserialize)]
struct CaskDocument {
    token: String,
    #[serde(default)]
    full_token: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    installed: Option<String>,
}

/// Extract version and origin formula from `brew info --json=v2` output.
///
/// The installed version wins over the stable one. Malformed documents
/// yield `None`.
pub fn parse_info_json(json: &str) -> Option<FormulaInfo> {
    let doc: InfoDocument = match serde_json::from_str(json) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::debug!(error = %e, "malformed brew info document");
            return None;
        }
    };

    if let Some(formula) = doc.formulae.into_iter().next() {
        let version = formula
            .installed
            .last()
            .map(|i| i.version.clone())
            .or_else(|| formula.versions.and_then(|v| v.stable))?;
        return Some(FormulaInfo {
            version,
            formula: formula.full_name.unwrap_or(formula.name),
        });
    }

    let cask = doc.casks.into_iter().next()?;
    Some(FormulaInfo {
        version: cask.installed.or(cask.version)?,
        formula: cask.full_token.unwrap_or(cask.token),
    })
}

/// Non-empty trimmed lines.
pub fn parse_lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decide from brew's chatter whether an upgrade changed anything.
pub fn classify_upgrade(stdout: &str, stderr: &str) -> UpgradeStatus {
    let quiet_markers = ["already installed", "already up-to-date", "already up to date"];
    let said_nothing_to_do = [stdout, stderr]
        .iter()
        .any(|text| quiet_markers.iter().any(|marker| text.contains(marker)));

    if said_nothing_to_do {
        UpgradeStatus::AlreadyUpToDate
    } else {
        UpgradeStatus::Upgraded
    }
}

fn tap_listed(stdout: &str, tap: &str) -> bool {
    stdout.lines().any(|line| line.trim() == tap)
}
