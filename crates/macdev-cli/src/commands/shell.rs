//! Interactive shell with the project profile on PATH

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use colored::Colorize;
use macdev_core::Engine;

use super::package::run_install;
use crate::context::ACTIVE_ENV;
use crate::error::{CliError, Result};

const DEFAULT_SHELL: &str = "/bin/bash";

/// Spawn `$SHELL` with `.macdev/profile/bin` first on `PATH`.
///
/// Outside an existing macdev shell the project is installed first.
pub fn run_shell(engine: &Engine) -> Result<()> {
    let config = engine.config();
    if !config.isolated {
        println!("{} Ensuring environment is up to date...", "=>".blue().bold());
        run_install(engine)?;
        println!();
    }

    let profile_bin = config.profile_bin();
    if !profile_bin.is_dir() {
        return Err(CliError::user(format!(
            "No profile at {}. Run 'macdev install' first.",
            profile_bin.display()
        )));
    }
    let profile_bin = profile_bin.canonicalize()?;

    let shell = std::env::var("SHELL").unwrap_or_else(|_| DEFAULT_SHELL.to_string());
    let path = prepend_path(&profile_bin, std::env::var_os("PATH"))?;

    println!("{} Entering macdev environment", "=>".blue().bold());
    println!("   Shell: {}", shell.dimmed());
    println!("   Type 'exit' to leave");

    let status = Command::new(&shell)
        .env("PATH", path)
        .env(ACTIVE_ENV, "1")
        .status()
        .map_err(|e| CliError::user(format!("Failed to spawn {shell}: {e}")))?;

    if !status.success() {
        return Err(CliError::user(format!("Shell exited with {status}")));
    }
    Ok(())
}

/// `dir` followed by the existing `PATH` entries.
fn prepend_path(dir: &Path, current: Option<OsString>) -> Result<OsString> {
    let mut entries = vec![dir.to_path_buf()];
    if let Some(current) = current {
        entries.extend(std::env::split_paths(&current));
    }
    std::env::join_paths(entries).map_err(|e| CliError::user(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_goes_first() {
        let path = prepend_path(
            Path::new("/p/.macdev/profile/bin"),
            Some(OsString::from("/usr/bin:/bin")),
        )
        .unwrap();
        assert_eq!(path, OsString::from("/p/.macdev/profile/bin:/usr/bin:/bin"));
    }

    #[test]
    fn empty_path_is_just_profile() {
        let path = prepend_path(Path::new("/p/bin"), None).unwrap();
        assert_eq!(path, OsString::from("/p/bin"));
    }
}
