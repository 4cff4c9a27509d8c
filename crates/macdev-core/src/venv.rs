//! Interpreter virtual environment at `.macdev/venv`

use std::path::Path;
use std::process::Command;

/// What happened when a venv was requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenvOutcome {
    Created,
    AlreadyExists,
    /// No `python3` in the profile
    NoInterpreter,
    Failed(String),
}

/// Create a venv with the profile's `python3` unless one already exists.
///
/// Failures are logged and returned, never raised.
pub fn ensure(profile_bin: &Path, venv_dir: &Path) -> VenvOutcome {
    if venv_dir.exists() {
        return VenvOutcome::AlreadyExists;
    }

    let python = profile_bin.join("python3");
    if !python.exists() {
        tracing::debug!(path = %python.display(), "no interpreter to create venv with");
        return VenvOutcome::NoInterpreter;
    }

    tracing::debug!(python = %python.display(), venv = %venv_dir.display(), "creating venv");
    let outcome = match Command::new(&python).arg("-m").arg("venv").arg(venv_dir).output() {
        Ok(output) if output.status.success() => VenvOutcome::Created,
        Ok(output) => VenvOutcome::Failed(String::from_utf8_lossy(&output.stderr).trim().to_string()),
        Err(e) => VenvOutcome::Failed(e.to_string()),
    };

    if let VenvOutcome::Failed(reason) = &outcome {
        tracing::warn!(venv = %venv_dir.display(), %reason, "failed to create venv");
    } else {
        tracing::info!(venv = %venv_dir.display(), "created venv");
    }
    outcome
}
