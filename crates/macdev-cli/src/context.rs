//! Process state turned into engine configuration
//!
//! The current directory selects the project; `MACDEV_ACTIVE` marks a
//! shell started by `macdev shell`.

use std::path::PathBuf;

use macdev_brew::Homebrew;
use macdev_core::{Engine, EngineConfig};

use crate::error::Result;

/// Set inside `macdev shell`
pub const ACTIVE_ENV: &str = "MACDEV_ACTIVE";

/// Build the engine configuration for this invocation.
pub fn config(global_manifest: Option<PathBuf>) -> Result<EngineConfig> {
    let project_root = std::env::current_dir()?;
    let global_manifest = match global_manifest {
        Some(path) => path,
        None => macdev_core::config::default_global_manifest()?,
    };

    let isolated = std::env::var_os(ACTIVE_ENV).is_some();
    tracing::debug!(
        project = %project_root.display(),
        global = %global_manifest.display(),
        isolated,
        "resolved context"
    );

    Ok(EngineConfig::new(project_root, global_manifest).with_isolated(isolated))
}

/// Engine backed by the real `brew`.
pub fn engine(global_manifest: Option<PathBuf>) -> Result<Engine> {
    Ok(Engine::new(config(global_manifest)?, Box::new(Homebrew::new())))
}
