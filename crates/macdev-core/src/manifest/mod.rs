//! Manifest Store
//!
//! Two manifests are kept in sync by the engine:
//!
//! - [`LocalManifest`]: `.macdev/manifest.toml` in a project, listing
//!   the pure packages that project needs. Only the `[packages]` section
//!   is ever written.
//! - [`GlobalManifest`]: `~/.config/macdev/manifest.toml`, recording
//!   everything macdev has installed for the user: pure packages,
//!   impure packages, casks, taps and the garbage-collection set.

mod global;
mod local;

pub use global::{GlobalManifest, Tracking};
pub use local::LocalManifest;

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Read and parse a TOML document.
///
/// A missing file is `ManifestNotFound`; unparsable content is
/// `ManifestParse`.
pub(crate) fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = macdev_fs::io::read_text_optional(path)?.ok_or_else(|| {
        Error::ManifestNotFound {
            path: path.to_path_buf(),
        }
    })?;

    toml::from_str(&content).map_err(|e| Error::ManifestParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Serialize and atomically write a TOML document.
pub(crate) fn save_toml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = toml::to_string_pretty(value)?;
    macdev_fs::io::write_text(path, &content)?;
    Ok(())
}
