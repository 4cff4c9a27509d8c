//! Symlink primitives used to materialize profiles.
//!
//! All operations are idempotent: running them twice leaves the same
//! filesystem state as running them once.

use crate::{Error, Result};
use std::fs;
use std::os::unix::fs as unix_fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Create a symlink at `link` pointing to `target`, replacing whatever
/// file or symlink is already there.
///
/// A real directory at `link` is never removed.
pub fn force_symlink(target: &Path, link: &Path) -> Result<()> {
    if let Ok(meta) = fs::symlink_metadata(link) {
        if meta.is_dir() {
            return Err(Error::Link {
                link: link.to_path_buf(),
                reason: "a directory is in the way".to_string(),
            });
        }
        fs::remove_file(link).map_err(|e| Error::io(link, e))?;
    }

    unix_fs::symlink(target, link).map_err(|e| Error::io(link, e))
}

/// Link every executable file or symlink of `source` into `dest`.
///
/// Directories and regular files without an execute bit are skipped.
/// Entries are processed in name order. Returns the names of the links
/// created. A missing `source` yields an empty list.
pub fn link_entries(source: &Path, dest: &Path) -> Result<Vec<String>> {
    let mut entries = match fs::read_dir(source) {
        Ok(rd) => rd
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| Error::io(source, e))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(source, e)),
    };
    entries.sort_by_key(|entry| entry.file_name());

    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;

    let mut linked = Vec::new();
    for entry in entries {
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_symlink() && !is_executable(&entry.path())? {
            tracing::debug!(path = %entry.path().display(), "skipping non-executable file");
            continue;
        }

        let name = entry.file_name();
        force_symlink(&entry.path(), &dest.join(&name))?;
        linked.push(name.to_string_lossy().into_owned());
    }

    Ok(linked)
}

fn is_executable(path: &Path) -> Result<bool> {
    let meta = fs::metadata(path).map_err(|e| Error::io(path, e))?;
    Ok(meta.permissions().mode() & 0o111 != 0)
}

/// Remove a directory tree if it exists. Returns whether anything was removed.
pub fn remove_tree(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(path).map_err(|e| Error::io(path, e))?;
            Ok(true)
        }
        Ok(_) => {
            fs::remove_file(path).map_err(|e| Error::io(path, e))?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Names of the entries in `dir`, sorted. A missing directory is empty.
pub fn entry_names(dir: &Path) -> Result<Vec<String>> {
    let read = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(dir, e)),
    };

    let mut names = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Read the target of a symlink.
pub fn read_link(link: &Path) -> Result<PathBuf> {
    fs::read_link(link).map_err(|e| Error::io(link, e))
}
