//! [`TestProject`] builder for macdev test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Relative path of the local manifest inside a project
pub const LOCAL_MANIFEST: &str = ".macdev/manifest.toml";
/// Relative path of the lock file inside a project
pub const LOCK_FILE: &str = ".macdev/manifest.lock";
/// Relative path of the profile binary directory inside a project
pub const PROFILE_BIN: &str = ".macdev/profile/bin";

/// A scratch directory holding a project and a separate fake home with
/// the global manifest.
///
/// ```text
/// <tmp>/project/.macdev/...
/// <tmp>/home/.config/macdev/manifest.toml
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty project (no `.macdev/` yet).
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("project")).unwrap();
        Self { temp_dir }
    }

    /// Create a project with the given local manifest content.
    pub fn with_local(content: &str) -> Self {
        let project = Self::new();
        project.write_local(content);
        project
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("project")
    }

    pub fn home(&self) -> PathBuf {
        self.temp_dir.path().join("home")
    }

    pub fn global_manifest(&self) -> PathBuf {
        self.home().join(".config/macdev/manifest.toml")
    }

    pub fn profile_bin(&self) -> PathBuf {
        self.root().join(PROFILE_BIN)
    }

    pub fn write_local(&self, content: &str) {
        write(&self.root().join(LOCAL_MANIFEST), content);
    }

    pub fn write_global(&self, content: &str) {
        write(&self.global_manifest(), content);
    }

    pub fn read_local(&self) -> String {
        read(&self.root().join(LOCAL_MANIFEST))
    }

    pub fn read_global(&self) -> String {
        read(&self.global_manifest())
    }

    /// Lock file content, `None` when there is no lock file.
    pub fn read_lock(&self) -> Option<String> {
        fs::read_to_string(self.root().join(LOCK_FILE)).ok()
    }

    /// Sorted names in the profile binary directory.
    pub fn profile_links(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.profile_bin()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Sorted `(name, target)` pairs of the profile's symlinks.
    pub fn profile_targets(&self) -> Vec<(String, PathBuf)> {
        self.profile_links()
            .into_iter()
            .map(|name| {
                let target = fs::read_link(self.profile_bin().join(&name))
                    .unwrap_or_else(|_| panic!("{name} is not a symlink"));
                (name, target)
            })
            .collect()
    }

    /// Assert that `path` (relative to the project root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the project root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
}
