//! Lock file generation tests

use macdev_core::lock::{self, LockFile, LockOutcome};
use macdev_core::{AddOptions, Engine, EngineConfig, LocalManifest, PackageSpec, Resolver};
use macdev_test_utils::{FakeBrew, TestProject};
use pretty_assertions::assert_eq;

fn manifest(specs: &[&str]) -> LocalManifest {
    let mut local = LocalManifest::default();
    for raw in specs {
        local.insert(&PackageSpec::parse(raw));
    }
    local
}

#[test]
fn generate_records_packages_and_dependencies() {
    let brew = FakeBrew::new();
    brew.preinstall("python@3.11");
    brew.set_info("python@3.11", "3.11.7", "python@3.11");
    brew.set_dependencies("python@3.11", &["readline", "sqlite", "python@3.11"]);
    brew.set_info("readline", "8.2.1", "readline");

    let lock = LockFile::generate(&manifest(&["python@3.11"]), &Resolver::new(&brew));

    assert_eq!(lock.packages.keys().collect::<Vec<_>>(), vec!["python"]);
    assert_eq!(lock.packages["python"].version, "3.11.7");
    assert_eq!(
        lock.dependencies.keys().collect::<Vec<_>>(),
        vec!["python:readline"]
    );
}

#[test]
fn unresolvable_packages_are_skipped() {
    let brew = FakeBrew::new();
    brew.preinstall("rust");

    let lock = LockFile::generate(&manifest(&["rust", "ghost"]), &Resolver::new(&brew));

    assert_eq!(lock.packages.keys().collect::<Vec<_>>(), vec!["rust"]);
}

#[test]
fn written_file_uses_nested_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.lock");
    let brew = FakeBrew::new();
    brew.preinstall("python@3.11");
    brew.set_info("python@3.11", "3.11.7", "python@3.11");
    brew.set_dependencies("python@3.11", &["readline"]);
    brew.set_info("readline", "8.2.1", "readline");

    let outcome = lock::regenerate(&path, &manifest(&["python@3.11"]), &Resolver::new(&brew));

    assert_eq!(
        outcome,
        LockOutcome::Written {
            packages: 1,
            dependencies: 1
        }
    );
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[metadata]"));
    assert!(written.contains("[packages.python]"));
    assert!(written.contains("[dependencies.\"python:readline\"]"));

    let loaded = LockFile::load(&path).unwrap();
    assert_eq!(loaded.packages["python"].formula, "python@3.11");
}

#[test]
fn empty_manifest_deletes_lock() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.lock");
    std::fs::write(&path, "old").unwrap();
    let brew = FakeBrew::new();

    let empty = LocalManifest::default();
    assert_eq!(lock::regenerate(&path, &empty, &Resolver::new(&brew)), LockOutcome::Removed);
    assert!(!path.exists());
    assert_eq!(lock::regenerate(&path, &empty, &Resolver::new(&brew)), LockOutcome::Absent);
}

#[test]
fn write_failure_is_reported_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the lock file should go
    let path = dir.path().join("manifest.lock");
    std::fs::create_dir(&path).unwrap();
    let brew = FakeBrew::new();
    brew.preinstall("rust");

    let outcome = lock::regenerate(&path, &manifest(&["rust"]), &Resolver::new(&brew));
    assert!(matches!(outcome, LockOutcome::Failed(_)));
}

#[test]
fn impure_only_environment_has_no_lock() {
    let project = TestProject::with_local("[packages]\n");
    let brew = FakeBrew::new();
    let config = EngineConfig::new(project.root(), project.global_manifest()).with_venv(false);
    let engine = Engine::new(config, brew.boxed());

    engine.add("wget", AddOptions::impure()).unwrap();
    engine.add("firefox", AddOptions::cask()).unwrap();
    engine.remove("wget").unwrap();
    engine.upgrade(None).unwrap();

    match project.read_lock() {
        None => {}
        Some(content) => {
            let lock: LockFile = toml::from_str(&content).unwrap();
            assert!(lock.packages.is_empty());
        }
    }
}
