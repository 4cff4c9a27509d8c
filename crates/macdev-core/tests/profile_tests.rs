//! Profile builder tests

use macdev_core::{PackageSpec, Profile, Resolver};
use macdev_test_utils::FakeBrew;
use macdev_test_utils::brew::FakeFormula;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn targets(profile: &Profile) -> Vec<(String, PathBuf)> {
    profile
        .binaries()
        .unwrap()
        .into_iter()
        .map(|name| {
            let target = fs::read_link(profile.bin_dir().join(&name)).unwrap();
            (name, target)
        })
        .collect()
}

fn specs(raw: &[&str]) -> Vec<PackageSpec> {
    raw.iter().map(|s| PackageSpec::parse(s)).collect()
}

#[test]
fn rebuild_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let profile = Profile::new(dir.path().join("profile"));
    let brew = FakeBrew::new();
    brew.with_bin("rust", &["cargo", "rustc"]).preinstall("rust");
    brew.with_bin("python@3.11", &["python3.11", "pip3.11"])
        .preinstall("python@3.11");
    let resolver = Resolver::new(&brew);
    let specs = specs(&["python@3.11", "rust"]);

    profile.rebuild(&specs, &resolver).unwrap();
    let first = targets(&profile);
    profile.rebuild(&specs, &resolver).unwrap();
    let second = targets(&profile);

    assert_eq!(first, second);
    assert_eq!(first.len(), 8);
}

#[test]
fn rebuild_drops_stale_links() {
    let dir = tempfile::tempdir().unwrap();
    let profile = Profile::new(dir.path().join("profile"));
    let brew = FakeBrew::new();
    brew.with_bin("go", &["go"]).preinstall("go");
    brew.with_bin("rust", &["cargo"]).preinstall("rust");
    let resolver = Resolver::new(&brew);

    profile.rebuild(&specs(&["go", "rust"]), &resolver).unwrap();
    profile.rebuild(&specs(&["rust"]), &resolver).unwrap();

    assert_eq!(profile.binaries().unwrap(), vec!["cargo".to_string()]);
}

#[test]
fn libexec_entries_are_linked_and_directories_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let profile = Profile::new(dir.path().join("profile"));
    let brew = FakeBrew::new();
    brew.formula(
        "python@3.12",
        FakeFormula {
            bin: vec!["python3.12".into()],
            libexec_bin: vec!["python".into(), "pip".into()],
            ..Default::default()
        },
    );
    let prefix = macdev_brew::PackageManager::install(&brew, "python@3.12", false).unwrap();
    fs::create_dir_all(prefix.join("bin/site-packages")).unwrap();
    fs::write(prefix.join("bin/README"), "not a program").unwrap();

    let linked = profile.link_prefix(&prefix).unwrap();

    assert_eq!(linked, vec!["python3.12", "pip", "python"]);
    assert_eq!(
        fs::read_link(profile.bin_dir().join("pip")).unwrap(),
        prefix.join("libexec/bin/pip")
    );
    assert!(!profile.bin_dir().join("site-packages").exists());
    assert!(fs::symlink_metadata(profile.bin_dir().join("README")).is_err());
}

#[test]
fn unresolvable_package_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let profile = Profile::new(dir.path().join("profile"));
    let brew = FakeBrew::new();
    brew.preinstall("rust");

    let report = profile
        .rebuild(&specs(&["ghost", "rust"]), &Resolver::new(&brew))
        .unwrap();

    assert_eq!(report.skipped, vec!["ghost".to_string()]);
    assert_eq!(report.linked, vec!["rust".to_string()]);
    assert!(profile.is_populated());
}

#[test]
fn rebuild_with_no_packages_leaves_empty_bin() {
    let dir = tempfile::tempdir().unwrap();
    let profile = Profile::new(dir.path().join("profile"));
    let brew = FakeBrew::new();

    profile.rebuild(&[], &Resolver::new(&brew)).unwrap();

    assert!(profile.bin_dir().is_dir());
    assert!(!profile.is_populated());
}
