//! Manifest persistence tests

use macdev_core::{Error, GlobalManifest, LocalManifest, PackageSpec, Tracking};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tempfile::TempDir;

#[test]
fn global_round_trip_preserves_key_forms() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manifest.toml");

    let mut manifest = GlobalManifest::default();
    manifest.insert_pure(&PackageSpec::parse("python@3.11"));
    manifest.insert_pure_entry("node", "20");
    manifest.insert_pure(&PackageSpec::parse("rust"));
    manifest.insert_impure("wget");
    manifest.insert_impure("git");
    manifest.insert_cask("firefox");
    manifest.stage_gc("go@1.22", "1.22");
    manifest.stage_gc("jq", "*");
    manifest.add_tap("acme/tools");

    manifest.save(&path).unwrap();
    let loaded = GlobalManifest::load(&path).unwrap();

    assert_eq!(loaded, manifest);
    assert_eq!(
        loaded.pure().collect::<Vec<_>>(),
        vec![("node", "20"), ("python@3.11", "*"), ("rust", "*")]
    );
    assert_eq!(loaded.tracking("firefox"), Some(&Tracking::Cask));
}

#[test]
fn global_file_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manifest.toml");

    let mut manifest = GlobalManifest::default();
    manifest.insert_impure("wget");
    manifest.add_tap("acme/tools");
    manifest.save(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("[impure]\nwget = true"));
    assert!(written.contains("\"acme/tools\" = true"));
    assert!(!written.contains("[gc]"));
    assert!(!written.contains("[casks]"));
}

#[test]
fn local_save_only_writes_packages() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manifest.toml");
    std::fs::write(
        &path,
        "[packages]\nrust = \"*\"\n\n[impure]\nwget = true\n\n[gc]\nnode = \"20\"\n",
    )
    .unwrap();

    let manifest = LocalManifest::load(&path).unwrap();
    manifest.save(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written.trim(), "[packages]\nrust = \"*\"");
}

#[test]
fn missing_and_malformed_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manifest.toml");

    assert!(matches!(
        LocalManifest::load(&path),
        Err(Error::ManifestNotFound { .. })
    ));

    std::fs::write(&path, "[packages\nrust =").unwrap();
    assert!(matches!(
        GlobalManifest::load(&path),
        Err(Error::ManifestParse { .. })
    ));
}

fn spec_key() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9-]{0,7}", proptest::option::of("[0-9]{1,2}(\\.[0-9]{1,2})?")).prop_map(
        |(name, version)| match version {
            Some(v) => format!("{name}@{v}"),
            None => name,
        },
    )
}

#[derive(Debug, Clone)]
enum Entry {
    Pure(String, String),
    Impure(String),
    Cask(String),
    Gc(String, String),
    Tap(String),
}

fn entry() -> impl Strategy<Value = Entry> {
    let version = prop_oneof![Just("*".to_string()), "[0-9]{1,2}"].boxed();
    prop_oneof![
        (spec_key(), version.clone()).prop_map(|(k, v)| Entry::Pure(k, v)),
        spec_key().prop_map(Entry::Impure),
        spec_key().prop_map(Entry::Cask),
        (spec_key(), version).prop_map(|(k, v)| Entry::Gc(k, v)),
        "[a-z]{1,6}/[a-z]{1,6}".prop_map(Entry::Tap),
    ]
}

proptest! {
    #[test]
    fn global_round_trip(entries in proptest::collection::vec(entry(), 0..24)) {
        let mut manifest = GlobalManifest::default();
        for entry in entries {
            match entry {
                Entry::Pure(k, v) => manifest.insert_pure_entry(k, v),
                Entry::Impure(k) => manifest.insert_impure(k),
                Entry::Cask(k) => manifest.insert_cask(k),
                Entry::Gc(k, v) => manifest.stage_gc(k, v),
                Entry::Tap(t) => { manifest.add_tap(t); }
            }
        }

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.toml");
        manifest.save(&path).unwrap();
        prop_assert_eq!(GlobalManifest::load(&path).unwrap(), manifest);
    }

    #[test]
    fn local_never_holds_name_twice(specs in proptest::collection::vec(spec_key(), 1..16)) {
        let mut manifest = LocalManifest::default();
        for raw in &specs {
            manifest.insert(&PackageSpec::parse(raw));
        }

        let names: Vec<String> = manifest
            .specs()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        let mut deduped = names.clone();
        deduped.dedup();
        prop_assert_eq!(names, deduped);
    }
}
