use macdev_fs::link;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

fn make_bin(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}

#[test]
fn test_link_entries_links_files_and_skips_directories() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("prefix/bin");
    make_bin(&source, &["cargo", "rustc"]);
    fs::create_dir_all(source.join("nested")).unwrap();

    let dest = temp.path().join("profile/bin");
    let linked = link::link_entries(&source, &dest).unwrap();

    assert_eq!(linked, vec!["cargo".to_string(), "rustc".to_string()]);
    assert_eq!(link::read_link(&dest.join("cargo")).unwrap(), source.join("cargo"));
    assert!(fs::symlink_metadata(dest.join("nested")).is_err());
}

#[test]
fn test_link_entries_skips_non_executable_files() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("prefix/bin");
    make_bin(&source, &["tool"]);
    let readme = source.join("README");
    fs::write(&readme, "docs").unwrap();
    fs::set_permissions(&readme, fs::Permissions::from_mode(0o644)).unwrap();
    std::os::unix::fs::symlink(source.join("tool"), source.join("tool-alias")).unwrap();

    let dest = temp.path().join("profile/bin");
    let linked = link::link_entries(&source, &dest).unwrap();

    assert_eq!(linked, vec!["tool".to_string(), "tool-alias".to_string()]);
    assert!(fs::symlink_metadata(dest.join("README")).is_err());
}

#[test]
fn test_link_entries_missing_source_is_empty() {
    let temp = TempDir::new().unwrap();
    let linked = link::link_entries(&temp.path().join("nope"), &temp.path().join("dest")).unwrap();
    assert!(linked.is_empty());
    assert!(!temp.path().join("dest").exists());
}

#[test]
fn test_link_entries_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("prefix/bin");
    make_bin(&source, &["node", "npm"]);
    let dest = temp.path().join("profile/bin");

    let first = link::link_entries(&source, &dest).unwrap();
    let second = link::link_entries(&source, &dest).unwrap();

    assert_eq!(first, second);
    assert_eq!(link::entry_names(&dest).unwrap(), vec!["node", "npm"]);
}

#[rstest]
#[case::stale_symlink(true)]
#[case::plain_file(false)]
fn test_force_symlink_replaces_existing(#[case] existing_is_link: bool) {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("python3.12");
    fs::write(&target, "").unwrap();
    let link_path = temp.path().join("python3");

    if existing_is_link {
        std::os::unix::fs::symlink(temp.path().join("gone"), &link_path).unwrap();
    } else {
        fs::write(&link_path, "old").unwrap();
    }

    link::force_symlink(&target, &link_path).unwrap();
    assert_eq!(link::read_link(&link_path).unwrap(), target);
}

#[test]
fn test_force_symlink_refuses_directory() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("bin");
    fs::create_dir_all(&dir).unwrap();

    let err = link::force_symlink(Path::new("/usr/bin/true"), &dir).unwrap_err();
    assert!(err.to_string().contains("directory"));
}

#[test]
fn test_remove_tree() {
    let temp = TempDir::new().unwrap();
    let profile = temp.path().join("profile");
    make_bin(&profile.join("bin"), &["a"]);

    assert!(link::remove_tree(&profile).unwrap());
    assert!(!profile.exists());
    assert!(!link::remove_tree(&profile).unwrap());
}
