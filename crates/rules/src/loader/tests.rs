//! Tests for the loader module.

use std::fs;

use tempfile::TempDir;

use super::*;
use crate::error::ErrorKind;

const RULES_YAML: &str = r#"
- name: nightly
  description: nightly job
  scheduleExpression: "cron(0 0 * * ? *)"
  command: '["run"]'
"#;

#[test]
fn decode_blank_document_is_empty() {
    assert!(decode_rules("").unwrap().is_empty());
    assert!(decode_rules("  \n\t\n").unwrap().is_empty());
}

#[test]
fn decode_non_sequence_is_decode_error() {
    let err = decode_rules("name: not-a-list\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);

    let err = decode_rules("- name: [unclosed\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn load_rules_from_file() {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("rules.yaml");
    fs::write(&path, RULES_YAML).unwrap();

    let rules = load_rules(&path).unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].name, "nightly");
}

#[test]
fn missing_input_is_io_error_naming_the_path() {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("absent.yaml");

    let err = load_rules(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("absent.yaml"));

    let err = read_template(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn read_template_is_verbatim() {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("rule.tmpl");
    fs::write(&path, "- name: {{ .Name }}\n\n").unwrap();
    assert_eq!(read_template(&path).unwrap(), "- name: {{ .Name }}\n\n");
}

#[test]
fn write_atomic_replaces_and_leaves_no_temp_file() {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("ecschedule.yaml");
    fs::write(&path, "old contents that are longer").unwrap();

    write_atomic(&path, b"new").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "new");

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[cfg(unix)]
#[test]
fn write_atomic_uses_owner_only_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("ecschedule.yaml");
    write_atomic(&path, b"region: x\n").unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[test]
fn write_atomic_replaces_stale_temp_file_with_owner_only_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("ecschedule.yaml");
    let stale = super::writer::temp_path(&path);
    fs::write(&stale, "half-written leftovers from a crashed run").unwrap();
    fs::set_permissions(&stale, fs::Permissions::from_mode(0o644)).unwrap();

    write_atomic(&path, b"region: x\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "region: x\n");
    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    assert!(!stale.exists());
}

#[test]
fn temp_file_is_a_hidden_sibling() {
    let path = std::path::Path::new("out").join("ecschedule.yaml");
    let tmp = super::writer::temp_path(&path);
    assert_eq!(tmp.parent(), path.parent());
    let name = tmp.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with(".ecschedule.yaml."));
    assert!(name.ends_with(".tmp"));
}

#[test]
fn write_into_missing_directory_fails() {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("no-such-dir").join("ecschedule.yaml");
    let err = write_atomic(&path, b"x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
