// Test utility module for array-api-stubgen integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stubs root shipped with the tests; holds a `_draft` package.
pub fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/fixtures/stubs")
}

pub fn fixture_draft() -> PathBuf {
    fixture_root().join("_draft")
}

/// Copy the fixture stubs root into a fresh temporary directory so tests
/// can write into it or tamper with it.
pub fn copy_fixture() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("stubs");
    copy_dir(&fixture_root(), &root);
    (temp, root)
}

fn copy_dir(from: &Path, to: &Path) {
    fs::create_dir_all(to).unwrap();
    for entry in fs::read_dir(from).unwrap() {
        let entry = entry.unwrap();
        let target = to.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

/// Overwrite one module of the copied draft package.
pub fn write_module(root: &Path, name: &str, code: &str) {
    fs::write(root.join("_draft").join(name), code).unwrap();
}
