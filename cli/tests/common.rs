//! # bindist Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests: running the compiled `bindist`
//! binary, building a release input tree in a temporary directory, and reading
//! back the entry names of a produced archive.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// # Get bindist Command (`bindist_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `bindist` binary.
///
/// ## Panics
/// Panics if the `bindist` binary cannot be found via `Command::cargo_bin`.
pub fn bindist_cmd() -> Command {
    Command::cargo_bin("bindist").expect("Failed to find bindist binary for testing")
}

/// Writes `content` to `base/relative`, creating parent directories.
pub fn write_file(base: &Path, relative: &str, content: &str) {
    let path = base.join(relative);
    fs::create_dir_all(path.parent().expect("test path has a parent"))
        .expect("Failed to create fixture directory");
    fs::write(&path, content).expect("Failed to write fixture file");
}

/// Populates `base` with every non-binary input of the default release layout,
/// including nested directories inside both trees.
pub fn populate_release_inputs(base: &Path) {
    write_file(base, "README.md", "# BNME");
    write_file(base, "README_BN.md", "# Bright Nights");
    write_file(base, "data/raw/keybindings.json", "[]");
    write_file(base, "data/mods/_me_interface/modinfo.json", "{}");
    write_file(base, "data/mods/_me_interface/ui/layout.json", "{}");
    write_file(base, "data/mods/_me_interface/ui/fonts/mono.json", "{}");
    write_file(base, "doc/BNME/index.md", "docs");
    write_file(base, "doc/BNME/guides/editor.md", "editor");
}

/// Entry names of the zip archive at `path`, in archive order.
pub fn archive_entry_names(path: &Path) -> Vec<String> {
    let file = fs::File::open(path).expect("Failed to open archive");
    let mut zip = zip::ZipArchive::new(file).expect("Failed to read archive");
    (0..zip.len())
        .map(|i| {
            zip.by_index(i)
                .expect("Failed to read archive entry")
                .name()
                .to_string()
        })
        .collect()
}
