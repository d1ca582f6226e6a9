//! # bindist Archive Entries (`common::archive::entry`)
//!
//! File: cli/src/common/archive/entry.rs
//!
//! ## Overview
//!
//! An archive entry pairs a source file, relative to the base directory, with
//! the name it is stored under. Names are always relative and use `/` as the
//! separator regardless of platform, so they never carry the base directory or
//! any other host-specific prefix.
//!
use crate::common::fs::{io, walk};
use crate::core::error::{BindistError, Result};
use std::path::{Component, Path, PathBuf};

/// A source file and the name it is stored under inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Source path, relative to the base directory.
    pub source: PathBuf,
    /// Entry name inside the archive.
    pub name: String,
}

impl ArchiveEntry {
    /// Creates an entry for `source`, stored under `dest` or, if `dest` is
    /// `None`, under the source path itself.
    pub fn new(source: &Path, dest: Option<&Path>) -> Result<Self> {
        Ok(Self {
            source: source.to_path_buf(),
            name: entry_name(dest.unwrap_or(source))?,
        })
    }
}

/// Converts a destination path into an archive entry name.
///
/// `.` components are dropped and the remaining components are joined with
/// `/`. Absolute paths, drive prefixes, `..` components and non-UTF-8
/// components are rejected, as is a path that normalizes to nothing.
pub fn entry_name(dest: &Path) -> Result<String> {
    let invalid = |reason: &str| BindistError::InvalidEntryName {
        name: dest.display().to_string(),
        reason: reason.to_string(),
    };

    let mut parts = Vec::new();
    for component in dest.components() {
        match component {
            Component::Normal(part) => {
                let part = part
                    .to_str()
                    .ok_or_else(|| invalid("not valid UTF-8"))?;
                parts.push(part);
            }
            Component::CurDir => {}
            Component::ParentDir => anyhow::bail!(invalid("must not contain '..'")),
            Component::RootDir | Component::Prefix(_) => {
                anyhow::bail!(invalid("must be a relative path"))
            }
        }
    }
    if parts.is_empty() {
        anyhow::bail!(invalid("names no file"));
    }
    Ok(parts.join("/"))
}

/// Expands the directory `source_dir` (relative to `base`) into one entry per
/// regular file below it, each stored under `dest_dir` (or `source_dir`) at
/// the same relative position.
///
/// # Errors
///
/// `BindistError::MissingInput` if `source_dir` does not exist, and any error
/// from walking the tree or naming its entries.
pub fn directory_entries(
    base: &Path,
    source_dir: &Path,
    dest_dir: Option<&Path>,
) -> Result<Vec<ArchiveEntry>> {
    let root = base.join(source_dir);
    io::require_dir(&root)?;
    let dest_root = dest_dir.unwrap_or(source_dir);

    walk::regular_files(&root)?
        .into_iter()
        .map(|relative| {
            ArchiveEntry::new(&source_dir.join(&relative), Some(&dest_root.join(&relative)))
        })
        .collect()
}
