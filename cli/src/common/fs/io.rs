//! # bindist Required Input Checks
//!
//! File: cli/src/common/fs/io.rs
//!

//! ## Overview
//!
//! Every input of a release is required. These helpers check an input before
//! it is used so that the error names the missing path instead of surfacing a
//! bare I/O error from deep inside the zip writer.
//!
//! Both checks follow symbolic links: a link to a regular file counts as a
//! regular file.
//!
//! `location_key` gives two spellings of one location (relative or absolute,
//! with or without `.` components) the same value, so the archive can
//! recognize its own files inside a walked tree.
//!
use crate::core::error::{BindistError, Result};
use anyhow::Context;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ensures `path` resolves to a regular file.
///
/// # Errors
///
/// - `BindistError::MissingInput` if nothing exists at `path`.
/// - `BindistError::InvalidInput` if `path` exists but is not a regular file.
/// - Any other I/O error while reading metadata, with context.
pub fn require_file(path: &Path) -> Result<()> {
    let metadata = metadata_or_missing(path)?;
    if !metadata.is_file() {
        anyhow::bail!(BindistError::InvalidInput {
            path: path.to_path_buf(),
            reason: "expected a regular file".to_string(),
        });
    }
    debug!("Found required file: {}", path.display());
    Ok(())
}

/// Ensures `path` resolves to a directory.
///
/// # Errors
///
/// - `BindistError::MissingInput` if nothing exists at `path`.
/// - `BindistError::InvalidInput` if `path` exists but is not a directory.
pub fn require_dir(path: &Path) -> Result<()> {
    let metadata = metadata_or_missing(path)?;
    if !metadata.is_dir() {
        anyhow::bail!(BindistError::InvalidInput {
            path: path.to_path_buf(),
            reason: "expected a directory".to_string(),
        });
    }
    debug!("Found required directory: {}", path.display());
    Ok(())
}

/// Reports whether `path` resolves to a regular file.
///
/// Only a path that does not exist counts as absent. Every other I/O error
/// (permissions, a file where a directory is expected) is returned.
pub fn is_regular_file(path: &Path) -> Result<bool> {
    Ok(metadata_if_present(path)?.is_some_and(|m| m.is_file()))
}

/// Returns a comparable form of `path`: its parent directory canonicalized,
/// joined with its file name.
///
/// The file itself need not exist. If the parent directory does not exist
/// either, `path` is returned unchanged; no existing tree can contain it.
pub fn location_key(path: &Path) -> Result<PathBuf> {
    let Some(name) = path.file_name() else {
        return Ok(path.to_path_buf());
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match fs::canonicalize(parent) {
        Ok(dir) => Ok(dir.join(name)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e).with_context(|| format!("Failed to resolve directory {:?}", parent)),
    }
}

fn metadata_or_missing(path: &Path) -> Result<fs::Metadata> {
    match metadata_if_present(path)? {
        Some(metadata) => Ok(metadata),
        None => anyhow::bail!(BindistError::MissingInput {
            path: path.to_path_buf(),
        }),
    }
}

fn metadata_if_present(path: &Path) -> Result<Option<fs::Metadata>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read metadata of {:?}", path)),
    }
}
