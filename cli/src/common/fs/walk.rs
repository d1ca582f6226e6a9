//! # bindist Directory Walking
//!
//! File: cli/src/common/fs/walk.rs
//!

//! ## Overview
//!
//! Enumerates the regular files below a directory so that a whole tree can be
//! added to an archive. The walk is sorted by file name at every level, which
//! makes the archive entry order independent of the filesystem's own order:
//! packaging the same tree twice yields the same entry list.
//!
//! Symbolic links are not followed and, like sockets, FIFOs and device files,
//! are skipped. Directories contribute no entries of their own.
//!
use crate::core::error::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Returns every regular file below `root`, as paths relative to `root`, in
/// lexicographic walk order.
///
/// # Errors
///
/// Returns an `Err` if any directory below `root` cannot be read. A tree that
/// cannot be fully read is never packaged partially.
pub fn regular_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry_result in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry =
            entry_result.with_context(|| format!("Failed to walk directory {:?}", root))?;
        if !entry.file_type().is_file() {
            if !entry.file_type().is_dir() {
                debug!("Skipping non-regular file: {}", entry.path().display());
            }
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .with_context(|| {
                format!(
                    "Walked path {:?} is not below {:?}",
                    entry.path(),
                    root
                )
            })?
            .to_path_buf();
        files.push(relative);
    }
    debug!("Found {} regular files below {}", files.len(), root.display());
    Ok(files)
}
