//! # bindist Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! This module builds the release zip archive. It maps files on disk to entry
//! names inside the archive and writes them, deflate-compressed, into a single
//! container file.
//!
//! ## Architecture
//!
//! - **`entry`**: `ArchiveEntry`, the pairing of a source path with its entry
//!   name, plus the normalization that turns destination paths into portable
//!   `/`-separated names and the expansion of a directory tree into entries.
//! - **`writer`**: `Archive`, the exclusively owned zip writer. It writes to a
//!   staging file next to the output and renames it onto the output path only
//!   when `finish` succeeds. Dropping an unfinished `Archive` removes the
//!   staging file, so a failed run never leaves a committed archive behind.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::Archive;
//! use std::path::Path;
//!
//! # fn run() -> anyhow::Result<()> {
//! let base = Path::new(".");
//! let mut archive = Archive::create(&base.join("bnme-bindist.zip"))?;
//! archive.add_file(base, Path::new("builddir/cataclysm-tiles"), Some(Path::new("cataclysm-bnme")))?;
//! archive.add_file(base, Path::new("README.md"), None)?;
//! archive.add_directory(base, Path::new("doc/BNME"), None)?;
//! let names = archive.finish()?;
//! # Ok(())
//! # }
//! ```
//!

pub mod entry;
pub mod writer;

pub use entry::ArchiveEntry;
pub use writer::Archive;
