//! # bindist Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!

//! ## Overview
//!
//! This module groups the filesystem operations the packager needs before and
//! while it writes an archive: checking that required inputs exist with the
//! right kind, and enumerating the regular files of a directory tree in a
//! stable order.
//!
//! ## Architecture
//!
//! Functionality is delegated to the following submodules:
//!
//! - **`io`**: `require_file` and `require_dir`, which turn absent inputs into
//!   `BindistError::MissingInput` and wrong-kind inputs into `BindistError::InvalidInput`.
//! - **`walk`**: `regular_files`, a sorted recursive walk built on `walkdir` that
//!   returns paths relative to the walked root.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::{io, walk};
//! use std::path::Path;
//!
//! # fn run_example() -> crate::core::error::Result<()> {
//! let docs = Path::new("doc/BNME");
//! io::require_dir(docs)?;
//! for relative in walk::regular_files(docs)? {
//!     println!("{}", relative.display());
//! }
//! # Ok(())
//! # }
//! ```
//!

/// Existence and kind checks for required inputs.
pub mod io;
/// Deterministic recursive enumeration of regular files.
pub mod walk;
