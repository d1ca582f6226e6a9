//! # bindist Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!

//! ## Overview
//!
//! Shared utilities used by the packaging command, kept apart from the
//! command logic (`commands::`) and the core infrastructure (`core::`).
//!
//! - **`archive`**: Entry naming and the zip archive writer.
//! - **`fs`**: Required-input checks and the sorted directory walk.
//!

/// Utilities for writing the release zip archive.
pub mod archive;
/// Utilities for filesystem checks and directory walking.
pub mod fs;
