//! # bindist Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! The packager has a single command, run when `bindist` is invoked. It
//! defines its own arguments structure (`PackageArgs`), flattened into the
//! top-level CLI, and a handler function (`handle_package`).
//!

/// Resolves the release layout and writes the release archive.
pub mod package;
