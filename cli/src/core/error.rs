//! # bindist Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the packager. Packaging
//! runs only after a successful build, so almost every failure it can report is
//! a required input that is not where the release layout says it should be.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `BindistError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Missing required inputs (fixed files, directory roots, binary variants)
//! - Inputs of the wrong kind (a directory where a file is expected, or vice versa)
//! - Destination names that cannot be stored as archive entries
//! - Layout configuration errors
//! - Zip writer failures
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !path.is_file() {
//!     anyhow::bail!(BindistError::MissingInput { path: path.to_path_buf() });
//! }
//!
//! // Recognize the error at the top level
//! if let Some(BindistError::NoBinaryVariant { .. }) = err.downcast_ref::<BindistError>() {
//!     eprintln!("Was the build run first?");
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the packager.
#[derive(Error, Debug)]
pub enum BindistError {
    #[error("Required input missing: {}", .path.display())]
    MissingInput { path: PathBuf },

    #[error("Required input missing: no binary found (tried {})", format_candidates(.candidates))]
    NoBinaryVariant { candidates: Vec<PathBuf> },

    #[error("Invalid input '{}': {reason}", .path.display())]
    InvalidInput { path: PathBuf, reason: String },

    #[error("Invalid archive entry name '{name}': {reason}")]
    InvalidEntryName { name: String, reason: String },

    #[error("Archive already contains an entry named '{name}'")]
    DuplicateEntry { name: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Zip archive error: {source}")]
    Archive {
        #[from]
        source: zip::result::ZipError,
    },
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
