//! # bindist Release Layout Configuration
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module defines the release layout: which binary variants are candidates,
//! which fixed files and directory trees go into the archive, and under which
//! entry names. The built-in defaults describe the `bnme-bindist.zip` release;
//! a `bindist.toml` file can override any part of it.
//!
//! ## Architecture
//!
//! Layout sources (first match wins):
//! 1. An explicit file passed with `--config`
//! 2. `bindist.toml` in the base directory
//! 3. The defaults defined in this module
//!
//! Every field of a layout file is optional and falls back to its default, so a
//! file may override only the output name, for example. Unknown fields are
//! rejected. The loaded layout is validated before it is used.
//!
//! All source paths in a layout are relative to the base directory.
//!
//! ## Examples
//!
//! ```rust
//! let layout = config::load_layout(Path::new("."), None)?;
//! for variant in &layout.binaries {
//!     println!("{} -> {}", variant.source.display(), variant.dest);
//! }
//! ```
//!
use crate::core::error::{BindistError, Result};
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Name of the layout file looked up in the base directory.
pub const LAYOUT_FILENAME: &str = "bindist.toml";

/// Describes everything that goes into one release archive.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Layout {
    /// Output archive path, relative to the base directory.
    #[serde(default = "default_output")]
    pub output: String,
    /// Candidate binaries in order of preference. The first one present is packaged.
    #[serde(default = "default_binaries")]
    pub binaries: Vec<BinaryVariant>,
    /// Individual files, written in order after the binary.
    #[serde(default = "default_files")]
    pub files: Vec<EntrySpec>,
    /// Directory trees, written recursively in order after the files.
    #[serde(default = "default_directories")]
    pub directories: Vec<EntrySpec>,
}

/// One platform variant of the packaged binary.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BinaryVariant {
    /// Build output path of this variant.
    pub source: PathBuf,
    /// Canonical entry name the binary is stored under.
    pub dest: String,
}

/// A file or directory tree to package.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EntrySpec {
    /// File or directory to package, relative to the base directory.
    pub source: PathBuf,
    /// Entry name (or root, for directories). Defaults to `source`.
    #[serde(default)]
    pub dest: Option<String>,
}

impl EntrySpec {
    fn new(source: &str) -> Self {
        Self {
            source: PathBuf::from(source),
            dest: None,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            output: default_output(),
            binaries: default_binaries(),
            files: default_files(),
            directories: default_directories(),
        }
    }
}

fn default_output() -> String {
    "bnme-bindist.zip".to_string()
}
fn default_binaries() -> Vec<BinaryVariant> {
    vec![
        BinaryVariant {
            source: PathBuf::from("builddir/cataclysm-tiles"),
            dest: "cataclysm-bnme".to_string(),
        },
        BinaryVariant {
            source: PathBuf::from("builddir/cataclysm-tiles.exe"),
            dest: "cataclysm-bnme.exe".to_string(),
        },
    ]
}
fn default_files() -> Vec<EntrySpec> {
    vec![
        EntrySpec::new("README.md"),
        EntrySpec::new("README_BN.md"),
        EntrySpec::new("data/raw/keybindings.json"),
    ]
}
fn default_directories() -> Vec<EntrySpec> {
    vec![
        EntrySpec::new("data/mods/_me_interface"),
        EntrySpec::new("doc/BNME"),
    ]
}

/// Loads and validates the release layout.
///
/// An explicit `config_path` must exist. Without one, `bindist.toml` in `base`
/// is used when present, otherwise the built-in layout.
pub fn load_layout(base: &Path, config_path: Option<&Path>) -> Result<Layout> {
    let layout = match config_path {
        Some(path) => {
            if !path.is_file() {
                return Err(anyhow!(BindistError::MissingInput {
                    path: path.to_path_buf()
                }))
                .context("Layout file given with --config was not found");
            }
            info!("Loading release layout from: {}", path.display());
            load_layout_from_path(path)?
        }
        None => {
            let default_path = base.join(LAYOUT_FILENAME);
            if default_path.is_file() {
                info!("Loading release layout from: {}", default_path.display());
                load_layout_from_path(&default_path)?
            } else {
                debug!(
                    "No {} in {}, using the built-in release layout.",
                    LAYOUT_FILENAME,
                    base.display()
                );
                Layout::default()
            }
        }
    };
    validate_layout(&layout).context("Release layout validation failed")?;
    debug!("Final release layout: {:?}", layout);
    Ok(layout)
}

fn load_layout_from_path(path: &Path) -> Result<Layout> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn validate_layout(layout: &Layout) -> Result<()> {
    if layout.output.trim().is_empty() {
        return Err(anyhow!(BindistError::Config(
            "Output archive name cannot be empty.".to_string()
        )));
    }
    if layout.output.ends_with('/') || layout.output.ends_with('\\') {
        return Err(anyhow!(BindistError::Config(format!(
            "Output archive name '{}' names a directory.",
            layout.output
        ))));
    }
    if layout.binaries.is_empty() {
        return Err(anyhow!(BindistError::Config(
            "At least one binary variant is required.".to_string()
        )));
    }
    for variant in &layout.binaries {
        if variant.source.as_os_str().is_empty() {
            return Err(anyhow!(BindistError::Config(format!(
                "Binary variant with destination '{}' has an empty source path.",
                variant.dest
            ))));
        }
        if variant.dest.is_empty() {
            return Err(anyhow!(BindistError::Config(format!(
                "Binary variant '{}' has an empty destination name.",
                variant.source.display()
            ))));
        }
    }
    for spec in layout.files.iter().chain(&layout.directories) {
        if spec.source.as_os_str().is_empty() {
            return Err(anyhow!(BindistError::Config(
                "File and directory entries cannot have an empty source path.".to_string()
            )));
        }
    }
    Ok(())
}
