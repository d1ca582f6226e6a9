//! # bindist Package Command
//!
//! File: cli/src/commands/package.rs
//!
//! ## Overview
//!
//! This module implements the packaging run itself: it resolves the release
//! layout against a base directory, picks the binary variant that was built,
//! and writes everything into the release archive.
//!
//! ## Architecture
//!
//! The command flow follows these steps:
//! 1. Resolve the base directory (`--base-dir`, default `.`) and load the layout.
//! 2. Select the binary: the first `BinaryVariant` whose source is a regular file.
//! 3. Check every fixed file and directory root. A missing input fails the run
//!    here, before the archive is opened, so no output file is produced.
//! 4. Expand the directory trees and check the full entry list for duplicate names.
//! 5. Write the binary, the fixed files, then the directory trees, in layout order.
//! 6. Commit the archive to the output path.
//!
//! With `--dry-run` the entry list from step 4 is printed instead of written, so
//! a dry run fails exactly where a real run would before writing.
//!
//! ## Examples
//!
//! ```bash
//! # Package the current directory into bnme-bindist.zip
//! bindist
//!
//! # Package another checkout, writing to a custom path
//! bindist --base-dir ~/src/bnme --output dist/bnme.zip
//!
//! # Show what would be packaged
//! bindist --dry-run
//! ```
//!
use crate::common::archive::{entry, Archive, ArchiveEntry};
use crate::common::fs::io;
use crate::core::config::{self, BinaryVariant, EntrySpec, Layout};
use crate::core::error::{BindistError, Result};
use clap::Parser;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// # Package Arguments (`PackageArgs`)
///
/// Every argument is optional; without any, the current directory is packaged
/// with the built-in release layout.
#[derive(Parser, Debug, Default)]
pub struct PackageArgs {
    /// Directory the release layout is resolved against. `~` is expanded.
    #[arg(short = 'C', long, default_value = ".")]
    pub base_dir: PathBuf,

    /// Output archive path, relative to the base directory. Overrides the layout's `output`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Layout file to use instead of `<base-dir>/bindist.toml`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the entries that would be written without creating the archive.
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// The resolved contents of one release, with every input already checked.
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub binary: ArchiveEntry,
    pub files: Vec<ArchiveEntry>,
    pub directories: Vec<EntrySpec>,
}

impl ReleasePlan {
    /// Resolves `layout` against `base`.
    ///
    /// # Errors
    ///
    /// - `BindistError::NoBinaryVariant` if no binary variant is present.
    /// - `BindistError::MissingInput` for the first absent file or directory.
    pub fn resolve(base: &Path, layout: &Layout) -> Result<Self> {
        let variant = select_binary(base, &layout.binaries)?;
        let binary = ArchiveEntry::new(&variant.source, Some(Path::new(&variant.dest)))?;

        let mut files = Vec::with_capacity(layout.files.len());
        for spec in &layout.files {
            io::require_file(&base.join(&spec.source))?;
            files.push(ArchiveEntry::new(
                &spec.source,
                spec.dest.as_deref().map(Path::new),
            )?);
        }

        for spec in &layout.directories {
            io::require_dir(&base.join(&spec.source))?;
        }

        Ok(Self {
            binary,
            files,
            directories: layout.directories.clone(),
        })
    }

    /// Lists every entry the archive will contain, in write order, without
    /// writing anything. `output` is excluded in case a tree contains it.
    ///
    /// # Errors
    ///
    /// `BindistError::DuplicateEntry` if two sources map to the same entry name,
    /// plus any error from walking the directory trees.
    pub fn entries(&self, base: &Path, output: &Path) -> Result<Vec<ArchiveEntry>> {
        let output_key = io::location_key(output)?;
        let mut entries = vec![self.binary.clone()];
        entries.extend(self.files.iter().cloned());

        for spec in &self.directories {
            let tree = entry::directory_entries(
                base,
                &spec.source,
                spec.dest.as_deref().map(Path::new),
            )?;
            let before = entries.len();
            for entry in tree {
                if io::location_key(&base.join(&entry.source))? == output_key {
                    debug!("Leaving out the output archive: {}", entry.source.display());
                    continue;
                }
                entries.push(entry);
            }
            info!(
                "Directory {} contributes {} entries",
                spec.source.display(),
                entries.len() - before
            );
        }

        {
            let mut names = HashSet::new();
            for entry in &entries {
                if !names.insert(entry.name.as_str()) {
                    anyhow::bail!(BindistError::DuplicateEntry {
                        name: entry.name.clone(),
                    });
                }
            }
        }
        Ok(entries)
    }

    /// Writes the release archive to `output` and returns its entry names.
    ///
    /// The entry list is computed before the archive is opened, so the staging
    /// file never appears in it.
    pub fn write(&self, base: &Path, output: &Path) -> Result<Vec<String>> {
        let entries = self.entries(base, output)?;
        let mut archive = Archive::create(output)?;

        info!("Adding binary {}", self.binary.source.display());
        for entry in &entries {
            archive.add_entry(base, entry)?;
        }
        debug!("Wrote {} entries to the staging archive", archive.entries().len());

        archive.finish()
    }
}

/// Picks the first binary variant whose source is a regular file below `base`.
///
/// # Errors
///
/// - `BindistError::NoBinaryVariant`, listing every candidate path, when none is present.
/// - Any I/O error other than "not found" while checking a candidate.
pub fn select_binary<'a>(base: &Path, variants: &'a [BinaryVariant]) -> Result<&'a BinaryVariant> {
    for variant in variants {
        let candidate = base.join(&variant.source);
        if io::is_regular_file(&candidate)? {
            info!(
                "Selected binary {} (packaged as '{}')",
                candidate.display(),
                variant.dest
            );
            return Ok(variant);
        }
        debug!("Binary variant not present: {}", candidate.display());
    }
    anyhow::bail!(BindistError::NoBinaryVariant {
        candidates: variants.iter().map(|v| base.join(&v.source)).collect(),
    })
}

/// # Handle Package Command (`handle_package`)
///
/// Runs one packaging pass as described in the module documentation.
pub fn handle_package(args: PackageArgs) -> Result<()> {
    let base = expand_path(&args.base_dir);
    io::require_dir(&base)?;
    debug!("Packaging relative to base directory {}", base.display());

    let config_path = args.config.as_deref().map(expand_path);
    let layout = config::load_layout(&base, config_path.as_deref())?;
    let output = base.join(args.output.unwrap_or_else(|| PathBuf::from(&layout.output)));

    let plan = ReleasePlan::resolve(&base, &layout)?;

    if args.dry_run {
        for entry in plan.entries(&base, &output)? {
            println!("{} -> {}", entry.source.display(), entry.name);
        }
        return Ok(());
    }

    let names = plan.write(&base, &output)?;
    println!("Created {} ({} entries)", output.display(), names.len());
    Ok(())
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
