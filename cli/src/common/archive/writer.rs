//! # bindist Zip Writer (`common::archive::writer`)
//!
//! File: cli/src/common/archive/writer.rs
//!
//! ## Overview
//!
//! `Archive` owns one zip archive for the duration of a packaging run. Entries
//! are written sequentially with the Deflate method. Once `finish` has been
//! called the archive is consumed, so nothing can be added to a closed archive.
//!
//! ## Architecture
//!
//! The `zip` crate's `ZipWriter` needs a seekable sink. The sink here is a
//! `tempfile::NamedTempFile` created in the output's directory:
//!
//! - `Archive::create` opens the staging file (`.bindist-*.zip.partial`).
//! - `add_file` / `add_directory` verify each source and stream it into a new entry.
//! - `finish` writes the central directory, flushes and syncs the staging file,
//!   and renames it onto the output path.
//!
//! If the run fails before `finish`, dropping the `Archive` closes the writer
//! and deletes the staging file. An earlier archive at the output path is only
//! ever replaced by a complete one.
//!
//! The staging file is created with the same permissions a new file would get
//! from the user's umask, and keeps them when renamed.
//!
//! On Unix each entry records the permission bits of its source file, so the
//! packaged binary keeps its executable bit when extracted.
//!
use super::entry::{self, ArchiveEntry};
use crate::common::fs::io;
use crate::core::error::{BindistError, Result};
use anyhow::Context;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// An open release archive. See the module documentation for the commit protocol.
pub struct Archive {
    writer: ZipWriter<BufWriter<NamedTempFile>>,
    output: PathBuf,
    output_key: PathBuf,
    staging_key: PathBuf,
    names: HashSet<String>,
    entries: Vec<String>,
}

impl Archive {
    /// Opens a new archive that will be committed to `output`.
    ///
    /// The output's parent directory is created if needed. Nothing is written
    /// at `output` itself until `finish`.
    pub fn create(output: &Path) -> Result<Self> {
        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {:?}", dir))?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(".bindist-").suffix(".zip.partial");
        // The default 0600 mode would survive the rename; let the umask apply instead.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let staging_file = builder
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create staging file in {:?}", dir))?;
        debug!("Staging archive at {}", staging_file.path().display());

        Ok(Self {
            output_key: io::location_key(output)?,
            staging_key: io::location_key(staging_file.path())?,
            writer: ZipWriter::new(BufWriter::new(staging_file)),
            output: output.to_path_buf(),
            names: HashSet::new(),
            entries: Vec::new(),
        })
    }

    /// Entry names written so far, in write order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Adds the regular file `source` (relative to `base`) under `dest`, or
    /// under `source` itself when `dest` is `None`.
    ///
    /// # Errors
    ///
    /// - `BindistError::MissingInput` if `source` does not exist.
    /// - `BindistError::InvalidEntryName` / `BindistError::DuplicateEntry` for bad destinations.
    /// - Any I/O or zip error while copying the file into the archive.
    pub fn add_file(&mut self, base: &Path, source: &Path, dest: Option<&Path>) -> Result<()> {
        let entry = ArchiveEntry::new(source, dest)?;
        self.add_entry(base, &entry)
    }

    /// Adds every regular file below `source_dir` (relative to `base`), keeping
    /// its position relative to `source_dir` under `dest_dir` (or `source_dir`).
    ///
    /// Returns the number of files added. The archive's own output and staging
    /// files are never added, even when they lie inside `source_dir` and the
    /// paths are spelled differently (e.g. absolute output, relative base).
    pub fn add_directory(
        &mut self,
        base: &Path,
        source_dir: &Path,
        dest_dir: Option<&Path>,
    ) -> Result<usize> {
        let entries = entry::directory_entries(base, source_dir, dest_dir)?;
        let mut added = 0;
        for entry in &entries {
            let full = base.join(&entry.source);
            let key = io::location_key(&full)?;
            if key == self.output_key || key == self.staging_key {
                debug!("Skipping the archive itself: {}", full.display());
                continue;
            }
            self.add_entry(base, entry)?;
            added += 1;
        }
        info!(
            "Added {} files from {} to the archive",
            added,
            base.join(source_dir).display()
        );
        Ok(added)
    }

    /// Writes one already-named entry. Its source is relative to `base`.
    pub fn add_entry(&mut self, base: &Path, entry: &ArchiveEntry) -> Result<()> {
        let source_path = base.join(&entry.source);
        io::require_file(&source_path)?;

        if self.names.contains(&entry.name) {
            anyhow::bail!(BindistError::DuplicateEntry {
                name: entry.name.clone(),
            });
        }

        let options = entry_options(&source_path)?;
        self.writer
            .start_file(entry.name.clone(), options)
            .map_err(BindistError::from)
            .with_context(|| format!("Failed to start archive entry '{}'", entry.name))?;

        let mut file = File::open(&source_path)
            .with_context(|| format!("Failed to open {:?}", source_path))?;
        let bytes = std::io::copy(&mut file, &mut self.writer).with_context(|| {
            format!(
                "Failed to write {:?} into archive entry '{}'",
                source_path, entry.name
            )
        })?;

        debug!(
            "Added {} as '{}' ({} bytes)",
            source_path.display(),
            entry.name,
            bytes
        );
        self.names.insert(entry.name.clone());
        self.entries.push(entry.name.clone());
        Ok(())
    }

    /// Closes the archive and commits it to the output path.
    ///
    /// Returns the names of all entries written, in order.
    pub fn finish(self) -> Result<Vec<String>> {
        let Archive {
            mut writer,
            output,
            entries,
            ..
        } = self;

        let buffered = writer
            .finish()
            .map_err(BindistError::from)
            .context("Failed to write the zip central directory")?;
        let staging = buffered
            .into_inner()
            .map_err(|e| e.into_error())
            .context("Failed to flush the staging archive")?;
        staging
            .as_file()
            .sync_all()
            .context("Failed to sync the staging archive")?;

        staging
            .persist(&output)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move the finished archive to {:?}", output))?;

        info!(
            "Wrote {} entries to {}",
            entries.len(),
            output.display()
        );
        Ok(entries)
    }
}

fn entry_options(source_path: &Path) -> Result<FileOptions> {
    let metadata = fs::metadata(source_path)
        .with_context(|| format!("Failed to read metadata of {:?}", source_path))?;
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(metadata.len() >= u64::from(u32::MAX));

    #[cfg(unix)]
    let options = {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode() & 0o777)
    };

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;
    use zip::ZipArchive;

    fn read_entries(path: &Path) -> Result<Vec<(String, String)>> {
        let mut zip = ZipArchive::new(File::open(path)?)?;
        let mut out = Vec::new();
        for i in 0..zip.len() {
            let mut file = zip.by_index(i)?;
            assert_eq!(file.compression(), CompressionMethod::Deflated);
            let mut content = String::new();
            file.read_to_string(&mut content)?;
            out.push((file.name().to_string(), content));
        }
        Ok(out)
    }

    fn leftover_staging_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.to_string_lossy().ends_with(".zip.partial") {
                found.push(path);
            }
        }
        Ok(found)
    }

    #[test]
    fn test_add_file_and_directory() -> Result<()> {
        let temp_dir = tempdir()?;
        let base = temp_dir.path();
        fs::create_dir_all(base.join("builddir"))?;
        fs::create_dir_all(base.join("doc/BNME/sub"))?;
        fs::write(base.join("builddir/cataclysm-tiles"), "binary")?;
        fs::write(base.join("README.md"), "readme")?;
        fs::write(base.join("doc/BNME/a.md"), "a")?;
        fs::write(base.join("doc/BNME/sub/b.md"), "b")?;

        let output = base.join("out.zip");
        let mut archive = Archive::create(&output)?;
        archive.add_file(
            base,
            Path::new("builddir/cataclysm-tiles"),
            Some(Path::new("./cataclysm-bnme")),
        )?;
        archive.add_file(base, Path::new("README.md"), None)?;
        assert_eq!(archive.add_directory(base, Path::new("doc/BNME"), None)?, 2);
        assert!(!output.exists());

        let names = archive.finish()?;
        assert_eq!(
            names,
            vec!["cataclysm-bnme", "README.md", "doc/BNME/a.md", "doc/BNME/sub/b.md"]
        );
        assert_eq!(
            read_entries(&output)?,
            vec![
                ("cataclysm-bnme".to_string(), "binary".to_string()),
                ("README.md".to_string(), "readme".to_string()),
                ("doc/BNME/a.md".to_string(), "a".to_string()),
                ("doc/BNME/sub/b.md".to_string(), "b".to_string()),
            ]
        );
        assert!(leftover_staging_files(base)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_add_file_missing_source() -> Result<()> {
        let temp_dir = tempdir()?;
        let mut archive = Archive::create(&temp_dir.path().join("out.zip"))?;
        let err = archive
            .add_file(temp_dir.path(), Path::new("README_BN.md"), None)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BindistError>(),
            Some(BindistError::MissingInput { .. })
        ));
        assert!(archive.entries().is_empty());
        Ok(())
    }

    #[test]
    fn test_duplicate_entry_rejected() -> Result<()> {
        let temp_dir = tempdir()?;
        let base = temp_dir.path();
        fs::write(base.join("a.txt"), "a")?;
        fs::write(base.join("b.txt"), "b")?;

        let mut archive = Archive::create(&base.join("out.zip"))?;
        archive.add_file(base, Path::new("a.txt"), Some(Path::new("same.txt")))?;
        let err = archive
            .add_file(base, Path::new("b.txt"), Some(Path::new("same.txt")))
            .unwrap_err();
        assert!(err.to_string().contains("already contains an entry named 'same.txt'"));
        Ok(())
    }

    #[test]
    fn test_failure_mid_walk_releases_archive() -> Result<()> {
        let temp_dir = tempdir()?;
        let base = temp_dir.path();
        fs::create_dir_all(base.join("data/mods/_me_interface"))?;
        fs::write(base.join("data/mods/_me_interface/mod.json"), "{}")?;
        // Both trees map onto the same destination root, so the second walk fails
        // on its first file after the archive already holds entries.
        fs::create_dir_all(base.join("other"))?;
        fs::write(base.join("other/mod.json"), "{}")?;

        let output = base.join("bnme-bindist.zip");
        let result = (|| -> Result<()> {
            let mut archive = Archive::create(&output)?;
            archive.add_directory(base, Path::new("data/mods/_me_interface"), Some(Path::new("mods")))?;
            archive.add_directory(base, Path::new("other"), Some(Path::new("mods")))?;
            archive.finish()?;
            Ok(())
        })();

        assert!(result.is_err());
        assert!(!output.exists());
        assert!(leftover_staging_files(base)?.is_empty());
        // The handle is released: the directory can be removed right away.
        temp_dir.close()?;
        Ok(())
    }

    #[test]
    fn test_finish_replaces_existing_output() -> Result<()> {
        let temp_dir = tempdir()?;
        let base = temp_dir.path();
        fs::write(base.join("README.md"), "new")?;
        let output = base.join("out.zip");
        fs::write(&output, "stale, not a zip")?;

        let mut archive = Archive::create(&output)?;
        archive.add_file(base, Path::new("README.md"), None)?;
        archive.finish()?;

        assert_eq!(
            read_entries(&output)?,
            vec![("README.md".to_string(), "new".to_string())]
        );
        Ok(())
    }

    #[test]
    fn test_add_directory_skips_own_output() -> Result<()> {
        let temp_dir = tempdir()?;
        let base = temp_dir.path();
        fs::create_dir_all(base.join("dist"))?;
        fs::write(base.join("dist/notes.txt"), "notes")?;

        let output = base.join("dist/release.zip");
        let mut archive = Archive::create(&output)?;
        assert_eq!(archive.add_directory(base, Path::new("dist"), None)?, 1);
        assert_eq!(archive.finish()?, vec!["dist/notes.txt"]);
        Ok(())
    }

    #[test]
    fn test_add_directory_skips_own_output_with_absolute_output() -> Result<()> {
        // Relative base (below the working directory), absolute output path.
        let temp_dir = tempfile::tempdir_in(".")?;
        let base = temp_dir.path();
        assert!(base.is_relative());
        fs::create_dir_all(base.join("dist"))?;
        fs::write(base.join("dist/notes.txt"), "notes")?;
        fs::write(base.join("dist/release.zip"), "previous archive")?;

        let output = fs::canonicalize(base)?.join("dist/release.zip");
        let mut archive = Archive::create(&output)?;
        assert_eq!(archive.add_directory(base, Path::new("dist"), None)?, 1);
        assert_eq!(archive.finish()?, vec!["dist/notes.txt"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_archive_mode_follows_umask() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir()?;
        let base = temp_dir.path();
        fs::write(base.join("README.md"), "readme")?;
        // A plain new file shows what the current umask yields for mode 0666.
        fs::write(base.join("reference"), "")?;
        let expected = fs::metadata(base.join("reference"))?.permissions().mode() & 0o777;

        let output = base.join("out.zip");
        let mut archive = Archive::create(&output)?;
        archive.add_file(base, Path::new("README.md"), None)?;
        archive.finish()?;

        assert_eq!(fs::metadata(&output)?.permissions().mode() & 0o777, expected);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_permissions_recorded() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempdir()?;
        let base = temp_dir.path();
        let binary = base.join("cataclysm-tiles");
        fs::write(&binary, "elf")?;
        fs::set_permissions(&binary, fs::Permissions::from_mode(0o755))?;

        let output = base.join("out.zip");
        let mut archive = Archive::create(&output)?;
        archive.add_file(base, Path::new("cataclysm-tiles"), Some(Path::new("cataclysm-bnme")))?;
        archive.finish()?;

        let mut zip = ZipArchive::new(File::open(&output)?)?;
        let file = zip.by_name("cataclysm-bnme")?;
        assert_eq!(file.unix_mode().map(|m| m & 0o777), Some(0o755));
        Ok(())
    }
}
