use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ARCHIVE_EXTENSION: &str = ".tar.gz";

/// The temporary staging tree disposed files are collected into, plus the
/// merge-in/pack-out lifecycle of the backup archive.
///
/// The staging tree mirrors the root's structure under
/// `<tmp>/<basename(root)>`, so packing the temp root reproduces
/// `basename(root)/...` on extraction. The temp directory is removed on every
/// exit path when this value drops.
pub struct ArchiveStaging {
    temp: TempDir,
    root_name: String,
    staging_dir: PathBuf,
    archive_path: PathBuf,
}

impl ArchiveStaging {
    pub fn new(root: &Path, backup: &str) -> Result<Self> {
        let temp = tempfile::Builder::new()
            .prefix("tidyup")
            .tempdir()
            .context("failed to create staging directory")?;

        let root_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "backup".to_string());
        let staging_dir = temp.path().join(&root_name);

        let backup_path = PathBuf::from(backup);
        let backup_path = if backup_path.is_absolute() {
            backup_path
        } else {
            env::current_dir()
                .context("failed to get current directory")?
                .join(backup_path)
        };
        let mut archive_name = backup_path.into_os_string();
        archive_name.push(ARCHIVE_EXTENSION);
        let archive_path = PathBuf::from(archive_name);

        Ok(Self {
            temp,
            root_name,
            staging_dir,
            archive_path,
        })
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Extracts a pre-existing backup archive into the temp root so the new
    /// archive stays additive across runs. Files disposed during this run are
    /// staged over the extracted copies.
    pub fn merge_existing(&self, dry_run: bool) -> Result<()> {
        if dry_run || !self.archive_path.is_file() {
            return Ok(());
        }

        log::debug!("merging {} into staging", self.archive_path.display());
        let file = File::open(&self.archive_path)
            .with_context(|| format!("failed to open {}", self.archive_path.display()))?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        archive
            .unpack(self.temp.path())
            .with_context(|| format!("failed to extract {}", self.archive_path.display()))?;
        Ok(())
    }

    /// Writes the archive once from the whole staging tree, replacing any
    /// previous generation. Nothing staged means nothing to pack.
    pub fn pack(&self) -> Result<()> {
        if !self.staging_dir.is_dir() {
            return Ok(());
        }

        println!("pack archive to {}", self.archive_path.display());
        let file = File::create(&self.archive_path)
            .with_context(|| format!("failed to create {}", self.archive_path.display()))?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        builder
            .append_dir_all(&self.root_name, &self.staging_dir)
            .context("failed to pack staging tree")?;
        builder
            .into_inner()
            .context("failed to finish archive")?
            .finish()
            .context("failed to finish compression")?;
        Ok(())
    }
}
