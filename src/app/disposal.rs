use crate::app::models::RunConfig;
use anyhow::{Context, Result};
use pathdiff::diff_paths;
use std::fs;
use std::path::{Path, PathBuf};

/// Disposes of matched entries: deletes them in place (`--no-backup`) or
/// relocates them into the staging tree for later archiving. In dry-run mode
/// every operation is announcement-only.
pub struct DisposalEngine<'a> {
    config: &'a RunConfig,
    staging_dir: PathBuf,
}

impl<'a> DisposalEngine<'a> {
    pub fn new(config: &'a RunConfig, staging_dir: &Path) -> Self {
        Self {
            config,
            staging_dir: staging_dir.to_path_buf(),
        }
    }

    /// Disposes of `path/name`. `name` may be a file or a whole directory
    /// subtree; disposal of a directory above the root (the root disposing
    /// itself) resolves to a `../` relative path and is allowed.
    pub fn dispose(&self, path: &Path, name: &str) -> Result<()> {
        let file_path = path.join(name);
        let rel = diff_paths(path, &self.config.root).unwrap_or_default();
        let dest_dir = self.staging_dir.join(&rel);
        let dest_path = dest_dir.join(name);
        let display = rel.join(name);

        if !dest_dir.is_dir() && !self.config.dry_run {
            fs::create_dir_all(&dest_dir)
                .with_context(|| format!("failed to create {}", dest_dir.display()))?;
        }

        if self.config.no_backup {
            println!("{} -> remove", display.display());
            if self.config.dry_run {
                return Ok(());
            }
            if file_path.is_dir() {
                fs::remove_dir_all(&file_path)
                    .with_context(|| format!("failed to remove {}", file_path.display()))?;
            } else {
                fs::remove_file(&file_path)
                    .with_context(|| format!("failed to remove {}", file_path.display()))?;
            }
        } else if !dest_path.is_dir() {
            println!("{} -> move to backup archive", display.display());
            if !self.config.dry_run {
                move_entry(&file_path, &dest_path).with_context(|| {
                    format!(
                        "failed to move {} to {}",
                        file_path.display(),
                        dest_path.display()
                    )
                })?;
            }
        } else {
            // Two source paths mapped to the same staging directory; the
            // second one is skipped rather than merged.
            println!("{} -> ignored, already in backup archive", display.display());
        }

        Ok(())
    }
}

/// Moves `src` to `dest` with rename semantics. The staging tree usually
/// lives on another filesystem, so a failed rename falls back to copy plus
/// delete, recursing for directories.
fn move_entry(src: &Path, dest: &Path) -> Result<()> {
    if fs::rename(src, dest).is_ok() {
        return Ok(());
    }

    if src.is_dir() {
        copy_dir_all(src, dest)?;
        fs::remove_dir_all(src)?;
    } else {
        fs::copy(src, dest)?;
        fs::remove_file(src)?;
    }
    Ok(())
}

fn copy_dir_all(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
