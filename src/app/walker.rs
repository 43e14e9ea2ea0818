use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Policy hooks for [`walk`]. The walker itself knows nothing about cleanup;
/// it only drives the two-phase descent.
pub trait Visitor {
    /// Called before descending into `path`. Returning `false` stops the
    /// walk for this directory: no recursion into children and no
    /// [`Visitor::post_visit`] call.
    fn pre_visit(&mut self, path: &Path, names: &[String]) -> Result<bool>;

    /// Called after all children of `path` have been walked, with a fresh
    /// listing that reflects whatever the children's processing changed.
    fn post_visit(&mut self, path: &Path, names: &[String]) -> Result<()>;
}

/// Lists the file names in `path`, sorted for deterministic output.
/// Non-UTF-8 names cannot be glob-matched and are skipped with a warning.
pub fn list_dir(path: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(path)
        .with_context(|| format!("failed to list directory {}", path.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", path.display()))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => log::warn!("skipping non-UTF-8 file name {:?}", raw),
        }
    }
    names.sort();
    Ok(names)
}

/// Recursive depth-first traversal visiting every directory twice: once
/// pre-order and once post-order. Listing errors propagate and abort the
/// whole walk. The root itself receives the same treatment as any child
/// directory.
pub fn walk(path: &Path, visitor: &mut dyn Visitor) -> Result<()> {
    let names = list_dir(path)?;

    if !visitor.pre_visit(path, &names)? {
        return Ok(());
    }

    // Recurse over the original listing; entries disposed by pre_visit are
    // no longer directories on disk and fall through the is_dir check.
    for name in &names {
        let child = path.join(name);
        if child.is_dir() {
            walk(&child, visitor)?;
        }
    }

    let fresh = list_dir(path)?;
    visitor.post_visit(path, &fresh)
}
