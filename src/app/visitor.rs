use crate::app::disposal::DisposalEngine;
use crate::app::models::RunConfig;
use crate::app::walker::{self, Visitor};
use anyhow::Result;
use pathdiff::diff_paths;
use std::path::Path;
use std::process::{Command, Stdio};

const MAKEFILE: &str = "Makefile";
const CONFIGURE: &str = "configure";

/// Picks the make target: autoconf trees get `distclean`, plain Makefiles
/// get `clean`.
fn clean_target(names: &[String]) -> &'static str {
    if names.iter().any(|n| n == CONFIGURE) {
        "distclean"
    } else {
        "clean"
    }
}

/// The cleanup policy applied at every directory: run make clean targets,
/// dispose of empty directories, and dispose of pattern matches.
pub struct CleanupVisitor<'a> {
    config: &'a RunConfig,
    disposal: DisposalEngine<'a>,
}

impl<'a> CleanupVisitor<'a> {
    pub fn new(config: &'a RunConfig, staging_dir: &Path) -> Self {
        Self {
            config,
            disposal: DisposalEngine::new(config, staging_dir),
        }
    }

    fn display_rel(&self, path: &Path) -> String {
        match diff_paths(path, &self.config.root) {
            Some(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
            _ => ".".to_string(),
        }
    }

    /// Runs `make <target>` with `path` as the child's working directory.
    /// stdin and stdout go to the null device; the exit status is ignored so
    /// a broken Makefile never aborts the run.
    fn run_make(&self, path: &Path, target: &str) {
        let result = Command::new("make")
            .arg(target)
            .current_dir(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status();
        match result {
            Ok(status) if !status.success() => {
                log::debug!("make {} in {} exited with {}", target, path.display(), status);
            }
            Ok(_) => {}
            Err(err) => {
                log::warn!("failed to run make {} in {}: {}", target, path.display(), err);
            }
        }
    }

    /// Disposes of `path` itself, addressed relative to its parent.
    /// For the root this resolves to `dirname(root)/basename(root)` and can
    /// legitimately dispose of the run's own root.
    fn dispose_directory(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or(path);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            self.disposal.dispose(parent, name)?;
        }
        Ok(())
    }
}

impl Visitor for CleanupVisitor<'_> {
    fn pre_visit(&mut self, path: &Path, names: &[String]) -> Result<bool> {
        let mut names = names.to_vec();

        if !self.config.ignore_makefiles && names.iter().any(|n| n == MAKEFILE) {
            let target = clean_target(&names);
            println!("{} -> make {}", self.display_rel(path), target);
            // Dry run stops here: no pattern processing, no descent and no
            // post-visit for this directory.
            if self.config.dry_run {
                return Ok(false);
            }
            self.run_make(path, target);
            names = walker::list_dir(path)?;
        }

        if !self.config.ignore_empty_folders && names.is_empty() {
            self.dispose_directory(path)?;
            return Ok(false);
        }

        for name in &names {
            if self.config.patterns.matches(name) {
                self.disposal.dispose(path, name)?;
            }
        }

        Ok(true)
    }

    fn post_visit(&mut self, path: &Path, names: &[String]) -> Result<()> {
        // Children and clean targets may have emptied this directory since
        // the pre-order visit.
        if !self.config.ignore_empty_folders && names.is_empty() {
            self.dispose_directory(path)?;
        }
        Ok(())
    }
}
