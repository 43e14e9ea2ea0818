use crate::app::patterns::PatternSet;
use std::path::PathBuf;

/// The final configuration after merging the `.tidyup` config file and CLI
/// args. Resolved once before the walk and never mutated afterwards; every
/// component borrows it.
#[derive(Debug)]
pub struct RunConfig {
    /// Absolute root of the tree to clean.
    pub root: PathBuf,
    pub patterns: PatternSet,
    /// Backup archive name without the `.tar.gz` extension.
    pub backup: String,
    pub dry_run: bool,
    pub no_backup: bool,
    pub ignore_makefiles: bool,
    pub ignore_empty_folders: bool,
}
