use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove backup files and build artifacts from a directory tree"
)]
pub struct Cli {
    /// Path to search for files to remove
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Slash separated list of glob patterns for files to remove
    /// (shell wildcards allowed, e.g. '*.bak/*~')
    #[arg(long, short = 'p', value_name = "pattern", default_value = "")]
    pub pattern: String,

    /// Perform a trial run with no changes made
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Don't read search patterns from the .tidyup file at the root
    #[arg(long)]
    pub no_config: bool,

    /// Delete matches instead of moving them into a backup archive
    #[arg(long)]
    pub no_backup: bool,

    /// Don't run make clean in directories that contain a Makefile
    #[arg(long)]
    pub ignore_makefiles: bool,

    /// Don't remove directories that are or become empty
    #[arg(long)]
    pub ignore_empty_folders: bool,

    /// Backup archive name without file extension
    #[arg(long, short = 'b', value_name = "name", default_value = "tidyup.backup")]
    pub backup: String,
}
