pub mod cli;
pub mod config;
pub mod disposal;
pub mod models;
pub mod patterns;
pub mod staging;
pub mod visitor;
pub mod walker;

use anyhow::Result;
use clap::Parser;

use self::cli::Cli;
use self::config::resolve_config;
use self::staging::ArchiveStaging;
use self::visitor::CleanupVisitor;

/// Resolves configuration and drives a full cleanup run.
pub fn run() -> Result<()> {
    let args = Cli::parse();
    let config = resolve_config(args)?;

    let staging = ArchiveStaging::new(&config.root, &config.backup)?;

    // Pre-populate the staging tree from the previous backup generation so
    // the repacked archive keeps files that were not re-matched this run.
    staging.merge_existing(config.dry_run)?;

    let mut visitor = CleanupVisitor::new(&config, staging.staging_dir());
    walker::walk(&config.root, &mut visitor)?;

    // Dry run: everything above was announcement-only and nothing was
    // staged, so there is nothing to pack.
    if config.dry_run {
        return Ok(());
    }

    if !config.no_backup {
        staging.pack()?;
    }

    // The staging temp directory is removed when `staging` drops, on this
    // path and on every error path above.
    Ok(())
}
