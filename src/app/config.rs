use crate::app::cli::Cli;
use crate::app::models::RunConfig;
use crate::app::patterns::PatternSet;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Per-root config file holding newline-delimited glob patterns.
const CONFIG_FILE: &str = ".tidyup";

/// Reads `<root>/.tidyup` if present. Blank lines and `#` comments are
/// skipped.
fn load_config_patterns(root: &Path) -> Result<Vec<String>> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.is_file() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config at {}", config_path.display()))?;

    let patterns = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect();
    Ok(patterns)
}

pub fn resolve_config(cli: Cli) -> Result<RunConfig> {
    if !cli.path.is_dir() {
        bail!("path {} does not exist", cli.path.display());
    }
    let root = cli
        .path
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", cli.path.display()))?;

    let config_patterns = if cli.no_config {
        Vec::new()
    } else {
        load_config_patterns(&root)?
    };

    let patterns = PatternSet::build(config_patterns, &cli.pattern)?;
    log::debug!("using patterns: {:?}", patterns.patterns());

    Ok(RunConfig {
        root,
        patterns,
        backup: cli.backup,
        dry_run: cli.dry_run,
        no_backup: cli.no_backup,
        ignore_makefiles: cli.ignore_makefiles,
        ignore_empty_folders: cli.ignore_empty_folders,
    })
}
