use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;

/// An ordered, deduplicated set of glob patterns matched against bare file
/// names (never full paths).
#[derive(Debug)]
pub struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl PatternSet {
    /// Builds the set from config-file patterns plus a slash-separated CLI
    /// pattern string. Config patterns come first; duplicates keep their
    /// first occurrence.
    pub fn build(config_patterns: Vec<String>, cli_pattern: &str) -> Result<Self> {
        let mut patterns = config_patterns;
        if !cli_pattern.is_empty() {
            patterns.extend(cli_pattern.split('/').map(str::to_string));
        }

        // Deduplicate while keeping order
        let mut seen = HashSet::new();
        patterns.retain(|p| seen.insert(p.clone()));

        if patterns.is_empty() {
            bail!("no patterns to use");
        }

        let mut builder = GlobSetBuilder::new();
        for pat in &patterns {
            builder.add(Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?);
        }
        let set = builder.build()?;

        Ok(Self { patterns, set })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
