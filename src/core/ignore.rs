//! Ignore rules from a component's `.yotta_ignore` file.

use std::path::Path;

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};

/// A set of glob patterns matched against component-relative paths.
///
/// A path is ignored if a pattern matches it or any of its ancestors, so
/// listing a directory ignores everything beneath it.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    patterns: Vec<Pattern>,
}

impl IgnoreList {
    /// Parse ignore rules: one pattern per line, `#` starts a comment.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut patterns = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.trim_start_matches("./").trim_end_matches('/');
            let pattern = Pattern::new(line)
                .with_context(|| format!("invalid ignore pattern: {}", line))?;
            patterns.push(pattern);
        }
        Ok(IgnoreList { patterns })
    }

    /// Load ignore rules from a file; a missing file ignores nothing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(IgnoreList::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ignore file: {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("in {}", path.display()))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check a path relative to the component root.
    pub fn matches(&self, relative_path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        relative_path
            .ancestors()
            .filter(|p| !p.as_os_str().is_empty())
            .any(|p| self.patterns.iter().any(|pat| pat.matches_path_with(p, options)))
    }
}
