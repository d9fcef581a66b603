//! Exclusion patterns applied while walking a repository
//!
//! Patterns use gitignore glob syntax: a trailing `/` restricts a pattern to
//! directories and a pattern without `/` matches at any depth.

use super::error::RetrievalError;
use ignore::overrides::{Override, OverrideBuilder};
use std::path::Path;

/// Paths skipped on every walk
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    // Dependencies
    "node_modules/",
    "vendor/",
    "venv/",
    // Compiled files
    "*.min.*",
    "*.pyc",
    "*.pyo",
    "*.pyd",
    "*.so",
    "*.dll",
    "*.class",
    // Images and fonts
    "*.jpg",
    "*.jpeg",
    "*.png",
    "*.gif",
    "*.ico",
    "*.svg",
    "*.ttf",
    "*.woff",
    "*.webp",
    // Cache and temporary files
    "__pycache__/",
    ".cache/",
    ".tmp/",
    // Lock files and logs
    "yarn.lock",
    "poetry.lock",
    "*.log",
    // Editor configuration
    ".vscode/",
    ".idea/",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    patterns: Vec<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends extra patterns, skipping ones already present
    pub fn with_patterns<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in extra {
            let pattern = pattern.into();
            if !self.patterns.contains(&pattern) {
                self.patterns.push(pattern);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Compiles the set into walker overrides rooted at `root`
    pub fn to_overrides(&self, root: &Path) -> Result<Override, RetrievalError> {
        let mut builder = OverrideBuilder::new(root);
        for pattern in &self.patterns {
            builder
                .add(&format!("!{}", pattern))
                .map_err(|e| RetrievalError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
        }
        builder.build().map_err(|e| RetrievalError::InvalidPattern {
            pattern: self.patterns.join(", "),
            message: e.to_string(),
        })
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDE_PATTERNS.iter().copied())
    }
}
