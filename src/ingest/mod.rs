//! Repository ingestion
//!
//! Turns a repository identifier (remote URL or local path) into a textual
//! file tree the model can reason about. Remote repositories are shallow
//! cloned into a temporary directory that is removed once the tree is built.

mod error;
mod patterns;
mod source;
mod tree;

pub use error::RetrievalError;
pub use patterns::{ExclusionSet, DEFAULT_EXCLUDE_PATTERNS};
pub use source::{RemoteRepository, RepositorySource};
pub use tree::render_tree;

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_CLONE_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_TREE_ENTRIES: usize = 10_000;

/// Produces a file tree for a repository identifier
#[async_trait]
pub trait RepositorySummarizer: Send + Sync {
    async fn summarize(
        &self,
        identifier: &str,
        exclusions: &ExclusionSet,
    ) -> Result<String, RetrievalError>;
}

/// Summarizer backed by `git clone` and a filtered directory walk
#[derive(Debug, Clone)]
pub struct TreeSummarizer {
    clone_timeout: Duration,
    max_entries: usize,
}

impl TreeSummarizer {
    pub fn new(clone_timeout: Duration, max_entries: usize) -> Self {
        Self {
            clone_timeout,
            max_entries,
        }
    }
}

impl Default for TreeSummarizer {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_CLONE_TIMEOUT_SECS),
            DEFAULT_MAX_TREE_ENTRIES,
        )
    }
}

#[async_trait]
impl RepositorySummarizer for TreeSummarizer {
    async fn summarize(
        &self,
        identifier: &str,
        exclusions: &ExclusionSet,
    ) -> Result<String, RetrievalError> {
        match RepositorySource::parse(identifier) {
            RepositorySource::Local(path) => {
                if !path.exists() {
                    return Err(RetrievalError::NotFound(path));
                }
                let canonical = path.canonicalize()?;
                let name = canonical
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| ".".to_string());

                info!(path = %canonical.display(), "Summarizing local repository");
                render_tree(&canonical, &name, exclusions, self.max_entries)
            }
            RepositorySource::Remote(remote) => {
                let checkout = source::shallow_clone(&remote, self.clone_timeout).await?;

                let root = remote.tree_root(checkout.path())?;

                info!(url = %remote.clone_url, "Summarizing cloned repository");
                render_tree(&root, &remote.name, exclusions, self.max_entries)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_summarize_local_path() {
        let dir = TempDir::new().unwrap();
        let repo = dir.path().join("inventory");
        fs::create_dir_all(repo.join("src")).unwrap();
        fs::write(repo.join("src/lib.rs"), "").unwrap();

        let summarizer = TreeSummarizer::default();
        let tree = summarizer
            .summarize(repo.to_str().unwrap(), &ExclusionSet::default())
            .await
            .unwrap();

        assert!(tree.starts_with("Directory structure:\n└── inventory/\n"));
        assert!(tree.contains("lib.rs"));
    }

    #[tokio::test]
    async fn test_summarize_missing_local_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        let err = TreeSummarizer::default()
            .summarize(missing.to_str().unwrap(), &ExclusionSet::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RetrievalError::NotFound(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_summarize_is_stable_across_calls() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/b.md"), "").unwrap();

        let summarizer = TreeSummarizer::default();
        let identifier = dir.path().to_str().unwrap();
        let first = summarizer
            .summarize(identifier, &ExclusionSet::default())
            .await
            .unwrap();
        let second = summarizer
            .summarize(identifier, &ExclusionSet::default())
            .await
            .unwrap();

        assert_eq!(first, second);
    }
}
