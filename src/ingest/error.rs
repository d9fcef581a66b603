use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning a repository identifier into a file tree
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Repository path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Repository path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    #[error("Cloning {url} timed out after {seconds} seconds")]
    Timeout { url: String, seconds: u64 },

    #[error("Subdirectory '{0}' not found in repository")]
    SubpathNotFound(String),

    #[error("Subdirectory '{0}' must stay inside the repository")]
    InvalidSubpath(String),

    #[error("Repository has more than {limit} entries")]
    TooLarge { limit: usize },

    #[error("Invalid exclusion pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to walk repository: {0}")]
    Walk(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ignore::Error> for RetrievalError {
    fn from(err: ignore::Error) -> Self {
        RetrievalError::Walk(err.to_string())
    }
}
