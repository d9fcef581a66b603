//! Repository identifiers and shallow cloning

use super::error::RetrievalError;
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

const KNOWN_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org", "codeberg.org"];

fn browse_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<repo>https?://[^/]+/[^/]+/[^/]+?)(?:\.git)?(?:/(?:-/)?(?:tree|blob)/(?P<branch>[^/]+)(?:/(?P<subpath>.+?))?)?/?$",
        )
        .expect("valid regex")
    })
}

/// Where a repository lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositorySource {
    Local(PathBuf),
    Remote(RemoteRepository),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub clone_url: String,
    pub name: String,
    pub branch: Option<String>,
    pub subpath: Option<String>,
}

impl RepositorySource {
    /// Classifies an identifier as a remote URL or a local path.
    ///
    /// Browse URLs such as `https://github.com/org/repo/tree/main/docs` are
    /// split into the clone URL, the branch and the subdirectory. The branch
    /// is a single path segment, so `tree/feature/x` reads as branch `feature`
    /// with subdirectory `x`.
    pub fn parse(identifier: &str) -> Self {
        let identifier = identifier.trim();

        let with_scheme = if KNOWN_HOSTS
            .iter()
            .any(|host| identifier.starts_with(&format!("{}/", host)))
        {
            format!("https://{}", identifier)
        } else {
            identifier.to_string()
        };

        if with_scheme.starts_with("http://") || with_scheme.starts_with("https://") {
            if let Some(caps) = browse_url_regex().captures(&with_scheme) {
                let repo = caps["repo"].to_string();
                return RepositorySource::Remote(RemoteRepository {
                    name: last_segment(&repo),
                    clone_url: repo,
                    branch: caps.name("branch").map(|m| m.as_str().to_string()),
                    subpath: caps.name("subpath").map(|m| m.as_str().to_string()),
                });
            }
            return RepositorySource::Remote(RemoteRepository::plain(&with_scheme));
        }

        if with_scheme.starts_with("git@")
            || with_scheme.starts_with("ssh://")
            || with_scheme.starts_with("git://")
        {
            return RepositorySource::Remote(RemoteRepository::plain(&with_scheme));
        }

        RepositorySource::Local(PathBuf::from(identifier))
    }
}

impl RemoteRepository {
    /// Directory to summarize inside `checkout`, honouring the subpath
    pub fn tree_root(&self, checkout: &Path) -> Result<PathBuf, RetrievalError> {
        let Some(subpath) = &self.subpath else {
            return Ok(checkout.to_path_buf());
        };

        let relative = Path::new(subpath);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(RetrievalError::InvalidSubpath(subpath.clone()));
        }

        let root = checkout.join(relative);
        if !root.is_dir() {
            return Err(RetrievalError::SubpathNotFound(subpath.clone()));
        }
        Ok(root)
    }

    fn plain(url: &str) -> Self {
        let trimmed = url.trim_end_matches('/');
        Self {
            clone_url: trimmed.to_string(),
            name: last_segment(trimmed),
            branch: None,
            subpath: None,
        }
    }
}

fn last_segment(url: &str) -> String {
    let tail = url
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(url);
    tail.trim_end_matches(".git").to_string()
}

/// Temporary checkout removed on drop
#[derive(Debug)]
pub struct ClonedRepository {
    path: PathBuf,
}

impl ClonedRepository {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ClonedRepository {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to remove temporary clone");
            }
        }
    }
}

/// Shallow-clones `remote` into a fresh temporary directory
pub async fn shallow_clone(
    remote: &RemoteRepository,
    timeout: Duration,
) -> Result<ClonedRepository, RetrievalError> {
    let path = std::env::temp_dir().join(format!("dfdgen-{}", Uuid::new_v4()));
    let checkout = ClonedRepository { path };

    let mut command = Command::new("git");
    command
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg("--single-branch");
    if let Some(branch) = &remote.branch {
        command.arg("--branch").arg(branch);
    }
    command
        .arg(&remote.clone_url)
        .arg(checkout.path())
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    info!(url = %remote.clone_url, branch = ?remote.branch, "Cloning repository");

    let output = match tokio::time::timeout(timeout, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(RetrievalError::CloneFailed {
                url: remote.clone_url.clone(),
                message: format!("could not run git: {}", e),
            })
        }
        Err(_) => {
            return Err(RetrievalError::Timeout {
                url: remote.clone_url.clone(),
                seconds: timeout.as_secs(),
            })
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(RetrievalError::CloneFailed {
            url: remote.clone_url.clone(),
            message: if stderr.is_empty() {
                format!("git exited with {}", output.status)
            } else {
                stderr
            },
        });
    }

    debug!(path = %checkout.path().display(), "Clone completed");
    Ok(checkout)
}
