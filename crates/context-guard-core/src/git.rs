//! Read-only git queries for the session-start banner.
//!
//! Each query is bounded by its own timeout and fails independently;
//! [`RepoContext::gather`] turns failures into absent fields.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::GitError;

pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Number of history entries shown in the banner.
pub const RECENT_COMMIT_LIMIT: usize = 3;

/// Snapshot of repository state, used for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoContext {
    pub branch: Option<String>,
    pub uncommitted_count: usize,
    pub recent_commits: Option<String>,
}

impl RepoContext {
    /// Run the three queries in `dir`, one after another.
    ///
    /// A failed query leaves its field at the default. Outside a repository
    /// this yields `RepoContext::default()`.
    pub async fn gather(dir: &Path, timeout: Duration) -> Self {
        let branch = current_branch(dir, timeout)
            .await
            .map_err(|e| debug!(error = %e, "branch unavailable"))
            .ok();
        let uncommitted_count = uncommitted_count(dir, timeout)
            .await
            .map_err(|e| debug!(error = %e, "status unavailable"))
            .unwrap_or(0);
        let recent_commits = recent_commits(dir, RECENT_COMMIT_LIMIT, timeout)
            .await
            .map_err(|e| debug!(error = %e, "history unavailable"))
            .ok();

        Self {
            branch,
            uncommitted_count,
            recent_commits,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.branch.is_none() && self.uncommitted_count == 0 && self.recent_commits.is_none()
    }
}

/// Current branch name via `git rev-parse --abbrev-ref HEAD`.
pub async fn current_branch(dir: &Path, timeout: Duration) -> Result<String, GitError> {
    let out = run_git(dir, &["rev-parse", "--abbrev-ref", "HEAD"], timeout).await?;
    non_empty("rev-parse", out)
}

/// Number of changed paths via `git status --porcelain`.
pub async fn uncommitted_count(dir: &Path, timeout: Duration) -> Result<usize, GitError> {
    let out = run_git(dir, &["status", "--porcelain"], timeout).await?;
    Ok(out.lines().filter(|l| !l.trim().is_empty()).count())
}

/// Last `limit` commits via `git log --oneline`.
pub async fn recent_commits(
    dir: &Path,
    limit: usize,
    timeout: Duration,
) -> Result<String, GitError> {
    let limit = format!("-{limit}");
    let out = run_git(dir, &["log", "--oneline", &limit], timeout).await?;
    non_empty("log", out)
}

async fn run_git(dir: &Path, args: &[&str], timeout: Duration) -> Result<String, GitError> {
    let command = args.first().copied().unwrap_or_default().to_string();

    let child = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| GitError::Timeout {
            command: command.clone(),
            timeout,
        })??;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(GitError::CommandFailed { command, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn non_empty(command: &str, out: String) -> Result<String, GitError> {
    let trimmed = out.trim();
    if trimmed.is_empty() {
        return Err(GitError::EmptyOutput {
            command: command.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
