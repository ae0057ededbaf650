//! Per-repository metadata extraction.

use std::path::Path;

use tracing::{debug, warn};

use super::cli::GitCli;
use super::types::{GitMetadata, UNKNOWN_BRANCH};

/// Extracts [`GitMetadata`] from one repository at a time.
#[derive(Clone)]
pub struct RepoScanner {
    git: GitCli,
}

impl RepoScanner {
    pub fn new(git: GitCli) -> Self {
        Self { git }
    }

    /// Scan one repository.
    ///
    /// The three git queries run concurrently. Returns `None` when the last
    /// commit cannot be determined; a failed branch query becomes
    /// `"unknown"` and a failed status query counts as clean.
    pub async fn scan(&self, repo: &Path) -> Option<GitMetadata> {
        let (last_commit, branch, dirty) = tokio::join!(
            self.git.last_commit_time(repo),
            self.git.current_branch(repo),
            self.git.has_uncommitted_changes(repo),
        );

        let last_commit = match last_commit {
            Ok(time) => time,
            Err(e) => {
                debug!(
                    event = "core.scan.repo_skipped",
                    path = %repo.display(),
                    error = %e
                );
                return None;
            }
        };

        let branch = match branch {
            Ok(branch) if !branch.is_empty() => branch,
            Ok(_) => UNKNOWN_BRANCH.to_string(),
            Err(e) => {
                warn!(
                    event = "core.scan.branch_failed",
                    path = %repo.display(),
                    error = %e
                );
                UNKNOWN_BRANCH.to_string()
            }
        };

        let is_dirty = dirty.unwrap_or_else(|e| {
            warn!(
                event = "core.scan.status_failed",
                path = %repo.display(),
                error = %e
            );
            false
        });

        Some(GitMetadata {
            last_commit,
            branch,
            is_dirty,
        })
    }
}
