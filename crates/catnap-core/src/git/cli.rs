//! Read-only git queries issued through the process runner.
//!
//! Each query runs `git` with the repository as working directory and maps
//! its output to a typed value. Degrading failures to defaults is the
//! scanner's job, not this module's.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::errors::ScanError;
use crate::process::ProcessRunner;

#[derive(Clone)]
pub struct GitCli {
    git: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl GitCli {
    pub fn new(git: PathBuf, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { git, runner }
    }

    /// Author date of `HEAD`, from `git log -1 --format=%aI`.
    pub async fn last_commit_time(&self, repo: &Path) -> Result<DateTime<Utc>, ScanError> {
        let output = self
            .runner
            .run(&self.git, &["log", "-1", "--format=%aI"], Some(repo))
            .await?;
        if output.is_empty() {
            return Err(ScanError::NoCommits {
                path: repo.display().to_string(),
            });
        }
        parse_commit_timestamp(&output)
    }

    /// Short name of the checked-out branch, from `git rev-parse --abbrev-ref HEAD`.
    pub async fn current_branch(&self, repo: &Path) -> Result<String, ScanError> {
        let output = self
            .runner
            .run(&self.git, &["rev-parse", "--abbrev-ref", "HEAD"], Some(repo))
            .await?;
        Ok(output)
    }

    /// Whether `git status --porcelain` reports anything.
    pub async fn has_uncommitted_changes(&self, repo: &Path) -> Result<bool, ScanError> {
        let output = self
            .runner
            .run(&self.git, &["status", "--porcelain"], Some(repo))
            .await?;
        Ok(!output.is_empty())
    }
}

/// Parse git's strict ISO-8601 author date (`%aI`) into UTC.
pub fn parse_commit_timestamp(value: &str) -> Result<DateTime<Utc>, ScanError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ScanError::InvalidTimestamp {
            value: value.to_string(),
            message: e.to_string(),
        })
}
