//! Remote description lookups through the `gh` CLI.

use std::path::PathBuf;
use std::sync::Arc;

use crate::process::{ProcessError, ProcessRunner, validate_arg};

/// Fetches a repository's description with `gh repo view`.
#[derive(Clone)]
pub struct DescriptionFetcher {
    gh: PathBuf,
    runner: Arc<dyn ProcessRunner>,
}

impl DescriptionFetcher {
    pub fn new(gh: PathBuf, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { gh, runner }
    }

    /// Description of `owner/repo`, or `None` when the repository has none.
    pub async fn fetch(&self, owner: &str, repo: &str) -> Result<Option<String>, ProcessError> {
        validate_arg(owner, "owner")?;
        validate_arg(repo, "repository")?;

        let slug = format!("{owner}/{repo}");
        let output = self
            .runner
            .run(
                &self.gh,
                &[
                    "repo",
                    "view",
                    slug.as_str(),
                    "--json",
                    "description",
                    "-q",
                    ".description",
                ],
                None,
            )
            .await?;

        Ok((!output.is_empty()).then_some(output))
    }
}
