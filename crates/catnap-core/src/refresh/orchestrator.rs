//! One scan cycle: discover, scan with bounded fan-out, classify, merge.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::types::RepositoryRecord;
use crate::concurrency::{MAX_CONCURRENT_TASKS, run_bounded};
use crate::config::{CatnapConfig, CategoryIndex};
use crate::git::{GitMetadata, RepoScanner, ScanError, discover, expand_tilde, repo_name};
use crate::status::classify;

/// Scan every repository under the configured root.
///
/// At most [`MAX_CONCURRENT_TASKS`] repositories are scanned at once.
/// Repositories without a readable last commit are left out. Descriptions
/// come from `descriptions` only; nothing here talks to the network.
/// Record order follows scan completion and is not meaningful.
pub async fn collect_records(
    scanner: &RepoScanner,
    config: &CatnapConfig,
    index: &CategoryIndex,
    descriptions: &BTreeMap<String, String>,
    now: DateTime<Utc>,
) -> Result<Vec<RepositoryRecord>, ScanError> {
    let root = expand_tilde(&config.scan_path)?;
    let candidates = discover(&root)?;

    debug!(
        event = "core.refresh.scan_started",
        root = %root.display(),
        candidates = candidates.len()
    );

    let scanned: Vec<(PathBuf, Option<GitMetadata>)> =
        run_bounded(candidates, MAX_CONCURRENT_TASKS, |path| {
            let scanner = scanner.clone();
            async move {
                let meta = scanner.scan(&path).await;
                (path, meta)
            }
        })
        .await;

    let skipped = scanned.iter().filter(|(_, meta)| meta.is_none()).count();
    let records: Vec<RepositoryRecord> = scanned
        .into_iter()
        .filter_map(|(path, meta)| {
            let meta = meta?;
            let name = repo_name(&path);
            Some(RepositoryRecord {
                status: classify(meta.last_commit, now, config.active_days, config.stale_days),
                description: descriptions.get(&name).cloned(),
                category: index.category_for(&name).to_string(),
                owner: config.github_owner.clone(),
                last_commit: meta.last_commit,
                branch: meta.branch,
                is_dirty: meta.is_dirty,
                path,
                name,
            })
        })
        .collect();

    info!(
        event = "core.refresh.scan_completed",
        root = %root.display(),
        repos = records.len(),
        skipped = skipped
    );

    Ok(records)
}
