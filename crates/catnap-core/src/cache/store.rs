//! The on-disk remote metadata cache and its TTL-driven refresh.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, warn};

use super::errors::CacheError;
use super::persistence::{load_cache, save_cache};
use super::remote::DescriptionFetcher;
use super::types::{CacheEntries, CacheEntry, descriptions, merge_entry};
use crate::concurrency::{MAX_CONCURRENT_TASKS, run_bounded};

/// Remote descriptions persisted in `gh-cache.json`.
///
/// Entries are only ever added or superseded, never removed, so a
/// description fetched once survives later failed lookups.
pub struct RemoteMetadataCache {
    path: PathBuf,
    fetcher: DescriptionFetcher,
    max_concurrent: usize,
}

impl RemoteMetadataCache {
    pub fn new(path: PathBuf, fetcher: DescriptionFetcher) -> Self {
        Self {
            path,
            fetcher,
            max_concurrent: MAX_CONCURRENT_TASKS,
        }
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_all(&self) -> CacheEntries {
        load_cache(&self.path)
    }

    /// Cached descriptions without any lookup.
    pub fn descriptions(&self) -> BTreeMap<String, String> {
        descriptions(&self.load_all())
    }

    pub fn persist(&self, entries: &CacheEntries) -> Result<(), CacheError> {
        save_cache(&self.path, entries)
    }

    /// Re-fetch the descriptions of `names` that are missing or older than `ttl`.
    ///
    /// Fresh entries cause no lookup. Lookups run with at most
    /// `max_concurrent` in flight; their results are merged here, in one
    /// place, stamped with `now`. A failed or empty lookup leaves the
    /// existing entry as it was. The merged cache is persisted in one write
    /// (a failed write is logged and ignored) and every cached description
    /// is returned.
    pub async fn refresh_stale(
        &self,
        names: &[String],
        owner: &str,
        ttl: TimeDelta,
        now: DateTime<Utc>,
    ) -> BTreeMap<String, String> {
        let mut entries = self.load_all();

        let mut seen = HashSet::new();
        let stale: Vec<String> = names
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .filter(|name| {
                entries
                    .get(name.as_str())
                    .is_none_or(|entry| !entry.is_fresh(now, ttl))
            })
            .cloned()
            .collect();

        info!(
            event = "core.cache.refresh_started",
            requested = names.len(),
            stale = stale.len(),
            owner = owner
        );

        let fetcher = self.fetcher.clone();
        let owner_owned = owner.to_string();
        let results = run_bounded(stale, self.max_concurrent, |name| {
            let fetcher = fetcher.clone();
            let owner = owner_owned.clone();
            async move {
                let result = fetcher.fetch(&owner, &name).await;
                (name, result)
            }
        })
        .await;

        let mut fetched = 0usize;
        let mut failed = 0usize;
        for (name, result) in results {
            match result {
                Ok(Some(description)) => {
                    merge_entry(&mut entries, name, CacheEntry::new(description, now));
                    fetched += 1;
                }
                Ok(None) => {
                    debug!(event = "core.cache.description_empty", repo = %name);
                    failed += 1;
                }
                Err(e) => {
                    warn!(
                        event = "core.cache.fetch_failed",
                        repo = %name,
                        error = %e
                    );
                    failed += 1;
                }
            }
        }

        if let Err(e) = self.persist(&entries) {
            warn!(
                event = "core.cache.save_failed",
                path = %self.path.display(),
                error = %e
            );
        }

        info!(
            event = "core.cache.refresh_completed",
            fetched = fetched,
            failed = failed,
            total = entries.len()
        );

        descriptions(&entries)
    }
}
