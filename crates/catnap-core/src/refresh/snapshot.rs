//! Single-writer, multi-reader cell holding the latest snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::types::{RepositoryRecord, Snapshot};

/// Publishes whole snapshots; readers never see a partial one.
pub struct SnapshotStore {
    tx: watch::Sender<Arc<Snapshot>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Snapshot::empty()));
        Self { tx }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }

    /// Replace the snapshot with `repos` unless `allowed` says otherwise.
    ///
    /// `allowed` is evaluated while holding the write side, so a publisher
    /// that has been superseded cannot interleave with its successor.
    /// Returns the published snapshot.
    pub fn publish_if(
        &self,
        allowed: impl FnOnce() -> bool,
        repos: Vec<RepositoryRecord>,
        refreshed_at: DateTime<Utc>,
    ) -> Option<Arc<Snapshot>> {
        let mut published = None;
        self.tx.send_if_modified(|slot| {
            if !allowed() {
                return false;
            }
            let next = Arc::new(Snapshot {
                generation: slot.generation + 1,
                refreshed_at: Some(refreshed_at),
                repos,
            });
            *slot = next.clone();
            published = Some(next);
            true
        });
        published
    }

    /// Re-publish the current snapshot with `descriptions` patched in.
    ///
    /// The generation is kept: the repositories are the same cycle's.
    pub fn patch_descriptions_if(
        &self,
        allowed: impl FnOnce() -> bool,
        descriptions: &BTreeMap<String, String>,
    ) -> Option<Arc<Snapshot>> {
        let mut published = None;
        self.tx.send_if_modified(|slot| {
            if !allowed() {
                return false;
            }
            let next = Arc::new(slot.with_descriptions(descriptions));
            *slot = next.clone();
            published = Some(next);
            true
        });
        published
    }
}
