//! The state container driving refresh cycles, enrichment and polling.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use chrono::{TimeDelta, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::errors::RefreshError;
use super::orchestrator::collect_records;
use super::snapshot::SnapshotStore;
use super::types::{CategoryGroup, Snapshot};
use crate::cache::{DescriptionFetcher, RemoteMetadataCache, default_cache_ttl};
use crate::concurrency::MAX_CONCURRENT_TASKS;
use crate::config::{CatnapConfig, CategoryIndex, load_config, save_config};
use crate::git::{GitCli, RepoScanner};
use crate::process::{LimitedRunner, ProcessRunner, Toolchain};
use crate::storage::CatnapPaths;

/// A configuration together with its precomputed category index.
struct ConfigState {
    config: CatnapConfig,
    index: CategoryIndex,
}

impl ConfigState {
    fn new(config: CatnapConfig) -> Self {
        let index = config.category_index();
        Self { config, index }
    }
}

struct Poller {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

struct EngineInner {
    paths: CatnapPaths,
    config: ArcSwap<ConfigState>,
    descriptions: ArcSwap<BTreeMap<String, String>>,
    snapshots: SnapshotStore,
    scanner: RepoScanner,
    cache: RemoteMetadataCache,
    cache_ttl: TimeDelta,
    /// Serializes enrichment passes, the only writers of the cache file.
    cache_writer: tokio::sync::Mutex<()>,
    /// Serializes read-modify-write of the configuration and its file.
    config_writer: Mutex<()>,
    expanded: AtomicBool,
    refreshes_running: AtomicUsize,
    /// Identity of the current poll loop. Bumped on every start and stop.
    epoch: AtomicU64,
    poller: Mutex<Option<Poller>>,
}

/// Owns the repository snapshot and everything that produces it.
///
/// Readers get immutable [`Snapshot`]s through [`RefreshEngine::current`] or
/// [`RefreshEngine::subscribe`]. Dropping the engine stops its poll loop.
pub struct RefreshEngine {
    inner: Arc<EngineInner>,
}

impl RefreshEngine {
    /// Build an engine over the files in `paths`.
    ///
    /// Loads the configuration and the cached descriptions. Every process
    /// `runner` executes goes through a limiter of [`MAX_CONCURRENT_TASKS`]
    /// permits.
    pub fn new(paths: CatnapPaths, runner: Arc<dyn ProcessRunner>, toolchain: Toolchain) -> Self {
        let runner: Arc<dyn ProcessRunner> =
            Arc::new(LimitedRunner::new(runner, MAX_CONCURRENT_TASKS));

        let config = load_config(&paths.config_file());
        let scanner = RepoScanner::new(GitCli::new(toolchain.git, runner.clone()));
        let cache = RemoteMetadataCache::new(
            paths.cache_file(),
            DescriptionFetcher::new(toolchain.gh, runner),
        );
        let descriptions = cache.descriptions();

        info!(
            event = "core.engine.created",
            config_dir = %paths.dir().display(),
            scan_path = %config.scan_path,
            cached_descriptions = descriptions.len()
        );

        Self {
            inner: Arc::new(EngineInner {
                paths,
                config: ArcSwap::from_pointee(ConfigState::new(config)),
                descriptions: ArcSwap::from_pointee(descriptions),
                snapshots: SnapshotStore::new(),
                scanner,
                cache,
                cache_ttl: default_cache_ttl(),
                cache_writer: tokio::sync::Mutex::new(()),
                config_writer: Mutex::new(()),
                expanded: AtomicBool::new(false),
                refreshes_running: AtomicUsize::new(0),
                epoch: AtomicU64::new(0),
                poller: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> CatnapConfig {
        self.inner.config.load().config.clone()
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.inner.snapshots.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.inner.snapshots.subscribe()
    }

    /// Descriptions known in memory, keyed by repository name.
    pub fn descriptions(&self) -> Arc<BTreeMap<String, String>> {
        self.inner.descriptions.load_full()
    }

    /// The current snapshot grouped under the current configuration.
    pub fn grouped(&self) -> Vec<CategoryGroup> {
        self.current().grouped(&self.inner.config.load().config)
    }

    pub fn is_loading(&self) -> bool {
        self.inner.refreshes_running.load(Ordering::SeqCst) > 0
    }

    /// Whether poll cycles also refresh remote descriptions.
    pub fn set_expanded(&self, expanded: bool) {
        self.inner.expanded.store(expanded, Ordering::SeqCst);
    }

    /// Run one scan cycle and publish its snapshot.
    ///
    /// When discovery fails the error is returned and the previous snapshot
    /// stays published.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, RefreshError> {
        let published = self.inner.refresh_cycle(None).await?;
        Ok(published.unwrap_or_else(|| self.current()))
    }

    /// Refresh stale remote descriptions for the repositories in the current
    /// snapshot and publish the snapshot with them patched in.
    pub async fn enrich_descriptions(&self) -> Arc<Snapshot> {
        self.inner
            .enrich_cycle(None)
            .await
            .unwrap_or_else(|| self.current())
    }

    /// Start the poll loop, superseding any running one.
    ///
    /// The new loop yields, then waits for the superseded loop to finish
    /// before its first refresh. A superseded loop never publishes.
    pub fn start_polling(&self) {
        let mut slot = self
            .inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = slot.take();
        if let Some(previous) = &previous {
            previous.token.cancel();
        }

        let token = CancellationToken::new();
        let inner = self.inner.clone();
        let loop_token = token.clone();
        let handle = tokio::spawn(async move {
            tokio::task::yield_now().await;
            if let Some(previous) = previous
                && let Err(e) = previous.handle.await
            {
                warn!(event = "core.poll.previous_loop_failed", error = %e);
            }
            inner.poll_loop(epoch, loop_token).await;
        });

        info!(event = "core.poll.started", epoch = epoch);
        *slot = Some(Poller { token, handle });
    }

    /// Stop scheduling poll cycles. In-flight work finishes but is not published.
    pub fn stop_polling(&self) {
        if let Some(poller) = self.inner.stop_poller() {
            drop(poller.handle);
        }
    }

    /// Stop polling and wait for the loop to exit.
    pub async fn shutdown(&self) {
        if let Some(poller) = self.inner.stop_poller()
            && let Err(e) = poller.handle.await
        {
            warn!(event = "core.poll.loop_join_failed", error = %e);
        }
    }

    pub fn is_polling(&self) -> bool {
        self.inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Collapse or expand a category section and save the configuration.
    pub fn toggle_section(&self, section: &str) -> CatnapConfig {
        let _writer = self
            .inner
            .config_writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let updated = self.inner.config.load().config.toggle_section(section);
        self.inner.persist_config(&updated);
        self.inner
            .config
            .store(Arc::new(ConfigState::new(updated.clone())));
        updated
    }

    /// Replace the configuration.
    ///
    /// Invalid configurations are rejected and change nothing. A running
    /// poll loop is restarted so a new interval takes effect.
    pub fn update_config(&self, config: CatnapConfig) -> Result<(), RefreshError> {
        config.validate()?;
        {
            let _writer = self
                .inner
                .config_writer
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            self.inner.persist_config(&config);
            self.inner.config.store(Arc::new(ConfigState::new(config)));
        }

        if self.is_polling() {
            self.start_polling();
        }
        Ok(())
    }
}

impl Drop for RefreshEngine {
    fn drop(&mut self) {
        self.inner.stop_poller();
    }
}

/// Counts a refresh as running for as long as it is alive.
struct RunningGuard<'a>(&'a AtomicUsize);

impl<'a> RunningGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl EngineInner {
    /// `None` is a direct call and may always publish.
    fn may_publish(&self, epoch: Option<u64>) -> bool {
        epoch.is_none_or(|epoch| self.epoch.load(Ordering::SeqCst) == epoch)
    }

    fn stop_poller(&self) -> Option<Poller> {
        let mut slot = self.poller.lock().unwrap_or_else(PoisonError::into_inner);
        let poller = slot.take()?;
        poller.token.cancel();
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        info!(event = "core.poll.stopped", epoch = epoch);
        Some(poller)
    }

    fn persist_config(&self, config: &CatnapConfig) {
        if let Err(e) = save_config(&self.paths.config_file(), config) {
            warn!(
                event = "core.config.save_failed",
                path = %self.paths.config_file().display(),
                error = %e
            );
        }
    }

    async fn refresh_cycle(
        &self,
        epoch: Option<u64>,
    ) -> Result<Option<Arc<Snapshot>>, RefreshError> {
        let _running = RunningGuard::enter(&self.refreshes_running);
        let state = self.config.load_full();
        let descriptions = self.descriptions.load_full();
        let now = Utc::now();

        let records =
            match collect_records(&self.scanner, &state.config, &state.index, &descriptions, now)
                .await
            {
                Ok(records) => records,
                Err(e) => {
                    error!(
                        event = "core.refresh.cycle_failed",
                        scan_path = %state.config.scan_path,
                        error = %e
                    );
                    return Err(e.into());
                }
            };

        let published = self
            .snapshots
            .publish_if(|| self.may_publish(epoch), records, now);
        match &published {
            Some(snapshot) => info!(
                event = "core.refresh.published",
                generation = snapshot.generation,
                repos = snapshot.repos.len()
            ),
            None => warn!(event = "core.refresh.superseded", epoch = ?epoch),
        }
        Ok(published)
    }

    async fn enrich_cycle(&self, epoch: Option<u64>) -> Option<Arc<Snapshot>> {
        let owner = self.config.load().config.github_owner.trim().to_string();
        if owner.is_empty() {
            debug!(event = "core.enrich.skipped", reason = "no owner configured");
            return None;
        }

        let names = self.snapshots.current().names();
        if names.is_empty() {
            return None;
        }

        let _writer = self.cache_writer.lock().await;
        let descriptions = self
            .cache
            .refresh_stale(&names, &owner, self.cache_ttl, Utc::now())
            .await;
        self.descriptions.store(Arc::new(descriptions.clone()));

        let published = self
            .snapshots
            .patch_descriptions_if(|| self.may_publish(epoch), &descriptions);
        if published.is_none() {
            warn!(event = "core.enrich.superseded", epoch = ?epoch);
        }
        published
    }

    async fn poll_loop(&self, epoch: u64, token: CancellationToken) {
        debug!(event = "core.poll.loop_entered", epoch = epoch);

        while !token.is_cancelled() {
            // Failures are logged by the cycle; the loop keeps going.
            let _ = self.refresh_cycle(Some(epoch)).await;

            if self.expanded.load(Ordering::SeqCst) && !token.is_cancelled() {
                self.enrich_cycle(Some(epoch)).await;
            }

            let interval = self.config.load().config.refresh_interval();
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        debug!(event = "core.poll.loop_exited", epoch = epoch);
    }
}
