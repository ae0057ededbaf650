//! catnap-core: Core library for the catnap repository-health monitor
//!
//! This library scans a directory of git repositories, classifies each one by
//! the age of its last commit, enriches them with GitHub descriptions from a
//! disk cache, and publishes the result as immutable snapshots. It is used by
//! the `catnap` CLI.
//!
//! # Main Entry Points
//!
//! - [`refresh`] - Refresh cycles, snapshots and the poll loop
//! - [`git`] - Repository discovery and per-repository queries
//! - [`cache`] - Remote description cache with TTL refresh
//! - [`config`] - Configuration management
//! - [`status`] - Active / In Progress / Stale classification

pub mod cache;
pub mod concurrency;
pub mod config;
pub mod errors;
pub mod events;
pub mod git;
pub mod logging;
pub mod process;
pub mod refresh;
pub mod status;
pub mod storage;

// Re-export commonly used types at crate root for convenience
pub use cache::{CacheEntry, RemoteMetadataCache};
pub use config::CatnapConfig;
pub use errors::{CatnapError, ConfigError};
pub use process::{CommandRunner, ProcessError, ProcessRunner, Toolchain};
pub use refresh::{
    CategoryGroup, RefreshEngine, RefreshError, RepositoryRecord, Snapshot, StatusCounts,
};
pub use status::{RepoStatus, classify};
pub use storage::CatnapPaths;

// Re-export logging initialization
pub use logging::init_logging;
