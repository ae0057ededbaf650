//! # Refresh
//!
//! Turns the scan root into published [`Snapshot`]s.
//!
//! A cycle discovers repositories, scans them with bounded fan-out, classifies
//! each one and merges in category and cached description. The
//! [`RefreshEngine`] owns the current snapshot, the optional enrichment pass
//! against the remote metadata cache, and the cancellable poll loop.

pub mod engine;
pub mod errors;
pub mod orchestrator;
pub mod snapshot;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use engine::RefreshEngine;
pub use errors::RefreshError;
pub use orchestrator::collect_records;
pub use snapshot::SnapshotStore;
pub use types::{CategoryGroup, RepositoryRecord, Snapshot, StatusCounts, age_label};
