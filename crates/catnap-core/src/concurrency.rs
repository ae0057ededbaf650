//! Bounded fan-out of independent async tasks.
//!
//! Admission is block-until-slot: a permit is acquired before each task is
//! spawned, so no more than `limit` tasks exist at once and the next item is
//! only admitted after an outstanding task completes. Results come back in
//! completion order.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

/// Maximum number of per-repository scans or remote lookups in flight.
pub const MAX_CONCURRENT_TASKS: usize = 8;

/// Run `task` for every item with at most `limit` tasks outstanding.
///
/// Waits for every admitted task before returning. A task that panics is
/// logged and contributes no result.
pub async fn run_bounded<I, F, Fut, T>(items: I, limit: usize, mut task: F) -> Vec<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let permits = Arc::new(Semaphore::new(limit.max(1)));
    let mut tasks = JoinSet::new();

    for item in items {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let fut = task(item);
        tasks.spawn(async move {
            let _permit = permit;
            fut.await
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(value) => results.push(value),
            Err(e) => {
                error!(
                    event = "core.concurrency.task_failed",
                    error = %e
                );
            }
        }
    }
    results
}
