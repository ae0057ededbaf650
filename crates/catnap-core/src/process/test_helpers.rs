//! Scripted process runner for tests.

use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::errors::ProcessError;
use super::runner::ProcessRunner;

type Responder = dyn Fn(&[&str], Option<&Path>) -> Result<String, ProcessError> + Send + Sync;

/// Answers invocations from a closure and records how they were made.
///
/// Tracks the number of concurrently outstanding calls so tests can assert
/// concurrency bounds.
pub struct ScriptedRunner {
    responder: Box<Responder>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new(
        responder: impl Fn(&[&str], Option<&Path>) -> Result<String, ProcessError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of recorded calls whose first argument equals `subcommand`.
    pub fn calls_to(&self, subcommand: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|args| args.first().is_some_and(|a| a == subcommand))
            .count()
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

/// Builds the failure a process returns when it exits with status 1.
pub fn exit_failure(stderr: &str) -> ProcessError {
    ProcessError::NonZeroExit {
        program: "scripted".to_string(),
        code: 1,
        stderr: stderr.to_string(),
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(
        &self,
        _program: &Path,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<String, ProcessError> {
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push(args.iter().map(|a| a.to_string()).collect());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        let result = (self.responder)(args, working_dir);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
