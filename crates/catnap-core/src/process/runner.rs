//! Asynchronous external process invocation.
//!
//! Every git and gh query goes through [`ProcessRunner`]. The production
//! implementation is [`CommandRunner`]; [`LimitedRunner`] wraps any runner to
//! cap how many invocations are outstanding at once.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::errors::ProcessError;

/// Default upper bound on how long a single subprocess may run.
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs an external executable and returns its trimmed stdout.
///
/// Implementations never retry. The caller passes an absolute program path;
/// no shell or PATH lookup happens at this layer.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(
        &self,
        program: &Path,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<String, ProcessError>;
}

#[async_trait]
impl<T: ProcessRunner + ?Sized> ProcessRunner for Arc<T> {
    async fn run(
        &self,
        program: &Path,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<String, ProcessError> {
        (**self).run(program, args, working_dir).await
    }
}

/// Runs processes with `tokio::process`, killing any child that outlives the timeout.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Duration,
}

impl CommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_PROCESS_TIMEOUT)
    }
}

#[async_trait]
impl ProcessRunner for CommandRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<String, ProcessError> {
        let program_name = program.display().to_string();

        let mut command = Command::new(program);
        command.args(args).stdin(Stdio::null()).kill_on_drop(true);
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }

        debug!(
            event = "core.process.run_started",
            program = %program_name,
            args = ?args,
            working_dir = ?working_dir
        );

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|source| ProcessError::SpawnFailed {
                program: program_name.clone(),
                source,
            })?,
            Err(_) => {
                warn!(
                    event = "core.process.run_timed_out",
                    program = %program_name,
                    args = ?args,
                    timeout_ms = self.timeout.as_millis() as u64
                );
                return Err(ProcessError::TimedOut {
                    program: program_name,
                    timeout: self.timeout,
                });
            }
        };

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }

        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!(
            event = "core.process.run_failed",
            program = %program_name,
            code = code,
            stderr = %stderr
        );
        Err(ProcessError::NonZeroExit {
            program: program_name,
            code,
            stderr,
        })
    }
}

/// Admits at most `max_in_flight` concurrent invocations of the wrapped runner.
///
/// Callers past the limit wait for a permit; nothing is queued or dropped.
pub struct LimitedRunner<R> {
    inner: R,
    permits: Semaphore,
}

impl<R: ProcessRunner> LimitedRunner<R> {
    pub fn new(inner: R, max_in_flight: usize) -> Self {
        Self {
            inner,
            permits: Semaphore::new(max_in_flight.max(1)),
        }
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

#[async_trait]
impl<R: ProcessRunner> ProcessRunner for LimitedRunner<R> {
    async fn run(
        &self,
        program: &Path,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<String, ProcessError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ProcessError::LimiterClosed)?;
        self.inner.run(program, args, working_dir).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::process::test_helpers::ScriptedRunner;
    use std::path::PathBuf;

    fn sh() -> PathBuf {
        which::which("sh").unwrap_or_else(|_| PathBuf::from("/bin/sh"))
    }

    #[tokio::test]
    async fn test_command_runner_returns_trimmed_stdout() {
        let runner = CommandRunner::default();
        let output = runner
            .run(&sh(), &["-c", "printf '  hello\\n\\n'"], None)
            .await
            .unwrap();
        assert_eq!(output, "hello");
    }

    #[tokio::test]
    async fn test_command_runner_uses_working_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let runner = CommandRunner::default();
        let output = runner
            .run(&sh(), &["-c", "pwd"], Some(temp_dir.path()))
            .await
            .unwrap();
        let expected = temp_dir.path().canonicalize().unwrap();
        assert_eq!(PathBuf::from(output).canonicalize().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_command_runner_non_zero_exit_carries_stderr() {
        let runner = CommandRunner::default();
        let err = runner
            .run(&sh(), &["-c", "echo boom >&2; exit 3"], None)
            .await
            .unwrap_err();
        match err {
            ProcessError::NonZeroExit { code, stderr, .. } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected NonZeroExit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_command_runner_missing_binary_is_spawn_failure() {
        let runner = CommandRunner::default();
        let err = runner
            .run(Path::new("/nonexistent/catnap-test-binary"), &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::SpawnFailed { .. }));
    }

    #[tokio::test]
    async fn test_command_runner_times_out() {
        let runner = CommandRunner::new(Duration::from_millis(100));
        let err = runner
            .run(&sh(), &["-c", "sleep 5"], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::TimedOut { .. }));
    }

    #[tokio::test]
    async fn test_limited_runner_caps_in_flight_invocations() {
        let scripted = Arc::new(
            ScriptedRunner::new(|_, _| Ok("ok".to_string())).with_delay(Duration::from_millis(20)),
        );
        let limited = Arc::new(LimitedRunner::new(scripted.clone(), 3));

        let mut handles = Vec::new();
        for _ in 0..12 {
            let limited = limited.clone();
            handles.push(tokio::spawn(async move {
                limited.run(Path::new("/usr/bin/true"), &[], None).await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "ok");
        }

        assert_eq!(scripted.call_count(), 12);
        assert!(scripted.max_in_flight() <= 3);
        assert_eq!(limited.available_permits(), 3);
    }

    #[test]
    fn test_limited_runner_never_has_zero_permits() {
        let limited = LimitedRunner::new(CommandRunner::default(), 0);
        assert_eq!(limited.available_permits(), 1);
    }
}
