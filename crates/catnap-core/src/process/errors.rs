use std::time::Duration;

use crate::errors::CatnapError;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to execute '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with code {code}: {stderr}")]
    NonZeroExit {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("'{program}' did not finish within {}s", timeout.as_secs_f64())]
    TimedOut { program: String, timeout: Duration },

    #[error("Invalid {label}: {message}")]
    InvalidArgument { label: String, message: String },

    #[error("Process limiter was closed")]
    LimiterClosed,
}

impl CatnapError for ProcessError {
    fn error_code(&self) -> &'static str {
        match self {
            ProcessError::SpawnFailed { .. } => "PROCESS_SPAWN_FAILED",
            ProcessError::NonZeroExit { .. } => "PROCESS_NON_ZERO_EXIT",
            ProcessError::TimedOut { .. } => "PROCESS_TIMED_OUT",
            ProcessError::InvalidArgument { .. } => "PROCESS_INVALID_ARGUMENT",
            ProcessError::LimiterClosed => "PROCESS_LIMITER_CLOSED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ProcessError::InvalidArgument { .. })
    }
}
