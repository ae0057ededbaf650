use crate::errors::{CatnapError, ConfigError};
use crate::git::ScanError;

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Refresh aborted: {source}")]
    Scan {
        #[from]
        source: ScanError,
    },

    #[error("Configuration rejected: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}

impl CatnapError for RefreshError {
    fn error_code(&self) -> &'static str {
        match self {
            RefreshError::Scan { source } => source.error_code(),
            RefreshError::Config { source } => source.error_code(),
        }
    }

    fn is_user_error(&self) -> bool {
        match self {
            RefreshError::Scan { source } => source.is_user_error(),
            RefreshError::Config { source } => source.is_user_error(),
        }
    }
}
