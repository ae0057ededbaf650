use crate::errors::CatnapError;
use crate::process::ProcessError;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Cannot expand '{path}': home directory not found")]
    HomeDirNotFound { path: String },

    #[error("Scan root is not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Repository has no commits: {path}")]
    NoCommits { path: String },

    #[error("Invalid commit timestamp '{value}': {message}")]
    InvalidTimestamp { value: String, message: String },

    #[error("Git query failed: {source}")]
    Process {
        #[from]
        source: ProcessError,
    },
}

impl CatnapError for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            ScanError::HomeDirNotFound { .. } => "SCAN_HOME_DIR_NOT_FOUND",
            ScanError::NotADirectory { .. } => "SCAN_ROOT_NOT_A_DIRECTORY",
            ScanError::NoCommits { .. } => "SCAN_NO_COMMITS",
            ScanError::InvalidTimestamp { .. } => "SCAN_INVALID_TIMESTAMP",
            ScanError::Process { .. } => "SCAN_PROCESS_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, ScanError::NotADirectory { .. })
    }
}
