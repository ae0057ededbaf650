use chrono::{DateTime, Utc};

/// Branch name reported when the current branch cannot be determined.
pub const UNKNOWN_BRANCH: &str = "unknown";

/// Metadata extracted from a single repository by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitMetadata {
    pub last_commit: DateTime<Utc>,
    pub branch: String,
    pub is_dirty: bool,
}
