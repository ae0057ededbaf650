pub mod cli;
pub mod discovery;
pub mod errors;
pub mod scanner;
pub mod types;

// Re-export commonly used types and functions
pub use cli::GitCli;
pub use discovery::{discover, expand_tilde, repo_name};
pub use errors::ScanError;
pub use scanner::RepoScanner;
pub use types::{GitMetadata, UNKNOWN_BRANCH};
