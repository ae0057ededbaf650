//! Finding candidate repositories under the scan root.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::errors::ScanError;

/// Name of the marker that makes a directory a repository.
pub const VCS_MARKER: &str = ".git";

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> Result<PathBuf, ScanError> {
    let rest = if path == "~" {
        ""
    } else if let Some(rest) = path.strip_prefix("~/") {
        rest
    } else {
        return Ok(PathBuf::from(path));
    };

    let home = dirs::home_dir().ok_or_else(|| ScanError::HomeDirNotFound {
        path: path.to_string(),
    })?;
    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

/// List the direct children of `root` that contain a `.git` marker, sorted.
///
/// A missing or unreadable root yields an empty list. A root that exists but
/// is not a directory is an error. The marker may be a directory or a
/// gitlink file (worktrees, submodules).
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if root.exists() && !root.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.display().to_string(),
        });
    }

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(
                event = "core.scan.root_unreadable",
                root = %root.display(),
                error = %e
            );
            return Ok(Vec::new());
        }
    };

    let mut repos: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!(
                    event = "core.scan.dir_entry_failed",
                    root = %root.display(),
                    error = %e
                );
                None
            }
        })
        .filter(|path| path.is_dir() && path.join(VCS_MARKER).exists())
        .collect();

    repos.sort();

    debug!(
        event = "core.scan.discover_completed",
        root = %root.display(),
        count = repos.len()
    );

    Ok(repos)
}

/// Repository name for a discovered path: its final component.
pub fn repo_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
