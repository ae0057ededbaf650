//! Absolute-path resolution for the external tools catnap shells out to.

use std::path::PathBuf;

use tracing::{debug, warn};

/// Install locations tried when `git` is not on PATH.
pub const GIT_FALLBACKS: &[&str] = &["/usr/bin/git", "/opt/homebrew/bin/git", "/usr/local/bin/git"];

/// Install locations tried when `gh` is not on PATH.
pub const GH_FALLBACKS: &[&str] = &["/opt/homebrew/bin/gh", "/usr/local/bin/gh", "/usr/bin/gh"];

/// Resolve `name` to an absolute path.
///
/// Looks the name up on PATH first, then tries each fallback that exists as a
/// file. When nothing is found, the first fallback (or the bare name) is
/// returned so the eventual invocation fails with a spawn error that names it.
pub fn resolve_executable(name: &str, fallbacks: &[&str]) -> PathBuf {
    match which::which(name) {
        Ok(path) => {
            debug!(
                event = "core.process.executable_resolved",
                name = name,
                path = %path.display()
            );
            path
        }
        Err(e) => {
            if let Some(found) = fallbacks.iter().map(PathBuf::from).find(|p| p.is_file()) {
                debug!(
                    event = "core.process.executable_fallback_used",
                    name = name,
                    path = %found.display()
                );
                return found;
            }
            warn!(
                event = "core.process.executable_not_found",
                name = name,
                error = %e
            );
            fallbacks
                .first()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(name))
        }
    }
}

/// Resolved locations of the git and gh binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub git: PathBuf,
    pub gh: PathBuf,
}

impl Toolchain {
    pub fn detect() -> Self {
        Self {
            git: resolve_executable("git", GIT_FALLBACKS),
            gh: resolve_executable("gh", GH_FALLBACKS),
        }
    }
}
