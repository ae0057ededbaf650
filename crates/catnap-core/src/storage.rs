//! Locations of catnap's persisted files and the atomic write they share.

use std::io::Write;
use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "CATNAP_CONFIG_DIR";

const CONFIG_FILE_NAME: &str = "config.toml";
/// JSON config written by earlier releases, read when `config.toml` is absent.
pub const LEGACY_CONFIG_FILE_NAME: &str = "config.json";
const CACHE_FILE_NAME: &str = "gh-cache.json";

/// Directory holding `config.toml` and `gh-cache.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatnapPaths {
    dir: PathBuf,
}

impl CatnapPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the configuration directory.
    ///
    /// Uses `CATNAP_CONFIG_DIR` when set and non-empty, otherwise
    /// `~/.config/catnap`. Falls back to `./.catnap` if the home directory
    /// cannot be determined.
    pub fn resolve() -> Self {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
            && !dir.is_empty()
        {
            return Self::new(dir);
        }

        match dirs::home_dir() {
            Some(home) => Self::new(home.join(".config").join("catnap")),
            None => {
                tracing::error!(
                    event = "core.storage.home_dir_not_found",
                    fallback = ".",
                    "Could not determine home directory - using current directory as fallback"
                );
                Self::new(PathBuf::from(".").join(".catnap"))
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    pub fn legacy_config_file(&self) -> PathBuf {
        self.dir.join(LEGACY_CONFIG_FILE_NAME)
    }

    pub fn cache_file(&self) -> PathBuf {
        self.dir.join(CACHE_FILE_NAME)
    }
}

/// Replace `path` with `contents` in one step.
///
/// Writes a temporary file next to the target and renames it over the
/// target, so readers see either the old or the new file, never a partial one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
