use std::path::Path;

use super::errors::CacheError;
use super::types::CacheEntries;
use crate::storage::write_atomic;

/// Load cached entries from `path`.
///
/// Returns an empty cache if the file doesn't exist or can't be used (with
/// the problem logged). The next successful enrichment rewrites the file.
pub fn load_cache(path: &Path) -> CacheEntries {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CacheEntries::new(),
        Err(e) => {
            tracing::warn!(
                event = "core.cache.load_failed",
                path = %path.display(),
                error = %e
            );
            return CacheEntries::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                event = "core.cache.json_parse_failed",
                path = %path.display(),
                error = %e,
                "Cache file contains invalid JSON - starting with an empty cache"
            );
            CacheEntries::new()
        }
    }
}

/// Serialize entries as pretty JSON. Keys are sorted, so identical caches
/// give identical bytes.
pub fn render_cache(entries: &CacheEntries) -> Result<String, CacheError> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Write the whole cache to `path` in one atomic replace.
pub fn save_cache(path: &Path, entries: &CacheEntries) -> Result<(), CacheError> {
    let json = render_cache(entries)?;

    write_atomic(path, json.as_bytes()).map_err(|source| CacheError::WriteFailed {
        path: path.display().to_string(),
        source,
    })?;

    tracing::debug!(
        event = "core.cache.saved",
        path = %path.display(),
        count = entries.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::types::CacheEntry;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample() -> CacheEntries {
        let fetched = Utc.with_ymd_and_hms(2026, 4, 2, 18, 30, 0).unwrap();
        let mut entries = CacheEntries::new();
        entries.insert("whisker-lore-api".into(), CacheEntry::new("Lore API", fetched));
        entries.insert("anikarr".into(), CacheEntry::new("Anime tracker", fetched));
        entries
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_cache(&temp_dir.path().join("gh-cache.json")).is_empty());
    }

    #[test]
    fn test_load_corrupted_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gh-cache.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_cache(&path).is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catnap").join("gh-cache.json");

        save_cache(&path, &sample()).expect("save should succeed");
        assert_eq!(load_cache(&path), sample());
    }

    #[test]
    fn test_repeated_saves_are_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gh-cache.json");

        save_cache(&path, &sample()).unwrap();
        let first = std::fs::read(&path).unwrap();
        save_cache(&path, &sample()).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rendered_keys_are_sorted() {
        let json = render_cache(&sample()).unwrap();
        let anikarr = json.find("\"anikarr\"").unwrap();
        let whisker = json.find("\"whisker-lore-api\"").unwrap();
        assert!(anikarr < whisker);
        let description = json.find("\"description\"").unwrap();
        let fetched_at = json.find("\"fetchedAt\"").unwrap();
        assert!(description < fetched_at);
    }

    #[test]
    fn test_save_into_blocked_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let result = save_cache(&blocker.join("gh-cache.json"), &sample());
        assert!(matches!(result, Err(CacheError::WriteFailed { .. })));
    }
}
