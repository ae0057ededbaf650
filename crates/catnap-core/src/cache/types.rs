use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// How long a fetched description is trusted before it is fetched again.
pub fn default_cache_ttl() -> TimeDelta {
    TimeDelta::hours(24)
}

/// Cached remote metadata, keyed by repository name.
pub type CacheEntries = BTreeMap<String, CacheEntry>;

/// A remote description and when it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub description: String,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(description: impl Into<String>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            description: description.into(),
            fetched_at,
        }
    }

    /// Fresh while fetched strictly after `now - ttl`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        self.fetched_at > now - ttl
    }
}

/// Insert `entry` unless the existing entry was fetched later.
///
/// Keeps `fetched_at` non-decreasing per key.
pub fn merge_entry(entries: &mut CacheEntries, name: String, entry: CacheEntry) {
    match entries.get(&name) {
        Some(existing) if existing.fetched_at > entry.fetched_at => {}
        _ => {
            entries.insert(name, entry);
        }
    }
}

/// Project the cache down to name → description.
pub fn descriptions(entries: &CacheEntries) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(name, entry)| (name.clone(), entry.description.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_entry_fresh_just_inside_ttl() {
        let entry = CacheEntry::new("Menu bar repo monitor", t0());
        let later = t0() + TimeDelta::hours(23) + TimeDelta::minutes(59);
        assert!(entry.is_fresh(later, default_cache_ttl()));
    }

    #[test]
    fn test_entry_stale_just_past_ttl() {
        let entry = CacheEntry::new("Menu bar repo monitor", t0());
        let later = t0() + TimeDelta::hours(24) + TimeDelta::minutes(1);
        assert!(!entry.is_fresh(later, default_cache_ttl()));
    }

    #[test]
    fn test_entry_stale_at_exact_ttl() {
        let entry = CacheEntry::new("x", t0());
        assert!(!entry.is_fresh(t0() + default_cache_ttl(), default_cache_ttl()));
    }

    #[test]
    fn test_merge_never_moves_timestamp_backwards() {
        let mut entries = CacheEntries::new();
        merge_entry(&mut entries, "quorum".into(), CacheEntry::new("newer", t0()));
        merge_entry(
            &mut entries,
            "quorum".into(),
            CacheEntry::new("older", t0() - TimeDelta::hours(1)),
        );
        assert_eq!(entries["quorum"].description, "newer");
        assert_eq!(entries["quorum"].fetched_at, t0());

        merge_entry(
            &mut entries,
            "quorum".into(),
            CacheEntry::new("newest", t0() + TimeDelta::hours(1)),
        );
        assert_eq!(entries["quorum"].description, "newest");
    }

    #[test]
    fn test_json_round_trip_uses_camel_case() {
        let mut entries = CacheEntries::new();
        entries.insert("paw".into(), CacheEntry::new("Dotfiles manager", t0()));

        let json = serde_json::to_string(&entries).unwrap();
        assert!(json.contains("\"fetchedAt\":\"2026-05-01T09:00:00"));

        let decoded: CacheEntries = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, entries);
    }

    #[test]
    fn test_descriptions_projection() {
        let mut entries = CacheEntries::new();
        entries.insert("a".into(), CacheEntry::new("first", t0()));
        entries.insert("b".into(), CacheEntry::new("second", t0()));
        let projected = descriptions(&entries);
        assert_eq!(projected.get("a").map(String::as_str), Some("first"));
        assert_eq!(projected.len(), 2);
    }
}
