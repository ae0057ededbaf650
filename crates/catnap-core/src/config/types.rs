//! Configuration type definitions.
//!
//! # Example Configuration
//!
//! ```toml
//! scanPath = "~/REPOS"
//! githubOwner = "alexcatdad"
//! refreshIntervalMinutes = 5
//! activeDays = 14
//! staleDays = 60
//! collapsedSections = ["Infrastructure"]
//!
//! [categories]
//! "Developer Tools" = ["paw-proxy", "meowtern"]
//! Infrastructure = ["server-config"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use super::categories::{CategoryIndex, UNCATEGORIZED};
use super::validation::REFRESH_INTERVAL_RANGE;

/// User configuration persisted in `config.toml`.
///
/// Field order matters for serialization: plain values and arrays come
/// before the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatnapConfig {
    /// Directory whose direct children are scanned for repositories.
    /// May start with `~`.
    #[serde(default = "super::defaults::default_scan_path")]
    pub scan_path: String,

    /// Owner used for `gh repo view <owner>/<name>` lookups.
    #[serde(default)]
    pub github_owner: String,

    #[serde(default = "super::defaults::default_refresh_interval_minutes")]
    pub refresh_interval_minutes: u64,

    /// Repositories with a commit at most this many days old are Active.
    #[serde(default = "super::defaults::default_active_days")]
    pub active_days: u32,

    /// Repositories with no commit for at least this many days are Stale.
    #[serde(default = "super::defaults::default_stale_days")]
    pub stale_days: u32,

    /// Category sections the user has collapsed.
    #[serde(default)]
    pub collapsed_sections: Vec<String>,

    /// Category name to the repository names it contains.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
}

impl CatnapConfig {
    /// Time between two poll cycles, clamped to the allowed minute range.
    pub fn refresh_interval(&self) -> Duration {
        let minutes = self.refresh_interval_minutes.clamp(
            *REFRESH_INTERVAL_RANGE.start(),
            *REFRESH_INTERVAL_RANGE.end(),
        );
        Duration::from_secs(minutes.saturating_mul(60))
    }

    /// Category containing `repo_name`, or "Uncategorized".
    ///
    /// Builds a throwaway index; callers classifying many repositories should
    /// build a [`CategoryIndex`] once instead.
    pub fn category_for(&self, repo_name: &str) -> String {
        self.category_index().category_for(repo_name).to_string()
    }

    pub fn category_index(&self) -> CategoryIndex {
        CategoryIndex::new(&self.categories)
    }

    /// Configured categories sorted by name, then "Uncategorized".
    pub fn ordered_categories(&self) -> Vec<String> {
        self.categories
            .keys()
            .filter(|name| name.as_str() != UNCATEGORIZED)
            .cloned()
            .chain(std::iter::once(UNCATEGORIZED.to_string()))
            .collect()
    }

    /// Return a copy with `section` collapsed if it was expanded and vice versa.
    pub fn toggle_section(&self, section: &str) -> Self {
        let mut copy = self.clone();
        if copy.collapsed_sections.iter().any(|s| s == section) {
            copy.collapsed_sections.retain(|s| s != section);
        } else {
            copy.collapsed_sections.push(section.to_string());
        }
        copy
    }

    pub fn is_section_collapsed(&self, section: &str) -> bool {
        self.collapsed_sections.iter().any(|s| s == section)
    }
}
