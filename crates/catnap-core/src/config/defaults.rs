//! Default values for configuration fields.

use super::types::CatnapConfig;
use std::collections::BTreeMap;

pub fn default_scan_path() -> String {
    "~/REPOS".to_string()
}

pub fn default_refresh_interval_minutes() -> u64 {
    5
}

pub fn default_active_days() -> u32 {
    14
}

pub fn default_stale_days() -> u32 {
    60
}

impl Default for CatnapConfig {
    fn default() -> Self {
        Self {
            scan_path: default_scan_path(),
            github_owner: String::new(),
            refresh_interval_minutes: default_refresh_interval_minutes(),
            active_days: default_active_days(),
            stale_days: default_stale_days(),
            collapsed_sections: Vec::new(),
            categories: BTreeMap::new(),
        }
    }
}
