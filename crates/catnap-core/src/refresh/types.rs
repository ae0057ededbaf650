use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::CatnapConfig;
use crate::status::RepoStatus;

/// One repository as observed by a single refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
    pub name: String,
    pub path: PathBuf,
    pub last_commit: DateTime<Utc>,
    pub branch: String,
    pub is_dirty: bool,
    pub status: RepoStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub owner: String,
}

impl RepositoryRecord {
    /// GitHub page of the repository, when an owner is configured.
    pub fn remote_url(&self) -> Option<String> {
        if self.owner.is_empty() {
            return None;
        }
        Some(format!("https://github.com/{}/{}", self.owner, self.name))
    }

    /// Compact age of the last commit, e.g. "3h ago".
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        age_label(self.last_commit, now)
    }
}

/// Format the time between `then` and `now` the way the status list shows it.
pub fn age_label(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "now".to_string();
    }

    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else if days < 30 {
        format!("{}w ago", days / 7)
    } else if days < 365 {
        format!("{}mo ago", days / 30)
    } else {
        format!("{}y ago", days / 365)
    }
}

/// The result of one completed refresh, published as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Zero for the empty snapshot before any refresh, then increasing.
    pub generation: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub repos: Vec<RepositoryRecord>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self {
            generation: 0,
            refreshed_at: None,
            repos: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.repos.iter().map(|r| r.name.clone()).collect()
    }

    /// Copy of this snapshot with descriptions looked up by name.
    ///
    /// A repository missing from `descriptions` keeps the description it had.
    pub fn with_descriptions(&self, descriptions: &BTreeMap<String, String>) -> Self {
        let repos = self
            .repos
            .iter()
            .map(|repo| {
                let mut repo = repo.clone();
                if let Some(description) = descriptions.get(&repo.name) {
                    repo.description = Some(description.clone());
                }
                repo
            })
            .collect();

        Self {
            generation: self.generation,
            refreshed_at: self.refreshed_at,
            repos,
        }
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::from_records(&self.repos)
    }

    /// Records grouped by category for display.
    ///
    /// Groups follow [`CatnapConfig::ordered_categories`]; empty groups are
    /// left out. Inside a group the most recently committed repository comes
    /// first, ties broken by name.
    pub fn grouped(&self, config: &CatnapConfig) -> Vec<CategoryGroup> {
        let mut by_category: BTreeMap<&str, Vec<&RepositoryRecord>> = BTreeMap::new();
        for repo in &self.repos {
            by_category.entry(repo.category.as_str()).or_default().push(repo);
        }

        config
            .ordered_categories()
            .into_iter()
            .filter_map(|name| {
                let mut repos: Vec<RepositoryRecord> = by_category
                    .remove(name.as_str())?
                    .into_iter()
                    .cloned()
                    .collect();
                repos.sort_by(|a, b| {
                    b.last_commit
                        .cmp(&a.last_commit)
                        .then_with(|| a.name.cmp(&b.name))
                });
                let collapsed = config.is_section_collapsed(&name);
                Some(CategoryGroup {
                    name,
                    collapsed,
                    repos,
                })
            })
            .collect()
    }
}

/// Repositories of one category, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub name: String,
    pub collapsed: bool,
    pub repos: Vec<RepositoryRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub active: usize,
    pub in_progress: usize,
    pub stale: usize,
}

impl StatusCounts {
    pub fn from_records(records: &[RepositoryRecord]) -> Self {
        records.iter().fold(Self::default(), |mut counts, record| {
            match record.status {
                RepoStatus::Active => counts.active += 1,
                RepoStatus::InProgress => counts.in_progress += 1,
                RepoStatus::Stale => counts.stale += 1,
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.active + self.in_progress + self.stale
    }
}

#[cfg(test)]
pub(crate) mod test_records {
    use super::*;
    use crate::config::UNCATEGORIZED;

    pub fn record(name: &str, category: &str, last_commit: DateTime<Utc>) -> RepositoryRecord {
        RepositoryRecord {
            name: name.to_string(),
            path: PathBuf::from("/repos").join(name),
            last_commit,
            branch: "main".to_string(),
            is_dirty: false,
            status: RepoStatus::Active,
            description: None,
            category: category.to_string(),
            owner: "alexcatdad".to_string(),
        }
    }

    pub fn uncategorized(name: &str, last_commit: DateTime<Utc>) -> RepositoryRecord {
        record(name, UNCATEGORIZED, last_commit)
    }
}

#[cfg(test)]
mod tests {
    use super::test_records::{record, uncategorized};
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_remote_url() {
        let repo = uncategorized("catnap", now());
        assert_eq!(
            repo.remote_url().as_deref(),
            Some("https://github.com/alexcatdad/catnap")
        );
    }

    #[test]
    fn test_remote_url_needs_owner() {
        let mut repo = uncategorized("catnap", now());
        repo.owner.clear();
        assert_eq!(repo.remote_url(), None);
    }

    #[test]
    fn test_age_labels() {
        let cases = [
            (TimeDelta::seconds(10), "now"),
            (TimeDelta::minutes(5), "5m ago"),
            (TimeDelta::hours(3), "3h ago"),
            (TimeDelta::days(2), "2d ago"),
            (TimeDelta::days(14), "2w ago"),
            (TimeDelta::days(120), "4mo ago"),
            (TimeDelta::days(800), "2y ago"),
        ];
        for (age, expected) in cases {
            assert_eq!(age_label(now() - age, now()), expected, "age {age}");
        }
    }

    #[test]
    fn test_age_label_future_commit_is_now() {
        assert_eq!(age_label(now() + TimeDelta::hours(2), now()), "now");
    }

    #[test]
    fn test_grouped_follows_ordered_categories_and_drops_empty() {
        let mut config = CatnapConfig::default();
        config
            .categories
            .insert("Tools".to_string(), vec!["paw".to_string()]);
        config
            .categories
            .insert("Apps".to_string(), vec!["nothing-here".to_string()]);
        config
            .categories
            .insert("Infra".to_string(), vec!["server-config".to_string()]);

        let snapshot = Snapshot {
            generation: 1,
            refreshed_at: Some(now()),
            repos: vec![
                uncategorized("scratch", now()),
                record("paw", "Tools", now()),
                record("server-config", "Infra", now()),
            ],
        };

        let names: Vec<String> = snapshot
            .grouped(&config)
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Infra", "Tools", "Uncategorized"]);
    }

    #[test]
    fn test_grouped_orders_by_last_commit_descending() {
        let snapshot = Snapshot {
            generation: 1,
            refreshed_at: Some(now()),
            repos: vec![
                uncategorized("old", now() - TimeDelta::days(90)),
                uncategorized("newest", now()),
                uncategorized("middle", now() - TimeDelta::days(3)),
            ],
        };

        let groups = snapshot.grouped(&CatnapConfig::default());
        assert_eq!(groups.len(), 1);
        let names: Vec<&str> = groups[0].repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["newest", "middle", "old"]);
    }

    #[test]
    fn test_grouped_marks_collapsed_sections() {
        let config = CatnapConfig::default().toggle_section("Uncategorized");
        let snapshot = Snapshot {
            generation: 1,
            refreshed_at: Some(now()),
            repos: vec![uncategorized("scratch", now())],
        };
        assert!(snapshot.grouped(&config)[0].collapsed);
    }

    #[test]
    fn test_with_descriptions_patches_only_known_names() {
        let mut described = uncategorized("described", now());
        described.description = Some("kept".to_string());
        let snapshot = Snapshot {
            generation: 4,
            refreshed_at: Some(now()),
            repos: vec![described, uncategorized("quorum", now())],
        };

        let mut descriptions = BTreeMap::new();
        descriptions.insert("quorum".to_string(), "Voting service".to_string());

        let patched = snapshot.with_descriptions(&descriptions);
        assert_eq!(patched.generation, 4);
        assert_eq!(patched.repos[0].description.as_deref(), Some("kept"));
        assert_eq!(patched.repos[1].description.as_deref(), Some("Voting service"));
    }

    #[test]
    fn test_status_counts() {
        let mut stale = uncategorized("b", now());
        stale.status = RepoStatus::Stale;
        let mut wip = uncategorized("c", now());
        wip.status = RepoStatus::InProgress;
        let counts = StatusCounts::from_records(&[uncategorized("a", now()), stale, wip]);

        assert_eq!(
            counts,
            StatusCounts {
                active: 1,
                in_progress: 1,
                stale: 1
            }
        );
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_record_json_is_camel_case() {
        let json = serde_json::to_string(&uncategorized("paw", now())).unwrap();
        assert!(json.contains("\"lastCommit\""));
        assert!(json.contains("\"isDirty\":false"));
        assert!(json.contains("\"status\":\"active\""));
        assert!(!json.contains("description"));
    }
}
