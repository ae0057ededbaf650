use chrono::{DateTime, Utc};

use catnap_core::{CategoryGroup, RepositoryRecord, StatusCounts};

const DIRTY_MARK: &str = "*";

pub struct TableFormatter {
    name_width: usize,
    branch_width: usize,
    status_width: usize,
    age_width: usize,
    dirty_width: usize,
    description_width: Option<usize>,
}

impl TableFormatter {
    pub fn new<'a>(
        repos: impl IntoIterator<Item = &'a RepositoryRecord>,
        with_descriptions: bool,
    ) -> Self {
        let mut name_width = 0;
        let mut branch_width = 0;
        for repo in repos {
            name_width = name_width.max(repo.name.chars().count());
            branch_width = branch_width.max(repo.branch.chars().count());
        }

        Self {
            name_width: name_width.clamp(10, 40), // "Repository" header minimum
            branch_width: branch_width.clamp(6, 30),
            status_width: 11,
            age_width: 11,
            dirty_width: 5,
            description_width: with_descriptions.then_some(40),
        }
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths = vec![
            self.name_width,
            self.branch_width,
            self.status_width,
            self.age_width,
            self.dirty_width,
        ];
        widths.extend(self.description_width);
        widths
    }

    pub fn render(&self, repos: &[RepositoryRecord], now: DateTime<Utc>) -> Vec<String> {
        let mut lines = vec![
            self.border('┌', '┬', '┐'),
            self.row(&["Repository", "Branch", "Status", "Last Commit", "Dirty", "Description"]),
            self.border('├', '┼', '┤'),
        ];
        for repo in repos {
            let age = repo.age_label(now);
            let dirty = if repo.is_dirty { DIRTY_MARK } else { "" };
            lines.push(self.row(&[
                repo.name.as_str(),
                repo.branch.as_str(),
                repo.status.label(),
                age.as_str(),
                dirty,
                repo.description.as_deref().unwrap_or(""),
            ]));
        }
        lines.push(self.border('└', '┴', '┘'));
        lines
    }

    /// One table row. Cells past the configured column count are dropped.
    fn row(&self, cells: &[&str]) -> String {
        let body: Vec<String> = self
            .widths()
            .into_iter()
            .zip(cells)
            .map(|(width, cell)| truncate(cell, width))
            .collect();
        format!("│ {} │", body.join(" │ "))
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = self
            .widths()
            .into_iter()
            .map(|width| "─".repeat(width + 2))
            .collect();
        format!("{left}{}{right}", segments.join(&middle.to_string()))
    }
}

/// Render grouped repositories, one table per expanded category.
///
/// Columns line up across all tables. Collapsed categories show only
/// their header.
pub fn render_groups(
    groups: &[CategoryGroup],
    now: DateTime<Utc>,
    with_descriptions: bool,
) -> String {
    let formatter = TableFormatter::new(
        groups
            .iter()
            .filter(|g| !g.collapsed)
            .flat_map(|g| g.repos.iter()),
        with_descriptions,
    );

    let mut lines = Vec::new();
    for group in groups {
        if group.collapsed {
            lines.push(format!("▸ {} ({}, collapsed)", group.name, group.repos.len()));
            continue;
        }
        lines.push(format!("▾ {} ({})", group.name, group.repos.len()));
        lines.extend(formatter.render(&group.repos, now));
        lines.push(String::new());
    }
    lines.join("\n")
}

pub fn render_counts(counts: &StatusCounts) -> String {
    format!(
        "{} active · {} in progress · {} stale",
        counts.active, counts.in_progress, counts.stale
    )
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings
/// including emoji and multi-byte characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catnap_core::RepoStatus;
    use chrono::{TimeDelta, TimeZone};
    use std::path::PathBuf;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap()
    }

    fn repo(name: &str, days_old: i64, dirty: bool) -> RepositoryRecord {
        RepositoryRecord {
            name: name.to_string(),
            path: PathBuf::from("/repos").join(name),
            last_commit: now() - TimeDelta::days(days_old),
            branch: "main".to_string(),
            is_dirty: dirty,
            status: RepoStatus::Active,
            description: None,
            category: "Tools".to_string(),
            owner: String::new(),
        }
    }

    fn group(name: &str, collapsed: bool, repos: Vec<RepositoryRecord>) -> CategoryGroup {
        CategoryGroup {
            name: name.to_string(),
            collapsed,
            repos,
        }
    }

    #[test]
    fn test_truncate_pads_short_strings() {
        assert_eq!(truncate("paw", 6), "paw   ");
    }

    #[test]
    fn test_truncate_long_strings_with_ellipsis() {
        assert_eq!(truncate("whisker-lore-api", 10), "whisker...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("猫猫猫猫猫猫", 5), "猫猫...");
    }

    #[test]
    fn test_rows_have_equal_width() {
        let repos = vec![repo("catnap", 2, true), repo("a-much-longer-repository-name", 40, false)];
        let lines = TableFormatter::new(&repos, false).render(&repos, now());

        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{lines:#?}");
        assert!(lines[1].contains("Repository"));
        assert!(!lines[1].contains("Description"));
        assert!(lines[3].contains("catnap"));
        assert!(lines[3].contains("2d ago"));
        assert!(lines[3].contains(DIRTY_MARK));
    }

    #[test]
    fn test_description_column_is_optional() {
        let mut described = repo("quorum", 1, false);
        described.description = Some("Voting service".to_string());
        let repos = vec![described];

        let lines = TableFormatter::new(&repos, true).render(&repos, now());
        assert!(lines[1].contains("Description"));
        assert!(lines[3].contains("Voting service"));
    }

    #[test]
    fn test_collapsed_group_shows_only_header() {
        let groups = vec![
            group("Infra", true, vec![repo("server-config", 3, false)]),
            group("Tools", false, vec![repo("paw", 1, false)]),
        ];

        let output = render_groups(&groups, now(), false);
        assert!(output.contains("▸ Infra (1, collapsed)"));
        assert!(!output.contains("server-config"));
        assert!(output.contains("▾ Tools (1)"));
        assert!(output.contains("paw"));
    }

    #[test]
    fn test_render_counts() {
        let counts = StatusCounts {
            active: 3,
            in_progress: 2,
            stale: 5,
        };
        assert_eq!(render_counts(&counts), "3 active · 2 in progress · 5 stale");
    }
}
