//! Repository freshness classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// Repository health derived from the age of its last commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepoStatus {
    Active,
    InProgress,
    Stale,
}

impl RepoStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RepoStatus::Active => "Active",
            RepoStatus::InProgress => "In Progress",
            RepoStatus::Stale => "Stale",
        }
    }
}

impl std::fmt::Display for RepoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a repository by the age of its last commit.
///
/// Active is checked before Stale, and both boundaries are inclusive. When
/// `stale_days <= active_days` nothing can be InProgress.
pub fn classify(
    last_commit: DateTime<Utc>,
    now: DateTime<Utc>,
    active_days: u32,
    stale_days: u32,
) -> RepoStatus {
    let age = (now - last_commit).num_seconds();
    let active_threshold = i64::from(active_days) * SECONDS_PER_DAY;
    let stale_threshold = i64::from(stale_days) * SECONDS_PER_DAY;

    if age <= active_threshold {
        RepoStatus::Active
    } else if age >= stale_threshold {
        RepoStatus::Stale
    } else {
        RepoStatus::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn status_at_age(age: Duration, active_days: u32, stale_days: u32) -> RepoStatus {
        classify(now() - age, now(), active_days, stale_days)
    }

    #[test]
    fn test_recent_commit_is_active() {
        assert_eq!(status_at_age(Duration::zero(), 14, 60), RepoStatus::Active);
    }

    #[test]
    fn test_within_active_threshold() {
        assert_eq!(status_at_age(Duration::days(7), 14, 60), RepoStatus::Active);
    }

    #[test]
    fn test_exact_active_threshold_is_active() {
        assert_eq!(status_at_age(Duration::days(14), 14, 60), RepoStatus::Active);
    }

    #[test]
    fn test_one_second_past_active_threshold_is_in_progress() {
        let age = Duration::days(14) + Duration::seconds(1);
        assert_eq!(status_at_age(age, 14, 60), RepoStatus::InProgress);
    }

    #[test]
    fn test_between_thresholds_is_in_progress() {
        assert_eq!(
            status_at_age(Duration::days(30), 14, 60),
            RepoStatus::InProgress
        );
    }

    #[test]
    fn test_exact_stale_threshold_is_stale() {
        assert_eq!(status_at_age(Duration::days(60), 14, 60), RepoStatus::Stale);
    }

    #[test]
    fn test_old_commit_is_stale() {
        assert_eq!(status_at_age(Duration::days(180), 14, 60), RepoStatus::Stale);
    }

    #[test]
    fn test_custom_thresholds() {
        assert_eq!(
            status_at_age(Duration::days(5), 3, 30),
            RepoStatus::InProgress
        );
    }

    #[test]
    fn test_inverted_thresholds_never_yield_in_progress() {
        for days in 0..40 {
            let status = status_at_age(Duration::days(days), 20, 10);
            assert_ne!(status, RepoStatus::InProgress, "age {days}d");
        }
        assert_eq!(status_at_age(Duration::days(15), 20, 10), RepoStatus::Active);
        assert_eq!(status_at_age(Duration::days(21), 20, 10), RepoStatus::Stale);
    }

    #[test]
    fn test_equal_thresholds_boundary_is_active() {
        assert_eq!(status_at_age(Duration::days(10), 10, 10), RepoStatus::Active);
    }

    #[test]
    fn test_future_commit_is_active() {
        assert_eq!(
            status_at_age(Duration::hours(-3), 14, 60),
            RepoStatus::Active
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(RepoStatus::Active.label(), "Active");
        assert_eq!(RepoStatus::InProgress.to_string(), "In Progress");
        assert_eq!(RepoStatus::Stale.label(), "Stale");
    }
}
