use crate::config::types::CatnapConfig;
use crate::errors::ConfigError;

/// Allowed refresh interval in minutes.
pub const REFRESH_INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 1..=60;

/// Allowed activity thresholds in days.
pub const THRESHOLD_DAYS_RANGE: std::ops::RangeInclusive<u32> = 1..=365;

/// Validate a configuration before it is saved.
///
/// `staleDays <= activeDays` is accepted: every repository is then either
/// Active or Stale. It is logged as a warning only.
pub fn validate_config(config: &CatnapConfig) -> Result<(), ConfigError> {
    if config.scan_path.trim().is_empty() {
        return Err(ConfigError::InvalidConfiguration {
            message: "scanPath must not be empty".to_string(),
        });
    }

    if !REFRESH_INTERVAL_RANGE.contains(&config.refresh_interval_minutes) {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "refreshIntervalMinutes must be between {} and {} (got {})",
                REFRESH_INTERVAL_RANGE.start(),
                REFRESH_INTERVAL_RANGE.end(),
                config.refresh_interval_minutes
            ),
        });
    }

    for (field, value) in [
        ("activeDays", config.active_days),
        ("staleDays", config.stale_days),
    ] {
        if !THRESHOLD_DAYS_RANGE.contains(&value) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!(
                    "{} must be between {} and {} (got {})",
                    field,
                    THRESHOLD_DAYS_RANGE.start(),
                    THRESHOLD_DAYS_RANGE.end(),
                    value
                ),
            });
        }
    }

    if config.stale_days <= config.active_days {
        tracing::warn!(
            event = "core.config.thresholds_overlap",
            active_days = config.active_days,
            stale_days = config.stale_days,
            "staleDays is not greater than activeDays - no repository will be In Progress"
        );
    }

    Ok(())
}
