//! Single-field edits addressed by their persisted key name.

use crate::config::types::CatnapConfig;
use crate::errors::ConfigError;

/// Keys accepted by [`apply_setting`].
pub const SETTING_KEYS: &[&str] = &[
    "scanPath",
    "githubOwner",
    "refreshIntervalMinutes",
    "activeDays",
    "staleDays",
];

/// Return a copy of `config` with `key` set to `value`.
///
/// Only parses the value; range checks are left to `validate_config`.
pub fn apply_setting(
    config: &CatnapConfig,
    key: &str,
    value: &str,
) -> Result<CatnapConfig, ConfigError> {
    let mut updated = config.clone();
    match key {
        "scanPath" => updated.scan_path = value.to_string(),
        "githubOwner" => updated.github_owner = value.to_string(),
        "refreshIntervalMinutes" => updated.refresh_interval_minutes = parse_number(key, value)?,
        "activeDays" => updated.active_days = parse_number(key, value)?,
        "staleDays" => updated.stale_days = parse_number(key, value)?,
        _ => {
            return Err(ConfigError::UnknownKey {
                key: key.to_string(),
                valid: SETTING_KEYS.join(", "),
            });
        }
    }
    Ok(updated)
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::InvalidConfiguration {
            message: format!("{key} expects a whole number, got '{value}': {e}"),
        })
}
