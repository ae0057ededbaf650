//! Reading and writing `config.toml`.
//!
//! A missing, unreadable, unparsable or out-of-range file never stops the
//! monitor: the built-in defaults are used instead and the problem is logged.
//! When `config.toml` is absent, a `config.json` written by earlier catnap
//! releases is read in its place; the next save migrates it to TOML.

use std::path::Path;

use crate::config::types::CatnapConfig;
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use crate::storage::{LEGACY_CONFIG_FILE_NAME, write_atomic};

/// Load the configuration at `path`, falling back to defaults.
pub fn load_config(path: &Path) -> CatnapConfig {
    match try_load_config(path) {
        Ok(Some(config)) => config,
        Ok(None) => {
            tracing::debug!(
                event = "core.config.file_missing",
                path = %path.display()
            );
            CatnapConfig::default()
        }
        Err(e) => {
            tracing::error!(
                event = "core.config.load_failed",
                path = %path.display(),
                error = %e,
                "Config file could not be loaded - using defaults"
            );
            CatnapConfig::default()
        }
    }
}

/// Load the configuration at `path`, reporting read, parse and range failures.
///
/// Returns `Ok(None)` when neither `path` nor the legacy `config.json` next
/// to it exists.
pub fn try_load_config(path: &Path) -> Result<Option<CatnapConfig>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return try_load_legacy(path),
        Err(e) => return Err(e.into()),
    };

    let config: CatnapConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            message: format!("{}: {}", path.display(), e),
        })?;
    validated(path, config).map(Some)
}

fn try_load_legacy(path: &Path) -> Result<Option<CatnapConfig>, ConfigError> {
    let legacy = path.with_file_name(LEGACY_CONFIG_FILE_NAME);
    if legacy == path {
        return Ok(None);
    }

    let content = match std::fs::read_to_string(&legacy) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let config: CatnapConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            message: format!("{}: {}", legacy.display(), e),
        })?;
    let config = validated(&legacy, config)?;

    tracing::info!(
        event = "core.config.legacy_loaded",
        path = %legacy.display(),
        migrate_to = %path.display()
    );
    Ok(Some(config))
}

fn validated(path: &Path, config: CatnapConfig) -> Result<CatnapConfig, ConfigError> {
    validate_config(&config).map_err(|e| match e {
        ConfigError::InvalidConfiguration { message } => ConfigError::InvalidConfiguration {
            message: format!("{}: {}", path.display(), message),
        },
        other => other,
    })?;
    Ok(config)
}

/// Serialize the configuration. Identical configs give identical text.
pub fn render_config(config: &CatnapConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|e| ConfigError::SaveFailed {
        message: format!("Failed to serialize config: {}", e),
    })
}

/// Save the configuration to `path`, creating the parent directory.
pub fn save_config(path: &Path, config: &CatnapConfig) -> Result<(), ConfigError> {
    let rendered = render_config(config)?;

    write_atomic(path, rendered.as_bytes()).map_err(|e| ConfigError::SaveFailed {
        message: format!("Failed to write config file ({}): {}", path.display(), e),
    })?;

    tracing::info!(
        event = "core.config.saved",
        path = %path.display(),
        categories = config.categories.len()
    );

    Ok(())
}
