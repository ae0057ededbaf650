//! # Configuration System
//!
//! A single TOML file, `config.toml`, in the catnap configuration directory
//! (`~/.config/catnap`, or `$CATNAP_CONFIG_DIR`).
//!
//! Loaded once at startup; a missing, broken or out-of-range file means
//! built-in defaults. A legacy `config.json` is read when no TOML file exists.
//! Changed only by explicit user action, and saved as a whole.
//!
//! ```rust,no_run
//! use catnap_core::config::{load_config, CatnapConfig};
//! use catnap_core::storage::CatnapPaths;
//!
//! let paths = CatnapPaths::resolve();
//! let config: CatnapConfig = load_config(&paths.config_file());
//! println!("scanning {}", config.scan_path);
//! ```

pub mod categories;
pub mod defaults;
pub mod loading;
pub mod settings;
pub mod types;
pub mod validation;

pub use categories::{CategoryIndex, UNCATEGORIZED};
pub use loading::{load_config, render_config, save_config, try_load_config};
pub use settings::{SETTING_KEYS, apply_setting};
pub use types::CatnapConfig;
pub use validation::validate_config;

impl CatnapConfig {
    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
