//! Lexiread settings, stored as `config.toml` in the platform config dir
//!
//! ```toml
//! version = 2
//!
//! [reader]
//! default_font_size = 20
//!
//! [narration]
//! default_rate = 1.0
//! language_prefix = "en-"
//! ```
//!
//! Missing keys take their defaults. Out-of-range values in a file are
//! reported but loaded; `save` refuses them.
//!
//! ```rust,no_run
//! use lexiread_config::ConfigManager;
//!
//! # fn main() -> Result<(), lexiread_config::ConfigError> {
//! let manager = ConfigManager::new()?;
//! let config = manager.load_or_default();
//! println!("Font size: {}", config.reader.default_font_size);
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;
mod migration;
mod persistence;
mod validation;

mod app_config;
mod narration_config;
mod reader_config;
mod rotation_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::ConfigManager;
pub use validation::{ConfigSection, Validator};

pub use app_config::{AppConfig, LogLevel};
pub use narration_config::NarrationConfig;
pub use reader_config::ReaderConfig;
pub use rotation_config::RotationConfig;

use serde::{Deserialize, Serialize};

/// Written to new files; older files are migrated on load
pub const CONFIG_VERSION: u32 = 2;

/// The whole `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub app: AppConfig,
    pub reader: ReaderConfig,
    pub narration: NarrationConfig,
    pub rotation: RotationConfig,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every section, returning all errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = [
            self.app.validate(),
            self.reader.validate(),
            self.narration.validate(),
            self.rotation.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .flatten()
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Takes every section from `other`
    pub fn merge(&mut self, other: Config) {
        self.app.merge(other.app);
        self.reader.merge(other.reader);
        self.narration.merge(other.narration);
        self.rotation.merge(other.rotation);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            app: AppConfig::default(),
            reader: ReaderConfig::default(),
            narration: NarrationConfig::default(),
            rotation: RotationConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_version_is_set() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        let mut override_config = Config::default();
        override_config.reader.default_font_size = 42;

        base.merge(override_config);
        assert_eq!(base.reader.default_font_size, 42);
    }

    #[test]
    fn test_errors_collected_across_sections() {
        let mut config = Config::default();
        config.reader.default_font_size = 0;
        config.narration.default_rate = 9.0;
        config.rotation.unlocked_per_day = 0;

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
