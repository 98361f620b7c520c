//! `[app]`: who is reading and where their progress is kept

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Verbosity of the `log` output; `env_logger` filter syntax
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [Self::Error, Self::Warn, Self::Info, Self::Debug, Self::Trace];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown log level '{}'", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: LogLevel,

    /// Directory holding locally persisted reading progress
    /// (relative to the config dir if not absolute)
    pub data_dir: PathBuf,

    /// Signed-in user, used to key local progress
    pub user_id: Option<String>,

    /// Treat the user as a subscriber (all stories unlocked)
    pub subscriber: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            data_dir: PathBuf::from("progress"),
            user_id: None,
            subscriber: false,
        }
    }
}

impl ConfigSection for AppConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = Vec::new();

        if self.data_dir.as_os_str().is_empty() {
            results.push(Err(ValidationError::new("app.data_dir", "must not be empty")));
        }

        if let Some(user) = &self.user_id {
            results.push(Validator::not_empty("app.user_id", user));
        }

        Validator::collect(results)
    }

    fn merge(&mut self, other: Self) {
        self.log_level = other.log_level;
        self.data_dir = other.data_dir;
        self.user_id = other.user_id;
        self.subscriber = other.subscriber;
    }

    fn section_name(&self) -> &'static str {
        "app"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_data_dir() {
        let mut config = AppConfig::default();
        config.data_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_user_id() {
        let mut config = AppConfig::default();
        config.user_id = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge() {
        let mut base = AppConfig::default();
        let mut other = AppConfig::default();
        other.log_level = LogLevel::Debug;
        other.subscriber = true;

        base.merge(other);
        assert_eq!(base.log_level, LogLevel::Debug);
        assert!(base.subscriber);
    }

    #[test]
    fn test_log_level_display_and_parse() {
        assert_eq!(LogLevel::Error.to_string(), "error");
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
