//! Reader view configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Reader view preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReaderConfig {
    /// Font size on the 1-100 slider scale used when a story is opened
    pub default_font_size: u8,

    /// Font size change per step
    pub font_size_step: u8,

    /// How long a resumed word stays highlighted, in seconds
    pub resume_highlight_secs: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_font_size: 20,
            font_size_step: 5,
            resume_highlight_secs: 15,
        }
    }
}

impl ConfigSection for ReaderConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect(vec![
            Validator::in_range("reader.default_font_size", self.default_font_size, 1..=100),
            Validator::in_range("reader.font_size_step", self.font_size_step, 1..=50),
            Validator::in_range(
                "reader.resume_highlight_secs",
                self.resume_highlight_secs,
                1..=300,
            ),
        ])
    }

    fn merge(&mut self, other: Self) {
        self.default_font_size = other.default_font_size;
        self.font_size_step = other.font_size_step;
        self.resume_highlight_secs = other.resume_highlight_secs;
    }

    fn section_name(&self) -> &'static str {
        "reader"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ReaderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_font_size_bounds() {
        let mut config = ReaderConfig::default();
        config.default_font_size = 0;
        assert!(config.validate().is_err());
        config.default_font_size = 101;
        assert!(config.validate().is_err());
        config.default_font_size = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_multiple_validation_errors() {
        let config = ReaderConfig {
            default_font_size: 0,
            font_size_step: 0,
            resume_highlight_secs: 0,
        };
        assert_eq!(config.validate().unwrap_err().len(), 3);
    }
}
