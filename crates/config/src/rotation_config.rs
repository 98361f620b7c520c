//! Daily rotation configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use lexiread_core::ProficiencyLevel;
use serde::{Deserialize, Serialize};

/// Daily free-story rotation
///
/// Every client must use the same values or their partitions diverge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RotationConfig {
    /// Stories readable for free today
    pub unlocked_per_day: usize,

    /// Stories shown locked as a teaser today
    pub preview_per_day: usize,

    /// Level whose stories take part in the rotation
    pub entry_level: ProficiencyLevel,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            unlocked_per_day: 4,
            preview_per_day: 4,
            entry_level: ProficiencyLevel::ENTRY,
        }
    }
}

impl ConfigSection for RotationConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect(vec![
            Validator::in_range("rotation.unlocked_per_day", self.unlocked_per_day, 1..=50),
            Validator::in_range("rotation.preview_per_day", self.preview_per_day, 0..=50),
        ])
    }

    fn merge(&mut self, other: Self) {
        self.unlocked_per_day = other.unlocked_per_day;
        self.preview_per_day = other.preview_per_day;
        self.entry_level = other.entry_level;
    }

    fn section_name(&self) -> &'static str {
        "rotation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_four_and_four() {
        let config = RotationConfig::default();
        assert_eq!(config.unlocked_per_day, 4);
        assert_eq!(config.preview_per_day, 4);
        assert_eq!(config.entry_level, ProficiencyLevel::A1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_unlocked_is_invalid() {
        let mut config = RotationConfig::default();
        config.unlocked_per_day = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_preview_may_be_zero() {
        let mut config = RotationConfig::default();
        config.preview_per_day = 0;
        assert!(config.validate().is_ok());
    }
}
