//! Read-aloud configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};

/// Read-aloud preferences and engine polling behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NarrationConfig {
    /// Speech rate multiplier applied to new utterances (0.5 - 2.0)
    pub default_rate: f32,

    /// Rate change per step
    pub rate_step: f32,

    /// Rate used when pronouncing a single word
    pub pronounce_rate: f32,

    /// Language prefix voices must match, e.g. "en-"
    pub language_prefix: String,

    /// Interval between engine idle checks while tearing down an utterance
    pub teardown_poll_interval_ms: u64,

    /// Upper bound on idle checks before teardown gives up waiting
    pub teardown_max_polls: u32,

    /// Interval between voice list probes
    pub voice_probe_interval_ms: u64,

    /// Upper bound on voice list probes
    pub voice_probe_max_attempts: u32,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            default_rate: 1.0,
            rate_step: 0.1,
            pronounce_rate: 0.8,
            language_prefix: "en-".to_string(),
            teardown_poll_interval_ms: 50,
            teardown_max_polls: 100,
            voice_probe_interval_ms: 200,
            voice_probe_max_attempts: 25,
        }
    }
}

impl ConfigSection for NarrationConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect(vec![
            Validator::in_range("narration.default_rate", self.default_rate, 0.5..=2.0),
            Validator::in_range("narration.rate_step", self.rate_step, 0.05..=0.5),
            Validator::in_range("narration.pronounce_rate", self.pronounce_rate, 0.5..=2.0),
            Validator::language_prefix("narration.language_prefix", &self.language_prefix),
            Validator::in_range(
                "narration.teardown_poll_interval_ms",
                self.teardown_poll_interval_ms,
                1..=1000,
            ),
            Validator::in_range(
                "narration.teardown_max_polls",
                self.teardown_max_polls,
                1..=10_000,
            ),
            Validator::in_range(
                "narration.voice_probe_interval_ms",
                self.voice_probe_interval_ms,
                10..=5000,
            ),
            Validator::in_range(
                "narration.voice_probe_max_attempts",
                self.voice_probe_max_attempts,
                1..=1000,
            ),
        ])
    }

    fn merge(&mut self, other: Self) {
        self.default_rate = other.default_rate;
        self.rate_step = other.rate_step;
        self.pronounce_rate = other.pronounce_rate;
        self.language_prefix = other.language_prefix;
        self.teardown_poll_interval_ms = other.teardown_poll_interval_ms;
        self.teardown_max_polls = other.teardown_max_polls;
        self.voice_probe_interval_ms = other.voice_probe_interval_ms;
        self.voice_probe_max_attempts = other.voice_probe_max_attempts;
    }

    fn section_name(&self) -> &'static str {
        "narration"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(NarrationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_rate() {
        let mut config = NarrationConfig::default();
        config.default_rate = 2.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_language_prefix() {
        let mut config = NarrationConfig::default();
        config.language_prefix = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge() {
        let mut base = NarrationConfig::default();
        let mut other = NarrationConfig::default();
        other.default_rate = 1.4;
        other.language_prefix = "de-".to_string();

        base.merge(other);
        assert_eq!(base.default_rate, 1.4);
        assert_eq!(base.language_prefix, "de-");
    }
}
