//! Voice selection

use serde::{Deserialize, Serialize};

/// A synthesis voice offered by the engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP 47 language tag, e.g. `en-US`
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }

    fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }

    fn is_us_english(&self) -> bool {
        self.lang == "en-US"
    }
}

type Preference = fn(&Voice, &str) -> bool;

/// Ordered from most to least preferred
const PREFERENCES: [Preference; 7] = [
    |v, _| v.name_contains("Google US English"),
    |v, _| v.name_contains("Samantha"),
    |v, _| v.name_contains("Microsoft Zira Desktop - English (United States)"),
    |v, _| v.is_us_english() && v.name_contains("neural"),
    |v, _| v.is_us_english() && v.name_contains("female"),
    |v, _| v.is_us_english(),
    |v, prefix| v.lang.starts_with(prefix),
];

/// Voices whose language starts with `language_prefix`
pub fn matching_language<'a>(voices: &'a [Voice], language_prefix: &str) -> Vec<&'a Voice> {
    voices
        .iter()
        .filter(|v| v.lang.starts_with(language_prefix))
        .collect()
}

/// Picks the best voice among those matching `language_prefix`
///
/// Returns None when no voice matches, in which case the engine's own
/// default voice is used.
pub fn select_voice<'a>(voices: &'a [Voice], language_prefix: &str) -> Option<&'a Voice> {
    let candidates = matching_language(voices, language_prefix);

    PREFERENCES
        .iter()
        .find_map(|prefers| {
            candidates
                .iter()
                .find(|v| prefers(**v, language_prefix))
                .copied()
        })
        .or_else(|| candidates.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(name: &str, lang: &str) -> Voice {
        Voice::new(name, lang)
    }

    #[test]
    fn test_google_preferred_over_everything() {
        let voices = vec![
            voice("Samantha", "en-US"),
            voice("Daniel", "en-GB"),
            voice("Google US English", "en-US"),
        ];
        let chosen = select_voice(&voices, "en-").map(|v| v.name.as_str());
        assert_eq!(chosen, Some("Google US English"));
    }

    #[test]
    fn test_neural_before_female_before_plain() {
        let voices = vec![
            voice("Plain", "en-US"),
            voice("Ava Female", "en-US"),
            voice("Jenny Neural", "en-US"),
        ];
        assert_eq!(select_voice(&voices, "en-").map(|v| v.name.as_str()), Some("Jenny Neural"));

        let voices = vec![voice("Plain", "en-US"), voice("Ava female", "en-US")];
        assert_eq!(select_voice(&voices, "en-").map(|v| v.name.as_str()), Some("Ava female"));
    }

    #[test]
    fn test_us_english_before_other_english() {
        let voices = vec![voice("Daniel", "en-GB"), voice("Alex", "en-US")];
        assert_eq!(select_voice(&voices, "en-").map(|v| v.name.as_str()), Some("Alex"));
    }

    #[test]
    fn test_any_english_variant() {
        let voices = vec![voice("Thomas", "fr-FR"), voice("Karen", "en-AU")];
        assert_eq!(select_voice(&voices, "en-").map(|v| v.name.as_str()), Some("Karen"));
    }

    #[test]
    fn test_no_matching_language() {
        let voices = vec![voice("Thomas", "fr-FR")];
        assert_eq!(select_voice(&voices, "en-"), None);
        assert_eq!(select_voice(&[], "en-"), None);
    }

    #[test]
    fn test_named_voice_must_match_language() {
        // A Samantha voice in another language is not a candidate
        let voices = vec![voice("Samantha", "it-IT"), voice("Karen", "en-AU")];
        assert_eq!(select_voice(&voices, "en-").map(|v| v.name.as_str()), Some("Karen"));
    }

    #[test]
    fn test_other_language_prefix() {
        let voices = vec![voice("Anna", "de-DE"), voice("Alex", "en-US")];
        assert_eq!(select_voice(&voices, "de-").map(|v| v.name.as_str()), Some("Anna"));
    }
}
