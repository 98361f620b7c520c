//! Platform speech engine abstraction

use crate::rate::SpeechRate;
use crate::voice::Voice;
use std::fmt;

/// Identifier the coordinator assigns to each utterance it starts
///
/// Engines echo it back with every event so events from a torn-down
/// utterance can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(u64);

impl UtteranceId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request to speak one piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    /// None lets the engine pick its default voice
    pub voice: Option<Voice>,
    pub lang: Option<String>,
    pub rate: SpeechRate,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    pub fn new(id: UtteranceId, text: impl Into<String>, rate: SpeechRate) -> Self {
        Self {
            id,
            text: text.into(),
            voice: None,
            lang: None,
            rate,
            pitch: 1.0,
            volume: 1.0,
        }
    }

    /// Uses `voice` and its language
    pub fn with_voice(mut self, voice: Option<Voice>) -> Self {
        self.lang = voice.as_ref().map(|v| v.lang.clone());
        self.voice = voice;
        self
    }
}

/// Notifications an engine delivers for an utterance
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Started,
    Paused,
    Resumed,
    Ended,
    Error(String),
    /// A word boundary; offsets count characters of the utterance text
    Boundary { char_index: usize, char_length: usize },
}

/// Operations the coordinator needs from a platform speech engine
///
/// Engines are shared, internally synchronised handles, so every method
/// takes `&self`. Events are delivered back through
/// `NarrationCoordinator::handle_event`.
pub trait SpeechEngine: Send + Sync {
    /// False when the host has no speech synthesis at all
    fn is_available(&self) -> bool {
        true
    }

    /// Voices currently known to the engine; may be empty until it warms up
    fn voices(&self) -> Vec<Voice>;

    /// Queues an utterance
    fn speak(&self, utterance: &Utterance);

    fn pause(&self);

    fn resume(&self);

    /// Drops the current and all queued utterances
    fn cancel(&self);

    fn is_speaking(&self) -> bool;

    fn is_pending(&self) -> bool;

    fn is_busy(&self) -> bool {
        self.is_speaking() || self.is_pending()
    }
}

/// Character offset and length of every whitespace-separated word
///
/// Mirrors the word boundary events engines emit while speaking `text`.
pub fn word_boundaries(text: &str) -> Vec<(usize, usize)> {
    let mut boundaries = Vec::new();
    let mut start = None;
    let mut count = 0;

    for (index, ch) in text.chars().enumerate() {
        match (ch.is_whitespace(), start) {
            (false, None) => {
                start = Some(index);
                count = 1;
            }
            (false, Some(_)) => count += 1,
            (true, Some(begin)) => {
                boundaries.push((begin, count));
                start = None;
            }
            (true, None) => {}
        }
    }
    if let Some(begin) = start {
        boundaries.push((begin, count));
    }
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_boundaries() {
        assert_eq!(word_boundaries("the fox  ran"), [(0, 3), (4, 3), (9, 3)]);
        assert_eq!(word_boundaries("  lead"), [(2, 4)]);
        assert!(word_boundaries(" \n ").is_empty());
    }

    #[test]
    fn test_boundaries_count_characters_not_bytes() {
        assert_eq!(word_boundaries("çay için"), [(0, 3), (4, 4)]);
    }

    #[test]
    fn test_utterance_with_voice_sets_lang() {
        let utterance = Utterance::new(UtteranceId::new(1), "hi", SpeechRate::default())
            .with_voice(Some(Voice::new("Alex", "en-US")));
        assert_eq!(utterance.lang.as_deref(), Some("en-US"));
        assert_eq!(utterance.pitch, 1.0);
    }
}
