//! Word highlighting driven by boundary events

/// Receives highlight updates for the words of the text being read
///
/// Word indices count whitespace-separated words of the utterance text.
pub trait HighlightSink: Send {
    /// Number of words the sink can highlight
    fn word_count(&self) -> usize;

    /// Removes the highlight from a word
    fn clear(&mut self, index: usize);

    /// Highlights a word and brings it into view
    fn highlight(&mut self, index: usize);
}

/// Index of the word being spoken at a boundary event
///
/// Counts the words in the text up to the end of the boundary. Offsets are
/// in characters; punctuation-heavy text can make this drift by a word.
pub fn boundary_word_index(text: &str, char_index: usize, char_length: usize) -> Option<usize> {
    let end = char_index.saturating_add(char_length);
    let spoken = text
        .chars()
        .take(end)
        .collect::<String>()
        .split_whitespace()
        .count();
    spoken.checked_sub(1)
}

/// One move of the highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightStep {
    pub clear: Option<usize>,
    pub highlight: usize,
}

impl HighlightStep {
    pub fn apply(self, sink: &mut dyn HighlightSink) {
        if let Some(previous) = self.clear {
            sink.clear(previous);
        }
        sink.highlight(self.highlight);
    }
}

/// Keeps highlights moving forward only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightTracker {
    last: Option<usize>,
}

impl HighlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<usize> {
        self.last
    }

    /// The step to `index`, if it lies after the last highlight and within
    /// `word_count` words
    pub fn advance(&mut self, index: usize, word_count: usize) -> Option<HighlightStep> {
        let forward = self.last.is_none_or(|last| index > last);
        if !forward || index >= word_count {
            return None;
        }
        let step = HighlightStep {
            clear: self.last.replace(index),
            highlight: index,
        };
        Some(step)
    }
}
