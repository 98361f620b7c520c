//! Reading-progress domain model

use crate::types::{StoryId, Validator};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random UserId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a UserId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the UserId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a reader left off in a story
///
/// `word_index` is relative to the page, matching the word tokens rendered
/// for that page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub page_number: usize,
    #[serde(default)]
    pub word_index: Option<usize>,
    #[serde(default)]
    pub show_highlight: bool,
}

impl Checkpoint {
    /// Checkpoint at the start of a page with no marked word
    pub fn at_page(page_number: usize) -> Self {
        Self {
            page_number,
            word_index: None,
            show_highlight: false,
        }
    }

    /// Checkpoint marking a specific word to highlight on the next visit
    pub fn marked(page_number: usize, word_index: usize) -> Self {
        Self {
            page_number,
            word_index: Some(word_index),
            show_highlight: true,
        }
    }

    /// Same position with the resume highlight switched off
    pub fn acknowledged(self) -> Self {
        Self {
            show_highlight: false,
            ..self
        }
    }
}

impl Validator for Checkpoint {
    fn validate(&self) -> Result<(), Vec<String>> {
        if self.show_highlight && self.word_index.is_none() {
            Err(vec![
                "A highlighted checkpoint must reference a word".to_string()
            ])
        } else {
            Ok(())
        }
    }
}

/// Storage key for a user's checkpoint in a story
pub fn progress_key(user: &UserId, story: &StoryId) -> String {
    format!("story_progress_{}_{}", user, story)
}
