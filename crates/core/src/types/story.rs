//! Story domain model

use crate::types::{Timestamp, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a story as issued by the backend
///
/// Identifiers are opaque strings; only equality and order of appearance matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryId(String);

impl StoryId {
    /// Creates a StoryId from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// CEFR proficiency tier of a story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
}

impl ProficiencyLevel {
    /// The free tier subject to daily rotation
    pub const ENTRY: Self = Self::A1;

    /// All levels in ascending order
    pub const ALL: [Self; 5] = [Self::A1, Self::A2, Self::B1, Self::B2, Self::C1];

    /// Returns true for the entry tier
    pub fn is_entry(&self) -> bool {
        *self == Self::ENTRY
    }

    /// Lowercase code as stored by the backend
    pub fn code(&self) -> &'static str {
        match self {
            Self::A1 => "a1",
            Self::A2 => "a2",
            Self::B1 => "b1",
            Self::B2 => "b2",
            Self::C1 => "c1",
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code().to_uppercase())
    }
}

impl FromStr for ProficiencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a1" => Ok(Self::A1),
            "a2" => Ok(Self::A2),
            "b1" => Ok(Self::B1),
            "b2" => Ok(Self::B2),
            "c1" => Ok(Self::C1),
            other => Err(format!("Unknown proficiency level '{}'", other)),
        }
    }
}

/// A story as delivered by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: StoryId,
    pub title: String,
    pub level: ProficiencyLevel,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub read_time_minutes: Option<u32>,
    #[serde(default)]
    pub rating: Option<f32>,
    pub created_at: Timestamp,
}

impl ContentItem {
    /// Creates a story with the required fields
    pub fn new(id: impl Into<StoryId>, title: impl Into<String>, level: ProficiencyLevel) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            level,
            content: String::new(),
            category: None,
            read_time_minutes: None,
            rating: None,
            created_at: Timestamp::now(),
        }
    }

    /// Sets the story body
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the estimated read time
    pub fn with_read_time(mut self, minutes: u32) -> Self {
        self.read_time_minutes = Some(minutes);
        self
    }

    /// Sets the average rating
    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }
}

impl Validator for ContentItem {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.id.as_str().trim().is_empty() {
            errors.push("Story id cannot be empty".to_string());
        }

        if self.title.trim().is_empty() {
            errors.push("Story title cannot be empty".to_string());
        }

        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                errors.push("Rating must be between 0 and 5".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
