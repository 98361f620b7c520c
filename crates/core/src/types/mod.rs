//! Domain types for Lexiread
//!
//! - `story`: Story identifiers, proficiency levels and content items
//! - `progress`: Users and reading checkpoints
//! - `common`: Shared traits and utilities

mod common;
mod progress;
mod story;

pub use common::{Timestamp, Validator};
pub use progress::{progress_key, Checkpoint, UserId};
pub use story::{ContentItem, ProficiencyLevel, StoryId};
