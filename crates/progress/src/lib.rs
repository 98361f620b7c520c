//! Lexiread reading progress
//!
//! Stores one checkpoint per user and story under the key
//! `story_progress_{user}_{story}` as JSON:
//!
//! ```json
//! {"page_number": 3, "word_index": 41, "show_highlight": true}
//! ```
//!
//! Progress is a convenience. Every failure to read or write it is logged
//! and degrades to "no checkpoint" instead of interrupting reading.

pub mod error;
pub mod store;
pub mod tracker;

pub use error::{ProgressError, ProgressResult};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use tracker::ProgressTracker;
