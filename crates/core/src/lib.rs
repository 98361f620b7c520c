pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, ErrorSeverity, RecoveryAction, Result};
pub use types::{
    progress_key, Checkpoint, ContentItem, ProficiencyLevel, StoryId, Timestamp, UserId, Validator,
};
