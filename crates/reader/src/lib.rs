//! Lexiread reader
//!
//! Splits story text into pages sized by the reader's font size, tracks
//! the current page and turns saved checkpoints back into a position.

pub mod pagination;
pub mod resume;
pub mod session;

pub use pagination::{
    build_pages, paginate, split_paragraphs, tokenize_words, word_count, words_per_page,
    FontSize, Page,
};
pub use resume::{resume_to_checkpoint, ResumeTarget};
pub use session::{PageDirection, ReadingSession};
