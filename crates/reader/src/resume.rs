//! Restoring a reading position from a saved checkpoint

use crate::pagination::Page;
use lexiread_core::Checkpoint;
use serde::Serialize;

/// Where the reader lands after resuming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResumeTarget {
    pub page_index: usize,
    /// Page-relative word to highlight, if any
    pub word_index: Option<usize>,
}

/// Maps a checkpoint onto the current pagination
///
/// The page is clamped into range, since the font size may have changed
/// since the checkpoint was written. The word is only highlighted when the
/// checkpoint asks for it and the index still exists on that page.
pub fn resume_to_checkpoint(pages: &[Page], checkpoint: &Checkpoint) -> ResumeTarget {
    let last = pages.len().saturating_sub(1);
    let page_index = checkpoint.page_number.min(last);

    if page_index != checkpoint.page_number {
        log::debug!(
            "Checkpoint page {} clamped to {}",
            checkpoint.page_number,
            page_index
        );
    }

    let page_words = pages.get(page_index).map_or(0, Page::word_count);
    let word_index = checkpoint
        .word_index
        .filter(|&index| checkpoint.show_highlight && index < page_words);

    if checkpoint.show_highlight && word_index.is_none() {
        log::debug!("Checkpoint highlight skipped, word no longer on page {}", page_index);
    }

    ResumeTarget {
        page_index,
        word_index,
    }
}
