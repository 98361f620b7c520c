//! Per-user checkpoint tracking on top of a `KeyValueStore`

use crate::error::{ProgressError, ProgressResult};
use crate::store::KeyValueStore;
use lexiread_core::{progress_key, Checkpoint, StoryId, UserId};

/// Loads and saves checkpoints for one user
///
/// The lenient methods (`load`, `save`, `clear_highlight_flag`, `clear`)
/// never fail: problems are logged and reported as `None` or `false`.
/// `try_load` exposes the underlying error for callers that want it.
pub struct ProgressTracker<S: KeyValueStore> {
    store: S,
    user: UserId,
}

impl<S: KeyValueStore> ProgressTracker<S> {
    pub fn new(store: S, user: UserId) -> Self {
        Self { store, user }
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Storage key for `story`
    pub fn key(&self, story: &StoryId) -> String {
        progress_key(&self.user, story)
    }

    /// Loads a checkpoint, surfacing storage and decoding errors
    pub fn try_load(&self, story: &StoryId) -> ProgressResult<Option<Checkpoint>> {
        let key = self.key(story);
        let Some(raw) = self.store.get(&key)? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| ProgressError::Malformed { key, source })
    }

    /// Loads a checkpoint; missing, unreadable and malformed entries all
    /// yield None
    pub fn load(&self, story: &StoryId) -> Option<Checkpoint> {
        match self.try_load(story) {
            Ok(checkpoint) => checkpoint,
            Err(e) => {
                log::warn!("Ignoring saved progress for story {}: {}", story, e);
                None
            }
        }
    }

    /// Writes a checkpoint; returns whether it was stored
    pub fn save(&self, story: &StoryId, checkpoint: &Checkpoint) -> bool {
        let key = self.key(story);
        let result = serde_json::to_string(checkpoint)
            .map_err(ProgressError::from)
            .and_then(|json| self.store.set(&key, &json));

        match result {
            Ok(()) => {
                log::debug!(
                    "Saved progress for story {}: page {}, word {:?}",
                    story,
                    checkpoint.page_number,
                    checkpoint.word_index
                );
                true
            }
            Err(e) => {
                log::warn!("Failed to save progress for story {}: {}", story, e);
                false
            }
        }
    }

    /// Rewrites the stored checkpoint with `show_highlight` off, so the
    /// resume highlight is shown only once
    ///
    /// Returns true if a checkpoint was rewritten.
    pub fn clear_highlight_flag(&self, story: &StoryId) -> bool {
        match self.load(story) {
            Some(checkpoint) if checkpoint.show_highlight => {
                self.save(story, &checkpoint.acknowledged())
            }
            _ => false,
        }
    }

    /// Deletes the stored checkpoint; returns whether the store accepted it
    pub fn clear(&self, story: &StoryId) -> bool {
        match self.store.remove(&self.key(story)) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Failed to clear progress for story {}: {}", story, e);
                false
            }
        }
    }
}
