//! Coordinator state management

use crate::engine::UtteranceId;
use crate::error::NarrationError;
use crate::highlight::{boundary_word_index, HighlightSink, HighlightStep, HighlightTracker};
use crate::rate::SpeechRate;
use crate::voice::Voice;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What an utterance was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtteranceKind {
    /// Reading a page aloud, with highlighting and pause/resume
    Reading,
    /// Pronouncing a single word; does not change the playback status
    Pronunciation,
}

/// A highlight sink with its own lock
///
/// The sink is only called with the coordinator state unlocked, so it may
/// query the coordinator.
#[derive(Clone)]
pub(crate) struct SinkHandle {
    words: usize,
    sink: Arc<Mutex<Box<dyn HighlightSink>>>,
}

impl SinkHandle {
    pub fn new(sink: Box<dyn HighlightSink>) -> Self {
        Self {
            words: sink.word_count(),
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    pub fn apply(&self, step: HighlightStep) {
        let mut sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        step.apply(sink.as_mut());
    }
}

pub(crate) struct ActiveUtterance {
    pub id: UtteranceId,
    pub kind: UtteranceKind,
    pub text: String,
    pub sink: Option<SinkHandle>,
    pub tracker: HighlightTracker,
}

impl ActiveUtterance {
    pub fn new(
        id: UtteranceId,
        kind: UtteranceKind,
        text: String,
        sink: Option<SinkHandle>,
    ) -> Self {
        Self {
            id,
            kind,
            text,
            sink,
            tracker: HighlightTracker::new(),
        }
    }

    /// Decides the highlight move for a boundary event; the caller applies
    /// it once the state is unlocked
    pub fn on_boundary(
        &mut self,
        char_index: usize,
        char_length: usize,
    ) -> Option<(HighlightStep, SinkHandle)> {
        let sink = self.sink.as_ref()?;
        let index = boundary_word_index(&self.text, char_index, char_length)?;
        let step = self.tracker.advance(index, sink.words)?;
        Some((step, sink.clone()))
    }
}

#[derive(Default)]
pub(crate) struct CoordinatorState {
    pub status: PlaybackStatus,
    pub rate: SpeechRate,
    pub voices: Vec<Voice>,
    pub active: Option<ActiveUtterance>,
    pub next_id: u64,
    /// Set by an engine error, until taken
    pub last_error: Option<NarrationError>,
}

impl CoordinatorState {
    pub fn allocate_id(&mut self) -> UtteranceId {
        self.next_id += 1;
        UtteranceId::new(self.next_id)
    }

    pub fn active_id(&self) -> Option<UtteranceId> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Forgets the current utterance; its later events become stale
    pub fn detach(&mut self) -> Option<ActiveUtterance> {
        self.status = PlaybackStatus::Stopped;
        self.active.take()
    }
}
