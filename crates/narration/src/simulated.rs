//! In-process engine that speaks nothing and records every call
//!
//! Used by the command line front end, which has no audio output, and by
//! tests that need to observe the exact sequence of engine calls.

use crate::engine::{SpeechEngine, Utterance, UtteranceId};
use crate::voice::Voice;
use std::sync::{Mutex, MutexGuard};

/// A call made on the engine, in order
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Speak {
        id: UtteranceId,
        text: String,
        rate: f32,
        voice: Option<String>,
    },
    Pause,
    Resume,
    Cancel,
}

#[derive(Debug, Default)]
struct SimState {
    available: bool,
    voices: Vec<Voice>,
    voices_hidden_for: u32,
    cancel_lag: u32,
    busy_after_cancel: u32,
    speaking: bool,
    paused: bool,
    current: Option<Utterance>,
    calls: Vec<EngineCall>,
    overlaps: usize,
}

#[derive(Debug)]
pub struct SimulatedEngine {
    state: Mutex<SimState>,
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                available: true,
                ..SimState::default()
            }),
        }
    }

    /// An engine on a host without speech synthesis
    pub fn unavailable() -> Self {
        Self {
            state: Mutex::new(SimState::default()),
        }
    }

    pub fn with_voices(self, voices: Vec<Voice>) -> Self {
        self.lock().voices = voices;
        self
    }

    /// `voices()` returns nothing for the first `probes` calls
    pub fn hide_voices_for(self, probes: u32) -> Self {
        self.lock().voices_hidden_for = probes;
        self
    }

    /// After `cancel()` the engine reports busy for `checks` more status checks
    pub fn with_cancel_lag(self, checks: u32) -> Self {
        self.lock().cancel_lag = checks;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    /// Number of times an utterance was spoken over another one
    pub fn overlaps(&self) -> usize {
        self.lock().overlaps
    }

    /// The utterance currently being spoken
    pub fn current(&self) -> Option<Utterance> {
        self.lock().current.clone()
    }

    pub fn is_paused(&self) -> bool {
        self.lock().paused
    }

    /// Finishes the current utterance; returns its id so the caller can
    /// deliver the `Ended` event
    pub fn finish(&self) -> Option<UtteranceId> {
        let mut state = self.lock();
        state.speaking = false;
        state.paused = false;
        state.current.take().map(|u| u.id)
    }
}

impl SpeechEngine for SimulatedEngine {
    fn is_available(&self) -> bool {
        self.lock().available
    }

    fn voices(&self) -> Vec<Voice> {
        let mut state = self.lock();
        if state.voices_hidden_for > 0 {
            state.voices_hidden_for -= 1;
            return Vec::new();
        }
        state.voices.clone()
    }

    fn speak(&self, utterance: &Utterance) {
        let mut state = self.lock();
        state.calls.push(EngineCall::Speak {
            id: utterance.id,
            text: utterance.text.clone(),
            rate: utterance.rate.value(),
            voice: utterance.voice.as_ref().map(|v| v.name.clone()),
        });

        // Empty utterances only wake the engine up
        if utterance.text.is_empty() {
            return;
        }

        if state.speaking || state.busy_after_cancel > 0 {
            state.overlaps += 1;
        }
        state.speaking = true;
        state.paused = false;
        state.current = Some(utterance.clone());
    }

    fn pause(&self) {
        let mut state = self.lock();
        state.calls.push(EngineCall::Pause);
        if state.speaking {
            state.paused = true;
        }
    }

    fn resume(&self) {
        let mut state = self.lock();
        state.calls.push(EngineCall::Resume);
        state.paused = false;
    }

    fn cancel(&self) {
        let mut state = self.lock();
        state.calls.push(EngineCall::Cancel);
        state.speaking = false;
        state.paused = false;
        state.current = None;
        state.busy_after_cancel = state.cancel_lag;
    }

    fn is_speaking(&self) -> bool {
        let mut state = self.lock();
        if state.busy_after_cancel > 0 {
            state.busy_after_cancel -= 1;
            return true;
        }
        state.speaking
    }

    fn is_pending(&self) -> bool {
        false
    }
}
