//! Read-aloud coordinator
//!
//! Owns the engine handle and the single active utterance. Any start
//! (`play`, `request_play` from stopped, `pronounce`) first tears down
//! whatever is active: the utterance is detached so its late events are
//! ignored, the engine is cancelled, and the coordinator waits until the
//! engine reports idle before speaking again.

use crate::engine::{EngineEvent, SpeechEngine, Utterance, UtteranceId};
use crate::error::{NarrationError, NarrationResult};
use crate::highlight::HighlightSink;
use crate::rate::SpeechRate;
use crate::state::{ActiveUtterance, CoordinatorState, PlaybackStatus, SinkHandle, UtteranceKind};
use crate::voice::{matching_language, select_voice, Voice};
use lexiread_config::NarrationConfig;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// Tunables for the coordinator
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationSettings {
    pub default_rate: SpeechRate,
    /// Change per faster/slower step
    pub rate_step: f32,
    pub pronounce_rate: SpeechRate,
    pub language_prefix: String,
    pub teardown_poll_interval: Duration,
    pub teardown_max_polls: u32,
    pub voice_probe_interval: Duration,
    pub voice_probe_max_attempts: u32,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self::from(&NarrationConfig::default())
    }
}

impl From<&NarrationConfig> for NarrationSettings {
    fn from(config: &NarrationConfig) -> Self {
        Self {
            default_rate: SpeechRate::clamped(config.default_rate),
            rate_step: config.rate_step,
            pronounce_rate: SpeechRate::clamped(config.pronounce_rate),
            language_prefix: config.language_prefix.clone(),
            teardown_poll_interval: Duration::from_millis(config.teardown_poll_interval_ms),
            teardown_max_polls: config.teardown_max_polls,
            voice_probe_interval: Duration::from_millis(config.voice_probe_interval_ms),
            voice_probe_max_attempts: config.voice_probe_max_attempts,
        }
    }
}

/// Result of a play/pause toggle
pub enum PlayOutcome<E: SpeechEngine> {
    Started(NarrationGuard<E>),
    Paused,
    Resumed,
}

impl<E: SpeechEngine> fmt::Debug for PlayOutcome<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayOutcome::Started(guard) => f.debug_tuple("Started").field(guard).finish(),
            PlayOutcome::Paused => write!(f, "Paused"),
            PlayOutcome::Resumed => write!(f, "Resumed"),
        }
    }
}

/// Cloneable handle; clones share the engine and the playback state
pub struct NarrationCoordinator<E: SpeechEngine> {
    engine: Arc<E>,
    state: Arc<Mutex<CoordinatorState>>,
    settings: Arc<NarrationSettings>,
}

impl<E: SpeechEngine> Clone for NarrationCoordinator<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            state: Arc::clone(&self.state),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<E: SpeechEngine> NarrationCoordinator<E> {
    pub fn new(engine: Arc<E>, settings: NarrationSettings) -> Self {
        let state = CoordinatorState {
            rate: settings.default_rate,
            ..CoordinatorState::default()
        };
        Self {
            engine,
            state: Arc::new(Mutex::new(state)),
            settings: Arc::new(settings),
        }
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn settings(&self) -> &NarrationSettings {
        &self.settings
    }

    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn status(&self) -> PlaybackStatus {
        self.lock().status
    }

    pub fn is_playing(&self) -> bool {
        self.status() == PlaybackStatus::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.status() == PlaybackStatus::Paused
    }

    /// Utterance whose events are currently honoured
    pub fn active_utterance(&self) -> Option<UtteranceId> {
        self.lock().active_id()
    }

    /// Rate used for the next reading request
    pub fn rate(&self) -> SpeechRate {
        self.lock().rate
    }

    /// Stores the rate for the next request; an utterance already playing
    /// keeps its rate
    pub fn set_rate(&self, rate: SpeechRate) {
        self.lock().rate = rate;
        log::debug!("Speech rate set to {}", rate);
    }

    /// Moves the stored rate by `steps` rate steps (negative is slower),
    /// staying within range; returns the new rate
    pub fn step_rate(&self, steps: i32) -> SpeechRate {
        let mut state = self.lock();
        state.rate = state.rate.adjusted(steps as f32 * self.settings.rate_step);
        log::debug!("Speech rate stepped by {} to {}", steps, state.rate);
        state.rate
    }

    pub fn ensure_available(&self) -> NarrationResult<()> {
        if self.engine.is_available() {
            Ok(())
        } else {
            Err(NarrationError::Unsupported)
        }
    }

    /// Waits for the engine to publish its voices and caches those matching
    /// the configured language
    ///
    /// Some engines return an empty list until they have spoken once, so an
    /// empty utterance is queued to wake them before probing.
    pub fn load_voices(&self) -> NarrationResult<Vec<Voice>> {
        self.ensure_available()?;

        let mut all = self.engine.voices();
        if all.is_empty() {
            if !self.engine.is_speaking() {
                let id = self.lock().allocate_id();
                self.engine.speak(&Utterance::new(id, "", self.rate()));
            }

            for attempt in 1..=self.settings.voice_probe_max_attempts {
                thread::sleep(self.settings.voice_probe_interval);
                all = self.engine.voices();
                if !all.is_empty() {
                    log::debug!("Voices available after {} probe(s)", attempt);
                    break;
                }
            }
        }

        let voices: Vec<Voice> = matching_language(&all, &self.settings.language_prefix)
            .into_iter()
            .cloned()
            .collect();

        if voices.is_empty() {
            log::warn!(
                "No {}* voices found, the engine default voice will be used",
                self.settings.language_prefix
            );
        } else {
            log::info!("Loaded {} voice(s)", voices.len());
        }

        self.lock().voices = voices.clone();
        Ok(voices)
    }

    /// Best voice among the cached voices, or the engine's current list if
    /// none were loaded
    pub fn best_voice(&self) -> Option<Voice> {
        let cached = self.lock().voices.clone();
        let pool = if cached.is_empty() {
            self.engine.voices()
        } else {
            cached
        };

        let voice = select_voice(&pool, &self.settings.language_prefix).cloned();
        if voice.is_none() {
            log::warn!("No suitable voice found, using engine default");
        }
        voice
    }

    /// Play/pause toggle
    ///
    /// Pauses while playing, resumes while paused, and otherwise starts
    /// reading `text` at the stored rate.
    pub fn request_play(
        &self,
        text: &str,
        sink: Option<Box<dyn HighlightSink>>,
    ) -> NarrationResult<PlayOutcome<E>> {
        match self.status() {
            PlaybackStatus::Playing => {
                self.pause();
                Ok(PlayOutcome::Paused)
            }
            PlaybackStatus::Paused => {
                self.resume();
                Ok(PlayOutcome::Resumed)
            }
            PlaybackStatus::Stopped => {
                let rate = self.rate();
                self.play(text, rate, sink).map(PlayOutcome::Started)
            }
        }
    }

    /// Tears down anything active and starts reading `text`
    pub fn play(
        &self,
        text: &str,
        rate: SpeechRate,
        sink: Option<Box<dyn HighlightSink>>,
    ) -> NarrationResult<NarrationGuard<E>> {
        self.ensure_available()?;
        self.teardown()?;

        if text.trim().is_empty() {
            return Err(NarrationError::EmptyText);
        }
        Ok(self.start(UtteranceKind::Reading, text, rate, sink))
    }

    /// Speaks a single word at the pronunciation rate
    pub fn pronounce(&self, word: &str) -> NarrationResult<NarrationGuard<E>> {
        self.ensure_available()?;
        let word = word.trim();
        if word.is_empty() {
            return Err(NarrationError::EmptyText);
        }

        self.teardown()?;
        let rate = self.settings.pronounce_rate;
        Ok(self.start(UtteranceKind::Pronunciation, word, rate, None))
    }

    /// Pauses reading; returns false if nothing was playing
    pub fn pause(&self) -> bool {
        {
            let mut state = self.lock();
            let reading = state
                .active
                .as_ref()
                .is_some_and(|a| a.kind == UtteranceKind::Reading);
            if state.status != PlaybackStatus::Playing || !reading {
                return false;
            }
            state.status = PlaybackStatus::Paused;
        }
        self.engine.pause();
        log::debug!("Narration paused");
        true
    }

    /// Resumes reading; returns false if nothing was paused
    pub fn resume(&self) -> bool {
        {
            let mut state = self.lock();
            if state.status != PlaybackStatus::Paused {
                return false;
            }
            state.status = PlaybackStatus::Playing;
        }
        self.engine.resume();
        log::debug!("Narration resumed");
        true
    }

    /// The engine failure that ended the last utterance, if any; cleared
    /// once taken and when a new utterance starts
    pub fn take_error(&self) -> Option<NarrationError> {
        self.lock().last_error.take()
    }

    /// Tears down the active utterance, if any
    pub fn stop(&self) -> NarrationResult<()> {
        self.teardown()
    }

    /// Routes an engine event to the active utterance
    ///
    /// Returns false when the event was ignored, either because it belongs
    /// to an utterance that was already torn down or because it changed
    /// nothing.
    pub fn handle_event(&self, id: UtteranceId, event: EngineEvent) -> bool {
        let mut state = self.lock();
        let Some(kind) = state.active.as_ref().filter(|a| a.id == id).map(|a| a.kind) else {
            log::debug!("Ignoring {:?} for stale utterance {}", event, id);
            return false;
        };
        let reading = kind == UtteranceKind::Reading;

        match event {
            EngineEvent::Started => {
                log::debug!("Utterance {} started", id);
                if reading && state.status == PlaybackStatus::Stopped {
                    state.status = PlaybackStatus::Playing;
                }
                reading
            }
            EngineEvent::Paused => {
                if reading {
                    state.status = PlaybackStatus::Paused;
                }
                reading
            }
            EngineEvent::Resumed => {
                if reading {
                    state.status = PlaybackStatus::Playing;
                }
                reading
            }
            EngineEvent::Ended => {
                log::info!("Utterance {} finished", id);
                state.detach();
                true
            }
            EngineEvent::Error(message) => {
                log::error!("Speech synthesis error on utterance {}: {}", id, message);
                state.detach();
                state.last_error = Some(NarrationError::Engine(message));
                true
            }
            EngineEvent::Boundary {
                char_index,
                char_length,
            } => {
                let step = state
                    .active
                    .as_mut()
                    .and_then(|active| active.on_boundary(char_index, char_length));
                // Sinks may call back into the coordinator
                drop(state);
                match step {
                    Some((step, sink)) => {
                        sink.apply(step);
                        true
                    }
                    None => false,
                }
            }
        }
    }

    fn start(
        &self,
        kind: UtteranceKind,
        text: &str,
        rate: SpeechRate,
        sink: Option<Box<dyn HighlightSink>>,
    ) -> NarrationGuard<E> {
        let voice = self.best_voice();
        let sink = sink.map(SinkHandle::new);

        let utterance = {
            let mut state = self.lock();
            let id = state.allocate_id();
            state.last_error = None;
            state.active = Some(ActiveUtterance::new(id, kind, text.to_string(), sink));
            if kind == UtteranceKind::Reading {
                state.status = PlaybackStatus::Playing;
            }
            Utterance::new(id, text, rate).with_voice(voice)
        };

        // Lock released first: engines may deliver events synchronously
        self.engine.speak(&utterance);
        log::info!(
            "Started {:?} utterance {} at {} with voice {}",
            kind,
            utterance.id,
            rate,
            utterance
                .voice
                .as_ref()
                .map_or("<default>", |v| v.name.as_str())
        );

        NarrationGuard::new(self.clone(), utterance.id)
    }

    fn teardown(&self) -> NarrationResult<()> {
        if let Some(previous) = self.lock().detach() {
            log::debug!("Detached utterance {}", previous.id);
        }

        if !self.engine.is_available() {
            return Ok(());
        }

        if self.engine.is_busy() {
            self.engine.cancel();
        }

        let mut polls = 0;
        while self.engine.is_busy() {
            if polls >= self.settings.teardown_max_polls {
                log::warn!("Speech engine still busy after {} checks", polls);
                return Err(NarrationError::TeardownTimeout { polls });
            }
            thread::sleep(self.settings.teardown_poll_interval);
            polls += 1;
        }
        Ok(())
    }

    fn stop_if_current(&self, id: UtteranceId) {
        if self.active_utterance() != Some(id) {
            return;
        }
        if let Err(e) = self.teardown() {
            log::warn!("Failed to stop utterance {}: {}", id, e);
        }
    }
}

/// Stops its utterance when dropped, unless detached or already replaced
#[must_use = "dropping the guard stops the utterance immediately"]
pub struct NarrationGuard<E: SpeechEngine> {
    coordinator: NarrationCoordinator<E>,
    id: UtteranceId,
    armed: bool,
}

impl<E: SpeechEngine> NarrationGuard<E> {
    fn new(coordinator: NarrationCoordinator<E>, id: UtteranceId) -> Self {
        Self {
            coordinator,
            id,
            armed: true,
        }
    }

    pub fn id(&self) -> UtteranceId {
        self.id
    }

    /// True while this guard's utterance is the coordinator's active one
    pub fn is_active(&self) -> bool {
        self.coordinator.active_utterance() == Some(self.id)
    }

    /// Lets the utterance outlive the guard
    pub fn detach(mut self) -> UtteranceId {
        self.armed = false;
        self.id
    }
}

impl<E: SpeechEngine> fmt::Debug for NarrationGuard<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarrationGuard")
            .field("id", &self.id)
            .field("armed", &self.armed)
            .finish()
    }
}

impl<E: SpeechEngine> Drop for NarrationGuard<E> {
    fn drop(&mut self) {
        if self.armed {
            self.coordinator.stop_if_current(self.id);
        }
    }
}
