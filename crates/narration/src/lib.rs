//! Lexiread narration - read-aloud playback on top of a platform speech engine
//!
//! The coordinator owns the only handle to the engine and guarantees that
//! at most one utterance is audible: every new utterance is preceded by a
//! full teardown of the previous one.

mod coordinator;
mod engine;
mod error;
mod highlight;
mod rate;
mod simulated;
mod state;
mod voice;

pub use coordinator::{NarrationCoordinator, NarrationGuard, NarrationSettings, PlayOutcome};
pub use engine::{word_boundaries, EngineEvent, SpeechEngine, Utterance, UtteranceId};
pub use error::{NarrationError, NarrationResult};
pub use highlight::{boundary_word_index, HighlightSink, HighlightStep, HighlightTracker};
pub use rate::SpeechRate;
pub use simulated::{EngineCall, SimulatedEngine};
pub use state::{PlaybackStatus, UtteranceKind};
pub use voice::{matching_language, select_voice, Voice};

pub type Result<T> = std::result::Result<T, NarrationError>;
