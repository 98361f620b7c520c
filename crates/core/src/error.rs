//! Application error type shared by every Lexiread crate
//!
//! Crate-level errors convert into `AppError`, which tells the caller two
//! things besides the message: how bad it is (`ErrorSeverity`) and what to
//! do next (`RecoveryAction`). Reading must keep working through any
//! `Recoverable` or `Degraded` error.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// What the caller should do about an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Try again on the next user action
    RetryImmediate,
    /// Hide the feature for this session (e.g. the read-aloud button)
    DisableFeature,
    /// Forget the stored value
    DiscardState,
    /// Fall back to `config.toml.backup`
    RestoreBackup,
    /// Show the subscription offer
    Upgrade,
    UserIntervention,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::RetryImmediate => "retry",
            Self::DisableFeature => "disable feature",
            Self::DiscardState => "discard stored state",
            Self::RestoreBackup => "restore backup",
            Self::Upgrade => "offer upgrade",
            Self::UserIntervention => "ask the user",
        };
        f.write_str(text)
    }
}

/// Ordered from least to most serious
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Recoverable,
    /// A feature is unavailable but reading continues
    Degraded,
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Recoverable => "recoverable",
            Self::Degraded => "degraded",
            Self::Fatal => "fatal",
        };
        f.write_str(text)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Progress store read or write failed
    #[error("Storage error: {message}")]
    StorageError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Stored reading progress could not be decoded
    #[error("Corrupted progress at '{key}': {reason}")]
    CorruptedProgress { key: String, reason: String },

    #[error("Speech synthesis is not supported on this device")]
    NarrationUnsupported,

    /// Speech engine reported a failure mid-utterance
    #[error("Narration failed: {message}")]
    NarrationFailed { message: String },

    /// Story is above the entry level and the reader has no subscription
    #[error("Premium required for story {story}")]
    PremiumRequired { story: String },

    /// Entry-level story outside today's rotation
    #[error("Daily access expired for story {story}")]
    DailyAccessExpired { story: String },

    #[error("Invalid configuration: {setting} = '{value}' ({reason})")]
    InvalidConfiguration {
        setting: String,
        value: String,
        reason: String,
    },

    #[error("Configuration corrupted: {path}")]
    ConfigurationCorrupted { path: PathBuf },

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },

    #[error("Invalid argument: {argument} - {reason}")]
    InvalidArgument { argument: String, reason: String },
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::StorageError { .. } | Self::NarrationFailed { .. } => ErrorSeverity::Recoverable,
            Self::ConfigurationCorrupted { .. } => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Degraded,
        }
    }

    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::StorageError { .. } | Self::NarrationFailed { .. } => {
                RecoveryAction::RetryImmediate
            }
            Self::NarrationUnsupported => RecoveryAction::DisableFeature,
            Self::CorruptedProgress { .. } => RecoveryAction::DiscardState,
            Self::ConfigurationCorrupted { .. } => RecoveryAction::RestoreBackup,
            Self::PremiumRequired { .. } => RecoveryAction::Upgrade,
            _ => RecoveryAction::UserIntervention,
        }
    }

    /// Text for a notice shown to the reader; never includes internals
    pub fn user_message(&self) -> String {
        let text = match self {
            Self::StorageError { .. } => "Your reading position could not be saved this time.",
            Self::CorruptedProgress { .. } => {
                "Your saved reading position was unreadable and has been reset."
            }
            Self::NarrationUnsupported => "Read-aloud is not supported on this device.",
            Self::NarrationFailed { .. } => {
                "Read-aloud stopped unexpectedly. Tap play to try again."
            }
            Self::PremiumRequired { .. } => "You need a Premium membership to read this story.",
            Self::DailyAccessExpired { .. } => {
                "Today's access to this story has ended. Discover new stories tomorrow!"
            }
            Self::InvalidConfiguration { setting, .. } => {
                return format!("Invalid setting: {}. Please check your configuration.", setting)
            }
            Self::ConfigurationCorrupted { .. } => {
                "App settings are corrupted. Resetting to defaults..."
            }
            Self::IoError { .. } => "A file operation failed. Please try again.",
            Self::InternalError { .. } => "An unexpected error occurred. Please try again.",
            Self::InvalidArgument { .. } => "Invalid input provided.",
        };
        text.to_string()
    }

    pub fn is_retryable(&self) -> bool {
        self.recovery_action() == RecoveryAction::RetryImmediate
    }

    /// Storage error wrapping its cause
    pub fn storage<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::StorageError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
