use lexiread_core::AppError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NarrationError {
    #[error("Speech synthesis is not supported on this device")]
    Unsupported,

    #[error("Nothing to read")]
    EmptyText,

    #[error("Speech rate must be between {min} and {max}, got {value}")]
    InvalidRate { value: f32, min: f32, max: f32 },

    #[error("Speech engine did not become idle after {polls} checks")]
    TeardownTimeout { polls: u32 },

    #[error("Speech engine error: {0}")]
    Engine(String),
}

impl NarrationError {
    /// Message suitable for showing to the reader
    pub fn user_message(&self) -> String {
        match self {
            Self::Unsupported => "Read-aloud is not supported on your device.".to_string(),
            Self::EmptyText => "There is no text to read on this page.".to_string(),
            Self::InvalidRate { min, max, .. } => {
                format!("Choose a reading speed between {}x and {}x.", min, max)
            }
            Self::TeardownTimeout { .. } | Self::Engine(_) => {
                "Read-aloud stopped unexpectedly. Please try again.".to_string()
            }
        }
    }
}

pub type NarrationResult<T> = Result<T, NarrationError>;

impl From<NarrationError> for AppError {
    fn from(err: NarrationError) -> Self {
        match err {
            NarrationError::Unsupported => AppError::NarrationUnsupported,
            NarrationError::InvalidRate { value, .. } => AppError::InvalidArgument {
                argument: "rate".to_string(),
                reason: format!("{} is out of range", value),
            },
            other => AppError::NarrationFailed {
                message: other.to_string(),
            },
        }
    }
}
