//! Progress storage errors

use lexiread_core::AppError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Failed to read progress file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write progress file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create progress directory {path}: {source}")]
    DirectoryCreationError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed progress at '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode progress: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

pub type ProgressResult<T> = Result<T, ProgressError>;

impl From<ProgressError> for AppError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::Malformed { key, source } => AppError::CorruptedProgress {
                key,
                reason: source.to_string(),
            },
            ProgressError::InvalidKey(key) => AppError::InvalidArgument {
                argument: key,
                reason: "not a valid storage key".to_string(),
            },
            other => AppError::storage("Reading progress unavailable", other),
        }
    }
}
