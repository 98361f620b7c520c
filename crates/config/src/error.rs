use lexiread_core::AppError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },

    #[error("cannot write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },

    #[error("{path} is not a valid config file: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("cannot encode config as TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// One or more fields are out of range; the message lists them all
    #[error("invalid config: {0}")]
    ValidationError(String),

    #[error("cannot upgrade config to version {version}: {reason}")]
    MigrationError { version: u32, reason: String },

    #[error("cannot create config directory {path}: {source}")]
    DirectoryCreationError { path: PathBuf, source: io::Error },

    /// No home directory, or the config path has no parent
    #[error("no usable config location: {reason}")]
    PathResolutionError { reason: String },

    #[error("cannot back up the previous config: {source}")]
    BackupError { source: io::Error },

    #[error(transparent)]
    IoError(#[from] io::Error),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ParseError { path, .. } => AppError::ConfigurationCorrupted { path },
            ConfigError::ValidationError(reason) => AppError::InvalidConfiguration {
                setting: "config".to_string(),
                value: String::new(),
                reason,
            },
            ConfigError::ReadError { path, source } | ConfigError::WriteError { path, source } => {
                AppError::IoError {
                    message: format!("config file {}", path.display()),
                    source,
                }
            }
            other => AppError::InternalError {
                message: other.to_string(),
            },
        }
    }
}

/// A config field holding an unusable value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{field} {message}{}",
    .value.as_ref().map(|v| format!(" (got {})", v)).unwrap_or_default()
)]
pub struct ValidationError {
    /// Dotted path, e.g. `reader.default_font_size`
    pub field: String,
    pub message: String,
    pub value: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    pub fn with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::new(field, message)
        }
    }
}
