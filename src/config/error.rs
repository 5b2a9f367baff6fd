//! Errors raised while reading or writing `config.yml`.

use std::path::PathBuf;

/// Configuration failures. The engine itself never sees these: a config that
/// fails to load stops the binary before any input is processed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file path not set")]
    FilePathNotSet,

    #[error("Failed to find home directory")]
    HomeDirectoryNotFound,

    #[error("Failed to read configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to write configuration to {path}: {source}")]
    SaveFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create configuration directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode configuration: {0}")]
    SerializationFailed(String),

    #[error("Failed to parse configuration: {0}")]
    DeserializationFailed(String),

    /// A tuning value is outside the range the engine can work with.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
