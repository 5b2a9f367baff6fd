//! Crate-level error type.
//!
//! The engine itself never fails: ambiguous input defers, out-of-range
//! lookups fall back to defaults. Only configuration and persistence I/O
//! surface errors, and they are gathered here.

pub use crate::config::ConfigError;
pub use crate::store::StoreError;

/// Every failure the crate can return. Module errors convert with `?`.
///
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raw mode, alternate screen or draw failures in the demo shell.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A global logger was already installed.
    #[error("Logger error: {0}")]
    Logger(String),
}

pub type AppResult<T> = Result<T, AppError>;
