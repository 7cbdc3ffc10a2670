use thiserror::Error;

use crate::llm::LlmError;

/// Errors from session store operations.
///
/// A missing session is not an error: `load` returns `None` and `delete`
/// returns `false`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid session identifier: '{0}' is empty after sanitization")]
    InvalidIdentifier(String),

    #[error("failed to read session '{key}': {message}")]
    Read { key: String, message: String },

    #[error("failed to write session '{key}': {message}")]
    Write { key: String, message: String },
}

/// Errors from a single chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid session identifier: '{0}' is empty after sanitization")]
    InvalidIdentifier(String),

    /// Caller history carried a `system` entry at `index`.
    #[error("history entry {index} has role 'system'; only user and assistant turns are accepted")]
    InvalidHistory { index: usize },

    #[error(transparent)]
    Provider(#[from] LlmError),

    /// The provider answered but the updated transcript could not be saved.
    /// The generated reply is kept so the caller can still show it.
    #[error("reply generated but not persisted: {source}")]
    Persistence { reply: String, source: StoreError },
}

/// Errors while building a configuration snapshot.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("failed to load {path}: {message}")]
    Dotenv { path: String, message: String },
}
