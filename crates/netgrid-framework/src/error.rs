//! Framework error types.

use thiserror::Error;

/// Result type alias for framework operations.
pub type FrameworkResult<T> = Result<T, FrameworkError>;

/// Errors raised by the host framework model.
#[derive(Debug, Error)]
pub enum FrameworkError {
    #[error("argument {key}: expected {expected}, found {found}")]
    ArgumentType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("plugin already registered: {0}")]
    DuplicatePlugin(String),

    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),
}
