//! Server errors.

use thiserror::Error;

/// Errors raised while configuring or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// Socket bind or serve failure.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
