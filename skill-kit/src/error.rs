//! Error types for skill dispatch.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by skill handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while parsing, routing or serializing a skill request.
#[derive(Error, Debug)]
pub enum Error {
    /// Inbound event is missing a required field or has an unknown request type
    #[error("Schema error: {0}")]
    Schema(String),

    /// Application ID on the event does not match the configured skill
    #[error("Authentication error: expected application id '{expected}', received '{received}'")]
    Authentication { expected: String, received: String },

    /// Non-intent request type with no registered handler
    #[error("No handler registered for request type: {0}")]
    UnregisteredHandler(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error raised by a skill handler, passed through untouched
    #[error(transparent)]
    Handler(BoxError),
}

impl Error {
    /// Get the HTTP-style status code the invoking platform should see.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Schema(_) => 400,
            Error::Authentication { .. } => 401,
            _ => 500,
        }
    }
}
