//! Error types for the Med-Echo skill.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a skill invocation.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The label service answered but had nothing usable
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// The messaging service rejected a send
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Intent name the skill does not handle
    #[error("Invalid intent: {0}")]
    InvalidIntent(String),

    /// Request type the skill does not handle
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
