//! Error types for the sleepwatch_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sleepwatch_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP transport error (connect, DNS, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The sleep provider answered with a non-success status
    #[error("Sleep provider error: {status} {reason}")]
    Provider {
        status: u16,
        reason: String,
        /// Provider error body, when it was valid JSON
        body: Option<serde_json::Value>,
    },

    /// The notification webhook answered with a non-success status
    #[error("Webhook returned HTTP {status}")]
    Webhook { status: u16, body: String },

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
