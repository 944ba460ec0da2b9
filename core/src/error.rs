//! Error types for the Front API client.
//!
//! # Design
//! Construction problems (`MissingApiKey`, `InvalidEndpoint`, `Config`) are
//! returned as `Err` straight away. Everything that can go wrong during a
//! call is carried inside the call's `Outcome` instead, so a failed request
//! still leaves its request/response record behind for inspection.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("an API key is required")]
    MissingApiKey,

    /// The endpoint is not an absolute http(s) URL.
    #[error("invalid API endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// Network, TLS or timeout failure. Carries the transport's message as is.
    #[error("{0}")]
    Transport(String),

    /// The payload decoded fine but describes an API-level failure.
    #[error("{status}: {detail}")]
    Api { status: i64, detail: String },

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Failure reported by a `Transport` when no HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::Transport(e.message)
    }
}
