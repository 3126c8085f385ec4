//! Centralized error types for webhook handling.

use thiserror::Error;

/// Main error type for webhook validation.
#[derive(Error, Debug)]
pub enum ConfettiError {
    #[error("Missing webhook signature header")]
    MissingSignature,

    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Webhook timestamp is {age_ms}ms away from server time (tolerance {tolerance_ms}ms)")]
    StaleTimestamp { age_ms: u64, tolerance_ms: u64 },

    #[error("Completed update is missing the previous state type")]
    MissingPreviousState,

    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for webhook operations.
pub type ConfettiResult<T> = Result<T, ConfettiError>;

impl ConfettiError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error means the caller could not be authenticated.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::MissingSignature | Self::InvalidSignature | Self::StaleTimestamp { .. }
        )
    }
}
