// Error types for the lifecycle engine

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for lifecycle engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while driving an event through its lifecycle
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input rejected before any state mutation
    #[error("validation error: {0}")]
    Validation(String),

    /// Event id does not resolve to a record (distinct from an OTP mismatch)
    #[error("event not found: {0}")]
    NotFound(Uuid),

    /// Submitted code does not match the stored one; no mutation performed
    #[error("invalid OTP")]
    OtpMismatch,

    /// OTP dispatch channel failure
    #[error("OTP dispatch error: {0}")]
    Dispatch(String),

    /// Store unreachable or write failure
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl EngineError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(event_id: Uuid) -> Self {
        EngineError::NotFound(event_id)
    }

    /// Create a dispatch error
    pub fn dispatch(msg: impl Into<String>) -> Self {
        EngineError::Dispatch(msg.into())
    }
}
