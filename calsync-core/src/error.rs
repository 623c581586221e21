//! Error types for the calsync ecosystem.

use thiserror::Error;

/// Errors that can occur in calsync operations.
#[derive(Error, Debug)]
pub enum CalSyncError {
    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Failed to save events: {0}")]
    Persistence(String),

    #[error("Authorization required")]
    MissingToken,

    #[error("Invalid authorization token")]
    UnknownToken,

    #[error("Insufficient permissions")]
    Forbidden {
        required: Vec<String>,
        has: Vec<String>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for calsync operations.
pub type CalSyncResult<T> = Result<T, CalSyncError>;
