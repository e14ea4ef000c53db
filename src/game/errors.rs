use thiserror::Error;

/// Errors that can arise while interacting with the profile storage layer.
#[derive(Debug, Error)]
pub enum GameError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around serde_json errors for JSON-valued keys.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when looking up a catalog entry that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal error (poisoned locks, unexpected conditions).
    #[error("internal error: {0}")]
    Internal(String),
}
