//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File or record not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A path escapes the disk root or is otherwise unusable.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// No disk is registered under this name.
    #[error("unknown disk: {0}")]
    UnknownDisk(String),

    /// A previous holder of the connection lock panicked.
    #[error("storage lock poisoned")]
    Poisoned,
}
