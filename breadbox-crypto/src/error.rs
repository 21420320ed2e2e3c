//! Error types for password hashing.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while hashing or verifying passwords.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The Argon2 parameters are out of range.
    #[error("invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// A stored hash is not a valid PHC string.
    #[error("invalid password hash: {0}")]
    InvalidHash(String),
}
