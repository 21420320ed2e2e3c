//! Password hashing for Breadbox.
//!
//! Passwords are stored as Argon2id PHC strings
//! (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so every stored hash
//! carries the parameters it was produced with and can be verified after the
//! defaults change.

mod error;
mod password;

pub use error::{CryptoError, CryptoResult};
pub use password::{KdfParams, PasswordHasher};
