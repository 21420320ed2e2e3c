//! Argon2id password hashing.

use crate::error::{CryptoError, CryptoResult};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Argon2 cost parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Parallelism factor.
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        // OWASP recommendations for Argon2id (2023)
        Self {
            memory_cost: 19 * 1024, // 19 MiB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Parameters for tests (fast but insecure).
    pub fn test() -> Self {
        Self {
            memory_cost: 1024, // 1 MiB
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// Hashes and verifies passwords with fixed cost parameters.
#[derive(Clone, Debug)]
pub struct PasswordHasher {
    params: KdfParams,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(KdfParams::default())
    }
}

impl PasswordHasher {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &KdfParams {
        &self.params
    }

    fn argon2(&self) -> CryptoResult<Argon2<'static>> {
        let params = Params::new(
            self.params.memory_cost,
            self.params.time_cost,
            self.params.parallelism,
            None,
        )
        .map_err(|e| CryptoError::InvalidParams(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hashes a password with a fresh random salt and returns the PHC string.
    pub fn hash(&self, password: &str) -> CryptoResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CryptoError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Checks a password against a stored PHC string.
    ///
    /// Returns `Ok(false)` on mismatch; a malformed hash is an error.
    pub fn verify(&self, password: &str, stored: &str) -> CryptoResult<bool> {
        let parsed = PasswordHash::new(stored).map_err(|e| CryptoError::InvalidHash(e.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CryptoError::InvalidHash(e.to_string())),
        }
    }
}
