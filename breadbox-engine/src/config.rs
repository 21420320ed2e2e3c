//! Engine configuration.
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! default_disk = "public"
//! default_locale = "en"
//! max_menu_depth = 16
//! timestamp_format = "%Y-%m-%d %H:%M:%S"
//!
//! [password]
//! memory_cost = 19456
//! time_cost = 2
//! parallelism = 1
//! ```

use std::path::Path;

use breadbox_crypto::{KdfParams, PasswordHasher};
use breadbox_model::check_datetime_format;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Disk used by upload fields that do not name one.
    pub default_disk: String,
    /// Locale whose `*_i18n` value becomes the stored field value.
    pub default_locale: String,
    /// Deepest menu nesting accepted by a reorder.
    pub max_menu_depth: usize,
    /// chrono format for normalized timestamps.
    pub timestamp_format: String,
    pub password: PasswordConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_disk: "public".to_string(),
            default_locale: "en".to_string(),
            max_menu_depth: 16,
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            password: PasswordConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects a `timestamp_format` chrono cannot render.
    pub fn validate(&self) -> EngineResult<()> {
        check_datetime_format(&self.timestamp_format)
            .map_err(|reason| EngineError::Configuration(format!("timestamp_format: {reason}")))
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn hasher(&self) -> PasswordHasher {
        PasswordHasher::new(KdfParams::from(&self.password))
    }
}

/// Argon2id cost parameters for password fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let params = KdfParams::default();
        Self {
            memory_cost: params.memory_cost,
            time_cost: params.time_cost,
            parallelism: params.parallelism,
        }
    }
}

impl From<&PasswordConfig> for KdfParams {
    fn from(config: &PasswordConfig) -> Self {
        KdfParams {
            memory_cost: config.memory_cost,
            time_cost: config.time_cost,
            parallelism: config.parallelism,
        }
    }
}
