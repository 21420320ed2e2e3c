//! Engine error taxonomy.

use breadbox_crypto::CryptoError;
use breadbox_model::ModelError;
use breadbox_storage::StorageError;
use breadbox_types::RecordId;

use crate::validation::ValidationErrors;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The resource schema is inconsistent (e.g., a relationship field with
    /// no options, or a target that is not registered).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Submitted values broke one or more rules. Nothing was written.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// No resource type is registered under this slug.
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// A referenced record does not exist.
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: RecordId },

    /// A submitted value could not be interpreted for its field type.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// A submitted menu tree nests deeper than allowed.
    #[error("menu nesting exceeds {max} levels")]
    MenuTooDeep { max: usize },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn not_found(resource: &str, id: RecordId) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id,
        }
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True for both missing resource types and missing records.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::UnknownResource(_))
    }

    /// Per-field messages, when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
