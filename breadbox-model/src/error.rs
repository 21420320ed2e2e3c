//! Configuration errors for resource definitions.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building or reading resource configuration.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The details blob of a field is not valid JSON or has the wrong shape.
    #[error("invalid details for field '{field}': {source}")]
    InvalidDetails {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// The details blob decoded but violates a per-type constraint.
    #[error("invalid options for field '{field}': {reason}")]
    InvalidOptions { field: String, reason: String },

    /// Two fields of one resource share a name.
    #[error("duplicate field '{field}' in resource '{resource}'")]
    DuplicateField { resource: String, field: String },

    /// A resource slug was registered twice.
    #[error("duplicate resource '{0}'")]
    DuplicateResource(String),

    /// A relationship points at a model that is not registered.
    #[error("field '{field}' of resource '{resource}' references unknown model '{model}'")]
    UnknownRelationshipTarget {
        resource: String,
        field: String,
        model: String,
    },

    /// Stored data could not be mapped onto a model type.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
