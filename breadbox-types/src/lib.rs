//! Core type definitions for Breadbox.
//!
//! This crate defines the small, resource-agnostic types shared by every
//! other crate in the workspace:
//! - Record identifiers (integer keys assigned by the record store)
//! - Event identifiers (UUID v7)
//! - Change events emitted after records are added, updated, or deleted
//!   and after files are removed from a disk
//!
//! Resource-specific structure (field definitions, options, records) lives
//! in `breadbox-model`.

mod event;
mod ids;

pub use event::{ChangeAction, Event, EventId, EventPayload};
pub use ids::RecordId;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid record id: {0}")]
    InvalidRecordId(String),
}
