//! Change notifications.
//!
//! Events are emitted after a record has been added, updated, or deleted and
//! after a file has been removed from a disk. They are fire-and-forget: the
//! engine never waits for a consumer.

use crate::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new event ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// What happened to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeAction {
    Added,
    Updated,
    Deleted,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Added => "Added",
            Self::Updated => "Updated",
            Self::Deleted => "Deleted",
        };
        f.write_str(label)
    }
}

/// The payload of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum EventPayload {
    /// A record of a resource changed.
    RecordChanged {
        /// Slug of the resource type (e.g., "posts").
        resource: String,
        record_id: RecordId,
        /// Full JSON representation of the record after the change
        /// (before it, for deletions).
        json_data: String,
        action: ChangeAction,
    },

    /// A stored file was removed.
    FileDeleted {
        /// Logical disk name.
        disk: String,
        path: String,
    },
}

/// A change notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub occurred_at: DateTime<Utc>,
    pub payload: EventPayload,
}

impl Event {
    /// Creates a new event stamped with the current time.
    #[must_use]
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: EventId::new(),
            occurred_at: Utc::now(),
            payload,
        }
    }

    /// Creates a record-changed event.
    #[must_use]
    pub fn record_changed(
        resource: impl Into<String>,
        record_id: RecordId,
        json_data: impl Into<String>,
        action: ChangeAction,
    ) -> Self {
        Self::new(EventPayload::RecordChanged {
            resource: resource.into(),
            record_id,
            json_data: json_data.into(),
            action,
        })
    }

    /// Creates a file-deleted event.
    #[must_use]
    pub fn file_deleted(disk: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(EventPayload::FileDeleted {
            disk: disk.into(),
            path: path.into(),
        })
    }

    /// Returns the action label for record events.
    pub fn action(&self) -> Option<ChangeAction> {
        match &self.payload {
            EventPayload::RecordChanged { action, .. } => Some(*action),
            EventPayload::FileDeleted { .. } => None,
        }
    }
}
