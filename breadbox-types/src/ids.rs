//! Identifier types used throughout Breadbox.
//!
//! Records use positive integer keys handed out by the record store on
//! first save, so an unsaved record simply has no id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Primary key of a persisted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wraps a raw key.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw key.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Interprets a JSON value as a record id.
    ///
    /// Accepts integers and integer strings, which is how ids arrive from
    /// form submissions.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, Error> {
        match value {
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self)
                .ok_or_else(|| Error::InvalidRecordId(n.to_string())),
            serde_json::Value::String(s) => s.trim().parse(),
            other => Err(Error::InvalidRecordId(other.to_string())),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| Error::InvalidRecordId(s.to_string()))
    }
}

impl From<i64> for RecordId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<RecordId> for serde_json::Value {
    fn from(id: RecordId) -> Self {
        serde_json::Value::from(id.0)
    }
}
