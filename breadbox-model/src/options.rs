//! Per-type field options.
//!
//! Each type tag owns one options struct. Unknown keys in the details blob
//! are ignored so that presentation-only settings (widths, placeholders,
//! thumbnail presets) can live next to the ones the engine reads.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Decoded options, one variant per handler family.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOptions {
    Text(TextOptions),
    Password,
    Checkbox(CheckboxOptions),
    /// Shared by `file`, `image` and `multiple_images`.
    Upload(UploadOptions),
    SelectMultiple(SelectOptions),
    Relationship(RelationshipOptions),
    Timestamp(TimestampOptions),
    Coordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextOptions {
    /// A submitted value equal to this string is stored as null.
    #[serde(default)]
    pub null: Option<String>,
}

/// Labels shown next to the toggle. The stored value is always a boolean.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckboxOptions {
    #[serde(default)]
    pub on: Option<String>,
    #[serde(default)]
    pub off: Option<String>,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadOptions {
    /// Overrides the configured default disk.
    #[serde(default)]
    pub disk: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectOptions {
    /// Selectable values mapped to their labels.
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
    #[serde(default)]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimestampOptions {
    /// chrono format string for the stored value.
    #[serde(default)]
    pub format: Option<String>,
}

impl TimestampOptions {
    pub(crate) fn check(&self) -> Result<(), String> {
        match &self.format {
            Some(format) => check_datetime_format(format),
            None => Ok(()),
        }
    }
}

/// Rejects chrono format strings that would fail when rendering.
pub fn check_datetime_format(format: &str) -> Result<(), String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(format!("'{format}' is not a valid date format"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipKind {
    #[serde(rename = "belongsTo")]
    BelongsTo,
    #[serde(rename = "belongsToMany")]
    BelongsToMany,
    #[serde(rename = "hasOne")]
    HasOne,
    #[serde(rename = "hasMany")]
    HasMany,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipOptions {
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    /// Target resource, by slug or model name.
    pub model: String,
    /// Foreign-key column written by `belongsTo`.
    #[serde(default)]
    pub column: Option<String>,
    /// Key on the target used for display lookups.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub pivot_table: Option<String>,
}

impl RelationshipOptions {
    pub fn belongs_to(model: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            kind: RelationshipKind::BelongsTo,
            model: model.into(),
            column: Some(column.into()),
            key: Some("id".to_string()),
            label: None,
            pivot_table: None,
        }
    }

    pub fn belongs_to_many(model: impl Into<String>, pivot_table: impl Into<String>) -> Self {
        Self {
            kind: RelationshipKind::BelongsToMany,
            model: model.into(),
            column: None,
            key: Some("id".to_string()),
            label: None,
            pivot_table: Some(pivot_table.into()),
        }
    }

    pub fn is_belongs_to_many(&self) -> bool {
        self.kind == RelationshipKind::BelongsToMany
    }

    /// `hasOne` / `hasMany` keys live on the other side and are never
    /// written from this resource's form.
    pub fn is_read_only(&self) -> bool {
        matches!(self.kind, RelationshipKind::HasOne | RelationshipKind::HasMany)
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("relationship model must not be empty".to_string());
        }
        match self.kind {
            RelationshipKind::BelongsToMany if blank(&self.pivot_table) => {
                Err("belongsToMany relationship requires pivot_table".to_string())
            }
            RelationshipKind::BelongsTo if blank(&self.column) => {
                Err("belongsTo relationship requires column".to_string())
            }
            _ => Ok(()),
        }
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
