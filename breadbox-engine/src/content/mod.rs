//! Content dispatcher and field-type handlers.
//!
//! Each [`FieldType`] maps to one [`ContentType`] through a static table.
//! A handler reads the field's raw request value (and uploads) and produces
//! [`Content`]: a value to store, a set of ids to sync through a pivot
//! table, or nothing.

mod checkbox;
mod coordinates;
mod password;
mod relationship;
pub mod select;
mod text;
pub mod timestamp;
mod upload;

use breadbox_crypto::PasswordHasher;
use breadbox_model::{FieldDefinition, FieldType};
use breadbox_storage::DiskManager;
use breadbox_types::RecordId;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::request::RequestInput;

pub use checkbox::Checkbox;
pub use coordinates::Coordinates;
pub use password::Password;
pub use relationship::Relationship;
pub use select::SelectMultiple;
pub use text::Text;
pub use timestamp::Timestamp;
pub use upload::{MultipleImages, SingleUpload};
pub(crate) use upload::{decode_paths, merge_paths};

/// What a handler produced for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Store this value on the record.
    Value(Value),
    /// Replace the record's related ids in a pivot table.
    Sync(Vec<RecordId>),
    /// Nothing usable was submitted.
    NoContent,
}

/// Handler output together with the attribute it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub target_field: String,
    pub content: Content,
}

/// Everything a handler may look at.
pub struct HandlerContext<'a> {
    pub request: &'a dyn RequestInput,
    /// Slug of the resource being written.
    pub slug: &'a str,
    pub field: &'a FieldDefinition,
    pub disks: &'a DiskManager,
    pub hasher: &'a PasswordHasher,
    pub config: &'a EngineConfig,
    pub now: DateTime<Utc>,
}

impl HandlerContext<'_> {
    /// The raw request value under the field's target key.
    pub fn value(&self) -> Option<&Value> {
        self.request.input(self.field.target_field())
    }

    /// The raw value, treating JSON null as absent.
    pub fn present_value(&self) -> Option<&Value> {
        self.value().filter(|v| !v.is_null())
    }
}

/// A field-type handler.
pub trait ContentType: Sync {
    fn produce(&self, ctx: &HandlerContext<'_>) -> EngineResult<Content>;
}

/// The handler for a field type.
pub fn handler_for(field_type: FieldType) -> &'static dyn ContentType {
    match field_type {
        FieldType::Password => &Password,
        FieldType::Checkbox => &Checkbox,
        FieldType::File | FieldType::Image => &SingleUpload,
        FieldType::MultipleImages => &MultipleImages,
        FieldType::SelectMultiple => &SelectMultiple,
        FieldType::Relationship => &Relationship,
        FieldType::Timestamp => &Timestamp,
        FieldType::Coordinates => &Coordinates,
        FieldType::Text => &Text,
    }
}

/// Runs the handler for the context's field.
pub fn dispatch(ctx: &HandlerContext<'_>) -> EngineResult<Dispatched> {
    let content = handler_for(ctx.field.field_type).produce(ctx)?;
    Ok(Dispatched {
        target_field: ctx.field.target_field().to_string(),
        content,
    })
}

/// Text form of a scalar request value. Arrays, objects and null have none.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// True for null, empty or whitespace strings, and empty arrays / objects.
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
