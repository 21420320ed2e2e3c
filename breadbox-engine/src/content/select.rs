//! `select_multiple` values and their stored JSON list form.

use breadbox_types::RecordId;
use serde_json::Value;

use super::{Content, ContentType, HandlerContext};
use crate::error::EngineResult;

/// Stores the selected values as a JSON-encoded list. Nothing selected is
/// stored as `"[]"`.
pub struct SelectMultiple;

impl ContentType for SelectMultiple {
    fn produce(&self, ctx: &HandlerContext<'_>) -> EngineResult<Content> {
        let selected = selected_values(ctx.value());
        Ok(Content::Value(Value::String(encode_list(&selected)?)))
    }
}

fn selected_values(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter(|v| !v.is_null()).cloned().collect(),
        Some(Value::String(s)) if s.is_empty() => Vec::new(),
        Some(other) => vec![other.clone()],
    }
}

pub fn encode_list(values: &[Value]) -> EngineResult<String> {
    Ok(serde_json::to_string(values)?)
}

pub fn decode_list(raw: &str) -> EngineResult<Vec<Value>> {
    Ok(serde_json::from_str(raw)?)
}

/// Encodes an ordered id list the way selections are stored.
pub fn encode_ids(ids: &[RecordId]) -> EngineResult<String> {
    Ok(serde_json::to_string(ids)?)
}

pub fn decode_ids(raw: &str) -> EngineResult<Vec<RecordId>> {
    Ok(serde_json::from_str(raw)?)
}
