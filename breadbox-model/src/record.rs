use breadbox_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a resource.
///
/// `attributes` holds the stored column values keyed by field name. A record
/// without an `id` has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub resource: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl Record {
    /// An empty, unsaved record of the given resource.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            id: None,
            resource: resource.into(),
            attributes: Map::new(),
        }
    }

    /// A record that already carries a key.
    pub fn with_id(resource: impl Into<String>, id: RecordId, attributes: Map<String, Value>) -> Self {
        Self {
            id: Some(id),
            resource: resource.into(),
            attributes,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Raw attribute value, including explicit nulls.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// True when the attribute exists and is not null.
    pub fn is_set(&self, field: &str) -> bool {
        matches!(self.attributes.get(field), Some(v) if !v.is_null())
    }

    /// Extract a string attribute.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.attributes.get(field).and_then(|v| v.as_str())
    }

    /// Extract a boolean attribute.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.attributes.get(field).and_then(|v| v.as_bool())
    }

    /// Extract an integer attribute.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.attributes.get(field).and_then(|v| v.as_i64())
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.attributes.remove(field)
    }

    /// The attributes plus `id`, as one JSON object.
    pub fn to_json(&self) -> Value {
        let mut object = self.attributes.clone();
        if let Some(id) = self.id {
            object.insert("id".to_string(), id.into());
        }
        Value::Object(object)
    }
}
