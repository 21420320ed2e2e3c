use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{ModelError, ModelResult};
use crate::options::{
    CheckboxOptions, FieldOptions, RelationshipOptions, SelectOptions, TextOptions,
    TimestampOptions, UploadOptions,
};

/// The content type of a field.
///
/// Tags are snake_case on the wire. Any tag without a dedicated handler
/// (`text_area`, `rich_text_box`, `number`, `select_dropdown`, ...) maps to
/// [`FieldType::Text`], whose handler passes the raw value through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Password,
    Checkbox,
    File,
    Image,
    MultipleImages,
    SelectMultiple,
    Relationship,
    Timestamp,
    Coordinates,
    Text,
}

impl FieldType {
    /// Resolves a configuration tag. Unknown tags become `Text`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "password" => Self::Password,
            "checkbox" => Self::Checkbox,
            "file" => Self::File,
            "image" => Self::Image,
            "multiple_images" => Self::MultipleImages,
            "select_multiple" => Self::SelectMultiple,
            "relationship" => Self::Relationship,
            "timestamp" => Self::Timestamp,
            "coordinates" => Self::Coordinates,
            _ => Self::Text,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Checkbox => "checkbox",
            Self::File => "file",
            Self::Image => "image",
            Self::MultipleImages => "multiple_images",
            Self::SelectMultiple => "select_multiple",
            Self::Relationship => "relationship",
            Self::Timestamp => "timestamp",
            Self::Coordinates => "coordinates",
            Self::Text => "text",
        }
    }

    /// Types whose stored value survives a submission without new content.
    pub fn keeps_existing_on_empty(&self) -> bool {
        matches!(
            self,
            Self::Image | Self::MultipleImages | Self::File | Self::Password
        )
    }

    /// Types that store paths on a disk.
    pub fn is_upload(&self) -> bool {
        matches!(self, Self::Image | Self::MultipleImages | Self::File)
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_tag().to_string()
    }
}

/// Validation rules as written in configuration: either a pipe-separated
/// string (`"required|max:255"`) or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    One(String),
    Many(Vec<String>),
}

impl RuleSpec {
    /// Splits into one entry per rule, dropping blanks.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            Self::One(raw) => raw
                .split('|')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Many(list) => list
                .iter()
                .map(|r| r.trim())
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// The `validation` section of a field's details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSpec {
    pub rule: RuleSpec,
    /// Custom messages keyed by rule name (`"required"`, `"max"`, ...).
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
}

impl ValidationSpec {
    pub fn is_empty(&self) -> bool {
        self.rule.to_list().is_empty()
    }
}

/// A field definition as stored in configuration, before its details are
/// decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRow {
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: String,
    /// JSON-encoded string or an inline object.
    #[serde(default)]
    pub details: Value,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct CommonDetails {
    #[serde(default)]
    validation: Option<ValidationSpec>,
    #[serde(default)]
    translatable: bool,
}

/// A decoded, validated field definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub field: String,
    pub field_type: FieldType,
    pub options: FieldOptions,
    pub validation: Option<ValidationSpec>,
    pub translatable: bool,
    pub display_name: String,
}

impl FieldDefinition {
    /// A text field with no options.
    pub fn text(field: impl Into<String>) -> Self {
        Self::bare(field, FieldType::Text, FieldOptions::Text(TextOptions::default()))
    }

    /// A field of the given type with default options.
    ///
    /// Relationships need [`Self::relationship`].
    pub fn of_type(field: impl Into<String>, field_type: FieldType) -> Self {
        let options = match field_type {
            FieldType::Password => FieldOptions::Password,
            FieldType::Checkbox => FieldOptions::Checkbox(CheckboxOptions::default()),
            FieldType::File | FieldType::Image | FieldType::MultipleImages => {
                FieldOptions::Upload(UploadOptions::default())
            }
            FieldType::SelectMultiple => FieldOptions::SelectMultiple(SelectOptions::default()),
            FieldType::Timestamp => FieldOptions::Timestamp(TimestampOptions::default()),
            FieldType::Coordinates => FieldOptions::Coordinates,
            // A relationship without options is rejected by the dispatcher.
            FieldType::Relationship | FieldType::Text => FieldOptions::Text(TextOptions::default()),
        };
        Self::bare(field, field_type, options)
    }

    /// A relationship field.
    pub fn relationship(field: impl Into<String>, options: RelationshipOptions) -> Self {
        Self::bare(field, FieldType::Relationship, FieldOptions::Relationship(options))
    }

    fn bare(field: impl Into<String>, field_type: FieldType, options: FieldOptions) -> Self {
        Self {
            field: field.into(),
            field_type,
            options,
            validation: None,
            translatable: false,
            display_name: String::new(),
        }
    }

    pub fn with_rules(mut self, rule: impl Into<String>) -> Self {
        self.validation = Some(ValidationSpec {
            rule: RuleSpec::One(rule.into()),
            messages: BTreeMap::new(),
        });
        self
    }

    pub fn with_message(mut self, rule: impl Into<String>, message: impl Into<String>) -> Self {
        if let Some(validation) = self.validation.as_mut() {
            validation.messages.insert(rule.into(), message.into());
        }
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn translatable(mut self) -> Self {
        self.translatable = true;
        self
    }

    /// Decodes a configuration row.
    ///
    /// The details blob is parsed once here; a malformed blob or a
    /// relationship missing its pivot table or column is a configuration
    /// error.
    pub fn from_row(row: &FieldRow) -> ModelResult<Self> {
        let details = decode_details(&row.field, &row.details)?;
        let invalid = |source| ModelError::InvalidDetails {
            field: row.field.clone(),
            source,
        };

        let common: CommonDetails =
            serde_json::from_value(details.clone()).map_err(invalid)?;
        let field_type = FieldType::from_tag(&row.field_type);

        let options = match field_type {
            FieldType::Password => FieldOptions::Password,
            FieldType::Coordinates => FieldOptions::Coordinates,
            FieldType::Checkbox => {
                FieldOptions::Checkbox(serde_json::from_value(details).map_err(invalid)?)
            }
            FieldType::File | FieldType::Image | FieldType::MultipleImages => {
                FieldOptions::Upload(serde_json::from_value(details).map_err(invalid)?)
            }
            FieldType::SelectMultiple => {
                FieldOptions::SelectMultiple(serde_json::from_value(details).map_err(invalid)?)
            }
            FieldType::Timestamp => {
                let options: TimestampOptions =
                    serde_json::from_value(details).map_err(invalid)?;
                options
                    .check()
                    .map_err(|reason| ModelError::InvalidOptions {
                        field: row.field.clone(),
                        reason,
                    })?;
                FieldOptions::Timestamp(options)
            }
            FieldType::Relationship => {
                let options: RelationshipOptions =
                    serde_json::from_value(details).map_err(invalid)?;
                options
                    .check()
                    .map_err(|reason| ModelError::InvalidOptions {
                        field: row.field.clone(),
                        reason,
                    })?;
                FieldOptions::Relationship(options)
            }
            FieldType::Text => FieldOptions::Text(serde_json::from_value(details).map_err(invalid)?),
        };

        Ok(Self {
            field: row.field.clone(),
            field_type,
            options,
            validation: common.validation.filter(|v| !v.is_empty()),
            translatable: common.translatable,
            display_name: row.display_name.clone(),
        })
    }

    /// Relationship options, when this is a relationship field.
    pub fn relationship_options(&self) -> Option<&RelationshipOptions> {
        match &self.options {
            FieldOptions::Relationship(options) => Some(options),
            _ => None,
        }
    }

    /// True for `belongsToMany` relationships, which are synced through a
    /// pivot table instead of written to the record.
    pub fn is_belongs_to_many(&self) -> bool {
        self.relationship_options()
            .is_some_and(RelationshipOptions::is_belongs_to_many)
    }

    /// The attribute this field writes to and reads its request value from.
    ///
    /// Single-valued relationships write their configured foreign-key column.
    pub fn target_field(&self) -> &str {
        match self.relationship_options() {
            Some(options) if !options.is_belongs_to_many() => {
                options.column.as_deref().unwrap_or(&self.field)
            }
            _ => &self.field,
        }
    }

    /// Label used in validation messages.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.field
        } else {
            &self.display_name
        }
    }
}

fn decode_details(field: &str, raw: &Value) -> ModelResult<Value> {
    let decoded = match raw {
        Value::Null => Value::Object(Default::default()),
        Value::String(s) if s.trim().is_empty() => Value::Object(Default::default()),
        Value::String(s) => serde_json::from_str(s).map_err(|source| ModelError::InvalidDetails {
            field: field.to_string(),
            source,
        })?,
        other => other.clone(),
    };
    match decoded {
        Value::Object(_) => Ok(decoded),
        // Older configurations store `[]` or `null` for "no options".
        Value::Null | Value::Array(_) => Ok(Value::Object(Default::default())),
        other => Err(ModelError::InvalidOptions {
            field: field.to_string(),
            reason: format!("details must be an object, got {other}"),
        }),
    }
}
