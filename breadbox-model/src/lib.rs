//! Resource model for Breadbox.
//!
//! Defines the types that describe a manageable resource and its data:
//! - [`Record`]: one row of a resource (id + JSON attributes)
//! - [`FieldDefinition`]: one configured attribute, with a [`FieldType`] tag
//!   and strongly typed [`FieldOptions`] decoded from the details blob
//! - [`ResourceType`] / [`ResourceRegistry`]: the field definitions of each
//!   resource, validated when the configuration is loaded
//! - [`MenuItem`] / [`MenuOrderNode`]: menu builder rows and reorder trees
//! - [`TranslationBundle`]: per-locale values for translatable fields
//!
//! Options are validated here, at configuration time, so request handling
//! never has to interpret a loosely typed document.

mod error;
mod field;
mod menu;
mod options;
mod record;
mod resource;
mod translation;

pub use error::{ModelError, ModelResult};
pub use field::{FieldDefinition, FieldRow, FieldType, RuleSpec, ValidationSpec};
pub use menu::{LinkType, MenuItem, MenuItemInput, MenuOrderNode, MENU_ITEMS_RESOURCE};
pub use options::{
    check_datetime_format, CheckboxOptions, FieldOptions, RelationshipKind, RelationshipOptions, SelectOptions,
    TextOptions, TimestampOptions, UploadOptions,
};
pub use record::Record;
pub use resource::{ResourceConfig, ResourceRegistry, ResourceType};
pub use translation::TranslationBundle;
