//! Typed-field content engine.
//!
//! Turns submitted form data into stored records according to each
//! resource's field definitions:
//!
//! - [`content`]: one handler per field type and the dispatcher that picks
//!   it from the field's type tag
//! - [`validation`]: rule sets derived from field definitions, and the
//!   built-in [`RuleValidator`]
//! - [`RecordPipeline`]: walks the fields of a resource, applies the
//!   skip / merge / keep-existing policy, saves the record, its
//!   translations, and its many-to-many pivots
//! - [`BreadService`]: the add / edit / delete entry points, which resolve
//!   the resource, validate first, and emit change events
//! - [`MenuBuilder`]: menu item CRUD and tree reordering
//!
//! Every collaborator (record store, disks, validator, event sink) is passed
//! in explicitly.

pub mod config;
pub mod content;
mod error;
mod events;
mod menu;
mod pipeline;
mod request;
mod service;
mod translation;
pub mod validation;

pub use config::{EngineConfig, PasswordConfig};
pub use error::{EngineError, EngineResult};
pub use events::{EventSink, LogSink, MemorySink};
pub use menu::MenuBuilder;
pub use pipeline::{PivotSync, RecordPipeline};
pub use request::{FormRequest, RequestInput, UploadedFile};
pub use service::BreadService;
pub use translation::extract_translations;
pub use validation::{Rule, RuleSet, RuleValidator, ValidationErrors, Validator};
