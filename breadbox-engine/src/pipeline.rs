//! Record upsert pipeline.

use breadbox_crypto::PasswordHasher;
use breadbox_model::{FieldDefinition, FieldType, Record, ResourceRegistry, ResourceType};
use breadbox_storage::{DiskManager, RecordStore};
use breadbox_types::RecordId;
use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::config::EngineConfig;
use crate::content::{self, Content, Dispatched, HandlerContext};
use crate::error::{EngineError, EngineResult};
use crate::request::{Overlay, RequestInput};
use crate::translation::extract_translations;

/// A many-to-many replacement deferred until the owner has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotSync {
    /// Slug of the related resource.
    pub target: String,
    pub pivot_table: String,
    pub ids: Vec<RecordId>,
}

/// Writes one request onto one record.
pub struct RecordPipeline<'a> {
    registry: &'a ResourceRegistry,
    store: &'a dyn RecordStore,
    disks: &'a DiskManager,
    hasher: &'a PasswordHasher,
    config: &'a EngineConfig,
}

impl<'a> RecordPipeline<'a> {
    pub fn new(
        registry: &'a ResourceRegistry,
        store: &'a dyn RecordStore,
        disks: &'a DiskManager,
        hasher: &'a PasswordHasher,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            registry,
            store,
            disks,
            hasher,
            config,
        }
    }

    /// Applies `request` to `record` field by field, saves it, then saves
    /// its translations and syncs its many-to-many relations.
    ///
    /// Uploads written before a later failure are left on their disks.
    pub fn upsert(
        &self,
        request: &dyn RequestInput,
        resource: &ResourceType,
        mut record: Record,
    ) -> EngineResult<Record> {
        let (translations, overrides) = if resource.is_translatable() {
            extract_translations(request, resource, &self.config.default_locale)?
        } else {
            Default::default()
        };
        let request = Overlay::new(request, overrides);
        let now = Utc::now();
        let mut pending: Vec<PivotSync> = Vec::new();

        for field in &resource.fields {
            if should_skip(&request, field) {
                continue;
            }

            let ctx = HandlerContext {
                request: &request,
                slug: &resource.slug,
                field,
                disks: self.disks,
                hasher: self.hasher,
                config: self.config,
                now,
            };
            let Dispatched {
                target_field,
                content,
            } = content::dispatch(&ctx)?;

            match content {
                Content::Sync(ids) => pending.push(self.pivot_sync(resource, field, ids)?),
                Content::Value(value) => {
                    let value = match field.field_type {
                        FieldType::MultipleImages => content::merge_paths(record.get(&target_field), &value)?,
                        FieldType::Relationship => self.check_foreign_key(resource, field, value)?,
                        _ => value,
                    };
                    record.set(target_field, value);
                }
                Content::NoContent => {
                    if field.field_type.keeps_existing_on_empty() && record.is_set(&target_field) {
                        continue;
                    }
                    record.set(target_field, Value::Null);
                }
            }
        }

        let id = self.store.save(&mut record)?;
        debug!("Saved {} {}", resource.slug, id);

        if !translations.is_empty() {
            self.store.save_translations(&resource.slug, id, &translations)?;
            debug!("Saved {} translation(s) for {} {}", translations.len(), resource.slug, id);
        }

        for sync in &pending {
            self.store.sync_pivot(&sync.pivot_table, id, &sync.ids)?;
            debug!(
                "Synced {} {} -> {} ({} id(s) via {})",
                resource.slug,
                id,
                sync.target,
                sync.ids.len(),
                sync.pivot_table
            );
        }

        Ok(record)
    }

    /// Buffers a many-to-many replacement after checking every id exists.
    fn pivot_sync(
        &self,
        resource: &ResourceType,
        field: &FieldDefinition,
        ids: Vec<RecordId>,
    ) -> EngineResult<PivotSync> {
        let target = self.relationship_target(resource, field)?;
        let pivot_table = field
            .relationship_options()
            .and_then(|options| options.pivot_table.clone())
            .ok_or_else(|| {
                EngineError::Configuration(format!("{}.{} has no pivot table", resource.slug, field.field))
            })?;
        for id in &ids {
            if !self.store.exists(&target.slug, *id)? {
                return Err(EngineError::not_found(&target.slug, *id));
            }
        }
        Ok(PivotSync {
            target: target.slug.clone(),
            pivot_table,
            ids,
        })
    }

    /// A non-null foreign key must point at an existing record.
    fn check_foreign_key(
        &self,
        resource: &ResourceType,
        field: &FieldDefinition,
        value: Value,
    ) -> EngineResult<Value> {
        if value.is_null() {
            return Ok(value);
        }
        let target = self.relationship_target(resource, field)?;
        let id = RecordId::from_json(&value)
            .map_err(|e| EngineError::invalid(field.target_field(), e.to_string()))?;
        if !self.store.exists(&target.slug, id)? {
            return Err(EngineError::not_found(&target.slug, id));
        }
        Ok(value)
    }

    fn relationship_target(
        &self,
        resource: &ResourceType,
        field: &FieldDefinition,
    ) -> EngineResult<&'a ResourceType> {
        let options = field.relationship_options().ok_or_else(|| {
            EngineError::Configuration(format!(
                "{}.{} has no relationship options",
                resource.slug, field.field
            ))
        })?;
        self.registry.target_of(options).ok_or_else(|| {
            EngineError::Configuration(format!(
                "{}.{} points at unknown resource '{}'",
                resource.slug, field.field, options.model
            ))
        })
    }
}

/// A field is left untouched when nothing was submitted for it, except for
/// checkboxes (absent means unchecked) and many-to-many relations (absent
/// means none selected). `hasOne` / `hasMany` are never written.
fn should_skip(request: &dyn RequestInput, field: &FieldDefinition) -> bool {
    if let Some(options) = field.relationship_options() {
        if options.is_read_only() {
            return true;
        }
        if options.is_belongs_to_many() {
            return false;
        }
    }
    if field.field_type == FieldType::Checkbox {
        return false;
    }
    let key = field.target_field();
    !request.has_file(key) && !request.has(key)
}
