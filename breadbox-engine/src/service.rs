//! Add / edit / delete entry points.

use std::sync::Arc;

use breadbox_crypto::PasswordHasher;
use breadbox_model::{FieldOptions, FieldType, Record, ResourceRegistry, ResourceType};
use breadbox_storage::{DiskManager, RecordStore, StorageError};
use breadbox_types::{ChangeAction, Event, RecordId};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::content::decode_paths;
use crate::error::{EngineError, EngineResult};
use crate::events::{EventSink, LogSink};
use crate::menu::MenuBuilder;
use crate::pipeline::RecordPipeline;
use crate::request::RequestInput;
use crate::validation::{RuleValidator, Validator, build_rules};

/// Resolves resources, validates, runs the upsert pipeline and reports
/// changes.
pub struct BreadService {
    registry: ResourceRegistry,
    store: Arc<dyn RecordStore>,
    disks: DiskManager,
    hasher: PasswordHasher,
    config: EngineConfig,
    validator: Arc<dyn Validator>,
    events: Arc<dyn EventSink>,
}

impl BreadService {
    /// Uses the built-in [`RuleValidator`] and logs events until told
    /// otherwise.
    pub fn new(
        config: EngineConfig,
        registry: ResourceRegistry,
        store: Arc<dyn RecordStore>,
        disks: DiskManager,
    ) -> Self {
        Self {
            hasher: config.hasher(),
            validator: Arc::new(RuleValidator::new(store.clone())),
            events: Arc::new(LogSink),
            registry,
            store,
            disks,
            config,
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn record_store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn disks(&self) -> &DiskManager {
        &self.disks
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn resource(&self, slug: &str) -> EngineResult<&ResourceType> {
        self.registry
            .get(slug)
            .ok_or_else(|| EngineError::UnknownResource(slug.to_string()))
    }

    pub fn find(&self, slug: &str, id: RecordId) -> EngineResult<Record> {
        self.store
            .find(slug, id)?
            .ok_or_else(|| EngineError::not_found(slug, id))
    }

    /// Checks a request against the resource's rules. Pass the edited
    /// record's id on update so uniqueness ignores it.
    pub fn validate(
        &self,
        slug: &str,
        request: &dyn RequestInput,
        id: Option<RecordId>,
    ) -> EngineResult<()> {
        let resource = self.resource(slug)?;
        self.validate_resource(resource, request, id)
    }

    /// Creates a record.
    pub fn store(&self, slug: &str, request: &dyn RequestInput) -> EngineResult<Record> {
        let resource = self.resource(slug)?;
        self.validate_resource(resource, request, None)?;
        let record = self.pipeline().upsert(request, resource, Record::new(slug))?;
        self.emit_change(&record, ChangeAction::Added);
        Ok(record)
    }

    /// Edits an existing record.
    pub fn update(
        &self,
        slug: &str,
        id: RecordId,
        request: &dyn RequestInput,
    ) -> EngineResult<Record> {
        let resource = self.resource(slug)?;
        let existing = self.find(slug, id)?;
        self.validate_resource(resource, request, Some(id))?;
        let record = self.pipeline().upsert(request, resource, existing)?;
        self.emit_change(&record, ChangeAction::Updated);
        Ok(record)
    }

    /// Deletes a record together with its translations, pivot rows and
    /// uploaded files. Returns the deleted record.
    pub fn destroy(&self, slug: &str, id: RecordId) -> EngineResult<Record> {
        let resource = self.resource(slug)?;
        let record = self.find(slug, id)?;

        self.store.delete(slug, id)?;
        self.store.delete_translations(slug, id, None)?;
        for field in &resource.fields {
            let pivot_table = field
                .relationship_options()
                .filter(|options| options.is_belongs_to_many())
                .and_then(|options| options.pivot_table.as_deref());
            if let Some(pivot_table) = pivot_table {
                self.store.delete_pivots(pivot_table, id)?;
            }
        }

        for field in resource.fields.iter().filter(|f| f.field_type.is_upload()) {
            let disk = match &field.options {
                FieldOptions::Upload(options) => options.disk.as_deref(),
                _ => None,
            };
            let paths = match field.field_type {
                FieldType::MultipleImages => decode_paths(record.get(&field.field)),
                _ => record
                    .get_str(&field.field)
                    .filter(|path| !path.is_empty())
                    .map(|path| vec![path.to_string()])
                    .unwrap_or_default(),
            };
            for path in paths {
                self.delete_file_if_exists(disk, &path)?;
            }
        }

        self.emit_change(&record, ChangeAction::Deleted);
        Ok(record)
    }

    /// Removes a stored upload if it is still there. Returns whether a file
    /// was removed.
    pub fn delete_file_if_exists(&self, disk: Option<&str>, path: &str) -> EngineResult<bool> {
        let disk = self.disks.resolve(disk)?;
        let exists = match disk.exists(path) {
            Ok(exists) => exists,
            Err(StorageError::InvalidPath(reason)) => {
                warn!("Not deleting unusable stored path on {}: {}", disk.name(), reason);
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };
        if !exists {
            debug!("File {}:{} already gone", disk.name(), path);
            return Ok(false);
        }
        disk.delete(path)?;
        self.events.emit(Event::file_deleted(disk.name(), path));
        Ok(true)
    }

    pub fn menus(&self) -> MenuBuilder<'_> {
        MenuBuilder::new(self.store.as_ref(), &self.config)
    }

    fn pipeline(&self) -> RecordPipeline<'_> {
        RecordPipeline::new(
            &self.registry,
            self.store.as_ref(),
            &self.disks,
            &self.hasher,
            &self.config,
        )
    }

    fn validate_resource(
        &self,
        resource: &ResourceType,
        request: &dyn RequestInput,
        id: Option<RecordId>,
    ) -> EngineResult<()> {
        let rules = build_rules(resource, id);
        if rules.is_empty() {
            return Ok(());
        }
        self.validator.validate(request, &rules)
    }

    fn emit_change(&self, record: &Record, action: ChangeAction) {
        let Some(id) = record.id else {
            return;
        };
        debug!("{} {} {}", action, record.resource, id);
        self.events.emit(Event::record_changed(
            record.resource.as_str(),
            id,
            record.to_json().to_string(),
            action,
        ));
    }
}
