//! Shared fixtures for engine tests.

#![allow(dead_code)]

use std::sync::Arc;

use breadbox_crypto::{KdfParams, PasswordHasher};
use breadbox_engine::{BreadService, EngineConfig, FormRequest, MemorySink};
use breadbox_model::{
    FieldDefinition, FieldType, Record, RelationshipKind, RelationshipOptions, ResourceRegistry,
    ResourceType,
};
use breadbox_storage::{DiskManager, MemoryDisk, RecordStore, SqliteRecordStore};
use breadbox_types::RecordId;
use serde_json::Value;

pub struct Harness {
    pub service: BreadService,
    pub sqlite: Arc<SqliteRecordStore>,
    pub disk: Arc<MemoryDisk>,
    pub events: Arc<MemorySink>,
}

impl Harness {
    pub fn store(&self) -> &dyn RecordStore {
        self.service.record_store()
    }

    pub fn store_arc(&self) -> Arc<dyn RecordStore> {
        self.sqlite.clone()
    }

    /// Saves a record directly, bypassing validation and handlers.
    pub fn seed(&self, resource: &str, attributes: Value) -> RecordId {
        let attributes = match attributes {
            Value::Object(map) => map,
            _ => panic!("seed attributes must be an object"),
        };
        let mut record = Record::new(resource);
        record.attributes = attributes;
        self.store().save(&mut record).unwrap()
    }
}

pub fn harness() -> Harness {
    harness_with(EngineConfig::default())
}

pub fn harness_with(config: EngineConfig) -> Harness {
    let store = Arc::new(SqliteRecordStore::open_in_memory().unwrap());
    let disk = Arc::new(MemoryDisk::new("public"));
    let events = Arc::new(MemorySink::new());
    let disks = DiskManager::new(config.default_disk.clone()).with_disk(disk.clone());
    let service = BreadService::new(config, blog_registry(), store.clone(), disks)
        .with_hasher(PasswordHasher::new(KdfParams::test()))
        .with_events(events.clone());
    Harness {
        service,
        sqlite: store,
        disk,
        events,
    }
}

pub fn request() -> FormRequest {
    FormRequest::new()
}

pub fn has_many(model: &str) -> RelationshipOptions {
    RelationshipOptions {
        kind: RelationshipKind::HasMany,
        model: model.to_string(),
        column: Some("post_id".to_string()),
        key: Some("id".to_string()),
        label: Some("body".to_string()),
        pivot_table: None,
    }
}

/// users, categories, tags, comments and posts.
pub fn blog_registry() -> ResourceRegistry {
    let users = ResourceType::new(
        "users",
        vec![
            FieldDefinition::text("name").with_rules("required"),
            FieldDefinition::text("email")
                .with_rules("required|email|unique:users,email")
                .with_display_name("E-mail address"),
            FieldDefinition::of_type("password", FieldType::Password),
            FieldDefinition::of_type("avatar", FieldType::Image),
        ],
    )
    .unwrap();

    let categories = ResourceType::new("categories", vec![FieldDefinition::text("name")]).unwrap();
    let tags = ResourceType::new("tags", vec![FieldDefinition::text("name")]).unwrap();
    let comments = ResourceType::new("comments", vec![FieldDefinition::text("body")]).unwrap();

    let posts = ResourceType::new(
        "posts",
        vec![
            FieldDefinition::text("title")
                .with_rules("required|max:40")
                .with_message("required", "Every post needs a :attribute.")
                .with_display_name("Title")
                .translatable(),
            FieldDefinition::text("slug").with_rules("required|unique:posts,slug"),
            FieldDefinition::text("body").translatable(),
            FieldDefinition::of_type("featured", FieldType::Checkbox),
            FieldDefinition::of_type("image", FieldType::Image),
            FieldDefinition::of_type("gallery", FieldType::MultipleImages),
            FieldDefinition::of_type("attachment", FieldType::File),
            FieldDefinition::of_type("colors", FieldType::SelectMultiple),
            FieldDefinition::of_type("published_at", FieldType::Timestamp),
            FieldDefinition::of_type("location", FieldType::Coordinates),
            FieldDefinition::relationship(
                "post_belongstomany_tag_relationship",
                RelationshipOptions::belongs_to_many("tags", "post_tag"),
            ),
            FieldDefinition::relationship(
                "post_belongsto_category_relationship",
                RelationshipOptions::belongs_to("categories", "category_id"),
            ),
            FieldDefinition::relationship("post_hasmany_comment_relationship", has_many("comments")),
        ],
    )
    .unwrap();

    let mut registry = ResourceRegistry::new();
    for resource in [users, categories, tags, comments, posts] {
        registry.register(resource).unwrap();
    }
    registry.check_relationships().unwrap();
    registry
}
