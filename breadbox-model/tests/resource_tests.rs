use breadbox_model::{
    FieldDefinition, FieldType, ModelError, RelationshipOptions, ResourceConfig, ResourceRegistry,
    ResourceType,
};
use serde_json::json;

fn users() -> ResourceType {
    ResourceType::new(
        "users",
        vec![
            FieldDefinition::text("name"),
            FieldDefinition::of_type("password", FieldType::Password),
        ],
    )
    .unwrap()
}

// ── ResourceType ─────────────────────────────────────────────────

#[test]
fn duplicate_fields_rejected() {
    let err = ResourceType::new(
        "posts",
        vec![FieldDefinition::text("title"), FieldDefinition::text("title")],
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::DuplicateField { .. }));
}

#[test]
fn field_lookup() {
    let r = users();
    assert!(r.field("name").is_some());
    assert!(r.field("missing").is_none());
}

#[test]
fn translatable_when_any_field_is() {
    let r = users();
    assert!(!r.is_translatable());

    let r = ResourceType::new("pages", vec![FieldDefinition::text("title").translatable()]).unwrap();
    assert!(r.is_translatable());
    assert_eq!(r.translatable_fields().count(), 1);
}

#[test]
fn from_config_applies_names() {
    let config: ResourceConfig = serde_json::from_value(json!({
        "slug": "posts",
        "display_name": "Posts",
        "model_name": "App\\Post",
        "fields": [
            {"field": "title", "type": "text", "details": "{\"validation\":{\"rule\":\"required\"}}"},
            {"field": "featured", "type": "checkbox"}
        ]
    }))
    .unwrap();
    let r = ResourceType::from_config(&config).unwrap();
    assert_eq!(r.display_name, "Posts");
    assert!(r.answers_to("App\\Post"));
    assert!(r.answers_to("posts"));
    assert_eq!(r.fields.len(), 2);
    assert_eq!(r.fields[1].field_type, FieldType::Checkbox);
}

// ── ResourceRegistry ─────────────────────────────────────────────

#[test]
fn duplicate_resource_rejected() {
    let mut registry = ResourceRegistry::new();
    registry.register(users()).unwrap();
    let err = registry.register(users()).unwrap_err();
    assert!(matches!(err, ModelError::DuplicateResource(slug) if slug == "users"));
}

#[test]
fn relationship_target_by_slug_or_model_name() {
    let mut registry = ResourceRegistry::new();
    let mut roles = ResourceType::new("roles", vec![FieldDefinition::text("name")]).unwrap();
    roles.model_name = "App\\Role".to_string();
    registry.register(roles).unwrap();

    let by_slug = RelationshipOptions::belongs_to_many("roles", "user_roles");
    let by_model = RelationshipOptions::belongs_to_many("App\\Role", "user_roles");
    assert_eq!(registry.target_of(&by_slug).unwrap().slug, "roles");
    assert_eq!(registry.target_of(&by_model).unwrap().slug, "roles");
}

#[test]
fn unknown_relationship_target_is_configuration_error() {
    let config: Vec<ResourceConfig> = serde_json::from_value(json!([{
        "slug": "posts",
        "fields": [{
            "field": "tags",
            "type": "relationship",
            "details": {"type": "belongsToMany", "model": "tags", "pivot_table": "post_tag"}
        }]
    }]))
    .unwrap();
    let err = ResourceRegistry::from_configs(&config).unwrap_err();
    match err {
        ModelError::UnknownRelationshipTarget { resource, field, model } => {
            assert_eq!(resource, "posts");
            assert_eq!(field, "tags");
            assert_eq!(model, "tags");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn registry_iterates_in_slug_order() {
    let mut registry = ResourceRegistry::new();
    registry.register(users()).unwrap();
    registry
        .register(ResourceType::new("categories", vec![]).unwrap())
        .unwrap();
    let slugs: Vec<_> = registry.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(slugs, vec!["categories", "users"]);
    assert_eq!(registry.len(), 2);
}
