use breadbox_model::{
    FieldDefinition, FieldOptions, FieldRow, FieldType, ModelError, RelationshipKind, RuleSpec,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn row(field: &str, field_type: &str, details: serde_json::Value) -> FieldRow {
    FieldRow {
        field: field.to_string(),
        field_type: field_type.to_string(),
        details,
        display_name: String::new(),
    }
}

// ── FieldType tags ───────────────────────────────────────────────

#[test]
fn known_tags_resolve() {
    assert_eq!(FieldType::from_tag("password"), FieldType::Password);
    assert_eq!(FieldType::from_tag("multiple_images"), FieldType::MultipleImages);
    assert_eq!(FieldType::from_tag("select_multiple"), FieldType::SelectMultiple);
    assert_eq!(FieldType::from_tag("coordinates"), FieldType::Coordinates);
}

#[test]
fn unknown_tags_fall_back_to_text() {
    assert_eq!(FieldType::from_tag("rich_text_box"), FieldType::Text);
    assert_eq!(FieldType::from_tag("number"), FieldType::Text);
    assert_eq!(FieldType::from_tag(""), FieldType::Text);
}

#[test]
fn field_type_serde_uses_tags() {
    let json = serde_json::to_string(&FieldType::MultipleImages).unwrap();
    assert_eq!(json, r#""multiple_images""#);
    let parsed: FieldType = serde_json::from_str(r#""code_editor""#).unwrap();
    assert_eq!(parsed, FieldType::Text);
}

#[test]
fn keep_existing_types() {
    assert!(FieldType::Image.keeps_existing_on_empty());
    assert!(FieldType::Password.keeps_existing_on_empty());
    assert!(!FieldType::Text.keeps_existing_on_empty());
    assert!(!FieldType::Checkbox.keeps_existing_on_empty());
}

// ── RuleSpec ─────────────────────────────────────────────────────

#[test]
fn pipe_rules_split_and_trim() {
    let spec = RuleSpec::One("required| max:255 ||email".into());
    assert_eq!(spec.to_list(), vec!["required", "max:255", "email"]);
}

#[test]
fn list_rules_drop_blanks() {
    let spec = RuleSpec::Many(vec!["required".into(), " ".into(), "unique:users".into()]);
    assert_eq!(spec.to_list(), vec!["required", "unique:users"]);
}

// ── FieldDefinition::from_row ────────────────────────────────────

#[test]
fn details_as_encoded_string() {
    let def = FieldDefinition::from_row(&row(
        "title",
        "text",
        json!(r#"{"validation":{"rule":"required|max:10","messages":{"required":"Need a title"}}}"#),
    ))
    .unwrap();
    let validation = def.validation.unwrap();
    assert_eq!(validation.rule.to_list(), vec!["required", "max:10"]);
    assert_eq!(validation.messages["required"], "Need a title");
}

#[test]
fn details_as_inline_object() {
    let def = FieldDefinition::from_row(&row("name", "text", json!({"null": "-"}))).unwrap();
    match def.options {
        FieldOptions::Text(options) => assert_eq!(options.null.as_deref(), Some("-")),
        other => panic!("unexpected options: {other:?}"),
    }
}

#[test]
fn empty_details_are_accepted() {
    let def = FieldDefinition::from_row(&row("body", "rich_text_box", json!(""))).unwrap();
    assert_eq!(def.field_type, FieldType::Text);
    assert!(def.validation.is_none());

    let def = FieldDefinition::from_row(&row("body", "text", json!(null))).unwrap();
    assert!(def.validation.is_none());
}

#[test]
fn empty_rule_is_dropped() {
    let def = FieldDefinition::from_row(&row("body", "text", json!({"validation": {"rule": ""}}))).unwrap();
    assert!(def.validation.is_none());
}

#[test]
fn malformed_details_are_rejected() {
    let err = FieldDefinition::from_row(&row("title", "text", json!("{not json"))).unwrap_err();
    assert!(matches!(err, ModelError::InvalidDetails { .. }));
}

#[test]
fn scalar_details_are_rejected() {
    let err = FieldDefinition::from_row(&row("title", "text", json!(5))).unwrap_err();
    assert!(matches!(err, ModelError::InvalidOptions { .. }));
}

#[test]
fn translatable_flag() {
    let def = FieldDefinition::from_row(&row("title", "text", json!({"translatable": true}))).unwrap();
    assert!(def.translatable);
}

#[test]
fn upload_disk_override() {
    let def = FieldDefinition::from_row(&row("avatar", "image", json!({"disk": "s3"}))).unwrap();
    match def.options {
        FieldOptions::Upload(options) => assert_eq!(options.disk.as_deref(), Some("s3")),
        other => panic!("unexpected options: {other:?}"),
    }
}

// ── Relationships ────────────────────────────────────────────────

#[test]
fn belongs_to_rewrites_target_field() {
    let def = FieldDefinition::from_row(&row(
        "post_belongsto_user_relationship",
        "relationship",
        json!({"type": "belongsTo", "model": "users", "column": "author_id", "key": "id", "label": "name"}),
    ))
    .unwrap();
    assert_eq!(def.target_field(), "author_id");
    assert!(!def.is_belongs_to_many());
}

#[test]
fn belongs_to_many_keeps_field_name() {
    let def = FieldDefinition::from_row(&row(
        "user_belongstomany_role_relationship",
        "relationship",
        json!({"type": "belongsToMany", "model": "roles", "pivot_table": "user_roles"}),
    ))
    .unwrap();
    assert!(def.is_belongs_to_many());
    assert_eq!(def.target_field(), "user_belongstomany_role_relationship");
    assert_eq!(
        def.relationship_options().unwrap().kind,
        RelationshipKind::BelongsToMany
    );
}

#[test]
fn belongs_to_many_requires_pivot_table() {
    let err = FieldDefinition::from_row(&row(
        "roles",
        "relationship",
        json!({"type": "belongsToMany", "model": "roles"}),
    ))
    .unwrap_err();
    match err {
        ModelError::InvalidOptions { field, reason } => {
            assert_eq!(field, "roles");
            assert!(reason.contains("pivot_table"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn belongs_to_requires_column() {
    let err = FieldDefinition::from_row(&row(
        "author",
        "relationship",
        json!({"type": "belongsTo", "model": "users"}),
    ))
    .unwrap_err();
    assert!(matches!(err, ModelError::InvalidOptions { .. }));
}

#[test]
fn relationship_requires_type() {
    let err = FieldDefinition::from_row(&row("author", "relationship", json!({"model": "users"})))
        .unwrap_err();
    assert!(matches!(err, ModelError::InvalidDetails { .. }));
}

#[test]
fn timestamp_format_is_checked_at_configuration() {
    let err = FieldDefinition::from_row(&row(
        "published_at",
        "timestamp",
        json!({"format": "%Q"}),
    ))
    .unwrap_err();
    match err {
        ModelError::InvalidOptions { field, reason } => {
            assert_eq!(field, "published_at");
            assert!(reason.contains("%Q"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let def = FieldDefinition::from_row(&row(
        "published_at",
        "timestamp",
        json!({"format": "%d/%m/%Y %H:%M"}),
    ))
    .unwrap();
    assert_eq!(def.field_type, FieldType::Timestamp);
}

// ── Builders ─────────────────────────────────────────────────────

#[test]
fn label_prefers_display_name() {
    let def = FieldDefinition::text("email");
    assert_eq!(def.label(), "email");
    let def = def.with_display_name("E-mail address");
    assert_eq!(def.label(), "E-mail address");
}

#[test]
fn with_message_requires_rules() {
    let def = FieldDefinition::text("slug").with_message("unique", "taken");
    assert!(def.validation.is_none());

    let def = FieldDefinition::text("slug")
        .with_rules("unique:posts")
        .with_message("unique", "taken");
    assert_eq!(def.validation.unwrap().messages["unique"], "taken");
}
