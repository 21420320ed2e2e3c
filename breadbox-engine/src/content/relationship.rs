use breadbox_model::RelationshipKind;
use breadbox_types::RecordId;
use serde_json::Value;

use super::{Content, ContentType, HandlerContext, is_blank};
use crate::error::{EngineError, EngineResult};

/// `belongsToMany` yields the ids to sync; `belongsTo` yields the foreign
/// key for its column. `hasOne` / `hasMany` are owned by the other side and
/// produce nothing.
pub struct Relationship;

impl ContentType for Relationship {
    fn produce(&self, ctx: &HandlerContext<'_>) -> EngineResult<Content> {
        let options = ctx.field.relationship_options().ok_or_else(|| {
            EngineError::Configuration(format!(
                "relationship field '{}' of {} has no relationship options",
                ctx.field.field, ctx.slug
            ))
        })?;

        match options.kind {
            RelationshipKind::BelongsToMany => {
                let ids = submitted_ids(&ctx.field.field, ctx.value())?;
                Ok(Content::Sync(ids))
            }
            RelationshipKind::BelongsTo => match ctx.value() {
                None => Ok(Content::NoContent),
                Some(value) if is_blank(value) => Ok(Content::Value(Value::Null)),
                Some(value) => {
                    let id = RecordId::from_json(value)
                        .map_err(|e| EngineError::invalid(ctx.field.target_field(), e.to_string()))?;
                    Ok(Content::Value(id.into()))
                }
            },
            RelationshipKind::HasOne | RelationshipKind::HasMany => Ok(Content::NoContent),
        }
    }
}

/// Ids of a many-to-many submission, in order, nulls dropped. An absent or
/// empty submission clears the relation.
fn submitted_ids(field: &str, value: Option<&Value>) -> EngineResult<Vec<RecordId>> {
    let items: Vec<&Value> = match value {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(value) if is_blank(value) => Vec::new(),
        Some(value) => vec![value],
    };
    items
        .into_iter()
        .filter(|item| !is_blank(item))
        .map(|item| RecordId::from_json(item).map_err(|e| EngineError::invalid(field, e.to_string())))
        .collect()
}
