use breadbox_model::FieldOptions;
use serde_json::Value;

use super::{Content, ContentType, HandlerContext};
use crate::error::EngineResult;

/// Default handler: the submitted value is stored as is.
pub struct Text;

impl ContentType for Text {
    fn produce(&self, ctx: &HandlerContext<'_>) -> EngineResult<Content> {
        let Some(value) = ctx.value() else {
            return Ok(Content::NoContent);
        };
        let null_sentinel = match &ctx.field.options {
            FieldOptions::Text(options) => options.null.as_deref(),
            _ => None,
        };
        if null_sentinel.is_some_and(|sentinel| value.as_str() == Some(sentinel)) {
            return Ok(Content::Value(Value::Null));
        }
        Ok(Content::Value(value.clone()))
    }
}
