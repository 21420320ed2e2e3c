use serde_json::Value;

use super::{Content, ContentType, HandlerContext, scalar_text};
use crate::error::EngineResult;

/// Hashes a non-blank password. A blank one leaves the stored hash alone.
pub struct Password;

impl ContentType for Password {
    fn produce(&self, ctx: &HandlerContext<'_>) -> EngineResult<Content> {
        let plain = ctx.present_value().and_then(scalar_text);
        match plain {
            Some(plain) if !plain.trim().is_empty() => {
                let hash = ctx.hasher.hash(&plain)?;
                Ok(Content::Value(Value::String(hash)))
            }
            _ => Ok(Content::NoContent),
        }
    }
}
