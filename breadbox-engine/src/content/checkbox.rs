use serde_json::Value;

use super::{Content, ContentType, HandlerContext};
use crate::error::EngineResult;

const TRUTHY: [&str; 4] = ["1", "on", "true", "yes"];

/// Stores a boolean. An unchecked box is not submitted at all, so absence
/// means false.
pub struct Checkbox;

impl ContentType for Checkbox {
    fn produce(&self, ctx: &HandlerContext<'_>) -> EngineResult<Content> {
        Ok(Content::Value(Value::Bool(is_checked(ctx.value()))))
    }
}

pub(crate) fn is_checked(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => {
            let s = s.trim().to_ascii_lowercase();
            TRUTHY.contains(&s.as_str())
        }
        _ => false,
    }
}
