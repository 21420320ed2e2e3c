use serde_json::Value;

use super::{Content, ContentType, HandlerContext, is_blank};
use crate::error::{EngineError, EngineResult};

/// Stores a `{lat, lng}` pair as a `POINT(lng lat)` literal.
pub struct Coordinates;

impl ContentType for Coordinates {
    fn produce(&self, ctx: &HandlerContext<'_>) -> EngineResult<Content> {
        let field = &ctx.field.field;
        let point = match ctx.value() {
            None => return Ok(Content::NoContent),
            Some(value) if is_blank(value) => return Ok(Content::NoContent),
            Some(Value::Object(point)) => point,
            Some(_) => return Err(EngineError::invalid(field, "expected an object with lat and lng")),
        };
        let lat = coordinate(field, point.get("lat"), "lat", 90.0)?;
        let lng = coordinate(field, point.get("lng"), "lng", 180.0)?;
        Ok(Content::Value(Value::String(format!("POINT({lng} {lat})"))))
    }
}

fn coordinate(field: &str, value: Option<&Value>, axis: &str, bound: f64) -> EngineResult<f64> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| EngineError::invalid(field, format!("missing or non-numeric {axis}")))?;
    if !parsed.is_finite() || parsed.abs() > bound {
        return Err(EngineError::invalid(field, format!("{axis} {parsed} is out of range")));
    }
    Ok(parsed)
}
