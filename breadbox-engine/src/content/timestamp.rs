//! Timestamp normalization.

use std::fmt::Write;

use breadbox_model::FieldOptions;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::{Content, ContentType, HandlerContext, scalar_text};
use crate::error::{EngineError, EngineResult};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parses the submitted date/time and stores it in the configured format.
pub struct Timestamp;

impl ContentType for Timestamp {
    fn produce(&self, ctx: &HandlerContext<'_>) -> EngineResult<Content> {
        let raw = match ctx.present_value().and_then(scalar_text) {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Content::NoContent),
        };
        let parsed = parse_datetime(&raw).ok_or_else(|| {
            EngineError::invalid(&ctx.field.field, format!("'{raw}' is not a recognizable date"))
        })?;
        let format = match &ctx.field.options {
            FieldOptions::Timestamp(options) => options.format.as_deref(),
            _ => None,
        }
        .unwrap_or(ctx.config.timestamp_format.as_str());
        let mut rendered = String::new();
        write!(rendered, "{}", parsed.format(format)).map_err(|_| {
            EngineError::Configuration(format!(
                "field '{}': '{format}' is not a valid date format",
                ctx.field.field
            ))
        })?;
        Ok(Content::Value(Value::String(rendered)))
    }
}

/// Accepts RFC 3339 (converted to UTC), `YYYY-MM-DD HH:MM[:SS]` with a space
/// or `T`, and bare dates (midnight).
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc).naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
