use breadbox_model::FieldOptions;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::{Content, ContentType, HandlerContext};
use crate::error::EngineResult;
use crate::request::UploadedFile;

/// `file` and `image`: stores the first upload and returns its path.
pub struct SingleUpload;

/// `multiple_images`: stores every upload and returns the JSON-encoded list
/// of paths.
pub struct MultipleImages;

impl ContentType for SingleUpload {
    fn produce(&self, ctx: &HandlerContext<'_>) -> EngineResult<Content> {
        match ctx.request.files(&ctx.field.field).first() {
            Some(file) => Ok(Content::Value(Value::String(store_upload(ctx, file)?))),
            None => Ok(Content::NoContent),
        }
    }
}

impl ContentType for MultipleImages {
    fn produce(&self, ctx: &HandlerContext<'_>) -> EngineResult<Content> {
        let files = ctx.request.files(&ctx.field.field);
        if files.is_empty() {
            return Ok(Content::NoContent);
        }
        let paths = files
            .iter()
            .map(|file| store_upload(ctx, file))
            .collect::<EngineResult<Vec<_>>>()?;
        Ok(Content::Value(Value::String(serde_json::to_string(&paths)?)))
    }
}

fn store_upload(ctx: &HandlerContext<'_>, file: &UploadedFile) -> EngineResult<String> {
    let disk_name = match &ctx.field.options {
        FieldOptions::Upload(options) => options.disk.as_deref(),
        _ => None,
    };
    let disk = ctx.disks.resolve(disk_name)?;
    let path = upload_path(ctx.slug, &ctx.field.field, ctx.now, file.extension().as_deref());
    let stored = disk.put(&path, &file.bytes)?;
    debug!(
        "Stored upload {} for {}.{} on disk {}",
        file.original_name,
        ctx.slug,
        ctx.field.field,
        disk.name()
    );
    Ok(stored)
}

/// `<slug>/<field>/<YYYY-MM>/<uuid-v7>[.<ext>]`.
pub(crate) fn upload_path(slug: &str, field: &str, now: DateTime<Utc>, ext: Option<&str>) -> String {
    let name = Uuid::now_v7();
    match ext {
        Some(ext) => format!("{slug}/{field}/{}/{name}.{ext}", now.format("%Y-%m")),
        None => format!("{slug}/{field}/{}/{name}", now.format("%Y-%m")),
    }
}

/// Decodes a stored image list. Anything that is not a list of strings is
/// treated as empty.
pub(crate) fn decode_paths(stored: Option<&Value>) -> Vec<String> {
    match stored {
        Some(Value::String(raw)) => serde_json::from_str(raw).unwrap_or_default(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Existing stored paths followed by newly stored ones, re-encoded.
pub(crate) fn merge_paths(existing: Option<&Value>, fresh: &Value) -> EngineResult<Value> {
    let mut paths = decode_paths(existing);
    paths.extend(decode_paths(Some(fresh)));
    Ok(Value::String(serde_json::to_string(&paths)?))
}
