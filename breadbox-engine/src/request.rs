//! Submitted form data as seen by the engine.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Read access to one submitted request.
pub trait RequestInput {
    /// The raw value under `key`, if the key was submitted.
    fn input(&self, key: &str) -> Option<&Value>;

    /// True when `key` was submitted, whatever its value.
    fn has(&self, key: &str) -> bool {
        self.input(key).is_some()
    }

    /// Uploads attached under `key`, in submission order.
    fn files(&self, key: &str) -> &[UploadedFile];

    fn has_file(&self, key: &str) -> bool {
        !self.files(key).is_empty()
    }
}

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            original_name: original_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Lowercased extension of the original name, if it has a usable one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase)
    }
}

/// A request held in memory.
///
/// Deserializes from `{ "values": {...} }`; files are attached with
/// [`FormRequest::with_file`] since their bytes do not travel as JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormRequest {
    #[serde(default)]
    values: Map<String, Value>,
    #[serde(skip)]
    files: BTreeMap<String, Vec<UploadedFile>>,
}

impl FormRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Map<String, Value>) -> Self {
        Self {
            values,
            files: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn with_file(mut self, key: impl Into<String>, file: UploadedFile) -> Self {
        self.attach(key, file);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn attach(&mut self, key: impl Into<String>, file: UploadedFile) {
        self.files.entry(key.into()).or_default().push(file);
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}

impl RequestInput for FormRequest {
    fn input(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn files(&self, key: &str) -> &[UploadedFile] {
        self.files.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A request with some values replaced, used to substitute default-locale
/// translations for the submitted field values.
pub(crate) struct Overlay<'a> {
    base: &'a dyn RequestInput,
    values: Map<String, Value>,
}

impl<'a> Overlay<'a> {
    pub(crate) fn new(base: &'a dyn RequestInput, values: Map<String, Value>) -> Self {
        Self { base, values }
    }
}

impl RequestInput for Overlay<'_> {
    fn input(&self, key: &str) -> Option<&Value> {
        self.values.get(key).or_else(|| self.base.input(key))
    }

    fn files(&self, key: &str) -> &[UploadedFile] {
        self.base.files(key)
    }
}
