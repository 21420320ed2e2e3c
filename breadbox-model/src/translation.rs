use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ModelResult;

/// Localized values for translatable fields: field → locale → value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationBundle {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl TranslationBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, locale: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(field.into())
            .or_default()
            .insert(locale.into(), value.into());
    }

    pub fn get(&self, field: &str, locale: &str) -> Option<&str> {
        self.entries
            .get(field)
            .and_then(|locales| locales.get(locale))
            .map(String::as_str)
    }

    pub fn locales_of(&self, field: &str) -> Option<&BTreeMap<String, String>> {
        self.entries.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }

    /// Number of (field, locale) pairs.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Flattened `(field, locale, value)` triples in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.entries.iter().flat_map(|(field, locales)| {
            locales
                .iter()
                .map(move |(locale, value)| (field.as_str(), locale.as_str(), value.as_str()))
        })
    }

    /// Decodes an `<field>_i18n` payload (a JSON object of locale → value).
    ///
    /// Non-string scalars are kept in their JSON text form; nulls are
    /// dropped.
    pub fn decode_locales(raw: &str) -> ModelResult<BTreeMap<String, String>> {
        let decoded: BTreeMap<String, Value> = serde_json::from_str(raw)?;
        Ok(decoded
            .into_iter()
            .filter_map(|(locale, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((locale, s)),
                other => Some((locale, other.to_string())),
            })
            .collect())
    }
}
