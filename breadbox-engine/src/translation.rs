//! `<field>_i18n` inputs.

use std::collections::BTreeMap;

use breadbox_model::{ResourceType, TranslationBundle};
use serde_json::{Map, Value};

use crate::error::{EngineError, EngineResult};
use crate::request::RequestInput;

/// Splits the `<field>_i18n` inputs of a translatable resource into the
/// default-locale value of each field (returned as request overrides) and a
/// bundle holding every other locale.
pub fn extract_translations(
    request: &dyn RequestInput,
    resource: &ResourceType,
    default_locale: &str,
) -> EngineResult<(TranslationBundle, Map<String, Value>)> {
    let mut bundle = TranslationBundle::new();
    let mut overrides = Map::new();

    for field in resource.translatable_fields() {
        let key = format!("{}_i18n", field.field);
        let Some(raw) = request.input(&key) else {
            continue;
        };
        for (locale, value) in decode(&key, raw)? {
            if locale == default_locale {
                overrides.insert(field.field.clone(), Value::String(value));
            } else {
                bundle.insert(field.field.as_str(), locale, value);
            }
        }
    }

    Ok((bundle, overrides))
}

/// Locale map from either a JSON-encoded string or an object.
pub(crate) fn decode(key: &str, raw: &Value) -> EngineResult<BTreeMap<String, String>> {
    let encoded = match raw {
        Value::Null => return Ok(BTreeMap::new()),
        Value::String(s) if s.trim().is_empty() => return Ok(BTreeMap::new()),
        Value::String(s) => s.clone(),
        Value::Object(_) => raw.to_string(),
        _ => return Err(EngineError::invalid(key, "expected an object of locale to value")),
    };
    TranslationBundle::decode_locales(&encoded)
        .map_err(|e| EngineError::invalid(key, e.to_string()))
}
