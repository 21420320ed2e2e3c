//! Rule evaluation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use breadbox_storage::RecordStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::rules::{Rule, RuleSet};
use crate::content::timestamp::parse_datetime;
use crate::content::{is_blank, scalar_text};
use crate::error::{EngineError, EngineResult};
use crate::request::{RequestInput, UploadedFile};

/// Failed rules per field, serialized as `{ field: [messages] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one failure.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(|m| m.first()).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Checks a request against a rule set.
pub trait Validator: Send + Sync {
    /// Returns [`EngineError::Validation`] listing every failed rule.
    fn validate(&self, input: &dyn RequestInput, rules: &RuleSet) -> EngineResult<()>;
}

/// The built-in validator. Uniqueness is checked against the record store.
pub struct RuleValidator {
    store: Arc<dyn RecordStore>,
}

impl RuleValidator {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn check_field(
        &self,
        input: &dyn RequestInput,
        field: &str,
        rules: &[Rule],
        set: &RuleSet,
        errors: &mut ValidationErrors,
    ) -> EngineResult<()> {
        let value = input.input(field);
        let files = input.files(field);
        let present = !files.is_empty() || value.is_some_and(|v| !is_blank(v));
        let numeric = rules.iter().any(|r| matches!(r, Rule::Numeric | Rule::Integer));

        for rule in rules {
            let failure = match rule {
                Rule::Required => (!present).then(|| ("The :attribute field is required.", None)),
                // Only `required` applies to a missing or empty value.
                _ if !present => None,
                Rule::Nullable => None,
                Rule::Other(raw) => {
                    debug!("Ignoring unsupported rule '{}' on {}", raw, field);
                    None
                }
                Rule::String => (!value.is_some_and(Value::is_string))
                    .then(|| ("The :attribute must be a string.", None)),
                Rule::Numeric => (!value.is_some_and(is_numeric))
                    .then(|| ("The :attribute must be a number.", None)),
                Rule::Integer => (!value.is_some_and(is_integer))
                    .then(|| ("The :attribute must be an integer.", None)),
                Rule::Boolean => (!value.is_some_and(is_boolean))
                    .then(|| ("The :attribute field must be true or false.", None)),
                Rule::Email => (!value.and_then(Value::as_str).is_some_and(is_email))
                    .then(|| ("The :attribute must be a valid email address.", None)),
                Rule::Date => (!value
                    .and_then(scalar_text)
                    .is_some_and(|raw| parse_datetime(&raw).is_some()))
                .then(|| ("The :attribute is not a valid date.", None)),
                Rule::Min(min) => measure(value, files, numeric)
                    .filter(|(size, _)| size < min)
                    .map(|(_, unit)| (min_template(unit), Some(*min))),
                Rule::Max(max) => measure(value, files, numeric)
                    .filter(|(size, _)| size > max)
                    .map(|(_, unit)| (max_template(unit), Some(*max))),
                Rule::In(allowed) => (!value.is_some_and(|v| is_in(v, allowed)))
                    .then(|| ("The selected :attribute is invalid.", None)),
                Rule::Unique {
                    resource,
                    column,
                    ignore,
                } => {
                    let taken = match value {
                        Some(v) => self.store.value_taken(resource, column, v, *ignore)?,
                        None => false,
                    };
                    taken.then(|| ("The :attribute has already been taken.", None))
                }
            };

            if let Some((template, bound)) = failure {
                let template = set.message(field, rule.name()).unwrap_or(template);
                errors.add(field, render(template, &set.attribute(field), bound));
            }
        }
        Ok(())
    }
}

impl Validator for RuleValidator {
    fn validate(&self, input: &dyn RequestInput, rules: &RuleSet) -> EngineResult<()> {
        let mut errors = ValidationErrors::new();
        for (field, field_rules) in &rules.rules {
            self.check_field(input, field, field_rules, rules, &mut errors)?;
        }
        if errors.is_empty() {
            Ok(())
        } else {
            debug!("Validation failed on {} field(s)", errors.len());
            Err(EngineError::Validation(errors))
        }
    }
}

#[derive(Clone, Copy)]
enum Unit {
    Number,
    Characters,
    Items,
    Kilobytes,
}

/// The size `min` / `max` compare against.
fn measure(value: Option<&Value>, files: &[UploadedFile], numeric: bool) -> Option<(f64, Unit)> {
    if let Some(file) = files.first() {
        return Some((file.bytes.len() as f64 / 1024.0, Unit::Kilobytes));
    }
    match value? {
        Value::Number(n) => n.as_f64().map(|n| (n, Unit::Number)),
        Value::String(s) if numeric => s.trim().parse::<f64>().ok().map(|n| (n, Unit::Number)),
        Value::String(s) => Some((s.chars().count() as f64, Unit::Characters)),
        Value::Array(items) => Some((items.len() as f64, Unit::Items)),
        _ => None,
    }
}

fn min_template(unit: Unit) -> &'static str {
    match unit {
        Unit::Number => "The :attribute must be at least :bound.",
        Unit::Characters => "The :attribute must be at least :bound characters.",
        Unit::Items => "The :attribute must have at least :bound items.",
        Unit::Kilobytes => "The :attribute must be at least :bound kilobytes.",
    }
}

fn max_template(unit: Unit) -> &'static str {
    match unit {
        Unit::Number => "The :attribute may not be greater than :bound.",
        Unit::Characters => "The :attribute may not be greater than :bound characters.",
        Unit::Items => "The :attribute may not have more than :bound items.",
        Unit::Kilobytes => "The :attribute may not be greater than :bound kilobytes.",
    }
}

fn render(template: &str, attribute: &str, bound: Option<f64>) -> String {
    let message = template.replace(":attribute", attribute);
    match bound {
        Some(bound) => message
            .replace(":bound", &bound.to_string())
            .replace(":min", &bound.to_string())
            .replace(":max", &bound.to_string()),
        None => message,
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
        _ => false,
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}

fn is_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_i64(), Some(0 | 1)),
        Value::String(s) => matches!(s.trim(), "0" | "1" | "true" | "false"),
        _ => false,
    }
}

fn is_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !raw.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn is_in(value: &Value, allowed: &[String]) -> bool {
    let contains = |v: &Value| scalar_text(v).is_some_and(|text| allowed.contains(&text));
    match value {
        Value::Array(items) => items.iter().all(contains),
        other => contains(other),
    }
}
