//! Rule sets derived from field definitions.

use std::collections::BTreeMap;

use breadbox_model::ResourceType;
use breadbox_types::RecordId;
use tracing::debug;

/// One parsed validation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    Nullable,
    String,
    Numeric,
    Integer,
    Boolean,
    Email,
    Date,
    Min(f64),
    Max(f64),
    In(Vec<String>),
    /// No other record of `resource` may hold the value in `column`;
    /// `ignore` excludes the record being edited.
    Unique {
        resource: String,
        column: String,
        ignore: Option<RecordId>,
    },
    /// A rule the built-in validator does not know. Kept for external
    /// validators.
    Other(String),
}

impl Rule {
    /// Parses `name[:params]`. `slug` and `field` fill in the table and
    /// column a bare `unique` refers to.
    pub fn parse(raw: &str, slug: &str, field: &str) -> Rule {
        let raw = raw.trim();
        let (name, params) = match raw.split_once(':') {
            Some((name, params)) => (name.trim().to_ascii_lowercase(), Some(params.trim())),
            None => (raw.to_ascii_lowercase(), None),
        };
        let bound = || params.and_then(|p| p.parse::<f64>().ok());

        match (name.as_str(), params) {
            ("required", _) => Rule::Required,
            ("nullable", _) => Rule::Nullable,
            ("string", _) => Rule::String,
            ("numeric", _) => Rule::Numeric,
            ("integer", _) => Rule::Integer,
            ("boolean", _) => Rule::Boolean,
            ("email", _) => Rule::Email,
            ("date", _) => Rule::Date,
            ("min", Some(_)) => bound().map_or_else(|| Rule::Other(raw.to_string()), Rule::Min),
            ("max", Some(_)) => bound().map_or_else(|| Rule::Other(raw.to_string()), Rule::Max),
            ("in", Some(list)) => Rule::In(list.split(',').map(|v| v.trim().to_string()).collect()),
            ("unique", params) => parse_unique(params, slug, field),
            _ => Rule::Other(raw.to_string()),
        }
    }

    /// The rule's name as used in message keys (`"<field>.<name>"`).
    pub fn name(&self) -> &str {
        match self {
            Rule::Required => "required",
            Rule::Nullable => "nullable",
            Rule::String => "string",
            Rule::Numeric => "numeric",
            Rule::Integer => "integer",
            Rule::Boolean => "boolean",
            Rule::Email => "email",
            Rule::Date => "date",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::In(_) => "in",
            Rule::Unique { .. } => "unique",
            Rule::Other(raw) => raw.split(':').next().unwrap_or(raw).trim(),
        }
    }
}

/// `unique[:resource[,column[,ignore]]]`
fn parse_unique(params: Option<&str>, slug: &str, field: &str) -> Rule {
    let mut parts = params.unwrap_or_default().split(',').map(str::trim);
    let resource = parts.next().filter(|p| !p.is_empty()).unwrap_or(slug);
    let column = parts.next().filter(|p| !p.is_empty()).unwrap_or(field);
    let ignore = parts.next().and_then(|p| p.parse::<RecordId>().ok());
    Rule::Unique {
        resource: resource.to_string(),
        column: column.to_string(),
        ignore,
    }
}

/// Rules per field, custom messages keyed `"<field>.<rule>"`, and display
/// names used in messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub rules: BTreeMap<String, Vec<Rule>>,
    pub messages: BTreeMap<String, String>,
    pub attributes: BTreeMap<String, String>,
}

impl RuleSet {
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules_for(&self, field: &str) -> &[Rule] {
        self.rules.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn message(&self, field: &str, rule: &str) -> Option<&str> {
        self.messages.get(&format!("{field}.{rule}")).map(String::as_str)
    }

    /// The display name for a field, or the field with underscores spaced.
    pub fn attribute(&self, field: &str) -> String {
        self.attributes
            .get(field)
            .cloned()
            .unwrap_or_else(|| field.replace('_', " "))
    }
}

/// Builds the rule set for a create (`existing == None`) or an update.
///
/// On update every rule mentioning `unique` is replaced by a uniqueness
/// check on the field's own column that ignores the edited record.
pub fn build_rules(resource: &ResourceType, existing: Option<RecordId>) -> RuleSet {
    let mut set = RuleSet::default();

    for field in &resource.fields {
        let Some(validation) = &field.validation else {
            continue;
        };
        let key = field.target_field();
        let raw_rules = validation.rule.to_list();
        if raw_rules.is_empty() {
            continue;
        }

        let rules = raw_rules
            .iter()
            .map(|raw| match existing {
                Some(id) if raw.to_ascii_lowercase().contains("unique") => Rule::Unique {
                    resource: resource.slug.clone(),
                    column: key.to_string(),
                    ignore: Some(id),
                },
                _ => Rule::parse(raw, &resource.slug, key),
            })
            .collect::<Vec<_>>();

        for (rule, message) in &validation.messages {
            set.messages.insert(format!("{key}.{rule}"), message.clone());
        }
        if !field.display_name.is_empty() {
            set.attributes.insert(key.to_string(), field.display_name.clone());
        }
        debug!("Rules for {}.{}: {:?}", resource.slug, key, rules);
        set.rules.insert(key.to_string(), rules);
    }

    set
}
