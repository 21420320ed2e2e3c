use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{ModelError, ModelResult};
use crate::field::{FieldDefinition, FieldRow};
use crate::options::RelationshipOptions;

/// Serialized form of a resource type, as found in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub slug: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldRow>,
}

/// A manageable resource: its slug and ordered field definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceType {
    pub slug: String,
    pub display_name: String,
    /// Alternate name relationships may use to reference this resource.
    pub model_name: String,
    pub fields: Vec<FieldDefinition>,
}

impl ResourceType {
    /// Builds a resource from already-decoded fields.
    pub fn new(slug: impl Into<String>, fields: Vec<FieldDefinition>) -> ModelResult<Self> {
        let slug = slug.into();
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.field.as_str()) {
                return Err(ModelError::DuplicateField {
                    resource: slug,
                    field: field.field.clone(),
                });
            }
        }
        Ok(Self {
            display_name: slug.clone(),
            model_name: slug.clone(),
            slug,
            fields,
        })
    }

    /// Decodes every field row of a configuration entry.
    pub fn from_config(config: &ResourceConfig) -> ModelResult<Self> {
        let fields = config
            .fields
            .iter()
            .map(FieldDefinition::from_row)
            .collect::<ModelResult<Vec<_>>>()?;
        let mut resource = Self::new(config.slug.clone(), fields)?;
        if let Some(name) = &config.display_name {
            resource.display_name = name.clone();
        }
        if let Some(model) = &config.model_name {
            resource.model_name = model.clone();
        }
        Ok(resource)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.field == name)
    }

    pub fn is_translatable(&self) -> bool {
        self.fields.iter().any(|f| f.translatable)
    }

    pub fn translatable_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.translatable)
    }

    /// Matches either the slug or the model name.
    pub fn answers_to(&self, model: &str) -> bool {
        self.slug == model || self.model_name == model
    }
}

/// All resource types known to the engine.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: BTreeMap<String, ResourceType>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes and registers every entry, then checks relationship targets.
    pub fn from_configs(configs: &[ResourceConfig]) -> ModelResult<Self> {
        let mut registry = Self::new();
        for config in configs {
            registry.register(ResourceType::from_config(config)?)?;
        }
        registry.check_relationships()?;
        Ok(registry)
    }

    pub fn register(&mut self, resource: ResourceType) -> ModelResult<()> {
        if self.resources.contains_key(&resource.slug) {
            return Err(ModelError::DuplicateResource(resource.slug));
        }
        self.resources.insert(resource.slug.clone(), resource);
        Ok(())
    }

    /// Every relationship must point at a registered resource.
    pub fn check_relationships(&self) -> ModelResult<()> {
        for resource in self.resources.values() {
            for field in &resource.fields {
                if let Some(options) = field.relationship_options() {
                    if self.target_of(options).is_none() {
                        return Err(ModelError::UnknownRelationshipTarget {
                            resource: resource.slug.clone(),
                            field: field.field.clone(),
                            model: options.model.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, slug: &str) -> Option<&ResourceType> {
        self.resources.get(slug)
    }

    /// Resolves the resource a relationship points at.
    pub fn target_of(&self, options: &RelationshipOptions) -> Option<&ResourceType> {
        self.resources
            .get(&options.model)
            .or_else(|| self.resources.values().find(|r| r.answers_to(&options.model)))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceType> {
        self.resources.values()
    }
}
