//! Menu builder rows.
//!
//! Menu items are ordinary records of the [`MENU_ITEMS_RESOURCE`] resource;
//! [`MenuItem`] is the typed view over one of them.

use breadbox_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelResult;
use crate::record::Record;

/// Resource slug under which menu items are stored.
pub const MENU_ITEMS_RESOURCE: &str = "menu_items";

fn default_target() -> String {
    "_self".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(skip)]
    pub id: Option<RecordId>,
    pub menu_id: RecordId,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default)]
    pub icon_class: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub parent_id: Option<RecordId>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub parameters: Option<String>,
}

impl MenuItem {
    pub fn new(menu_id: RecordId, title: impl Into<String>) -> Self {
        Self {
            id: None,
            menu_id,
            title: title.into(),
            url: None,
            target: default_target(),
            icon_class: None,
            color: None,
            parent_id: None,
            order: 0,
            route: None,
            parameters: None,
        }
    }

    pub fn from_record(record: &Record) -> ModelResult<Self> {
        let mut item: Self = serde_json::from_value(Value::Object(record.attributes.clone()))?;
        item.id = record.id;
        Ok(item)
    }

    pub fn to_record(&self) -> ModelResult<Record> {
        let attributes = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Default::default(),
        };
        Ok(Record {
            id: self.id,
            resource: MENU_ITEMS_RESOURCE.to_string(),
            attributes,
        })
    }
}

/// One node of a submitted reorder tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuOrderNode {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuOrderNode>,
}

impl MenuOrderNode {
    pub fn leaf(id: RecordId) -> Self {
        Self {
            id,
            children: Vec::new(),
        }
    }

    pub fn with_children(id: RecordId, children: Vec<MenuOrderNode>) -> Self {
        Self {
            id,
            children,
        }
    }
}

/// How a menu item links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Route,
    Url,
}

/// Submitted fields for creating or editing a menu item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItemInput {
    #[serde(default)]
    pub menu_id: Option<RecordId>,
    #[serde(default)]
    pub title: Option<String>,
    /// JSON object of locale → title, sent by translatable menus.
    #[serde(default)]
    pub title_i18n: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub icon_class: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub parameters: Option<String>,
    #[serde(default, rename = "type")]
    pub link_type: Option<LinkType>,
}

impl MenuItemInput {
    /// Clears whichever link representation the submitted link type does
    /// not use.
    ///
    /// Route links drop the URL; URL links drop the route and its
    /// parameters. Without a link type both are left as they are.
    pub fn normalize_link(&self, item: &mut MenuItem) {
        match self.link_type {
            Some(LinkType::Route) => item.url = None,
            Some(LinkType::Url) => {
                item.route = None;
                item.parameters = Some(String::new());
            }
            None => {}
        }
    }

    /// Writes the submitted values onto an item, leaving unsent ones alone,
    /// then normalizes its link.
    pub fn apply_to(&self, item: &mut MenuItem) {
        if let Some(menu_id) = self.menu_id {
            item.menu_id = menu_id;
        }
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(target) = &self.target {
            item.target = target.clone();
        }
        if self.url.is_some() {
            item.url = self.url.clone();
        }
        if self.route.is_some() {
            item.route = self.route.clone();
        }
        if self.parameters.is_some() {
            item.parameters = self.parameters.clone();
        }
        if self.icon_class.is_some() {
            item.icon_class = self.icon_class.clone();
        }
        if self.color.is_some() {
            item.color = self.color.clone();
        }
        self.normalize_link(item);
    }
}
