//! Menu items and tree reordering.

use breadbox_model::{LinkType, MENU_ITEMS_RESOURCE, MenuItem, MenuItemInput, MenuOrderNode, TranslationBundle};
use breadbox_storage::RecordStore;
use breadbox_types::RecordId;
use serde_json::Value;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::translation;

const TITLE: &str = "title";

pub struct MenuBuilder<'a> {
    store: &'a dyn RecordStore,
    config: &'a EngineConfig,
}

impl<'a> MenuBuilder<'a> {
    pub fn new(store: &'a dyn RecordStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn item(&self, id: RecordId) -> EngineResult<MenuItem> {
        let record = self
            .store
            .find(MENU_ITEMS_RESOURCE, id)?
            .ok_or_else(|| EngineError::not_found(MENU_ITEMS_RESOURCE, id))?;
        Ok(MenuItem::from_record(&record)?)
    }

    /// Items of one menu, top level first, each level by `order`.
    pub fn items(&self, menu_id: RecordId) -> EngineResult<Vec<MenuItem>> {
        let mut items = Vec::new();
        for record in self.store.all(MENU_ITEMS_RESOURCE)? {
            let item = MenuItem::from_record(&record)?;
            if item.menu_id == menu_id {
                items.push(item);
            }
        }
        items.sort_by_key(|item| (item.parent_id, item.order, item.id));
        Ok(items)
    }

    /// Applies a submitted tree: the item at position `i` of a level gets
    /// `order = i + 1` and the level's parent, then its children are
    /// walked with it as their parent.
    ///
    /// Trees deeper than `max_menu_depth` are rejected before anything is
    /// written.
    pub fn reorder(&self, nodes: &[MenuOrderNode], parent: Option<RecordId>) -> EngineResult<()> {
        let max = self.config.max_menu_depth;
        if depth_of(nodes) > max {
            return Err(EngineError::MenuTooDeep { max });
        }
        self.reorder_level(nodes, parent)
    }

    fn reorder_level(&self, nodes: &[MenuOrderNode], parent: Option<RecordId>) -> EngineResult<()> {
        for (index, node) in nodes.iter().enumerate() {
            let mut item = self.item(node.id)?;
            item.order = u32::try_from(index + 1).unwrap_or(u32::MAX);
            item.parent_id = parent;
            self.save(&mut item)?;
            debug!("Menu item {} -> order {} under {:?}", node.id, item.order, parent);

            if !node.children.is_empty() {
                self.reorder_level(&node.children, Some(node.id))?;
            }
        }
        Ok(())
    }

    /// Creates an item at the end of its menu's top level. Items without a
    /// link type are URL links.
    pub fn add_item(&self, mut input: MenuItemInput) -> EngineResult<MenuItem> {
        input.link_type.get_or_insert(LinkType::Url);
        let translations = self.take_translations(&mut input)?;
        let menu_id = input
            .menu_id
            .ok_or_else(|| EngineError::invalid("menu_id", "a menu item needs a menu"))?;

        let mut item = MenuItem::new(menu_id, input.title.clone().unwrap_or_default());
        input.apply_to(&mut item);
        item.order = self.highest_order(menu_id)? + 1;
        let id = self.save(&mut item)?;
        self.save_translations(id, &translations)?;
        debug!("Added menu item {} to menu {}", id, menu_id);
        Ok(item)
    }

    pub fn update_item(&self, id: RecordId, mut input: MenuItemInput) -> EngineResult<MenuItem> {
        let mut item = self.item(id)?;
        let translations = self.take_translations(&mut input)?;
        input.apply_to(&mut item);
        self.save(&mut item)?;
        self.save_translations(id, &translations)?;
        debug!("Updated menu item {}", id);
        Ok(item)
    }

    /// Deletes an item and its title translations. Children keep their
    /// parent id.
    pub fn delete_item(&self, id: RecordId) -> EngineResult<MenuItem> {
        let item = self.item(id)?;
        self.store.delete(MENU_ITEMS_RESOURCE, id)?;
        self.store
            .delete_translations(MENU_ITEMS_RESOURCE, id, Some(TITLE))?;
        debug!("Deleted menu item {}", id);
        Ok(item)
    }

    fn save(&self, item: &mut MenuItem) -> EngineResult<RecordId> {
        let mut record = item.to_record()?;
        let id = self.store.save(&mut record)?;
        item.id = Some(id);
        Ok(id)
    }

    fn highest_order(&self, menu_id: RecordId) -> EngineResult<u32> {
        Ok(self
            .items(menu_id)?
            .iter()
            .filter(|item| item.parent_id.is_none())
            .map(|item| item.order)
            .max()
            .unwrap_or(0))
    }

    /// Moves the default-locale `title_i18n` value into `title` and returns
    /// the other locales.
    fn take_translations(&self, input: &mut MenuItemInput) -> EngineResult<TranslationBundle> {
        let mut bundle = TranslationBundle::new();
        let Some(raw) = input.title_i18n.take() else {
            return Ok(bundle);
        };
        let mut locales = translation::decode("title_i18n", &Value::String(raw))?;
        if let Some(title) = locales.remove(&self.config.default_locale) {
            input.title = Some(title);
        }
        for (locale, value) in locales {
            bundle.insert(TITLE, locale, value);
        }
        Ok(bundle)
    }

    fn save_translations(&self, id: RecordId, bundle: &TranslationBundle) -> EngineResult<()> {
        if !bundle.is_empty() {
            self.store.save_translations(MENU_ITEMS_RESOURCE, id, bundle)?;
        }
        Ok(())
    }
}

/// Number of levels in a submitted tree.
fn depth_of(nodes: &[MenuOrderNode]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + depth_of(&node.children))
        .max()
        .unwrap_or(0)
}
