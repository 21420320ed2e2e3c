mod common;

use breadbox_engine::{EngineConfig, EngineError};
use breadbox_model::{LinkType, MENU_ITEMS_RESOURCE, MenuItem, MenuItemInput, MenuOrderNode};
use breadbox_types::RecordId;
use common::{Harness, harness, harness_with};
use pretty_assertions::assert_eq;

const MENU: RecordId = RecordId::new(1);

fn add(h: &Harness, title: &str) -> MenuItem {
    h.service
        .menus()
        .add_item(MenuItemInput {
            menu_id: Some(MENU),
            title: Some(title.to_string()),
            url: Some(format!("/{}", title.to_lowercase())),
            ..Default::default()
        })
        .unwrap()
}

fn id_of(item: &MenuItem) -> RecordId {
    item.id.unwrap()
}

// ── Reorder ──────────────────────────────────────────────────────

#[test]
fn reorder_assigns_positions_and_parents() {
    let h = harness();
    let a = id_of(&add(&h, "A"));
    let b = id_of(&add(&h, "B"));
    let c = id_of(&add(&h, "C"));
    let d = id_of(&add(&h, "D"));

    let tree = vec![
        MenuOrderNode::leaf(c),
        MenuOrderNode::leaf(a),
        MenuOrderNode::with_children(b, vec![MenuOrderNode::leaf(d)]),
    ];
    h.service.menus().reorder(&tree, None).unwrap();

    let menus = h.service.menus();
    let placed = |id| {
        let item = menus.item(id).unwrap();
        (item.order, item.parent_id)
    };
    assert_eq!(placed(c), (1, None));
    assert_eq!(placed(a), (2, None));
    assert_eq!(placed(b), (3, None));
    assert_eq!(placed(d), (1, Some(b)));
}

#[test]
fn reorder_parses_submitted_json() {
    let h = harness();
    let a = id_of(&add(&h, "A"));
    let b = id_of(&add(&h, "B"));
    let json = format!(r#"[{{"id":{b},"children":[{{"id":{a}}}]}}]"#);
    let tree: Vec<MenuOrderNode> = serde_json::from_str(&json).unwrap();

    h.service.menus().reorder(&tree, None).unwrap();
    assert_eq!(h.service.menus().item(a).unwrap().parent_id, Some(b));
}

#[test]
fn reorder_of_missing_item_is_not_found() {
    let h = harness();
    let err = h
        .service
        .menus()
        .reorder(&[MenuOrderNode::leaf(RecordId::new(42))], None)
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { ref resource, .. } if resource == MENU_ITEMS_RESOURCE));
}

#[test]
fn reorder_rejects_trees_deeper_than_configured() {
    let h = harness_with(EngineConfig {
        max_menu_depth: 2,
        ..EngineConfig::default()
    });
    let a = id_of(&add(&h, "A"));
    let b = id_of(&add(&h, "B"));
    let c = id_of(&add(&h, "C"));

    let tree = vec![MenuOrderNode::with_children(
        a,
        vec![MenuOrderNode::with_children(b, vec![MenuOrderNode::leaf(c)])],
    )];
    let err = h.service.menus().reorder(&tree, None).unwrap_err();
    assert!(matches!(err, EngineError::MenuTooDeep { max: 2 }));
    // Nothing was moved.
    assert_eq!(h.service.menus().item(b).unwrap().parent_id, None);
}

// ── Item CRUD ────────────────────────────────────────────────────

#[test]
fn added_items_go_to_the_end() {
    let h = harness();
    let first = add(&h, "First");
    let second = add(&h, "Second");
    assert_eq!(first.order, 1);
    assert_eq!(second.order, 2);
    assert_eq!(second.target, "_self");

    let titles: Vec<_> = h
        .service
        .menus()
        .items(MENU)
        .unwrap()
        .into_iter()
        .map(|item| item.title)
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[test]
fn route_links_drop_the_url() {
    let h = harness();
    let item = h
        .service
        .menus()
        .add_item(MenuItemInput {
            menu_id: Some(MENU),
            title: Some("Dashboard".to_string()),
            url: Some("/admin".to_string()),
            route: Some("admin.dashboard".to_string()),
            parameters: Some(r#"{"tab":"main"}"#.to_string()),
            link_type: Some(LinkType::Route),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(item.url, None);
    assert_eq!(item.route.as_deref(), Some("admin.dashboard"));
    assert_eq!(item.parameters.as_deref(), Some(r#"{"tab":"main"}"#));
}

#[test]
fn url_links_drop_the_route() {
    let h = harness();
    let item = h
        .service
        .menus()
        .add_item(MenuItemInput {
            menu_id: Some(MENU),
            title: Some("Docs".to_string()),
            url: Some("https://example.org".to_string()),
            route: Some("docs".to_string()),
            link_type: Some(LinkType::Url),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(item.route, None);
    assert_eq!(item.parameters.as_deref(), Some(""));
    assert_eq!(item.url.as_deref(), Some("https://example.org"));
}

#[test]
fn item_without_menu_is_rejected() {
    let h = harness();
    let err = h
        .service
        .menus()
        .add_item(MenuItemInput {
            title: Some("Lost".to_string()),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidValue { ref field, .. } if field == "menu_id"));
}

#[test]
fn title_translations_are_split_by_locale() {
    let h = harness();
    let item = h
        .service
        .menus()
        .add_item(MenuItemInput {
            menu_id: Some(MENU),
            title_i18n: Some(r#"{"en":"Home","de":"Startseite"}"#.to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(item.title, "Home");

    let bundle = h.store().translations(MENU_ITEMS_RESOURCE, id_of(&item)).unwrap();
    assert_eq!(bundle.get("title", "de"), Some("Startseite"));
}

#[test]
fn update_item_changes_only_sent_values() {
    let h = harness();
    let item = add(&h, "Blog");
    let id = id_of(&item);

    let updated = h
        .service
        .menus()
        .update_item(
            id,
            MenuItemInput {
                title: Some("Journal".to_string()),
                url: Some("/journal".to_string()),
                icon_class: Some("icon-book".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "Journal");
    assert_eq!(updated.order, item.order);
    assert_eq!(h.service.menus().item(id).unwrap().icon_class.as_deref(), Some("icon-book"));
}

#[test]
fn title_only_update_keeps_the_url() {
    let h = harness();
    let id = id_of(&add(&h, "Blog"));

    h.service
        .menus()
        .update_item(
            id,
            MenuItemInput {
                title: Some("Journal".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let stored = h.service.menus().item(id).unwrap();
    assert_eq!(stored.title, "Journal");
    assert_eq!(stored.url.as_deref(), Some("/blog"));
}

#[test]
fn title_only_update_of_a_route_item_keeps_the_route() {
    let h = harness();
    let item = h
        .service
        .menus()
        .add_item(MenuItemInput {
            menu_id: Some(MENU),
            title: Some("Home".to_string()),
            route: Some("home".to_string()),
            parameters: Some(r#"{"tab":"main"}"#.to_string()),
            link_type: Some(LinkType::Route),
            ..Default::default()
        })
        .unwrap();
    let id = id_of(&item);

    h.service
        .menus()
        .update_item(
            id,
            MenuItemInput {
                title: Some("Start".to_string()),
                link_type: Some(LinkType::Route),
                ..Default::default()
            },
        )
        .unwrap();

    let stored = h.service.menus().item(id).unwrap();
    assert_eq!(stored.title, "Start");
    assert_eq!(stored.route.as_deref(), Some("home"));
    assert_eq!(stored.parameters.as_deref(), Some(r#"{"tab":"main"}"#));
    assert_eq!(stored.url, None);
}

#[test]
fn switching_an_item_to_a_url_drops_its_route() {
    let h = harness();
    let item = h
        .service
        .menus()
        .add_item(MenuItemInput {
            menu_id: Some(MENU),
            title: Some("Home".to_string()),
            route: Some("home".to_string()),
            link_type: Some(LinkType::Route),
            ..Default::default()
        })
        .unwrap();
    let id = id_of(&item);

    let updated = h
        .service
        .menus()
        .update_item(
            id,
            MenuItemInput {
                url: Some("/home".to_string()),
                link_type: Some(LinkType::Url),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.url.as_deref(), Some("/home"));
    assert_eq!(updated.route, None);
    assert_eq!(updated.parameters.as_deref(), Some(""));
}

#[test]
fn delete_item_removes_it_and_its_title_translations() {
    let h = harness();
    let item = h
        .service
        .menus()
        .add_item(MenuItemInput {
            menu_id: Some(MENU),
            title_i18n: Some(r#"{"en":"Home","de":"Startseite"}"#.to_string()),
            ..Default::default()
        })
        .unwrap();
    let id = id_of(&item);

    h.service.menus().delete_item(id).unwrap();
    assert!(h.service.menus().item(id).unwrap_err().is_not_found());
    assert!(h.store().translations(MENU_ITEMS_RESOURCE, id).unwrap().is_empty());
    assert!(h.service.menus().delete_item(id).unwrap_err().is_not_found());
}
